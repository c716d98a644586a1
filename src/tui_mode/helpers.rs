use crate::calc_engine::{FunctionName, Operator};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Breaks `text` into lines at most `width` columns wide. Words wider than a
/// line are split between grapheme clusters.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let joined = if line.is_empty() {
            word.width()
        } else {
            line.width() + 1 + word.width()
        };
        if joined <= width {
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
            continue;
        }

        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        for grapheme in word.graphemes(true) {
            if !line.is_empty() && line.width() + grapheme.width() > width {
                lines.push(std::mem::take(&mut line));
            }
            line.push_str(grapheme);
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn name_style(name: &str, base_style: Style) -> Style {
    if FunctionName::from_name(name).is_some() {
        Style::default()
            .fg(Color::LightBlue)
            .add_modifier(Modifier::BOLD)
    } else {
        base_style
    }
}

/// Colours numbers, operators and known function names of an expression.
pub fn highlight_expression(expr: &str, base_style: Style) -> Vec<Span<'static>> {
    let operator_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let number_style = Style::default().fg(Color::LightGreen);

    let mut spans = Vec::new();
    let mut current = String::new();
    let mut in_name = false;
    let mut in_number = false;

    let flush = |spans: &mut Vec<Span<'static>>, current: &mut String, in_name: &mut bool, in_number: &mut bool| {
        if *in_name {
            let style = name_style(current, base_style);
            spans.push(Span::styled(std::mem::take(current), style));
        } else if *in_number {
            spans.push(Span::styled(std::mem::take(current), number_style));
        }
        *in_name = false;
        *in_number = false;
    };

    for c in expr.chars() {
        if c.is_alphabetic() {
            if in_number {
                flush(&mut spans, &mut current, &mut in_name, &mut in_number);
            }
            current.push(c);
            in_name = true;
        } else if c.is_ascii_digit() || c == '.' {
            if in_name {
                flush(&mut spans, &mut current, &mut in_name, &mut in_number);
            }
            current.push(c);
            in_number = true;
        } else {
            flush(&mut spans, &mut current, &mut in_name, &mut in_number);
            match Operator::from_char(c) {
                Some(_) => spans.push(Span::styled(c.to_string(), operator_style)),
                None if c == ' ' => spans.push(Span::raw(" ")),
                None => spans.push(Span::styled(c.to_string(), base_style)),
            }
        }
    }
    flush(&mut spans, &mut current, &mut in_name, &mut in_number);

    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn wraps_on_words() {
        assert_eq!(wrap_text("a bb ccc", 4), vec!["a bb", "ccc"]);
        assert_eq!(wrap_text("abcdef", 4), vec!["abcd", "ef"]);
        assert_eq!(wrap_text("anything", 0), vec![""]);
        assert_eq!(wrap_text("ab cdefgh i", 3), vec!["ab", "cde", "fgh", "i"]);
        assert_eq!(wrap_text("１２３", 4), vec!["１２", "３"]);
        assert!(wrap_text("   ", 5).is_empty());
    }

    #[test]
    fn highlight_splits_tokens() {
        let base = Style::default().fg(Color::Cyan);
        let spans = highlight_expression("sqrt(16)+x", base);
        let texts: Vec<&str> = spans.iter().map(|span| span.content.as_ref()).collect();
        assert_eq!(texts, vec!["sqrt", "(", "16", ")", "+", "x"]);

        assert_eq!(spans[0].style.fg, Some(Color::LightBlue));
        assert_eq!(spans[2].style.fg, Some(Color::LightGreen));
        assert_eq!(spans[4].style.fg, Some(Color::Yellow));
        assert_eq!(spans[5].style, base);
    }
}
