use crate::calc_engine::AngleMode;
use crate::session::{parse_command, Command, HistoryEntry};
use tracing::info;
use unicode_segmentation::UnicodeSegmentation;

pub struct App {
    pub input: String,
    /// Cursor position in grapheme clusters.
    pub cursor_position: usize,
    pub input_scroll: usize,
    pub history: Vec<HistoryEntry>,
    pub cursor_history: usize,
    pub angle_mode: AngleMode,
    pub should_quit: bool,
    pub show_help: bool,
    pub help_scroll: usize,
    pub list_height: usize,
    pub item_start_indices: Vec<usize>,
    pub history_scroll: usize,
    pub scroll_to_bottom: bool,
    pub terminal_too_small: bool,
}

impl App {
    pub fn new(angle_mode: AngleMode) -> Self {
        App {
            input: String::new(),
            cursor_position: 0,
            input_scroll: 0,
            history: Vec::new(),
            cursor_history: 0,
            angle_mode,
            should_quit: false,
            show_help: false,
            help_scroll: 0,
            list_height: 5,
            item_start_indices: Vec::new(),
            history_scroll: 0,
            scroll_to_bottom: false,
            terminal_too_small: false,
        }
    }

    fn input_len(&self) -> usize {
        self.input.graphemes(true).count()
    }

    pub fn adjust_input_scroll(&mut self, visible_width: usize) {
        let total = self.input_len();
        let cursor_pos = self.cursor_position;

        if cursor_pos < self.input_scroll {
            self.input_scroll = cursor_pos;
        } else if cursor_pos >= self.input_scroll + visible_width {
            self.input_scroll = cursor_pos - visible_width + 1;
        }

        if self.input_scroll > total.saturating_sub(visible_width) {
            self.input_scroll = total.saturating_sub(visible_width);
        }
    }

    pub fn submit(&mut self) {
        let Some(command) = parse_command(&self.input) else {
            return;
        };

        match command {
            Command::Quit => {
                self.should_quit = true;
                return;
            }
            Command::Clear => {
                self.history.clear();
                self.cursor_history = 0;
                self.history_scroll = 0;
            }
            Command::Help => {
                self.show_help = true;
                self.help_scroll = 0;
            }
            Command::SetMode(mode) => self.set_angle_mode(mode),
            Command::MissingExpression => {
                // Shown like a failed evaluation of the bare word.
                let entry = HistoryEntry::evaluate("details", false, self.angle_mode);
                self.push_entry(entry);
            }
            Command::Evaluate {
                expression,
                detailed,
            } => {
                let entry = HistoryEntry::evaluate(expression, detailed, self.angle_mode);
                self.push_entry(entry);
            }
        }
        self.clear_input();
    }

    fn push_entry(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
        self.cursor_history = self.history.len().saturating_sub(1);
        self.scroll_to_bottom = true;
    }

    pub fn set_angle_mode(&mut self, mode: AngleMode) {
        if self.angle_mode != mode {
            info!(from = %self.angle_mode, to = %mode, "angle mode changed");
        }
        self.angle_mode = mode;
    }

    pub fn toggle_angle_mode(&mut self) {
        self.set_angle_mode(self.angle_mode.toggle());
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_idx = Self::grapheme_index_to_byte_index(&self.input, self.cursor_position);
        let before = self.input_len();
        self.input.insert(byte_idx, c);
        // a combining mark joins the previous cluster instead of adding one
        if self.input_len() > before {
            self.cursor_position += 1;
        }
    }

    pub fn delete_before_cursor(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            self.delete_at_cursor();
        }
    }

    pub fn delete_at_cursor(&mut self) {
        let start = Self::grapheme_index_to_byte_index(&self.input, self.cursor_position);
        let end = Self::grapheme_index_to_byte_index(&self.input, self.cursor_position + 1);
        self.input.drain(start..end);
    }

    pub fn move_cursor(&mut self, direction: i32) {
        match direction {
            -1 => self.cursor_position = self.cursor_position.saturating_sub(1),
            1 => self.cursor_position = (self.cursor_position + 1).min(self.input_len()),
            _ => {}
        }
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor_position = self.input_len();
    }

    pub fn move_cursor_by_words(&mut self, direction: i32) {
        let graphemes: Vec<&str> = self.input.graphemes(true).collect();
        let is_space = |g: &str| g.chars().all(char::is_whitespace);
        let mut pos = self.cursor_position;

        if direction < 0 {
            while pos > 0 && is_space(graphemes[pos - 1]) {
                pos -= 1;
            }
            while pos > 0 && !is_space(graphemes[pos - 1]) {
                pos -= 1;
            }
        } else {
            let len = graphemes.len();
            while pos < len && !is_space(graphemes[pos]) {
                pos += 1;
            }
            while pos < len && is_space(graphemes[pos]) {
                pos += 1;
            }
        }
        self.cursor_position = pos;
    }

    pub fn navigate_history(&mut self, direction: i32) {
        if direction < 0 && self.cursor_history > 0 {
            self.cursor_history -= 1;
        } else if direction > 0 && self.cursor_history < self.history.len().saturating_sub(1) {
            self.cursor_history += 1;
        }

        if self.cursor_history < self.history.len() {
            self.input = self.history[self.cursor_history].input.clone();
        } else {
            self.input.clear();
        }
        self.move_cursor_to_end();
        self.input_scroll = 0;
        self.scroll_to_bottom = false;
    }

    pub fn scroll_history(&mut self, direction: i32) {
        let step = self.list_height.saturating_sub(1);
        if direction < 0 {
            self.cursor_history = self.cursor_history.saturating_sub(step);
        } else {
            self.cursor_history = self
                .cursor_history
                .saturating_add(step)
                .min(self.history.len().saturating_sub(1));
        }

        if self.cursor_history < self.history.len() {
            self.input = self.history[self.cursor_history].input.clone();
        }
        self.move_cursor_to_end();
        self.input_scroll = 0;
        self.scroll_to_bottom = false;
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
        self.input_scroll = 0;
    }

    pub fn grapheme_index_to_byte_index(s: &str, index: usize) -> usize {
        s.grapheme_indices(true)
            .nth(index)
            .map(|(i, _)| i)
            .unwrap_or_else(|| s.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn type_line(app: &mut App, line: &str) {
        for c in line.chars() {
            app.insert_char(c);
        }
    }

    #[test]
    fn submit_records_transcript() {
        let mut app = App::new(AngleMode::Radians);
        type_line(&mut app, "2 + 3 * 4");
        app.submit();

        assert_eq!(app.history.len(), 1);
        assert_eq!(app.history[0].transcript_line(), "2+3*4 = 14.0");
        assert!(app.input.is_empty());
        assert_eq!(app.cursor_position, 0);
        assert!(app.scroll_to_bottom);
    }

    #[test]
    fn errors_are_kept_in_history() {
        let mut app = App::new(AngleMode::Radians);
        type_line(&mut app, "(2+3");
        app.submit();
        assert_eq!(app.history[0].outcome(), "ERROR: INVALID FUNCTION USED");
    }

    #[test]
    fn mode_commands_switch_trig() {
        let mut app = App::new(AngleMode::Radians);
        type_line(&mut app, "deg");
        app.submit();
        assert_eq!(app.angle_mode, AngleMode::Degrees);
        assert!(app.history.is_empty());

        type_line(&mut app, "cos(180)");
        app.submit();
        assert_eq!(app.history[0].outcome(), "-1.0");

        app.toggle_angle_mode();
        assert_eq!(app.angle_mode, AngleMode::Radians);
    }

    #[test]
    fn clear_and_quit() {
        let mut app = App::new(AngleMode::Radians);
        type_line(&mut app, "1+1");
        app.submit();
        type_line(&mut app, "clear");
        app.submit();
        assert!(app.history.is_empty());

        type_line(&mut app, "q");
        app.submit();
        assert!(app.should_quit);
    }

    #[test]
    fn editing_works_on_graphemes() {
        let mut app = App::new(AngleMode::Radians);
        type_line(&mut app, "1é2");
        assert_eq!(app.cursor_position, 3);

        app.move_cursor(-1);
        app.delete_before_cursor();
        assert_eq!(app.input, "12");
        assert_eq!(app.cursor_position, 1);

        app.delete_at_cursor();
        assert_eq!(app.input, "1");
    }

    #[test]
    fn word_jumps() {
        let mut app = App::new(AngleMode::Radians);
        type_line(&mut app, "sin(30) + 2");
        app.move_cursor_by_words(-1);
        assert_eq!(app.cursor_position, 10);
        app.move_cursor_by_words(-1);
        assert_eq!(app.cursor_position, 8);
        app.move_cursor_by_words(1);
        assert_eq!(app.cursor_position, 10);
    }

    #[test]
    fn history_recall() {
        let mut app = App::new(AngleMode::Radians);
        for line in ["1+1", "2+2", "3+3"] {
            type_line(&mut app, line);
            app.submit();
        }
        app.navigate_history(-1);
        assert_eq!(app.input, "2+2");
        assert_eq!(app.cursor_position, 3);
        app.navigate_history(1);
        assert_eq!(app.input, "3+3");
    }
}
