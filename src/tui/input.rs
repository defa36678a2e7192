use ratatui::{
    crossterm::event::{KeyCode, KeyEvent, KeyModifiers},
    style::{Modifier, Style},
    text::{Line, Span},
};

/// Single-line text buffer with a char-indexed cursor.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TextInput {
    text: String,
    cursor: usize,
}

impl TextInput {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Drains the buffer and resets the cursor.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Applies an editing key. Returns `false` for keys the buffer does not
    /// handle, such as `Enter` or `Esc`.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => self.insert(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.left(),
            KeyCode::Right => self.right(),
            KeyCode::Home => self.home(),
            KeyCode::End => self.end(),
            _ => return false,
        }
        true
    }

    /// Renders the text with the cursor cell reversed, or `hint` dimmed when
    /// empty.
    pub fn line<'a>(&'a self, hint: &'a str, focused: bool) -> Line<'a> {
        let cursor_style = Style::new().add_modifier(Modifier::REVERSED);
        if self.is_empty() {
            let mut spans = Vec::new();
            if focused {
                spans.push(Span::styled(" ", cursor_style));
            }
            spans.push(Span::styled(hint, Style::new().add_modifier(Modifier::DIM)));
            return Line::from(spans);
        }
        if !focused {
            return Line::raw(self.text.as_str());
        }

        let at = self.byte_index(self.cursor);
        let (before, rest) = self.text.split_at(at);
        let mut chars = rest.char_indices();
        let (under, after) = match chars.nth(1) {
            Some((split, _)) => rest.split_at(split),
            None if rest.is_empty() => (" ", ""),
            None => (rest, ""),
        };
        Line::from(vec![
            Span::raw(before),
            Span::styled(under, cursor_style),
            Span::raw(after),
        ])
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(s: &str) -> TextInput {
        let mut input = TextInput::default();
        s.chars().for_each(|c| input.insert(c));
        input
    }

    #[test]
    fn editing_at_cursor() {
        let mut input = typed("helo");
        input.left();
        input.insert('l');
        assert_eq!(input.text(), "hello");

        input.home();
        input.delete();
        assert_eq!(input.text(), "ello");

        input.end();
        input.backspace();
        assert_eq!(input.text(), "ell");

        input.home();
        input.backspace();
        assert_eq!(input.text(), "ell");
    }

    #[test]
    fn multibyte_text_is_char_indexed() {
        let mut input = typed("café");
        input.left();
        input.insert('x');
        assert_eq!(input.text(), "cafxé");
        input.end();
        input.backspace();
        assert_eq!(input.text(), "cafx");
    }

    #[test]
    fn cursor_is_clamped() {
        let mut input = TextInput::with_text("ab");
        input.right();
        input.right();
        input.insert('c');
        assert_eq!(input.text(), "abc");
        input.home();
        input.left();
        input.insert('_');
        assert_eq!(input.text(), "_abc");
    }

    #[test]
    fn handle_key_edits_and_reports_unhandled() {
        let mut input = TextInput::default();
        assert!(input.handle_key(KeyCode::Char('h').into()));
        assert!(input.handle_key(KeyCode::Char('i').into()));
        assert!(input.handle_key(KeyCode::Left.into()));
        assert!(input.handle_key(KeyCode::Backspace.into()));
        assert_eq!(input.text(), "i");

        assert!(!input.handle_key(KeyCode::Enter.into()));
        assert!(!input.handle_key(KeyCode::Esc.into()));
        assert!(!input.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert_eq!(input.text(), "i");
    }

    #[test]
    fn take_resets() {
        let mut input = typed("Buy milk");
        assert_eq!(input.take(), "Buy milk");
        assert!(input.is_empty());
        input.insert('x');
        assert_eq!(input.text(), "x");
    }

    fn spans(line: &Line) -> Vec<String> {
        line.spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn line_marks_cursor_cell() {
        let mut input = typed("abc");
        input.left();
        assert_eq!(spans(&input.line("hint", true)), ["ab", "c", ""]);

        input.end();
        assert_eq!(spans(&input.line("hint", true)), ["abc", " ", ""]);
        assert_eq!(spans(&input.line("hint", false)), ["abc"]);
    }

    #[test]
    fn empty_line_shows_hint() {
        let input = TextInput::default();
        let line = input.line("Enter task", false);
        assert_eq!(line.spans.len(), 1);
        assert_eq!(line.spans[0].content, "Enter task");
    }
}
