/// Single-line editable text with a cursor, used for form fields and the search box.
///
/// The cursor is a byte offset that always sits on a char boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    cursor: usize,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn set<T: Into<String>>(&mut self, value: T) {
        let value: String = value.into();
        self.text = value.replace(['\n', '\r'], " ");
        self.cursor = self.text.len();
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' || ch == '\r' {
            return;
        }
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.text.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.text.drain(self.cursor..next);
        }
    }

    /// Ctrl+W: drop the word before the cursor along with trailing spaces.
    pub fn delete_word(&mut self) {
        let head = &self.text[..self.cursor];
        let trimmed = head.trim_end_matches(' ');
        let start = trimmed.rfind(' ').map(|idx| idx + 1).unwrap_or(0);
        self.text.drain(start..self.cursor);
        self.cursor = start;
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.cursor = next;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Column of the cursor counted in chars, for placing the terminal cursor.
    pub fn cursor_col(&self) -> usize {
        self.text[..self.cursor].chars().count()
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.text[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(idx, _)| idx)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.text[self.cursor..]
            .chars()
            .next()
            .map(|ch| self.cursor + ch.len_utf8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_places_cursor_at_end() {
        let mut buffer = TextBuffer::new();
        buffer.set("hello");

        assert_eq!(buffer.as_str(), "hello");
        assert_eq!(buffer.cursor_col(), 5);
    }

    #[test]
    fn set_flattens_newlines() {
        let mut buffer = TextBuffer::new();
        buffer.set("two\nlines");
        assert_eq!(buffer.as_str(), "two lines");
    }

    #[test]
    fn edits_respect_multibyte_chars() {
        let mut buffer = TextBuffer::new();
        buffer.set("café");
        buffer.move_left();
        buffer.insert_char('!');
        assert_eq!(buffer.as_str(), "caf!é");
        assert_eq!(buffer.cursor_col(), 4);

        buffer.move_end();
        buffer.backspace();
        assert_eq!(buffer.as_str(), "caf!");

        buffer.move_home();
        buffer.delete_char();
        assert_eq!(buffer.as_str(), "af!");
        assert_eq!(buffer.cursor_col(), 0);
    }

    #[test]
    fn delete_word_removes_previous_word() {
        let mut buffer = TextBuffer::new();
        buffer.set("buy oat milk  ");
        buffer.delete_word();
        assert_eq!(buffer.as_str(), "buy oat ");
        buffer.delete_word();
        buffer.delete_word();
        assert_eq!(buffer.as_str(), "");
    }

    #[test]
    fn ignores_line_breaks_and_boundary_moves() {
        let mut buffer = TextBuffer::new();
        buffer.insert_char('\n');
        buffer.backspace();
        buffer.move_left();
        buffer.delete_char();
        buffer.move_right();
        assert_eq!(buffer.as_str(), "");
        assert_eq!(buffer.cursor_col(), 0);
    }
}
