/// Single-line text buffer with a byte-indexed cursor kept on char boundaries.
#[derive(Debug, Clone, Default)]
pub struct InputLine {
    pub buffer: String,
    pub cursor_position: usize,
}

impl InputLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor_position = 0;
    }

    pub fn insert_char(&mut self, c: char) {
        self.buffer.insert(self.cursor_position, c);
        self.cursor_position += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(previous) = self.previous_boundary() {
            self.buffer.remove(previous);
            self.cursor_position = previous;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor_position < self.buffer.len() {
            self.buffer.remove(self.cursor_position);
        }
    }

    pub fn move_cursor_left(&mut self) {
        if let Some(previous) = self.previous_boundary() {
            self.cursor_position = previous;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if let Some(c) = self.buffer[self.cursor_position..].chars().next() {
            self.cursor_position += c.len_utf8();
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_position = self.buffer.len();
    }

    /// Text before and after the cursor, for rendering.
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.buffer.split_at(self.cursor_position)
    }

    fn previous_boundary(&self) -> Option<usize> {
        self.buffer[..self.cursor_position]
            .char_indices()
            .next_back()
            .map(|(index, _)| index)
    }
}
