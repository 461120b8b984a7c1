//! Text buffer with a cursor, plus the line layout the InputBox renders.
//!
//! Wrapping here is character-based (not word-based): a visual line ends at
//! a `\n` or when the next character would overflow the width. Because the
//! InputBox draws these exact lines itself, cursor math never drifts from
//! what is on screen.

use std::ops::Range;

use unicode_width::UnicodeWidthChar;

/// Display width of a char, with control chars counted as zero.
fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

fn str_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Whether a character is a "word" character (alphanumeric or underscore).
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[derive(Debug, Default, Clone, PartialEq)]
pub(super) struct EditBuffer {
    text: String,
    /// Byte offset into `text`, always on a char boundary
    cursor: usize,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Take the text out, leaving an empty buffer.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    pub fn backspace(&mut self) -> bool {
        match self.text[..self.cursor].chars().next_back() {
            Some(c) => {
                self.cursor -= c.len_utf8();
                self.text.remove(self.cursor);
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor < self.text.len() {
            self.text.remove(self.cursor);
            true
        } else {
            false
        }
    }

    pub fn move_left(&mut self) -> bool {
        match self.text[..self.cursor].chars().next_back() {
            Some(c) => {
                self.cursor -= c.len_utf8();
                true
            }
            None => false,
        }
    }

    pub fn move_right(&mut self) -> bool {
        match self.text[self.cursor..].chars().next() {
            Some(c) => {
                self.cursor += c.len_utf8();
                true
            }
            None => false,
        }
    }

    /// Start of the current logical line.
    pub fn move_home(&mut self) -> bool {
        let start = self.text[..self.cursor].rfind('\n').map_or(0, |i| i + 1);
        let moved = start != self.cursor;
        self.cursor = start;
        moved
    }

    /// End of the current logical line.
    pub fn move_end(&mut self) -> bool {
        let end = self.text[self.cursor..]
            .find('\n')
            .map_or(self.text.len(), |i| self.cursor + i);
        let moved = end != self.cursor;
        self.cursor = end;
        moved
    }

    /// Skip non-word chars backwards, then the word before them.
    pub fn move_word_left(&mut self) -> bool {
        let before = &self.text[..self.cursor];
        let mut target = self.cursor;
        let mut seen_word = false;
        for (i, c) in before.char_indices().rev() {
            if is_word_char(c) {
                seen_word = true;
            } else if seen_word {
                break;
            }
            target = i;
        }
        let moved = target != self.cursor;
        self.cursor = target;
        moved
    }

    /// Skip non-word chars forwards, then the word after them.
    pub fn move_word_right(&mut self) -> bool {
        let after = &self.text[self.cursor..];
        let mut target = self.text.len();
        let mut seen_word = false;
        for (i, c) in after.char_indices() {
            if is_word_char(c) {
                seen_word = true;
            } else if seen_word {
                target = self.cursor + i;
                break;
            }
        }
        let moved = target != self.cursor;
        self.cursor = target;
        moved
    }

    /// Move to the visual line above (`-1`) or below (`1`), keeping the
    /// column where possible. Returns false at the first/last line.
    pub fn move_vertically(&mut self, direction: i8, width: usize) -> bool {
        let lines = self.visual_lines(width);
        let (row, col) = self.cursor_position(width);
        let target = match direction {
            d if d < 0 && row > 0 => row - 1,
            d if d > 0 && row + 1 < lines.len() => row + 1,
            _ => return false,
        };

        let span = lines[target].clone();
        let mut offset = span.start;
        let mut used = 0;
        for (i, c) in self.text[span.clone()].char_indices() {
            let w = char_width(c);
            if used + w > col {
                break;
            }
            used += w;
            offset = span.start + i + c.len_utf8();
        }
        self.cursor = offset;
        true
    }

    /// Byte ranges of each visual line at `width` columns. Never empty.
    pub fn visual_lines(&self, width: usize) -> Vec<Range<usize>> {
        let width = width.max(1);
        let mut lines = Vec::new();
        let mut line_start = 0;

        for logical in self.text.split('\n') {
            let mut start = line_start;
            let mut used = 0;
            for (i, c) in logical.char_indices() {
                let w = char_width(c);
                if used + w > width && used > 0 {
                    lines.push(start..line_start + i);
                    start = line_start + i;
                    used = 0;
                }
                used += w;
            }
            lines.push(start..line_start + logical.len());
            line_start += logical.len() + 1;
        }

        lines
    }

    /// (row, column) of the cursor on the visual grid.
    pub fn cursor_position(&self, width: usize) -> (usize, usize) {
        let lines = self.visual_lines(width);
        let row = lines
            .iter()
            .rposition(|span| span.start <= self.cursor)
            .unwrap_or(0);
        let col = str_width(&self.text[lines[row].start..self.cursor]);
        (row, col)
    }
}
