use std::ops::Range;

/// Editing state of a text entry. Positions are char indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditorState {
    pub value: String,
    pub caret: usize,
    pub anchor: usize,
    pub selection: Option<(usize, usize)>,
    pub marked: Option<(usize, usize)>,
}

impl EditorState {
    /// Starts with the caret after the last char.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let len = value.chars().count();
        Self {
            value,
            caret: len,
            anchor: len,
            selection: None,
            marked: None,
        }
    }

    /// Replaces the whole value, keeping the caret where it was when possible.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        let len = self.len();
        self.caret = self.caret.min(len);
        self.anchor = self.caret;
        self.selection = None;
        self.marked = None;
    }

    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn selected_text(&self) -> String {
        let Some((start, end)) = self.selection else {
            return String::new();
        };
        self.value
            .chars()
            .skip(start)
            .take(end.saturating_sub(start))
            .collect()
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.anchor = self.caret;
    }

    pub fn set_caret(&mut self, next_caret: usize, extend: bool) {
        self.caret = next_caret.min(self.len());
        if extend {
            self.selection = selection_from_anchor(self.anchor, self.caret);
        } else {
            self.clear_selection();
        }
    }

    pub fn move_left(&mut self, extend: bool) {
        if !extend {
            if let Some((start, _)) = self.selection {
                self.set_caret(start, false);
                return;
            }
        }
        self.set_caret(self.caret.saturating_sub(1), extend);
    }

    pub fn move_right(&mut self, extend: bool) {
        if !extend {
            if let Some((_, end)) = self.selection {
                self.set_caret(end, false);
                return;
            }
        }
        self.set_caret(self.caret + 1, extend);
    }

    pub fn move_home(&mut self, extend: bool) {
        let (line, _) = self.line_col(self.caret);
        self.set_caret(self.index_for_line_col(line, 0), extend);
    }

    pub fn move_end(&mut self, extend: bool) {
        let (line, _) = self.line_col(self.caret);
        self.set_caret(self.index_for_line_col(line, usize::MAX), extend);
    }

    /// Moves by whole lines, keeping the column where the target line allows.
    pub fn move_lines(&mut self, delta: isize, extend: bool) {
        let (line, column) = self.line_col(self.caret);
        let last = self.line_count().saturating_sub(1);
        let target = line.saturating_add_signed(delta).min(last);
        let next = if delta < 0 && line == 0 {
            0
        } else if delta > 0 && line == last {
            self.len()
        } else {
            self.index_for_line_col(target, column)
        };
        self.set_caret(next, extend);
    }

    pub fn select_all(&mut self) {
        self.anchor = 0;
        self.caret = self.len();
        self.selection = selection_from_anchor(0, self.caret);
    }

    pub fn delete_backward(&mut self) -> bool {
        if let Some((start, end)) = self.selection {
            self.replace_char_range(start, end, "");
            return true;
        }
        if self.caret == 0 {
            return false;
        }
        self.replace_char_range(self.caret - 1, self.caret, "");
        true
    }

    pub fn delete_forward(&mut self) -> bool {
        if let Some((start, end)) = self.selection {
            self.replace_char_range(start, end, "");
            return true;
        }
        if self.caret >= self.len() {
            return false;
        }
        self.replace_char_range(self.caret, self.caret + 1, "");
        true
    }

    pub fn insert_text(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let (start, end) = self.selection.unwrap_or((self.caret, self.caret));
        self.replace_char_range(start, end, text);
        true
    }

    pub fn replace_char_range(&mut self, start: usize, end: usize, insert: &str) {
        let len = self.len();
        let start = start.min(len);
        let end = end.min(len).max(start);
        let byte_start = byte_index_at_char(&self.value, start);
        let byte_end = byte_index_at_char(&self.value, end);
        self.value.replace_range(byte_start..byte_end, insert);
        self.caret = (start + insert.chars().count()).min(self.len());
        self.marked = None;
        self.clear_selection();
    }

    pub fn clamp_to_max_length(&mut self, max_length: Option<usize>) -> bool {
        let Some(limit) = max_length else {
            return false;
        };
        if self.len() <= limit {
            return false;
        }
        self.value = self.value.chars().take(limit).collect();
        self.caret = self.caret.min(limit);
        self.anchor = self.anchor.min(limit);
        self.selection = normalize_range(self.selection, limit);
        self.marked = normalize_range(self.marked, limit);
        true
    }

    pub fn line_count(&self) -> usize {
        self.value.split('\n').count()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.value.split('\n')
    }

    /// Zero-based line and column of a char index.
    pub fn line_col(&self, index: usize) -> (usize, usize) {
        let mut line = 0;
        let mut column = 0;
        for ch in self.value.chars().take(index) {
            if ch == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }
        (line, column)
    }

    /// Char index of `column` on `line`, clamped to the line's end.
    pub fn index_for_line_col(&self, line: usize, column: usize) -> usize {
        let mut index = 0;
        for (current, text) in self.lines().enumerate() {
            let width = text.chars().count();
            if current == line {
                return index + column.min(width);
            }
            index += width + 1;
        }
        self.len()
    }

    /// Char range of `line` without its trailing newline.
    pub fn line_range(&self, line: usize) -> Range<usize> {
        let start = self.index_for_line_col(line, 0);
        let end = self.index_for_line_col(line, usize::MAX);
        start..end
    }
}

pub fn byte_index_at_char(value: &str, char_index: usize) -> usize {
    value
        .char_indices()
        .nth(char_index)
        .map(|(index, _)| index)
        .unwrap_or(value.len())
}

pub fn char_index_at_byte(value: &str, byte_index: usize) -> usize {
    let mut byte_index = byte_index.min(value.len());
    while byte_index > 0 && !value.is_char_boundary(byte_index) {
        byte_index -= 1;
    }
    value[..byte_index].chars().count()
}

pub fn char_index_from_utf16(value: &str, utf16_index: usize) -> usize {
    let mut utf16_count = 0usize;
    let mut char_index = 0usize;
    for ch in value.chars() {
        if utf16_count >= utf16_index {
            break;
        }
        utf16_count += ch.len_utf16();
        char_index += 1;
    }
    char_index
}

pub fn utf16_from_char(value: &str, char_index: usize) -> usize {
    value.chars().take(char_index).map(char::len_utf16).sum()
}

pub fn char_range_from_utf16(value: &str, range: Range<usize>) -> Range<usize> {
    let start = char_index_from_utf16(value, range.start);
    let end = char_index_from_utf16(value, range.end);
    if start <= end { start..end } else { end..start }
}

pub fn utf16_range_from_char(value: &str, range: Range<usize>) -> Range<usize> {
    utf16_from_char(value, range.start)..utf16_from_char(value, range.end)
}

fn normalize_range(range: Option<(usize, usize)>, len: usize) -> Option<(usize, usize)> {
    let (start, end) = range?;
    let (start, end) = (start.min(len), end.min(len));
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    (start < end).then_some((start, end))
}

fn selection_from_anchor(anchor: usize, caret: usize) -> Option<(usize, usize)> {
    match anchor.cmp(&caret) {
        std::cmp::Ordering::Equal => None,
        std::cmp::Ordering::Less => Some((anchor, caret)),
        std::cmp::Ordering::Greater => Some((caret, anchor)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_replaces_the_selection() {
        let mut editor = EditorState::new("hello world");
        editor.set_caret(6, false);
        editor.set_caret(11, true);
        assert_eq!(editor.selected_text(), "world");
        editor.insert_text("there");
        assert_eq!(editor.value, "hello there");
        assert_eq!(editor.caret, 11);
        assert_eq!(editor.selection, None);
    }

    #[test]
    fn deletes_respect_text_edges() {
        let mut editor = EditorState::new("ab");
        assert!(!editor.delete_forward());
        assert!(editor.delete_backward());
        assert_eq!(editor.value, "a");
        editor.set_caret(0, false);
        assert!(!editor.delete_backward());
    }

    #[test]
    fn max_length_trims_tail_and_caret() {
        let mut editor = EditorState::new("abcdef");
        assert!(editor.clamp_to_max_length(Some(4)));
        assert_eq!(editor.value, "abcd");
        assert_eq!(editor.caret, 4);
        assert!(!editor.clamp_to_max_length(None));
    }

    #[test]
    fn vertical_moves_keep_the_column() {
        let mut editor = EditorState::new("first\nab\nthird");
        editor.set_caret(4, false);
        editor.move_lines(1, false);
        assert_eq!(editor.line_col(editor.caret), (1, 2));
        editor.move_lines(1, false);
        assert_eq!(editor.line_col(editor.caret), (2, 2));
        editor.move_lines(1, false);
        assert_eq!(editor.caret, editor.len());
        editor.move_home(false);
        assert_eq!(editor.line_col(editor.caret), (2, 0));
    }

    #[test]
    fn multibyte_text_maps_between_units() {
        let value = "aé😀b";
        assert_eq!(byte_index_at_char(value, 2), 3);
        assert_eq!(char_index_at_byte(value, 4), 2);
        assert_eq!(utf16_from_char(value, 3), 4);
        assert_eq!(char_range_from_utf16(value, 4..1), 1..3);
    }
}
