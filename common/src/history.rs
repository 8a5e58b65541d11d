use std::collections::VecDeque;

/// Bounded FIFO of recently typed display tokens.
#[derive(Debug)]
pub struct HistoryBuffer {
    tokens: VecDeque<Box<str>>,
    max_len: usize,
}

impl HistoryBuffer {
    pub fn new(max_len: usize) -> Self {
        Self {
            tokens: VecDeque::with_capacity(max_len),
            max_len,
        }
    }

    /// Appends a token, evicting the oldest entries beyond `max_len`.
    pub fn append(&mut self, token: Box<str>) {
        self.tokens.push_back(token);
        while self.tokens.len() > self.max_len {
            self.tokens.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Shrinks the bound, evicting from the front if needed.
    pub fn set_max_len(&mut self, max_len: usize) {
        self.max_len = max_len;
        while self.tokens.len() > self.max_len {
            self.tokens.pop_front();
        }
    }

    /// Space-joined tokens, truncated to the *last* `max_chars` characters.
    pub fn render(&self, max_chars: usize) -> String {
        let mut text = String::new();
        for (index, token) in self.tokens.iter().enumerate() {
            if index > 0 {
                text.push(' ');
            }
            text.push_str(token);
        }
        let char_count = text.chars().count();
        if char_count > max_chars {
            text.chars().skip(char_count - max_chars).collect()
        } else {
            text
        }
    }
}
