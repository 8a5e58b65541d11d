use std::time::Instant;

/// One key press, already mapped to its display token, handed from the
/// listener thread to the UI loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMessage {
    pub token: Box<str>,
    pub instant: Instant,
}

impl KeyMessage {
    pub fn new(token: Box<str>, instant: Instant) -> Self {
        Self { token, instant }
    }
}
