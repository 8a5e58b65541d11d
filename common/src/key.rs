use rdev::Key;

/// Pressing this key stops the global listener.
pub const EXIT_KEY: Key = Key::Escape;

/// Maps a pressed key to its display glyph.
///
/// Special keys get a fixed symbol; printable keys use the unicode text the
/// hook reported; anything else falls back to the key's debug name (so `F1`
/// shows as "F1"). Keys with no sensible rendering yield `None` and are
/// dropped.
pub fn display_token(key: Key, name: Option<&str>) -> Option<Box<str>> {
    if let Some(symbol) = special_symbol(key) {
        return Some(symbol.into());
    }
    if let Some(name) = name {
        if !name.is_empty() && name.chars().all(|c| !c.is_control()) {
            return Some(name.into());
        }
    }
    match key {
        Key::Unknown(_) => None,
        _ => Some(format!("{key:?}").into_boxed_str()),
    }
}

fn special_symbol(key: Key) -> Option<&'static str> {
    let symbol = match key {
        Key::Space => "␣",
        Key::Return | Key::KpReturn => "⏎",
        Key::Backspace => "⌫",
        Key::Tab => "⇥",
        Key::Escape => "⎋",
        Key::ShiftLeft | Key::ShiftRight => "⇧",
        Key::ControlLeft | Key::ControlRight => "⌃",
        Key::Alt | Key::AltGr => "⌥",
        Key::MetaLeft | Key::MetaRight => "⌘",
        Key::CapsLock => "⇪",
        Key::LeftArrow => "←",
        Key::RightArrow => "→",
        Key::UpArrow => "↑",
        Key::DownArrow => "↓",
        Key::Delete => "⌦",
        Key::Home => "↖",
        Key::End => "↘",
        Key::PageUp => "⇞",
        Key::PageDown => "⇟",
        _ => return None,
    };
    Some(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_keys_map_to_symbols() {
        assert_eq!(display_token(Key::Space, Some(" ")).as_deref(), Some("␣"));
        assert_eq!(display_token(Key::Return, None).as_deref(), Some("⏎"));
        assert_eq!(display_token(Key::ShiftLeft, None).as_deref(), Some("⇧"));
        assert_eq!(display_token(Key::ShiftRight, None).as_deref(), Some("⇧"));
        assert_eq!(display_token(Key::UpArrow, None).as_deref(), Some("↑"));
        assert_eq!(display_token(Key::Escape, None).as_deref(), Some("⎋"));
    }

    #[test]
    fn printable_keys_use_reported_name() {
        assert_eq!(display_token(Key::KeyA, Some("a")).as_deref(), Some("a"));
        assert_eq!(display_token(Key::KeyA, Some("A")).as_deref(), Some("A"));
        assert_eq!(display_token(Key::Num1, Some("1")).as_deref(), Some("1"));
    }

    #[test]
    fn control_characters_fall_back_to_key_name() {
        // some platforms report control characters for unnamed keys
        assert_eq!(display_token(Key::F1, Some("\u{1b}")).as_deref(), Some("F1"));
        assert_eq!(display_token(Key::Insert, None).as_deref(), Some("Insert"));
    }

    #[test]
    fn unknown_keys_are_dropped() {
        assert_eq!(display_token(Key::Unknown(0xabcd), None), None);
    }
}
