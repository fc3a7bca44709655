//! Fixed key → action mapping shared by every adapter.
//!
//! Mirrors the keyboard wiring of the GUI shells: digits, `.`, `Enter`/`=`,
//! `Backspace`, `Escape`/`c`, the five operator keys, and `n` for negate.
//! Anything else maps to nothing and is dropped by the caller.

use crate::calculator::{Calculator, Operator};

/// A single calculator input event, decoded from a key name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Digit(char),
    Decimal,
    Operator(Operator),
    Negate,
    Equals,
    Clear,
    Delete,
}

/// Decode a key event name (`"7"`, `"."`, `"Enter"`, `"Backspace"`, ...)
/// into an [`Action`]. Unmapped keys return `None`.
pub fn map_key(key: &str) -> Option<Action> {
    match key {
        "Enter" | "=" => Some(Action::Equals),
        "Backspace" => Some(Action::Delete),
        "Escape" | "c" | "C" => Some(Action::Clear),
        "." => Some(Action::Decimal),
        "n" => Some(Action::Negate),
        _ => {
            let mut chars = key.chars();
            let first = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            if first.is_ascii_digit() {
                return Some(Action::Digit(first));
            }
            Operator::from_symbol(key).map(Action::Operator)
        }
    }
}

/// Single-character convenience wrapper around [`map_key`].
pub fn map_char(ch: char) -> Option<Action> {
    let mut buf = [0u8; 4];
    map_key(ch.encode_utf8(&mut buf))
}

/// Feed a keystroke string into a session: either one named key
/// (`"Enter"`, `"Escape"`, ...) or a run of single-character keys
/// (`"2+3*4="`). Unmapped characters are skipped.
pub fn press_keys(calc: &mut Calculator, keys: &str) {
    if keys.chars().count() > 1 {
        if let Some(action) = map_key(keys) {
            calc.apply(action);
            return;
        }
    }
    for ch in keys.chars() {
        if let Some(action) = map_char(ch) {
            calc.apply(action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_map_to_digit_actions() {
        for d in '0'..='9' {
            assert_eq!(map_char(d), Some(Action::Digit(d)));
        }
    }

    #[test]
    fn ascii_operator_aliases() {
        assert_eq!(map_key("*"), Some(Action::Operator(Operator::Multiply)));
        assert_eq!(map_key("/"), Some(Action::Operator(Operator::Divide)));
        assert_eq!(map_key("-"), Some(Action::Operator(Operator::Subtract)));
        assert_eq!(map_key("+"), Some(Action::Operator(Operator::Add)));
        assert_eq!(map_key("%"), Some(Action::Operator(Operator::Percent)));
    }

    #[test]
    fn display_symbols_map_too() {
        assert_eq!(map_key("×"), Some(Action::Operator(Operator::Multiply)));
        assert_eq!(map_key("÷"), Some(Action::Operator(Operator::Divide)));
        assert_eq!(map_key("−"), Some(Action::Operator(Operator::Subtract)));
    }

    #[test]
    fn named_keys() {
        assert_eq!(map_key("Enter"), Some(Action::Equals));
        assert_eq!(map_key("="), Some(Action::Equals));
        assert_eq!(map_key("Backspace"), Some(Action::Delete));
        assert_eq!(map_key("Escape"), Some(Action::Clear));
        assert_eq!(map_key("c"), Some(Action::Clear));
        assert_eq!(map_key("n"), Some(Action::Negate));
    }

    #[test]
    fn unmapped_keys_are_none() {
        assert_eq!(map_key("Tab"), None);
        assert_eq!(map_key("q"), None);
        assert_eq!(map_key(""), None);
        assert_eq!(map_key("12"), None);
    }

    #[test]
    fn press_keys_feeds_sequences_and_named_keys() {
        let mut calc = Calculator::new();
        press_keys(&mut calc, "12+3");
        press_keys(&mut calc, "Enter");
        assert_eq!(calc.display(), "15");

        press_keys(&mut calc, "Escape");
        assert_eq!(calc.display(), "0");
    }

    #[test]
    fn press_keys_skips_unmapped_characters() {
        let mut calc = Calculator::new();
        press_keys(&mut calc, "1a2b3");
        assert_eq!(calc.display(), "123");
    }
}
