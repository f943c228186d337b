//! egui keyboard events → bytes for the child process.

use egui::{Key, Modifiers};

/// Terminal modes that change what a key sends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyModes {
    /// DECCKM: cursor keys send SS3 instead of CSI sequences
    pub app_cursor: bool,
}

/// Bytes for a key press that does not produce text, or `None` when the
/// key should be left to the text event (or ignored).
pub fn encode_key(key: Key, modifiers: Modifiers, modes: KeyModes) -> Option<Vec<u8>> {
    if modifiers.ctrl && !modifiers.alt {
        if let Some(byte) = control_byte(key) {
            return Some(vec![byte]);
        }
    }

    let cursor = |normal: &'static [u8], app: &'static [u8]| {
        if modes.app_cursor { app } else { normal }
    };

    let bytes: &[u8] = match key {
        Key::Enter => b"\r",
        Key::Backspace => b"\x7f",
        Key::Tab if modifiers.shift => b"\x1b[Z",
        Key::Tab => b"\t",
        Key::Escape => b"\x1b",
        Key::ArrowUp => cursor(b"\x1b[A", b"\x1bOA"),
        Key::ArrowDown => cursor(b"\x1b[B", b"\x1bOB"),
        Key::ArrowRight => cursor(b"\x1b[C", b"\x1bOC"),
        Key::ArrowLeft => cursor(b"\x1b[D", b"\x1bOD"),
        Key::Home => cursor(b"\x1b[H", b"\x1bOH"),
        Key::End => cursor(b"\x1b[F", b"\x1bOF"),
        Key::Insert => b"\x1b[2~",
        Key::Delete => b"\x1b[3~",
        Key::PageUp => b"\x1b[5~",
        Key::PageDown => b"\x1b[6~",
        Key::F1 => b"\x1bOP",
        Key::F2 => b"\x1bOQ",
        Key::F3 => b"\x1bOR",
        Key::F4 => b"\x1bOS",
        Key::F5 => b"\x1b[15~",
        Key::F6 => b"\x1b[17~",
        Key::F7 => b"\x1b[18~",
        Key::F8 => b"\x1b[19~",
        Key::F9 => b"\x1b[20~",
        Key::F10 => b"\x1b[21~",
        Key::F11 => b"\x1b[23~",
        Key::F12 => b"\x1b[24~",
        _ => return None,
    };

    Some(bytes.to_vec())
}

/// Ctrl+letter and the few punctuation chords terminals map to C0 codes
fn control_byte(key: Key) -> Option<u8> {
    let byte = match key {
        Key::A => 0x01,
        Key::B => 0x02,
        Key::C => 0x03,
        Key::D => 0x04,
        Key::E => 0x05,
        Key::F => 0x06,
        Key::G => 0x07,
        Key::H => 0x08,
        Key::I => 0x09,
        Key::J => 0x0a,
        Key::K => 0x0b,
        Key::L => 0x0c,
        Key::M => 0x0d,
        Key::N => 0x0e,
        Key::O => 0x0f,
        Key::P => 0x10,
        Key::Q => 0x11,
        Key::R => 0x12,
        Key::S => 0x13,
        Key::T => 0x14,
        Key::U => 0x15,
        Key::V => 0x16,
        Key::W => 0x17,
        Key::X => 0x18,
        Key::Y => 0x19,
        Key::Z => 0x1a,
        Key::OpenBracket => 0x1b,
        Key::Backslash => 0x1c,
        Key::CloseBracket => 0x1d,
        Key::Space => 0x00,
        _ => return None,
    };
    Some(byte)
}

/// Normalize pasted text line endings to carriage returns.
pub fn paste_bytes(text: &str) -> Vec<u8> {
    text.replace("\r\n", "\r").replace('\n', "\r").into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_letters_map_to_c0() {
        assert_eq!(
            encode_key(Key::C, Modifiers::CTRL, KeyModes::default()),
            Some(vec![0x03])
        );
        assert_eq!(
            encode_key(Key::Z, Modifiers::CTRL, KeyModes::default()),
            Some(vec![0x1a])
        );
    }

    #[test]
    fn plain_letters_are_left_to_text_events() {
        assert_eq!(encode_key(Key::C, Modifiers::NONE, KeyModes::default()), None);
    }

    #[test]
    fn cursor_keys_follow_app_cursor_mode() {
        assert_eq!(
            encode_key(Key::ArrowUp, Modifiers::NONE, KeyModes::default()),
            Some(b"\x1b[A".to_vec())
        );
        assert_eq!(
            encode_key(Key::ArrowUp, Modifiers::NONE, KeyModes { app_cursor: true }),
            Some(b"\x1bOA".to_vec())
        );
    }

    #[test]
    fn editing_keys() {
        let none = KeyModes::default();
        assert_eq!(encode_key(Key::Enter, Modifiers::NONE, none), Some(b"\r".to_vec()));
        assert_eq!(encode_key(Key::Backspace, Modifiers::NONE, none), Some(vec![0x7f]));
        assert_eq!(encode_key(Key::Tab, Modifiers::SHIFT, none), Some(b"\x1b[Z".to_vec()));
        assert_eq!(encode_key(Key::Delete, Modifiers::NONE, none), Some(b"\x1b[3~".to_vec()));
    }

    #[test]
    fn paste_uses_carriage_returns() {
        assert_eq!(paste_bytes("a\r\nb\nc"), b"a\rb\rc".to_vec());
    }
}
