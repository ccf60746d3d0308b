//! Keyboard port.
//!
//! Host key events are translated into Triton key codes and latched in the
//! port-0 buffer. Bit 7 is the strobe: held while the key is down, cleared
//! on release. Reading the port does not clear the strobe; the bit follows
//! the key state.

use triton_common::key::Key;

#[derive(Default)]
pub struct Keyboard {
    buffer: u8,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current port-0 value.
    pub fn buffer(&self) -> u8 {
        self.buffer
    }

    /// Latch a host key event. Unrecognized keys leave the buffer alone.
    pub fn handle_event(&mut self, key: Key, pressed: bool, shifted: bool, ctrl: bool) {
        if let Some(code) = key_code(key, shifted, ctrl) {
            self.buffer = if pressed { code | 0x80 } else { code };
        }
    }
}

/// Triton key code for a host key under the given modifiers, or `None`
/// when the combination produces nothing on the Triton keyboard.
pub fn key_code(key: Key, shifted: bool, ctrl: bool) -> Option<u8> {
    if ctrl {
        if let Some(i) = key.letter_index() {
            return Some(0x01 + i);
        }
        return match key {
            Key::Quote => Some(0x00),
            Key::Backslash => Some(0x1c),
            Key::LBracket => Some(0x1b),
            Key::RBracket => Some(0x1d),
            _ => None,
        };
    }

    // Keys that ignore shift.
    match key {
        Key::Escape => return Some(0x1b),
        Key::Space => return Some(0x20),
        Key::Enter => return Some(0x0d),
        Key::Backspace | Key::Left => return Some(0x08),
        Key::Right => return Some(0x09),
        Key::Down => return Some(0x0a),
        Key::Up => return Some(0x0b),
        _ => {}
    }

    if !shifted {
        if let Some(i) = key.letter_index() {
            return Some(0x61 + i);
        }
        if let Some(d) = key.digit_value() {
            return Some(0x30 + d);
        }
        match key {
            Key::LBracket => Some(0x5b),
            Key::RBracket => Some(0x5d),
            Key::Semicolon => Some(0x3b),
            Key::Comma => Some(0x2c),
            Key::Period => Some(0x2e),
            Key::Quote => Some(0x27),
            Key::Slash => Some(0x2f),
            Key::Backslash => Some(0x5c),
            Key::Equals => Some(0x3d),
            Key::Minus => Some(0x2d),
            _ => None,
        }
    } else {
        if let Some(i) = key.letter_index() {
            return Some(0x41 + i);
        }
        // UK layout, as on the original machine.
        match key {
            Key::Num0 => Some(0x29),
            Key::Num1 => Some(0x21),
            Key::Num2 => Some(0x22),
            Key::Num3 => Some(0x23),
            Key::Num4 => Some(0x24),
            Key::Num5 => Some(0x25),
            Key::Num6 => Some(0x5e),
            Key::Num7 => Some(0x26),
            Key::Num8 => Some(0x2a),
            Key::Num9 => Some(0x28),
            Key::LBracket => Some(0x7b),
            Key::RBracket => Some(0x7d),
            Key::Semicolon => Some(0x3a),
            Key::Comma => Some(0x3c),
            Key::Period => Some(0x3e),
            Key::Quote => Some(0x40),
            Key::Slash => Some(0x3f),
            Key::Backslash => Some(0x7c),
            Key::Equals => Some(0x2b),
            Key::Minus => Some(0x5f),
            _ => None,
        }
    }
}
