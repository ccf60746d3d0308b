/// Logical key codes shared between frontends and machines.
///
/// This is the subset of a host keyboard that the emulated machines care
/// about; frontends map their native scancodes onto it and anything else
/// collapses to `None`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
    Escape,
    Space,
    Enter,
    Backspace,
    Left,
    Right,
    Up,
    Down,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Period,
    Quote,
    Slash,
    Backslash,
    Equals,
    Minus,
    LShift,
    RShift,
    LCtrl,
    RCtrl,
    F1,
    F2,
    F3,
    F4,
    F9,
    None,
}

impl Key {
    /// Letter index for A..Z, used by machines that map letters as a block.
    pub fn letter_index(self) -> Option<u8> {
        let i = match self {
            Key::A => 0,
            Key::B => 1,
            Key::C => 2,
            Key::D => 3,
            Key::E => 4,
            Key::F => 5,
            Key::G => 6,
            Key::H => 7,
            Key::I => 8,
            Key::J => 9,
            Key::K => 10,
            Key::L => 11,
            Key::M => 12,
            Key::N => 13,
            Key::O => 14,
            Key::P => 15,
            Key::Q => 16,
            Key::R => 17,
            Key::S => 18,
            Key::T => 19,
            Key::U => 20,
            Key::V => 21,
            Key::W => 22,
            Key::X => 23,
            Key::Y => 24,
            Key::Z => 25,
            _ => return None,
        };
        Some(i)
    }

    /// Digit value for Num0..Num9.
    pub fn digit_value(self) -> Option<u8> {
        let d = match self {
            Key::Num0 => 0,
            Key::Num1 => 1,
            Key::Num2 => 2,
            Key::Num3 => 3,
            Key::Num4 => 4,
            Key::Num5 => 5,
            Key::Num6 => 6,
            Key::Num7 => 7,
            Key::Num8 => 8,
            Key::Num9 => 9,
            _ => return None,
        };
        Some(d)
    }
}
