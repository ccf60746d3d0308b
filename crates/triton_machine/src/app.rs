use crate::machine::{TritonMachine, FRAME_RATE_HZ};
use crate::sound::Beeper;
use crate::tape::TapeStatus;
use crate::vdu::{VDU_CELLS, VDU_COLS};
use triton_common::app::App;
use triton_common::color::Color;
use triton_common::key::Key;

/// Logical screen width in pixels: 64 characters of 8 pixels.
pub const SCREEN_WIDTH: usize = 512;
/// Logical screen height: 16 rows of 24 pixels plus the panel strip.
pub const SCREEN_HEIGHT: usize = 414;
/// Default integer scaling factor for the SDL2 frontend.
pub const SCREEN_SCALE: u32 = 2;

const GLYPH_WIDTH: usize = 8;
const GLYPH_HEIGHT: usize = 24;

const LED_ON: Color = Color::new_rgb(250, 0, 0);
const LED_OFF: Color = Color::new_rgb(50, 0, 0);

/// Raw glyph ROM: 128 glyphs of 24 rows, one byte per row with the most
/// significant bit leftmost. Stands in for the character generator ICs.
pub struct FontRom {
    data: Vec<u8>,
}

impl FontRom {
    pub const GLYPHS: usize = 128;
    pub const BYTES: usize = Self::GLYPHS * GLYPH_HEIGHT;

    pub fn from_bytes(data: Vec<u8>) -> Option<Self> {
        (data.len() >= Self::BYTES).then_some(Self { data })
    }

    fn row(&self, glyph: u8, row: usize) -> u8 {
        self.data[glyph as usize * GLYPH_HEIGHT + row]
    }
}

/// Frontend-facing application wrapper for the Triton machine.
///
/// Implements the shared `App` trait so the SDL2 runner can drive the
/// emulator: one `update` per host frame steps the machine, gates the
/// beeper and repaints the text screen, the LED row and the tape
/// indicator.
pub struct TritonApp {
    machine: TritonMachine,
    font: FontRom,
    beeper: Option<Beeper>,
    should_exit: bool,
    paused: bool,
    in_focus: bool,
    shifted: bool,
    ctrl: bool,
    blink_count: u32,
    cursor_on: bool,
}

impl TritonApp {
    pub fn new(machine: TritonMachine, font: FontRom) -> Self {
        Self {
            machine,
            font,
            beeper: None,
            should_exit: false,
            paused: false,
            in_focus: true,
            shifted: false,
            ctrl: false,
            blink_count: 0,
            cursor_on: true,
        }
    }

    fn render(&self, screen: &mut [u8]) {
        debug_assert_eq!(screen.len(), SCREEN_WIDTH * SCREEN_HEIGHT * 3);
        screen.fill(0);

        // Text screen, rolled by the VDU's start row.
        let vram = self.machine.video_ram();
        let roll = VDU_COLS * self.machine.display_start_row();
        for cell in 0..VDU_CELLS {
            let glyph = vram[(roll + cell) % VDU_CELLS] & 0x7f;
            let cx = (cell % VDU_COLS) * GLYPH_WIDTH;
            let cy = (cell / VDU_COLS) * GLYPH_HEIGHT;
            for gy in 0..GLYPH_HEIGHT {
                let bits = self.font.row(glyph, gy);
                if bits == 0 {
                    continue;
                }
                for gx in 0..GLYPH_WIDTH {
                    if bits & (0x80 >> gx) != 0 {
                        put_pixel(screen, cx + gx, cy + gy, Color::WHITE);
                    }
                }
            }
        }

        // Winking cursor: an underline in the cursor's cell.
        if self.cursor_on {
            let pos = self.machine.cursor_position();
            let cx = (pos % VDU_COLS) * GLYPH_WIDTH;
            let cy = (pos / VDU_COLS) * GLYPH_HEIGHT + 18;
            fill_rect(screen, cx, cy, GLYPH_WIDTH, 2, Color::WHITE);
        }

        // LED row; a 0 bit lights the LED, bit 7 is the leftmost.
        let leds = self.machine.led_buffer();
        for i in 0..8 {
            let color = if leds & (0x80 >> i) == 0 { LED_ON } else { LED_OFF };
            fill_circle(screen, 22 + i * 15, 403, 7, color);
        }

        // Tape indicator, colored by (relay, transport direction).
        let color = match self.machine.tape_indicator() {
            (false, _) => Color::GRAY,
            (true, TapeStatus::Idle) => Color::YELLOW,
            (true, TapeStatus::Reading) => Color::GREEN,
            (true, TapeStatus::Writing) => Color::RED,
        };
        fill_rect(screen, 462, 388, 45, 22, color);
    }
}

impl App for TritonApp {
    fn init(&mut self) {
        log::info!("Triton init");
        if self.beeper.is_none() {
            self.beeper = Beeper::new();
        }
    }

    fn update(&mut self, screen: &mut [u8]) {
        if !self.paused {
            self.machine.step_frame();
        }

        if let Some(beeper) = &mut self.beeper {
            beeper.set_active(!self.paused && self.machine.oscillator());
        }

        // 2 Hz wink.
        self.blink_count += 1;
        if self.blink_count > FRAME_RATE_HZ / 4 {
            self.cursor_on = !self.cursor_on;
            self.blink_count = 0;
        }

        self.render(screen);
    }

    fn handle_key_event(&mut self, key: Key, is_down: bool) {
        // Modifiers are tracked even when the window is out of focus so
        // that they are not stuck on re-entry.
        match key {
            Key::LShift | Key::RShift => {
                self.shifted = is_down;
                return;
            }
            Key::LCtrl | Key::RCtrl => {
                self.ctrl = is_down;
                return;
            }
            _ => {}
        }

        if !self.in_focus {
            return;
        }

        if is_down {
            match key {
                Key::F1 => {
                    self.machine.reset_button();
                    return;
                }
                Key::F2 => {
                    self.machine.clear_screen_button();
                    return;
                }
                Key::F3 => {
                    self.machine.initialise_button();
                    return;
                }
                Key::F4 => {
                    self.paused = !self.paused;
                    return;
                }
                Key::F9 => {
                    self.should_exit = true;
                    return;
                }
                _ => {}
            }
        }

        self.machine.handle_key(key, is_down, self.shifted, self.ctrl);
    }

    fn focus_changed(&mut self, in_focus: bool) {
        self.in_focus = in_focus;
    }

    fn should_exit(&self) -> bool {
        self.should_exit
    }

    fn exit(&mut self) {
        log::info!("Triton exit");
    }

    fn width(&self) -> u32 {
        SCREEN_WIDTH as u32
    }

    fn height(&self) -> u32 {
        SCREEN_HEIGHT as u32
    }

    fn scale(&self) -> u32 {
        SCREEN_SCALE
    }

    fn frame_rate(&self) -> u32 {
        FRAME_RATE_HZ
    }

    fn title(&self) -> String {
        "Transam Triton".to_string()
    }
}

fn put_pixel(screen: &mut [u8], x: usize, y: usize, color: Color) {
    let idx = (y * SCREEN_WIDTH + x) * 3;
    screen[idx] = color.r;
    screen[idx + 1] = color.g;
    screen[idx + 2] = color.b;
}

fn fill_rect(screen: &mut [u8], x: usize, y: usize, w: usize, h: usize, color: Color) {
    for dy in 0..h {
        for dx in 0..w {
            put_pixel(screen, x + dx, y + dy, color);
        }
    }
}

fn fill_circle(screen: &mut [u8], cx: usize, cy: usize, radius: usize, color: Color) {
    let r = radius as i32;
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r {
                let x = cx as i32 + dx;
                let y = cy as i32 + dy;
                if x >= 0 && (x as usize) < SCREEN_WIDTH && y >= 0 && (y as usize) < SCREEN_HEIGHT {
                    put_pixel(screen, x as usize, y as usize, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_font() -> FontRom {
        FontRom::from_bytes(vec![0u8; FontRom::BYTES]).unwrap()
    }

    #[test]
    fn font_rom_requires_full_glyph_set() {
        assert!(FontRom::from_bytes(vec![0u8; FontRom::BYTES - 1]).is_none());
        assert!(FontRom::from_bytes(vec![0u8; FontRom::BYTES]).is_some());
    }

    #[test]
    fn f9_requests_exit() {
        let mut app = TritonApp::new(TritonMachine::new(), blank_font());
        assert!(!app.should_exit());
        app.handle_key_event(Key::F9, true);
        assert!(app.should_exit());
    }

    #[test]
    fn modifiers_reach_the_key_table() {
        let mut app = TritonApp::new(TritonMachine::new(), blank_font());
        app.handle_key_event(Key::LShift, true);
        app.handle_key_event(Key::A, true);
        assert_eq!(app.machine.key_buffer(), 0xc1, "shift+A with strobe");
        app.handle_key_event(Key::LShift, false);
        app.handle_key_event(Key::A, false);
        assert_eq!(app.machine.key_buffer(), 0x61, "released plain A");
    }

    #[test]
    fn out_of_focus_events_are_dropped() {
        let mut app = TritonApp::new(TritonMachine::new(), blank_font());
        app.focus_changed(false);
        app.handle_key_event(Key::F9, true);
        assert!(!app.should_exit(), "unfocused F9 must be ignored");
        app.focus_changed(true);
        app.handle_key_event(Key::F9, true);
        assert!(app.should_exit());
    }

    #[test]
    fn update_renders_a_frame() {
        let mut app = TritonApp::new(TritonMachine::new(), blank_font());
        let mut screen = vec![0u8; SCREEN_WIDTH * SCREEN_HEIGHT * 3];
        app.update(&mut screen);
        // The unlit LED row is painted even on an empty machine.
        assert!(screen.iter().any(|&b| b != 0));
    }
}
