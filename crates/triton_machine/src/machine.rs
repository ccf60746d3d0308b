//! The Triton machine: 8080 CPU, 64 KiB bus, and the port-mapped devices.

use crate::cpu::{Bus8080, Cpu8080};
use crate::keyboard::Keyboard;
use crate::tape::{TapeDeck, TapeStatus};
use crate::vdu::{Vdu, VDU_CELLS};
use triton_common::key::Key;

/// Total addressable memory size (64 KiB).
const MEMORY_SIZE: usize = 0x10000;

/// Start of the video page the VDU controller writes and the presenter
/// reads.
pub const VRAM_START: usize = 0x1000;
/// Size of the video page in bytes (16 rows of 64 characters).
pub const VRAM_SIZE: usize = VDU_CELLS;

/// Effective 8080 clock (one microcycle is 1.25 us) and frame timing.
pub const CPU_CLOCK_HZ: u32 = 800_000;
pub const FRAME_RATE_HZ: u32 = 25;
pub const CYCLES_PER_FRAME: u32 = CPU_CLOCK_HZ / FRAME_RATE_HZ;

/// UART status with TX ready and RX empty; nothing is wired to the serial
/// port, so the value never changes.
const UART_STATUS: u8 = 0x11;

/// Bus state for the Triton (memory and the port 0-7 devices).
struct TritonBus {
    memory: [u8; MEMORY_SIZE],
    keyboard: Keyboard,
    vdu: Vdu,
    tape: TapeDeck,
    led_buffer: u8,
    port6: u8,
    port7: u8,
    oscillator: bool,
}

impl Default for TritonBus {
    fn default() -> Self {
        Self {
            memory: [0; MEMORY_SIZE],
            keyboard: Keyboard::new(),
            vdu: Vdu::new(),
            tape: TapeDeck::new(),
            led_buffer: 0,
            port6: 0,
            port7: 0,
            oscillator: false,
        }
    }
}

impl Bus8080 for TritonBus {
    fn mem_read(&mut self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    fn mem_write(&mut self, addr: u16, value: u8) {
        // ROM regions are not write-protected; a store there sticks until
        // the next ROM load, as on the reference machine.
        self.memory[addr as usize] = value;
    }

    fn io_read(&mut self, port: u8) -> Option<u8> {
        match port {
            // Keyboard buffer; the strobe bit follows the key state and is
            // not cleared by the read.
            0 => Some(self.keyboard.buffer()),
            1 => Some(UART_STATUS),
            4 => self.tape.read_byte(),
            _ => None,
        }
    }

    fn io_write(&mut self, port: u8, value: u8) {
        match port {
            2 => self.tape.write_byte(value),
            3 => self.led_buffer = value,
            5 => {
                let Self { vdu, memory, .. } = self;
                vdu.port_write(value, &mut memory[VRAM_START..VRAM_START + VRAM_SIZE]);
            }
            6 => self.port6 = value >> 6,
            7 => {
                self.port7 = value;
                self.oscillator = (value & 0x40) != 0;
                self.tape.set_relay((value & 0x80) != 0);
            }
            _ => {}
        }
    }
}

/// The assembled Triton: CPU plus bus.
///
/// The frame loop calls [`TritonMachine::step_frame`] once per host frame;
/// the front-panel buttons and keyboard events arrive between frames.
pub struct TritonMachine {
    cpu: Cpu8080,
    bus: TritonBus,
}

impl Default for TritonMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl TritonMachine {
    pub fn new() -> Self {
        Self {
            cpu: Cpu8080::new(),
            bus: TritonBus::default(),
        }
    }

    /// Copy a ROM image into memory at `origin`. Oversized images are
    /// truncated at the end of the address space.
    pub fn load_rom(&mut self, origin: u16, data: &[u8]) {
        let start = origin as usize;
        let len = data.len().min(MEMORY_SIZE - start);
        self.bus.memory[start..start + len].copy_from_slice(&data[..len]);
    }

    /// Run one frame of CPU time (32 000 T-states at the stock clock).
    ///
    /// A halted CPU idles the rest of the frame instead of burning cycles;
    /// execution resumes when a front-panel interrupt or a reset arrives.
    pub fn step_frame(&mut self) {
        let mut cycles: u32 = 0;
        while cycles < CYCLES_PER_FRAME {
            if self.cpu.halted {
                break;
            }
            cycles += self.cpu.step(&mut self.bus);
        }
    }

    /// Front-panel PB1: pull the CPU to the reset vector. Registers and
    /// memory keep their contents.
    pub fn reset_button(&mut self) {
        self.cpu.pc = 0x0000;
        self.cpu.interrupts_enabled = false;
        self.cpu.halted = false;
    }

    /// Front-panel PB2 (clear screen): RST 1, honored only while INTE is
    /// set.
    pub fn clear_screen_button(&mut self) {
        self.cpu.interrupt(&mut self.bus, 1);
    }

    /// Front-panel PB3 (initialise): RST 2, honored only while INTE is set.
    pub fn initialise_button(&mut self) {
        self.cpu.interrupt(&mut self.bus, 2);
    }

    /// Forward a host key event to the keyboard port.
    pub fn handle_key(&mut self, key: Key, pressed: bool, shifted: bool, ctrl: bool) {
        self.bus.keyboard.handle_event(key, pressed, shifted, ctrl);
    }

    /// The video page as the presenter reads it.
    pub fn video_ram(&self) -> &[u8] {
        &self.bus.memory[VRAM_START..VRAM_START + VRAM_SIZE]
    }

    /// Screen row currently displayed at the top of the frame.
    pub fn display_start_row(&self) -> usize {
        self.bus.vdu.start_row()
    }

    /// Logical cursor cell within the displayed frame.
    pub fn cursor_position(&self) -> usize {
        self.bus.vdu.cursor_position()
    }

    /// Current keyboard-port byte; bit 7 is the strobe.
    pub fn key_buffer(&self) -> u8 {
        self.bus.keyboard.buffer()
    }

    /// Last byte written to the LED latch; a 0 bit lights the LED and
    /// bit 7 drives the leftmost one.
    pub fn led_buffer(&self) -> u8 {
        self.bus.led_buffer
    }

    /// Motor relay and transport direction, for the tape indicator.
    pub fn tape_indicator(&self) -> (bool, TapeStatus) {
        (self.bus.tape.relay(), self.bus.tape.status())
    }

    /// True while the 1 kHz beeper is audible.
    pub fn oscillator(&self) -> bool {
        self.bus.oscillator
    }

    /// Port 6 latch (top two bits of the last write), debug surface only.
    pub fn port6(&self) -> u8 {
        self.bus.port6
    }

    /// Port 7 latch, debug surface only.
    pub fn port7(&self) -> u8 {
        self.bus.port7
    }
}
