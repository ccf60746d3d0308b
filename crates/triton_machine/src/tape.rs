//! Cassette interface.
//!
//! The tape is a raw byte file, `TAPE` in the working directory. Bit 7 of
//! port 7 powers the motor relay; with the relay on, the first port used
//! decides the session's direction (port 4 reads, port 2 writes) and a mode
//! switch requires cycling the relay. Dropping the relay closes the file.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::PathBuf;

use log::warn;

/// Default tape image path, relative to the working directory.
pub const TAPE_PATH: &str = "TAPE";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TapeStatus {
    Idle,
    Reading,
    Writing,
}

pub struct TapeDeck {
    path: PathBuf,
    relay: bool,
    status: TapeStatus,
    file: Option<File>,
}

impl Default for TapeDeck {
    fn default() -> Self {
        Self::new()
    }
}

impl TapeDeck {
    pub fn new() -> Self {
        Self::with_path(TAPE_PATH)
    }

    /// Deck over an explicit tape image path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            relay: false,
            status: TapeStatus::Idle,
            file: None,
        }
    }

    pub fn relay(&self) -> bool {
        self.relay
    }

    pub fn status(&self) -> TapeStatus {
        self.status
    }

    /// Drive the motor relay from port 7 bit 7. The falling edge ends the
    /// session: the file is closed and the deck returns to idle.
    pub fn set_relay(&mut self, on: bool) {
        if on && !self.relay {
            self.relay = true;
        } else if !on && self.relay {
            if self.status != TapeStatus::Idle {
                self.file = None;
                self.status = TapeStatus::Idle;
            }
            self.relay = false;
        }
    }

    /// Port-4 read. `None` with the relay off (the bus is undriven and the
    /// accumulator keeps its value); 0x00 at end of tape, in a write
    /// session, or when the tape image cannot be opened.
    pub fn read_byte(&mut self) -> Option<u8> {
        if !self.relay {
            return None;
        }
        if self.status == TapeStatus::Idle {
            match File::open(&self.path) {
                Ok(f) => self.file = Some(f),
                Err(e) => warn!("cannot open tape {:?} for reading: {e}", self.path),
            }
            self.status = TapeStatus::Reading;
        }
        if self.status != TapeStatus::Reading {
            return Some(0x00);
        }
        let mut byte = [0u8; 1];
        match self.file.as_mut().map(|f| f.read(&mut byte)) {
            Some(Ok(1)) => Some(byte[0]),
            _ => Some(0x00),
        }
    }

    /// Port-2 write. Dropped with the relay off or during a read session;
    /// write errors are dropped too, the emulated program sees nothing.
    pub fn write_byte(&mut self, value: u8) {
        if !self.relay {
            return;
        }
        if self.status == TapeStatus::Idle {
            match OpenOptions::new().append(true).create(true).open(&self.path) {
                Ok(f) => self.file = Some(f),
                Err(e) => warn!("cannot open tape {:?} for writing: {e}", self.path),
            }
            self.status = TapeStatus::Writing;
        }
        if self.status != TapeStatus::Writing {
            return;
        }
        if let Some(f) = self.file.as_mut() {
            if let Err(e) = f.write_all(&[value]) {
                warn!("tape write failed: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_tape(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("triton_tape_{name}_{}", std::process::id()));
        let _ = fs::remove_file(&p);
        p
    }

    #[test]
    fn write_then_read_round_trip() {
        let path = scratch_tape("round_trip");
        let mut deck = TapeDeck::with_path(&path);

        deck.set_relay(true);
        for b in [0x11, 0x22, 0x33] {
            deck.write_byte(b);
        }
        assert_eq!(deck.status(), TapeStatus::Writing);
        deck.set_relay(false);
        assert_eq!(deck.status(), TapeStatus::Idle);

        deck.set_relay(true);
        assert_eq!(deck.read_byte(), Some(0x11));
        assert_eq!(deck.read_byte(), Some(0x22));
        assert_eq!(deck.read_byte(), Some(0x33));
        assert_eq!(deck.read_byte(), Some(0x00), "end of tape reads 0x00");
        deck.set_relay(false);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn relay_off_leaves_bus_undriven() {
        let path = scratch_tape("relay_off");
        let mut deck = TapeDeck::with_path(&path);
        assert_eq!(deck.read_byte(), None);
        deck.write_byte(0x42);
        assert!(!path.exists(), "write with relay off must be dropped");
    }

    #[test]
    fn mode_switch_requires_relay_cycle() {
        let path = scratch_tape("mode_switch");
        let mut deck = TapeDeck::with_path(&path);

        deck.set_relay(true);
        deck.write_byte(0xaa);
        // A read in a write session does not rewind or switch mode.
        assert_eq!(deck.read_byte(), Some(0x00));
        assert_eq!(deck.status(), TapeStatus::Writing);
        deck.set_relay(false);

        deck.set_relay(true);
        assert_eq!(deck.read_byte(), Some(0xaa));
        // A write in a read session is dropped.
        deck.write_byte(0xbb);
        assert_eq!(deck.status(), TapeStatus::Reading);
        deck.set_relay(false);

        deck.set_relay(true);
        assert_eq!(deck.read_byte(), Some(0xaa));
        assert_eq!(deck.read_byte(), Some(0x00));
        deck.set_relay(false);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_tape_reads_as_end_of_file() {
        let path = scratch_tape("missing");
        let mut deck = TapeDeck::with_path(&path);
        deck.set_relay(true);
        assert_eq!(deck.read_byte(), Some(0x00));
        assert_eq!(deck.status(), TapeStatus::Reading);
    }

    #[test]
    fn relay_rising_edge_keeps_idle() {
        let path = scratch_tape("rising");
        let mut deck = TapeDeck::with_path(&path);
        deck.set_relay(true);
        assert_eq!(deck.status(), TapeStatus::Idle);
        assert!(deck.relay());
    }
}
