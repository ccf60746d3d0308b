use log::{error, warn};
use rodio::buffer::SamplesBuffer;
use rodio::source::Source;
use rodio::{OutputStream, Sink};

/// The Triton's 1 kHz beeper, gated by bit 6 of port 7.
///
/// The tone is a generated sine loop on a rodio sink; rodio owns the audio
/// thread and the only signal crossing into it is play/pause.
pub struct Beeper {
    _stream: OutputStream,
    sink: Sink,
    active: bool,
}

impl Beeper {
    /// Try to bring up the audio output. If no device is available the
    /// emulator runs silently.
    pub fn new() -> Option<Self> {
        let Ok((stream, handle)) = OutputStream::try_default() else {
            warn!("no audio output device, beeper disabled");
            return None;
        };
        let Ok(sink) = Sink::try_new(&handle) else {
            error!("failed to create audio sink, beeper disabled");
            return None;
        };

        // A quarter of a second of a 1 kHz tone at 44.1 kHz, looped.
        let wave: Vec<f32> = (0..11_025)
            .map(|i| (i as f32 * 1000.0 / 44_100.0 * std::f32::consts::TAU).sin() * 0.3)
            .collect();
        sink.append(SamplesBuffer::new(1, 44_100, wave).repeat_infinite());
        sink.pause();

        Some(Self {
            _stream: stream,
            sink,
            active: false,
        })
    }

    /// Follow the oscillator flag; only edges touch the sink.
    pub fn set_active(&mut self, on: bool) {
        if on == self.active {
            return;
        }
        self.active = on;
        if on {
            self.sink.play();
        } else {
            self.sink.pause();
        }
    }
}
