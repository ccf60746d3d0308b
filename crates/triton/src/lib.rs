pub mod rom;

use anyhow::{Context, Result};
use triton_machine::{FontRom, TritonApp, TritonMachine};
use triton_sdl2::{App, SdlContext, SdlInitInfo};

pub use rom::RomSet;

/// Glyph ROM path, relative to the working directory.
const FONT_PATH: &str = "FONT.ROM";

/// Assemble the machine for `rom_set` and hand it to the SDL2 runner.
pub fn run(rom_set: RomSet) -> Result<()> {
    let machine = load_machine(rom_set)?;

    let font_bytes = std::fs::read(FONT_PATH).context("Error loading font file")?;
    let font = FontRom::from_bytes(font_bytes).context("Error loading font file")?;

    let app = TritonApp::new(machine, font);
    let init_info = SdlInitInfo::builder()
        .width(app.width())
        .height(app.height())
        .scale(app.scale())
        .title(app.title())
        .build();
    SdlContext::run(init_info, app)?;
    Ok(())
}

/// Build a machine with `rom_set` loaded. Any unreadable image fails the
/// whole set.
pub fn load_machine(rom_set: RomSet) -> Result<TritonMachine> {
    let mut machine = TritonMachine::new();
    for image in rom_set.images() {
        let data = std::fs::read(image.path).context("Unable to load ROM")?;
        machine.load_rom(image.origin, &data[..image.len.min(data.len())]);
        log::info!("loaded {} at {:#06x}", image.path, image.origin);
    }
    Ok(machine)
}
