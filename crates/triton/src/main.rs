use std::process;

use triton::RomSet;

fn main() {
    env_logger::init();

    let rom_set = match std::env::args().nth(1) {
        None => RomSet::Default72,
        Some(arg) => match RomSet::from_arg(&arg) {
            Some(set) => set,
            None => {
                eprintln!("Invalid CLI argument");
                process::exit(1);
            }
        },
    };
    log::info!("ROM set: {rom_set:?}");

    if let Err(e) = triton::run(rom_set) {
        eprintln!("{e}");
        process::exit(1);
    }
}
