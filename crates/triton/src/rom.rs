//! ROM set selection.
//!
//! The Triton shipped with several monitor/BASIC ROM generations; each set
//! is a list of image files and the addresses they occupy. File names
//! follow the labels on the original EPROMs.

const K1: usize = 0x400;
const K8: usize = 0x2000;

/// One ROM image: file path, load address and expected length.
pub struct RomImage {
    pub path: &'static str,
    pub origin: u16,
    pub len: usize,
}

const fn image(path: &'static str, origin: u16, len: usize) -> RomImage {
    RomImage { path, origin, len }
}

/// A selectable ROM set. `Default72` is the combined 7.2 images in the
/// working directory; the named sets load the individual EPROM dumps from
/// `roms/`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RomSet {
    Default72,
    V41,
    V51,
    V52,
    V72,
    V72Dec,
}

impl RomSet {
    /// Parse the CLI's positional argument. `None` for anything that is
    /// not a known set name.
    pub fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "4.1" => Some(Self::V41),
            "5.1" => Some(Self::V51),
            "5.2" => Some(Self::V52),
            "7.2" => Some(Self::V72),
            "7.2DEC" => Some(Self::V72Dec),
            _ => None,
        }
    }

    pub fn images(self) -> &'static [RomImage] {
        const DEFAULT72: &[RomImage] = &[
            image("MONA72.ROM", 0x0000, K1),
            image("MONB72.ROM", 0x0c00, K1),
            image("BASIC72.ROM", 0xe000, K8),
        ];
        const V41: &[RomImage] = &[
            image("roms/L4.1 MONITOR.BIN", 0x0000, K1),
            image("roms/L4.1A BASIC.BIN", 0x0400, K1),
            image("roms/L4.1B BASIC.BIN", 0x0800, K1),
        ];
        const V51: &[RomImage] = &[
            image("roms/ROM_5.1A.BIN", 0x0000, K1),
            image("roms/ROM_5.1A BASIC.BIN", 0x0400, K1),
            image("roms/ROM_5.1B BASIC.BIN", 0x0800, K1),
            image("roms/ROM_5.1B.BIN", 0x0c00, K1),
        ];
        const V52: &[RomImage] = &[
            image("roms/ROM_5.2A.BIN", 0x0000, K1),
            image("roms/ROM_5.1A BASIC.BIN", 0x0400, K1),
            image("roms/ROM_5.1B BASIC.BIN", 0x0800, K1),
            image("roms/ROM_5.2B.BIN", 0x0c00, K1),
        ];
        const V72: &[RomImage] = &[
            image("roms/ROM_7.2A.BIN", 0x0000, K1),
            image("roms/ROM_7.2B.BIN", 0x0c00, K1),
            image("roms/L7.2A BASIC.BIN", 0xe000, K1),
            image("roms/L7.2B BASIC.BIN", 0xe400, K1),
            image("roms/L7.2C BASIC.BIN", 0xe800, K1),
            image("roms/L7.2D BASIC.BIN", 0xec00, K1),
            image("roms/L7.2E BASIC.BIN", 0xf000, K1),
            image("roms/L7.2F BASIC.BIN", 0xf400, K1),
            image("roms/L7.2G BASIC.BIN", 0xf800, K1),
            image("roms/L7.2H BASIC.BIN", 0xfc00, K1),
        ];
        const V72DEC: &[RomImage] = &[
            image("roms/ROM_7.2A.BIN", 0x0000, K1),
            image("roms/ROM_7.2B.BIN", 0x0c00, K1),
            image("roms/L7.2A BASIC 31DECEMBER2020.BIN", 0xe000, K1),
            image("roms/L7.2B BASIC 31DECEMBER2020.BIN", 0xe400, K1),
            image("roms/L7.2C BASIC 31DECEMBER2020.BIN", 0xe800, K1),
            image("roms/L7.2D BASIC 31DECEMBER2020.BIN", 0xec00, K1),
            image("roms/L7.2E BASIC 31DECEMBER2020.BIN", 0xf000, K1),
            image("roms/L7.2F BASIC 31DECEMBER2020.BIN", 0xf400, K1),
            image("roms/L7.2G BASIC 31DECEMBER2020.BIN", 0xf800, K1),
            image("roms/L7.2H BASIC 31DECEMBER2020.BIN", 0xfc00, K1),
        ];
        match self {
            Self::Default72 => DEFAULT72,
            Self::V41 => V41,
            Self::V51 => V51,
            Self::V52 => V52,
            Self::V72 => V72,
            Self::V72Dec => V72DEC,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arg_names_map_to_sets() {
        assert_eq!(RomSet::from_arg("4.1"), Some(RomSet::V41));
        assert_eq!(RomSet::from_arg("5.1"), Some(RomSet::V51));
        assert_eq!(RomSet::from_arg("5.2"), Some(RomSet::V52));
        assert_eq!(RomSet::from_arg("7.2"), Some(RomSet::V72));
        assert_eq!(RomSet::from_arg("7.2DEC"), Some(RomSet::V72Dec));
        assert_eq!(RomSet::from_arg("7.3"), None);
        assert_eq!(RomSet::from_arg(""), None);
    }

    #[test]
    fn default_set_layout() {
        let images = RomSet::Default72.images();
        assert_eq!(images.len(), 3);
        assert_eq!(images[0].origin, 0x0000);
        assert_eq!(images[1].origin, 0x0c00);
        assert_eq!(images[2].origin, 0xe000);
        assert_eq!(images[2].len, 0x2000);
    }

    #[test]
    fn images_stay_inside_the_address_space() {
        for set in [
            RomSet::Default72,
            RomSet::V41,
            RomSet::V51,
            RomSet::V52,
            RomSet::V72,
            RomSet::V72Dec,
        ] {
            for image in set.images() {
                let end = image.origin as usize + image.len;
                assert!(end <= 0x10000, "{:?}: {} overruns", set, image.path);
            }
        }
    }

    #[test]
    fn basic_72_sets_cover_the_top_pages() {
        let images = RomSet::V72.images();
        assert_eq!(images.len(), 10);
        for (i, image) in images[2..].iter().enumerate() {
            assert_eq!(image.origin as usize, 0xe000 + i * 0x400);
        }
    }
}
