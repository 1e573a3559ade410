use embedded_graphics::prelude::Size;
use enumset::{enum_set, EnumSet, EnumSetType};
use esp_idf_hal::units::Hertz;

#[cfg(not(any(
    feature = "ili9341",
    feature = "ili9486",
    feature = "ili9488",
    feature = "st7789",
    feature = "st7796",
)))]
compile_error!(
    "no panel controller selected: enable exactly one of `ili9341`, `ili9486`, `ili9488`, `st7789`, `st7796`"
);

#[cfg(any(
    all(feature = "ili9341", any(feature = "ili9486", feature = "ili9488", feature = "st7789", feature = "st7796")),
    all(feature = "ili9486", any(feature = "ili9488", feature = "st7789", feature = "st7796")),
    all(feature = "ili9488", any(feature = "st7789", feature = "st7796")),
    all(feature = "st7789", feature = "st7796"),
))]
compile_error!("panel controller features are mutually exclusive: enable exactly one");

/// Controller families the firmware knows how to bring up.
// Only the variant picked by the active cargo feature is ever constructed.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverVariant {
    Ili9341,
    Ili9486,
    Ili9488,
    St7789,
    St7796,
}

#[cfg(feature = "ili9341")]
pub const DRIVER: DriverVariant = DriverVariant::Ili9341;
#[cfg(feature = "ili9486")]
pub const DRIVER: DriverVariant = DriverVariant::Ili9486;
#[cfg(feature = "ili9488")]
pub const DRIVER: DriverVariant = DriverVariant::Ili9488;
#[cfg(feature = "st7789")]
pub const DRIVER: DriverVariant = DriverVariant::St7789;
#[cfg(feature = "st7796")]
pub const DRIVER: DriverVariant = DriverVariant::St7796;

/// Glyph tables linked into the binary for the text renderer.
#[derive(EnumSetType, Debug)]
pub enum FontSet {
    Glcd,
    Font2,
    Font4,
    Font6,
    Font7,
    Font8,
    GfxFreeFonts,
}

/// GPIO numbers wiring the panel and touch controller to the SPI bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiPins {
    pub miso: u8,
    pub mosi: u8,
    pub sclk: u8,
    pub cs: u8,
    pub dc: u8,
    pub rst: u8,
    pub touch_cs: u8,
}

/// Everything the display stack needs to know about this board, fixed at
/// build time. `SETUP` is the one record the rest of the firmware reads.
#[derive(Debug, Clone, Copy)]
pub struct UserSetup {
    pub driver: DriverVariant,
    pub width: u16,
    pub height: u16,
    pub pins: SpiPins,
    pub fonts: EnumSet<FontSet>,
    pub smooth_font: bool,
    pub spi_write_hz: u32,
    pub spi_read_hz: u32,
    pub spi_touch_hz: u32,
}

pub const SETUP: UserSetup = UserSetup {
    driver: DRIVER,
    width: 480,
    height: 320,
    pins: SpiPins {
        miso: 19,
        mosi: 23,
        sclk: 18,
        cs: 15,
        dc: 2,
        rst: 4,
        touch_cs: 5,
    },
    fonts: enum_set!(
        FontSet::Glcd
            | FontSet::Font2
            | FontSet::Font4
            | FontSet::Font6
            | FontSet::Font7
            | FontSet::Font8
            | FontSet::GfxFreeFonts
    ),
    smooth_font: true,
    spi_write_hz: 27_000_000,
    spi_read_hz: 20_000_000,
    spi_touch_hz: 2_500_000,
};

impl UserSetup {
    pub const fn display_size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }

    pub const fn write_baudrate(&self) -> Hertz {
        Hertz(self.spi_write_hz)
    }

    pub const fn touch_baudrate(&self) -> Hertz {
        Hertz(self.spi_touch_hz)
    }

    pub const fn bus_pins(&self) -> [u8; 7] {
        [
            self.pins.miso,
            self.pins.mosi,
            self.pins.sclk,
            self.pins.cs,
            self.pins.dc,
            self.pins.rst,
            self.pins.touch_cs,
        ]
    }

    /// Two peripherals sharing a GPIO would fight over the line.
    pub const fn pins_distinct(&self) -> bool {
        let pins = self.bus_pins();
        let mut i = 0;
        while i < pins.len() {
            let mut j = i + 1;
            while j < pins.len() {
                if pins[i] == pins[j] {
                    return false;
                }
                j += 1;
            }
            i += 1;
        }
        true
    }

    /// Writes tolerate the highest clock, touch sampling the lowest.
    pub const fn clocks_ordered(&self) -> bool {
        self.spi_touch_hz > 0
            && self.spi_touch_hz <= self.spi_read_hz
            && self.spi_read_hz <= self.spi_write_hz
    }
}

// A bad record fails the build here instead of failing on the bench.
const _: () = {
    assert!(SETUP.width > 0 && SETUP.height > 0, "panel geometry must be non-zero");
    assert!(SETUP.pins_distinct(), "SPI pin assignments must be unique");
    assert!(SETUP.clocks_ordered(), "SPI clocks must satisfy write >= read >= touch > 0");
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn panel_geometry_matches_wiring_doc() {
        assert_eq!(SETUP.width, 480);
        assert_eq!(SETUP.height, 320);
        assert_eq!(SETUP.display_size(), Size::new(480, 320));
    }

    #[test]
    fn pin_map_matches_board_wiring() {
        assert_eq!(
            SETUP.pins,
            SpiPins {
                miso: 19,
                mosi: 23,
                sclk: 18,
                cs: 15,
                dc: 2,
                rst: 4,
                touch_cs: 5,
            }
        );
    }

    #[test]
    fn bus_pins_are_unique() {
        assert!(SETUP.pins_distinct());
        let pins = SETUP.bus_pins();
        let distinct: HashSet<u8> = pins.iter().copied().collect();
        assert_eq!(distinct.len(), pins.len());
    }

    #[test]
    fn duplicate_pin_assignment_is_rejected() {
        let mut bad = SETUP;
        bad.pins.touch_cs = bad.pins.cs;
        assert!(!bad.pins_distinct());
    }

    #[test]
    fn spi_clocks_step_down_toward_touch() {
        assert_eq!(SETUP.spi_write_hz, 27_000_000);
        assert_eq!(SETUP.spi_read_hz, 20_000_000);
        assert_eq!(SETUP.spi_touch_hz, 2_500_000);
        assert!(SETUP.clocks_ordered());
        assert_eq!(SETUP.write_baudrate(), Hertz(27_000_000));
        assert_eq!(SETUP.touch_baudrate(), Hertz(2_500_000));
    }

    #[test]
    fn zero_touch_clock_is_rejected() {
        let mut bad = SETUP;
        bad.spi_touch_hz = 0;
        assert!(!bad.clocks_ordered());
    }

    #[test]
    fn read_clock_above_write_clock_is_rejected() {
        let mut bad = SETUP;
        bad.spi_read_hz = bad.spi_write_hz + 1;
        assert!(!bad.clocks_ordered());
    }

    #[test]
    fn every_font_table_is_linked() {
        assert_eq!(SETUP.fonts, EnumSet::<FontSet>::all());
        assert!(SETUP.smooth_font);
    }

    #[cfg(feature = "ili9488")]
    #[test]
    fn selected_driver_matches_feature() {
        assert_eq!(SETUP.driver, DriverVariant::Ili9488);
    }
}
