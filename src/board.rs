use std::sync::Arc;

use anyhow::{anyhow, Result};
use display_interface_spi::SPIInterface;
use embedded_hal::spi::{Mode, Phase, Polarity};
use esp_idf_hal::{
    delay::Delay,
    gpio::{Gpio2, Gpio4, Output, PinDriver},
    peripherals::Peripherals,
    spi::{config::Config as SpiConfig, SpiDeviceDriver, SpiDriver},
};
use log::info;
use mipidsi::Builder;

use crate::config::SETUP;

#[cfg(feature = "ili9341")]
mod panel {
    pub type PanelModel = mipidsi::models::ILI9341Rgb565;
    pub const PANEL_MODEL: PanelModel = mipidsi::models::ILI9341Rgb565;
}
#[cfg(feature = "ili9486")]
mod panel {
    pub type PanelModel = mipidsi::models::ILI9486Rgb666;
    pub const PANEL_MODEL: PanelModel = mipidsi::models::ILI9486Rgb666;
}
#[cfg(feature = "ili9488")]
mod panel {
    pub type PanelModel = mipidsi::models::ILI9488Rgb666;
    pub const PANEL_MODEL: PanelModel = mipidsi::models::ILI9488Rgb666;
}
#[cfg(feature = "st7789")]
mod panel {
    pub type PanelModel = mipidsi::models::ST7789;
    pub const PANEL_MODEL: PanelModel = mipidsi::models::ST7789;
}
#[cfg(feature = "st7796")]
mod panel {
    pub type PanelModel = mipidsi::models::ST7796;
    pub const PANEL_MODEL: PanelModel = mipidsi::models::ST7796;
}

pub use panel::PanelModel;
use panel::PANEL_MODEL;

pub type PanelColor = <PanelModel as mipidsi::models::Model>::ColorFormat;

pub type PanelSpi = SpiDeviceDriver<'static, Arc<SpiDriver<'static>>>;

pub type Panel = mipidsi::Display<
    SPIInterface<PanelSpi, PinDriver<'static, Gpio2, Output>>,
    PanelModel,
    PinDriver<'static, Gpio4, Output>,
>;

// SPI mode 0 for both the panel and the touch controller.
pub const SPI_MODE: Mode = Mode {
    polarity: Polarity::IdleLow,
    phase: Phase::CaptureOnFirstTransition,
};

pub struct Board {
    pub display: Panel,
    /// Handed to an external XPT2046 driver; carried until one is wired in.
    #[allow(dead_code)]
    pub touch_spi: PanelSpi,
}

/// Claims the SPI bus and control pins and initializes the panel, all per
/// the setup record. Runs once at boot.
pub fn init(peripherals: Peripherals) -> Result<Board> {
    let pins = peripherals.pins;

    let spi_driver = Arc::new(SpiDriver::new(
        peripherals.spi2,
        pins.gpio18,
        pins.gpio23,
        Some(pins.gpio19),
        &Default::default(),
    )?);
    info!(
        "SPI2 bus up: sclk={} mosi={} miso={}",
        SETUP.pins.sclk, SETUP.pins.mosi, SETUP.pins.miso
    );

    let display_config = SpiConfig::new()
        .baudrate(SETUP.write_baudrate())
        .data_mode(SPI_MODE);
    let display_spi = SpiDeviceDriver::new(spi_driver.clone(), Some(pins.gpio15), &display_config)?;

    let touch_config = SpiConfig::new()
        .baudrate(SETUP.touch_baudrate())
        .data_mode(SPI_MODE);
    let touch_spi = SpiDeviceDriver::new(spi_driver.clone(), Some(pins.gpio5), &touch_config)?;

    let dc = PinDriver::output(pins.gpio2)?;
    let rst = PinDriver::output(pins.gpio4)?;
    let mut delay = Delay::new_default();

    // Orientation, color order and inversion are left at the driver's
    // defaults; only what the setup record covers is passed down.
    let display = Builder::new(PANEL_MODEL, SPIInterface::new(display_spi, dc))
        .reset_pin(rst)
        .display_size(SETUP.width, SETUP.height)
        .init(&mut delay)
        .map_err(|e| anyhow!("panel init failed: {:?}", e))?;

    info!(
        "{:?} panel initialized, write clock {} Hz (read path {} Hz)",
        SETUP.driver, SETUP.spi_write_hz, SETUP.spi_read_hz
    );
    info!(
        "touch controller SPI device ready on cs={} at {} Hz",
        SETUP.pins.touch_cs, SETUP.spi_touch_hz
    );
    info!(
        "font tables {:?}, smooth font: {}",
        SETUP.fonts, SETUP.smooth_font
    );

    Ok(Board { display, touch_spi })
}
