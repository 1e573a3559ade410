use anyhow::anyhow;
use embedded_graphics::prelude::*;
use esp_idf_hal::{delay::FreeRtos, peripherals::Peripherals};
use esp_idf_svc::log::EspLogger;
use log::info;

mod board;
mod config;

use crate::board::PanelColor;
use crate::config::SETUP;

fn main() -> anyhow::Result<()> {
    esp_idf_svc::sys::link_patches();
    EspLogger::initialize_default();
    info!("Starting panel bring-up");

    let peripherals = Peripherals::take()?;
    info!("Peripherals taken");

    let mut board = board::init(peripherals)?;

    board
        .display
        .clear(PanelColor::BLACK)
        .map_err(|e| anyhow!("panel clear failed: {:?}", e))?;
    info!("{:?} ready, panel {:?}", SETUP.driver, SETUP.display_size());

    loop {
        FreeRtos::delay_ms(1000);
    }
}
