#![no_std]

pub mod button;
pub mod usb_net;

use embassy_nrf::config::{Config, HfclkSource};
use embassy_nrf::pac;

/// Chip config for the mesh nodes. USB needs the external crystal.
pub fn config() -> Config {
    let mut config = Config::default();
    config.hfclk_source = HfclkSource::ExternalXtal;
    config
}

/// Factory programmed 64 bit device identifier.
pub fn device_id() -> u64 {
    let low = pac::FICR.deviceid(0).read();
    let high = pac::FICR.deviceid(1).read();
    (u64::from(high) << 32) | u64::from(low)
}
