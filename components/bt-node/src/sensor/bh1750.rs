//! ROHM BH1750 ambient light sensor on I2C.
//!
//! The device takes a single opcode byte to select its measurement mode and
//! answers every read with the latest conversion as a big-endian `u16`.

use embedded_hal_async::i2c::I2c;

use crate::sensor::{Measurement, SensorError, SensorSource};

/// ADDR pin low.
pub const DEFAULT_ADDRESS: u8 = 0x23;
/// ADDR pin high.
pub const ALTERNATE_ADDRESS: u8 = 0x5C;

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// 1 lx resolution, 120 ms conversion.
    #[default]
    ContinuousHighResolution = 0x10,
    /// 0.5 lx resolution, 120 ms conversion.
    ContinuousHighResolution2 = 0x11,
    /// 4 lx resolution, 16 ms conversion.
    ContinuousLowResolution = 0x13,
    OneTimeHighResolution = 0x20,
    OneTimeHighResolution2 = 0x21,
    OneTimeLowResolution = 0x23,
}

impl Mode {
    fn opcode(self) -> u8 {
        self as u8
    }
}

pub struct Bh1750<I2C: I2c> {
    i2c: I2C,
    address: u8,
    mode: Mode,
}

impl<I2C: I2c> Bh1750<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, DEFAULT_ADDRESS)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Bh1750 {
            i2c,
            address,
            mode: Mode::default(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Writes the mode-select opcode. Must run once before the first read.
    pub async fn init(&mut self) -> Result<(), SensorError> {
        self.set_mode(self.mode).await
    }

    pub async fn set_mode(&mut self, mode: Mode) -> Result<(), SensorError> {
        self.i2c.write(self.address, &[mode.opcode()]).await.map_err(SensorError::from_i2c)?;
        self.mode = mode;
        debug!("BH1750[0x{:02X}]> mode 0x{:02X}", self.address, mode.opcode());
        Ok(())
    }

    pub async fn read_raw(&mut self) -> Result<u16, SensorError> {
        let mut data = [0u8; 2];
        self.i2c.read(self.address, &mut data).await.map_err(SensorError::from_i2c)?;
        Ok(u16::from_be_bytes(data))
    }
}

impl<I2C: I2c> SensorSource for Bh1750<I2C> {
    async fn read(&mut self) -> Result<Measurement, SensorError> {
        let raw = self.read_raw().await?;
        let lux = raw_to_lux(raw);
        trace!("BH1750[0x{:02X}]> raw {} => {} lux", self.address, raw, lux);
        Ok(Measurement::from_lux(lux))
    }
}

/// Counts / 1.2, truncated to whole lux.
pub fn raw_to_lux(raw: u16) -> u16 {
    (u32::from(raw) * 5 / 6) as u16
}


#[cfg(test)]
pub mod tests {
    use embedded_hal::i2c::ErrorKind;

    use super::mocks::{MockI2c, Transaction};
    use super::*;

    #[tokio::test]
    async fn init_selects_continuous_high_resolution() {
        let mut sensor = Bh1750::new(MockI2c::new(&[Transaction::Write(0x23, vec![0x10])]));
        sensor.init().await.unwrap();
        assert_eq!(sensor.mode(), Mode::ContinuousHighResolution);
        sensor.i2c.done();
    }

    #[tokio::test]
    async fn read_converts_big_endian_counts_to_lux() {
        let mut sensor = Bh1750::new(MockI2c::new(&[
            Transaction::Write(0x23, vec![0x10]),
            Transaction::Read(0x23, [0x01, 0x2C]), // 300 counts
            Transaction::Read(0x23, [0x00, 0x94]), // 148 counts
        ]));
        sensor.init().await.unwrap();
        assert_eq!(sensor.read().await, Ok(Measurement::from_lux(250)));
        assert_eq!(sensor.read().await, Ok(Measurement::from_lux(123)));
        sensor.i2c.done();
    }

    #[tokio::test]
    async fn alternate_address_and_mode() {
        let mut sensor = Bh1750::with_address(
            MockI2c::new(&[
                Transaction::Write(0x5C, vec![0x13]),
                Transaction::Read(0x5C, [0xFF, 0xFF]),
            ]),
            ALTERNATE_ADDRESS,
        );
        sensor.set_mode(Mode::ContinuousLowResolution).await.unwrap();
        assert_eq!(sensor.read().await, Ok(Measurement::from_lux(54612)));
        sensor.i2c.done();
    }

    #[tokio::test]
    async fn nack_is_reported_as_bus_error() {
        let mut sensor = Bh1750::new(MockI2c::new(&[Transaction::Nack(0x23), Transaction::Nack(0x23)]));
        assert!(matches!(sensor.init().await, Err(SensorError::Bus(ErrorKind::NoAcknowledge(_)))));
        assert!(matches!(sensor.read().await, Err(SensorError::Bus(ErrorKind::NoAcknowledge(_)))));
        assert_eq!(sensor.mode(), Mode::ContinuousHighResolution);
        sensor.i2c.done();
    }

    #[test]
    fn raw_to_lux_divides_by_one_point_two() {
        assert_eq!(raw_to_lux(0), 0);
        assert_eq!(raw_to_lux(1), 0);
        assert_eq!(raw_to_lux(12), 10);
        assert_eq!(raw_to_lux(300), 250);
        assert_eq!(raw_to_lux(1000), 833);
        assert_eq!(raw_to_lux(u16::MAX), 54612);
    }
}
