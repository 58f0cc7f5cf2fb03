pub mod bh1750;

/// A single illuminance reading in lux.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement(u16);

impl Measurement {
    /// Reported in place of a reading when the sensor could not be read.
    pub const SENTINEL: Measurement = Measurement(0);

    pub const fn from_lux(lux: u16) -> Self {
        Measurement(lux)
    }

    pub const fn lux(&self) -> u16 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    Bus(embedded_hal::i2c::ErrorKind),
}

impl SensorError {
    pub fn from_i2c<E: embedded_hal::i2c::Error>(err: E) -> Self {
        SensorError::Bus(err.kind())
    }
}

pub trait SensorSource {
    async fn read(&mut self) -> Result<Measurement, SensorError>;
}

/// Reads the sensor, substituting [`Measurement::SENTINEL`] when the read fails.
pub async fn read_or_sentinel<S: SensorSource>(sensor: &mut S) -> Measurement {
    match sensor.read().await {
        Ok(measurement) => measurement,
        Err(e) => {
            warn!("Sensor read failed: {:?} => reporting {}", e, Measurement::SENTINEL.lux());
            Measurement::SENTINEL
        }
    }
}
