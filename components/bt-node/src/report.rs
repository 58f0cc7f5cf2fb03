use embassy_net::IpEndpoint;

use crate::fmt::FormatablePayload;
use crate::net::{Transport, TransportError};
use crate::payload::format_light_report;
use crate::sensor::{Measurement, SensorSource, read_or_sentinel};

/// One report cycle: read the sensor and send the reading as a light report.
pub struct Reporter<'a, S: SensorSource, T: Transport> {
    sensor: S,
    transport: &'a T,
    destination: IpEndpoint,
}

impl<'a, S: SensorSource, T: Transport> Reporter<'a, S, T> {
    pub fn new(sensor: S, transport: &'a T, destination: IpEndpoint) -> Self {
        Reporter {
            sensor,
            transport,
            destination,
        }
    }

    /// Sends exactly one report. A failed read is reported as
    /// [`Measurement::SENTINEL`]; a failed send is logged and dropped.
    pub async fn report_once(&mut self) -> Result<Measurement, TransportError> {
        let measurement = read_or_sentinel(&mut self.sensor).await;
        let payload = format_light_report(measurement);
        match self.transport.send(self.destination, payload.as_bytes()).await {
            Ok(()) => {
                info!("Sent: {}", FormatablePayload(payload.as_bytes()));
                Ok(measurement)
            }
            Err(e) => {
                warn!("Sending '{}' failed: {:?}", FormatablePayload(payload.as_bytes()), e);
                Err(e)
            }
        }
    }
}
