use embassy_net::IpEndpoint;

use crate::net::{Transport, TransportError};
use crate::payload::GREETING;
use crate::wake::WakeSignal;

/// Sends [`GREETING`] to the group once per button press.
pub struct Runner<'a, T: Transport> {
    transport: &'a T,
    wake: &'a WakeSignal,
    destination: IpEndpoint,
}

pub fn new<'a, T: Transport>(transport: &'a T, wake: &'a WakeSignal, destination: IpEndpoint) -> Runner<'a, T> {
    Runner {
        transport,
        wake,
        destination,
    }
}

impl<'a, T: Transport> Runner<'a, T> {
    /// Waits for the next press and sends one greeting. Presses while a send
    /// is in flight collapse into a single pending one.
    pub async fn once(&mut self) -> Result<(), TransportError> {
        self.wake.wait().await;
        self.transport.send(self.destination, GREETING.as_bytes()).await?;
        info!("Sent: {}", GREETING);
        Ok(())
    }

    pub async fn run(mut self) -> ! {
        info!("Greeting sender started");
        loop {
            if let Err(e) = self.once().await {
                warn!("Sending greeting failed: {:?}", e);
            }
        }
    }
}
