use crate::fmt::FormatablePayload;
use crate::net::{Transport, TransportError};
use crate::payload::{RECEIVE_BUFFER_SIZE, parse_light_report};

/// Gets every datagram the node receives.
pub trait PayloadHandler {
    fn handle(&mut self, payload: &[u8]);
}

impl<F: FnMut(&[u8])> PayloadHandler for F {
    fn handle(&mut self, payload: &[u8]) {
        self(payload)
    }
}

/// Logs each payload, light reports additionally with their value.
pub struct LoggingHandler;

impl PayloadHandler for LoggingHandler {
    fn handle(&mut self, payload: &[u8]) {
        info!("Received: {}", FormatablePayload(payload));
        if let Some(measurement) = parse_light_report(payload) {
            debug!("Light report => {} lux", measurement.lux());
        }
    }
}

pub struct Receiver<'a, T: Transport, H: PayloadHandler> {
    transport: &'a T,
    handler: H,
}

pub fn new<'a, T: Transport, H: PayloadHandler>(transport: &'a T, handler: H) -> Receiver<'a, T, H> {
    Receiver { transport, handler }
}

impl<'a, T: Transport, H: PayloadHandler> Receiver<'a, T, H> {
    /// Waits for one datagram and hands it to the handler. Returns the
    /// number of bytes delivered, `0` for an empty datagram.
    pub async fn receive_once(&mut self) -> Result<usize, TransportError> {
        let mut buf = [0u8; RECEIVE_BUFFER_SIZE];
        let len = self.transport.receive(&mut buf[..RECEIVE_BUFFER_SIZE - 1]).await?;
        if len == 0 {
            warn!("Failed to read message");
            return Ok(0);
        }
        self.handler.handle(&buf[..len]);
        Ok(len)
    }

    pub async fn run(mut self) -> ! {
        info!("Receiver started");
        loop {
            if let Err(e) = self.receive_once().await {
                warn!("Receive failed: {:?}", e);
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use std::vec::Vec;

    use super::*;
    use crate::net::mocks::MockNetwork;

    #[tokio::test]
    async fn handler_gets_each_datagram() {
        let network = MockNetwork::new(&[2222]);
        let transport = network.transport(0);
        network.inject(0, b"Hello Thread xd");
        network.inject(0, b"Light: 4 lux");

        let mut received: Vec<Vec<u8>> = Vec::new();
        let mut receiver = new(&transport, |payload: &[u8]| received.push(payload.to_vec()));
        assert_eq!(receiver.receive_once().await, Ok(15));
        assert_eq!(receiver.receive_once().await, Ok(12));
        drop(receiver);

        assert_eq!(received, vec![b"Hello Thread xd".to_vec(), b"Light: 4 lux".to_vec()]);
    }

    #[tokio::test]
    async fn long_datagram_is_cut_to_63_bytes() {
        let network = MockNetwork::new(&[2222]);
        let transport = network.transport(0);
        network.inject(0, &[b'x'; 100]);

        let mut lengths = Vec::new();
        let mut receiver = new(&transport, |payload: &[u8]| lengths.push(payload.len()));
        assert_eq!(receiver.receive_once().await, Ok(RECEIVE_BUFFER_SIZE - 1));
        drop(receiver);

        assert_eq!(lengths, vec![63]);
    }

    #[tokio::test]
    async fn empty_datagram_is_not_handed_over() {
        let network = MockNetwork::new(&[2222]);
        let transport = network.transport(0);
        network.inject(0, b"");

        let mut calls = 0;
        let mut receiver = new(&transport, |_: &[u8]| calls += 1);
        assert_eq!(receiver.receive_once().await, Ok(0));
        drop(receiver);

        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn logging_handler_accepts_any_payload() {
        let network = MockNetwork::new(&[2222]);
        let transport = network.transport(0);
        network.inject(0, b"Light: 250 lux");
        network.inject(0, &[0xde, 0xad, 0xbe, 0xef]);

        let mut receiver = new(&transport, LoggingHandler);
        assert_eq!(receiver.receive_once().await, Ok(14));
        assert_eq!(receiver.receive_once().await, Ok(4));
        assert_eq!(network.pending(0), 0);
    }
}
