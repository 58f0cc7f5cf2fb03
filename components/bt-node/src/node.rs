//! Start-up helpers shared by the node binaries.

use embassy_net::Ipv6Address;
use embassy_time::Timer;

use crate::net::{Transport, TransportError};

/// A resource the node cannot run without. Peripherals are owned singletons
/// and cannot be missing, so only the network side fails at start-up.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    Transport(TransportError),
}

impl From<TransportError> for InitError {
    fn from(err: TransportError) -> Self {
        InitError::Transport(err)
    }
}

/// Joins `group`; a node that listens must not start without membership.
pub fn join_group<T: Transport>(transport: &T, group: Ipv6Address) -> Result<(), InitError> {
    transport.join_group(group)?;
    Ok(())
}

/// Logs `err` and idles forever. The main loop is never entered.
pub async fn park(err: InitError) -> ! {
    error!("Node init failed: {:?}", err);
    loop {
        Timer::after_secs(1).await;
    }
}

#[cfg(test)]
pub mod tests {
    use embassy_time::{Duration, with_timeout};

    use super::*;
    use crate::config;
    use crate::net::mocks::MockNetwork;

    #[test]
    fn join_failure_is_an_init_error() {
        let network = MockNetwork::new(&[2222]);
        let transport = network.transport(0);
        transport.fail_join();
        assert_eq!(
            join_group(&transport, config::MULTICAST_GROUP),
            Err(InitError::Transport(TransportError::GroupJoin))
        );
    }

    #[test]
    fn join_success() {
        let network = MockNetwork::new(&[2222]);
        let transport = network.transport(0);
        assert_eq!(join_group(&transport, config::MULTICAST_GROUP), Ok(()));
    }

    #[tokio::test]
    async fn park_never_returns() {
        let parked = with_timeout(Duration::from_millis(20), park(InitError::Transport(TransportError::Open))).await;
        assert!(parked.is_err());
    }
}
