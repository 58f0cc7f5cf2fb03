//! Datagram transport towards the multicast group.
//!
//! Delivery is fire-and-forget: no acknowledgement, no retry, no ordering.

pub mod udp;

use embassy_net::{IpAddress, IpEndpoint, Ipv6Address};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// The socket could not be opened or bound.
    Open,
    /// The stack rejected the datagram (no route, no buffer, interface down).
    Send,
    Receive,
    GroupJoin,
}

pub trait Transport {
    async fn send(&self, destination: IpEndpoint, payload: &[u8]) -> Result<(), TransportError>;

    /// Waits for the next datagram. Datagrams longer than `buf` are truncated.
    async fn receive(&self, buf: &mut [u8]) -> Result<usize, TransportError>;

    /// Membership lasts as long as the transport, there is no leave.
    fn join_group(&self, group: Ipv6Address) -> Result<(), TransportError>;
}

impl<T: Transport> Transport for &T {
    async fn send(&self, destination: IpEndpoint, payload: &[u8]) -> Result<(), TransportError> {
        T::send(self, destination, payload).await
    }

    async fn receive(&self, buf: &mut [u8]) -> Result<usize, TransportError> {
        T::receive(self, buf).await
    }

    fn join_group(&self, group: Ipv6Address) -> Result<(), TransportError> {
        T::join_group(self, group)
    }
}

pub fn group_endpoint(group: Ipv6Address, port: u16) -> IpEndpoint {
    IpEndpoint::new(IpAddress::Ipv6(group), port)
}

/// Multicast group and port the nodes are built for.
pub fn default_group_endpoint() -> IpEndpoint {
    group_endpoint(crate::config::MULTICAST_GROUP, crate::config::UDP_PORT)
}

#[cfg(test)]
pub mod mocks {
    use core::cell::{Cell, RefCell};
    use std::vec::Vec;

    use embassy_sync::{blocking_mutex::raw::NoopRawMutex, channel::Channel};

    use super::*;

    const INBOX_SIZE: usize = 16;

    struct Node {
        port: u16,
        groups: RefCell<Vec<Ipv6Address>>,
        inbox: Channel<NoopRawMutex, Vec<u8>, INBOX_SIZE>,
    }

    /// In-memory multicast segment: a datagram sent to `group:port` lands in the
    /// inbox of every other node bound to `port` that joined `group`.
    pub struct MockNetwork {
        nodes: Vec<Node>,
    }

    impl MockNetwork {
        pub fn new(ports: &[u16]) -> Self {
            Self {
                nodes: ports
                    .iter()
                    .map(|port| Node {
                        port: *port,
                        groups: RefCell::new(Vec::new()),
                        inbox: Channel::new(),
                    })
                    .collect(),
            }
        }

        pub fn transport(&self, id: usize) -> MockTransport<'_> {
            MockTransport {
                network: self,
                id,
                sent: RefCell::new(Vec::new()),
                send_attempts: Cell::new(0),
                failing_sends: Cell::new(0),
                failing_join: Cell::new(false),
            }
        }

        /// Queues a datagram for node `id` as if it came from the air.
        pub fn inject(&self, id: usize, payload: &[u8]) {
            self.nodes[id].inbox.try_send(payload.to_vec()).expect("inbox full");
        }

        pub fn pending(&self, id: usize) -> usize {
            self.nodes[id].inbox.len()
        }

        fn deliver(&self, from: usize, destination: IpEndpoint, payload: &[u8]) {
            #[allow(irrefutable_let_patterns)]
            let IpAddress::Ipv6(group) = destination.addr else {
                return;
            };
            for (id, node) in self.nodes.iter().enumerate() {
                if id != from && node.port == destination.port && node.groups.borrow().contains(&group) {
                    node.inbox.try_send(payload.to_vec()).expect("inbox full");
                }
            }
        }
    }

    pub struct MockTransport<'n> {
        network: &'n MockNetwork,
        id: usize,
        pub sent: RefCell<Vec<(IpEndpoint, Vec<u8>)>>,
        pub send_attempts: Cell<usize>,
        failing_sends: Cell<usize>,
        failing_join: Cell<bool>,
    }

    impl MockTransport<'_> {
        /// The next `count` sends are rejected like a stack without buffers would.
        pub fn fail_next_sends(&self, count: usize) {
            self.failing_sends.set(count);
        }

        pub fn fail_join(&self) {
            self.failing_join.set(true);
        }

        pub fn sent_payloads(&self) -> Vec<std::string::String> {
            self.sent
                .borrow()
                .iter()
                .map(|(_, payload)| std::string::String::from_utf8_lossy(payload).into_owned())
                .collect()
        }
    }

    impl Transport for MockTransport<'_> {
        async fn send(&self, destination: IpEndpoint, payload: &[u8]) -> Result<(), TransportError> {
            self.send_attempts.set(self.send_attempts.get() + 1);
            if self.failing_sends.get() > 0 {
                self.failing_sends.set(self.failing_sends.get() - 1);
                return Err(TransportError::Send);
            }
            self.sent.borrow_mut().push((destination, payload.to_vec()));
            self.network.deliver(self.id, destination, payload);
            Ok(())
        }

        async fn receive(&self, buf: &mut [u8]) -> Result<usize, TransportError> {
            let datagram = self.network.nodes[self.id].inbox.receive().await;
            let len = datagram.len().min(buf.len());
            buf[..len].copy_from_slice(&datagram[..len]);
            Ok(len)
        }

        fn join_group(&self, group: Ipv6Address) -> Result<(), TransportError> {
            if self.failing_join.get() {
                return Err(TransportError::GroupJoin);
            }
            self.network.nodes[self.id].groups.borrow_mut().push(group);
            Ok(())
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::mocks::MockNetwork;
    use super::*;

    #[test]
    fn default_endpoint_is_site_local_all_nodes() {
        let endpoint = default_group_endpoint();
        assert_eq!(endpoint.port, 2222);
        assert_eq!(endpoint.addr, IpAddress::Ipv6(Ipv6Address::new(0xff03, 0, 0, 0, 0, 0, 0, 1)));
    }

    #[tokio::test]
    async fn multicast_reaches_joined_nodes_only() {
        let network = MockNetwork::new(&[2222, 2222, 2222, 4444]);
        let sender = network.transport(0);
        let joined = network.transport(1);
        let _not_joined = network.transport(2);
        let other_port = network.transport(3);
        joined.join_group(crate::config::MULTICAST_GROUP).unwrap();
        other_port.join_group(crate::config::MULTICAST_GROUP).unwrap();

        sender.send(default_group_endpoint(), b"Light: 1 lux").await.unwrap();

        assert_eq!(network.pending(0), 0);
        assert_eq!(network.pending(1), 1);
        assert_eq!(network.pending(2), 0);
        assert_eq!(network.pending(3), 0);
    }

    #[tokio::test]
    async fn receive_truncates_to_buffer() {
        let network = MockNetwork::new(&[2222]);
        let transport = network.transport(0);
        network.inject(0, b"0123456789");
        let mut buf = [0u8; 4];
        assert_eq!(transport.receive(&mut buf).await, Ok(4));
        assert_eq!(&buf, b"0123");
    }

    #[tokio::test]
    async fn send_failures_are_reported() {
        let network = MockNetwork::new(&[2222]);
        let transport = network.transport(0);
        transport.fail_next_sends(1);
        assert_eq!(transport.send(default_group_endpoint(), b"a").await, Err(TransportError::Send));
        assert_eq!(transport.send(default_group_endpoint(), b"b").await, Ok(()));
        assert_eq!(transport.send_attempts.get(), 2);
        assert_eq!(transport.sent_payloads(), vec!["b"]);
    }
}
