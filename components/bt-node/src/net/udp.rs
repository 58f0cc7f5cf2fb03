use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{IpAddress, IpEndpoint, Ipv6Address, Stack};

use crate::net::{Transport, TransportError};

const PACKET_METADATA_COUNT: usize = 4;

/// Holds a whole datagram at the IPv6 minimum MTU.
pub const RX_BUFFER_SIZE: usize = 1280;
pub const TX_BUFFER_SIZE: usize = 256;

/// Buffers used by the node binaries.
pub type NodeState = State<RX_BUFFER_SIZE, TX_BUFFER_SIZE>;

/// Socket buffers, must outlive the transport.
pub struct State<const RX: usize, const TX: usize> {
    rx_meta: [PacketMetadata; PACKET_METADATA_COUNT],
    rx_buffer: [u8; RX],
    tx_meta: [PacketMetadata; PACKET_METADATA_COUNT],
    tx_buffer: [u8; TX],
}

impl<const RX: usize, const TX: usize> State<RX, TX> {
    pub const fn new() -> Self {
        State {
            rx_meta: [PacketMetadata::EMPTY; PACKET_METADATA_COUNT],
            rx_buffer: [0; RX],
            tx_meta: [PacketMetadata::EMPTY; PACKET_METADATA_COUNT],
            tx_buffer: [0; TX],
        }
    }
}

impl<const RX: usize, const TX: usize> Default for State<RX, TX> {
    fn default() -> Self {
        Self::new()
    }
}

/// UDP socket on an embassy-net stack. `RX` matches the socket's receive
/// buffer, so any datagram the socket accepts fits the scratch copy.
pub struct UdpTransport<'a, const RX: usize> {
    stack: Stack<'a>,
    socket: UdpSocket<'a>,
}

/// Opens a UDP socket on `stack` bound to `port`.
pub fn open<'a, const RX: usize, const TX: usize>(
    stack: Stack<'a>,
    state: &'a mut State<RX, TX>,
    port: u16,
) -> Result<UdpTransport<'a, RX>, TransportError> {
    let mut socket = UdpSocket::new(
        stack,
        &mut state.rx_meta,
        &mut state.rx_buffer,
        &mut state.tx_meta,
        &mut state.tx_buffer,
    );
    socket.bind(port).map_err(|e| {
        error!("UDP bind to port {} failed: {:?}", port, e);
        TransportError::Open
    })?;
    info!("UDP socket bound to port {}", port);
    Ok(UdpTransport { stack, socket })
}

impl<const RX: usize> Transport for UdpTransport<'_, RX> {
    async fn send(&self, destination: IpEndpoint, payload: &[u8]) -> Result<(), TransportError> {
        self.socket.send_to(payload, destination).await.map_err(|e| {
            warn!("UDP send to {:?} failed: {:?}", destination, e);
            TransportError::Send
        })?;
        trace!("UDP.TX> {} bytes to {:?}", payload.len(), destination);
        Ok(())
    }

    async fn receive(&self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let mut datagram = [0u8; RX];
        let (len, meta) = self.socket.recv_from(&mut datagram).await.map_err(|e| {
            warn!("UDP receive failed: {:?}", e);
            TransportError::Receive
        })?;
        let delivered = len.min(buf.len());
        buf[..delivered].copy_from_slice(&datagram[..delivered]);
        if delivered < len {
            debug!("UDP.RX> {} bytes from {:?} truncated to {}", len, meta.endpoint, delivered);
        } else {
            trace!("UDP.RX> {} bytes from {:?}", len, meta.endpoint);
        }
        Ok(delivered)
    }

    fn join_group(&self, group: Ipv6Address) -> Result<(), TransportError> {
        self.stack.join_multicast_group(group).map_err(|e| {
            error!("Joining multicast group {:?} failed: {:?}", IpAddress::Ipv6(group), e);
            TransportError::GroupJoin
        })?;
        info!("Joined multicast group {:?}", IpAddress::Ipv6(group));
        Ok(())
    }
}
