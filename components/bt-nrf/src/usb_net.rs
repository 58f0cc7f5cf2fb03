//! IPv6 link to a host over USB CDC-NCM.
//!
//! The host bridges the nodes onto one Ethernet segment, so a datagram sent to
//! the multicast group reaches every node that joined it.

use bt_node::info;
use embassy_futures::join::join3;
use embassy_net::{Ipv6Address, Ipv6Cidr, Stack, StackResources, StaticConfigV6};
use embassy_usb::class::cdc_ncm::embassy_net::{Device, Runner as NcmRunner, State as NetState};
use embassy_usb::class::cdc_ncm::{CdcNcmClass, State as NcmState};
use embassy_usb::driver::Driver;
use embassy_usb::{Builder, UsbDevice};

pub const MTU: usize = 1514;
const PACKET_QUEUE: usize = 4;
const SOCKET_COUNT: usize = 3;
const MAX_PACKET_SIZE: u16 = 64;

/// Unique local prefix of the node segment, `fd00:b7::/64`.
const PREFIX: [u16; 4] = [0xfd00, 0x00b7, 0, 0];
/// MAC the host side of the link gets.
const HOST_MAC: [u8; 6] = [0x88, 0x88, 0x88, 0x88, 0x88, 0x88];

/// Buffers of the USB device and the network stack, must be `'static` in practice.
pub struct State<'d> {
    config_descriptor: [u8; 256],
    bos_descriptor: [u8; 256],
    msos_descriptor: [u8; 128],
    control_buf: [u8; 128],
    ncm: NcmState<'d>,
    net: NetState<MTU, PACKET_QUEUE, PACKET_QUEUE>,
    resources: StackResources<SOCKET_COUNT>,
}

impl State<'_> {
    pub fn new() -> Self {
        State {
            config_descriptor: [0; 256],
            bos_descriptor: [0; 256],
            msos_descriptor: [0; 128],
            control_buf: [0; 128],
            ncm: NcmState::new(),
            net: NetState::new(),
            resources: StackResources::new(),
        }
    }
}

impl Default for State<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives the USB device, the NCM class and the network stack.
pub struct Runner<'d, D: Driver<'d>> {
    usb: UsbDevice<'d, D>,
    ncm: NcmRunner<'d, D, MTU>,
    net: embassy_net::Runner<'d, Device<'d, MTU>>,
}

impl<'d, D: Driver<'d>> Runner<'d, D> {
    pub async fn run(self) {
        let Runner { mut usb, ncm, mut net } = self;
        join3(usb.run(), ncm.run(), net.run()).await;
    }
}

/// Node address in the segment prefix, interface id from the device id.
pub fn node_address(device_id: u64) -> Ipv6Address {
    let id = device_id.to_be_bytes();
    let word = |i: usize| u16::from_be_bytes([id[i], id[i + 1]]);
    Ipv6Address::new(PREFIX[0], PREFIX[1], PREFIX[2], PREFIX[3], word(0), word(2), word(4), word(6))
}

/// Locally administered unicast MAC from the device id.
pub fn node_mac(device_id: u64) -> [u8; 6] {
    let id = device_id.to_be_bytes();
    [0x02, id[3], id[4], id[5], id[6], id[7]]
}

pub fn new<'d, D: Driver<'d>>(state: &'d mut State<'d>, driver: D, device_id: u64, seed: u64) -> (Runner<'d, D>, Stack<'d>) {
    let mut config = embassy_usb::Config::new(0xc0de, 0xcafe);
    config.manufacturer = Some("Bittailor");
    config.product = Some("BT Mesh Node");
    config.serial_number = Some("_BT_MESH_");
    config.max_power = 100;
    config.max_packet_size_0 = 64;
    // NCM is a composite device
    config.composite_with_iads = true;
    config.device_class = 0xEF;
    config.device_sub_class = 0x02;
    config.device_protocol = 0x01;

    let mut builder = Builder::new(
        driver,
        config,
        &mut state.config_descriptor,
        &mut state.bos_descriptor,
        &mut state.msos_descriptor,
        &mut state.control_buf,
    );
    let class = CdcNcmClass::new(&mut builder, &mut state.ncm, HOST_MAC, MAX_PACKET_SIZE);
    let usb = builder.build();

    let (ncm, device) = class.into_embassy_net_device::<MTU, PACKET_QUEUE, PACKET_QUEUE>(&mut state.net, node_mac(device_id));

    let address = node_address(device_id);
    let net_config = embassy_net::Config::ipv6_static(StaticConfigV6 {
        address: Ipv6Cidr::new(address, 64),
        gateway: None,
        dns_servers: Default::default(),
    });
    let (stack, net) = embassy_net::new(device, net_config, &mut state.resources, seed);
    info!("USB network configured as {}", embassy_net::IpAddress::Ipv6(address));

    (Runner { usb, ncm, net }, stack)
}
