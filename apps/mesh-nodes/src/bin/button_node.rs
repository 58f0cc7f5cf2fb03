#![no_std]
#![no_main]

use bt_node::net::{self, udp};
use bt_node::node::{self, park};
use bt_node::receiver::{self, LoggingHandler};
use bt_node::wake::WakeSignal;
use bt_node::{config, greeting};
use bt_nrf::button::{self, Edge};
use bt_nrf::usb_net;
use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::join::join4;
use embassy_nrf::{
    bind_interrupts, peripherals, rng,
    usb::{self, Driver, vbus_detect::HardwareVbusDetect},
};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    USBD => usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => usb::vbus_detect::InterruptHandler;
    RNG => rng::InterruptHandler<peripherals::RNG>;
});

static WAKE: WakeSignal = WakeSignal::new();

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_nrf::init(bt_nrf::config());
    info!("Button node starting");

    let driver = Driver::new(p.USBD, Irqs, HardwareVbusDetect::new(Irqs));
    let mut rng = rng::Rng::new(p.RNG, Irqs);
    let mut seed = [0u8; 8];
    rng.blocking_fill_bytes(&mut seed);

    static USB_NET: StaticCell<usb_net::State<'static>> = StaticCell::new();
    let (net_runner, stack) = usb_net::new(USB_NET.init(usb_net::State::new()), driver, bt_nrf::device_id(), u64::from_le_bytes(seed));

    let mut udp_state = udp::NodeState::new();
    let transport = match udp::open(stack, &mut udp_state, config::UDP_PORT) {
        Ok(transport) => transport,
        Err(e) => park(e.into()).await,
    };
    if let Err(e) = node::join_group(&transport, config::MULTICAST_GROUP) {
        park(e).await;
    }

    let button = button::new(p.P0_11, Edge::Release, &WAKE);

    let sender = greeting::new(&transport, &WAKE, net::default_group_endpoint());
    let receiver = receiver::new(&transport, LoggingHandler);

    join4(net_runner.run(), button.run(), sender.run(), receiver.run()).await;
}
