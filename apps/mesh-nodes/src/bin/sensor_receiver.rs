#![no_std]
#![no_main]

use bt_node::config;
use bt_node::net::udp;
use bt_node::node::{self, park};
use bt_node::receiver::{self, LoggingHandler};
use bt_nrf::usb_net;
use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::join::join;
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

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_nrf::init(bt_nrf::config());
    info!("Sensor receiver starting");

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

    let receiver = receiver::new(&transport, LoggingHandler);

    join(net_runner.run(), receiver.run()).await;
}
