#![no_std]
#![no_main]

use bt_node::net::{self, udp};
use bt_node::node::park;
use bt_node::report::Reporter;
use bt_node::sensor::bh1750::Bh1750;
use bt_node::wake::WakeSignal;
use bt_node::{config, duty_cycle};
use bt_nrf::button::{self, Edge};
use bt_nrf::usb_net;
use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::join::join3;
use embassy_nrf::{
    bind_interrupts, peripherals, rng,
    twim::{self, Twim},
    usb::{self, Driver, vbus_detect::HardwareVbusDetect},
};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    USBD => usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => usb::vbus_detect::InterruptHandler;
    RNG => rng::InterruptHandler<peripherals::RNG>;
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

static WAKE: WakeSignal = WakeSignal::new();

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_nrf::init(bt_nrf::config());
    info!("Light sensor node starting");

    let mut twim_config = twim::Config::default();
    twim_config.frequency = twim::Frequency::K100;
    let mut twim_buffer = [0u8; 16];
    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim_config, &mut twim_buffer);
    let mut sensor = Bh1750::new(i2c);
    if let Err(e) = sensor.init().await {
        warn!("BH1750 init failed: {:?}", e);
    }

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

    let button = button::new(p.P0_12, Edge::Press, &WAKE);

    let reporter = Reporter::new(sensor, &transport, net::default_group_endpoint());
    let controller = duty_cycle::new(reporter, &WAKE, duty_cycle::Config::default());

    join3(net_runner.run(), button.run(), controller.run()).await;
}
