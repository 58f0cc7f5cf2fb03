use bt_node::wake::WakeSignal;
use bt_node::{debug, info};
use embassy_nrf::gpio::{Input, Pin, Pull};
use embassy_nrf::Peri;

/// Buttons on the DK are active low.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Falling edge.
    Press,
    /// Rising edge.
    Release,
}

/// Raises a wake signal on every edge of one button.
pub struct Watcher<'d> {
    input: Input<'d>,
    edge: Edge,
    wake: &'d WakeSignal,
}

pub fn new<'d>(pin: Peri<'d, impl Pin>, edge: Edge, wake: &'d WakeSignal) -> Watcher<'d> {
    Watcher {
        input: Input::new(pin, Pull::Up),
        edge,
        wake,
    }
}

impl Watcher<'_> {
    pub async fn run(mut self) -> ! {
        info!("Button watcher armed on {:?}", self.edge);
        loop {
            match self.edge {
                Edge::Press => self.input.wait_for_falling_edge().await,
                Edge::Release => self.input.wait_for_rising_edge().await,
            }
            debug!("Button {:?}", self.edge);
            self.wake.notify();
        }
    }
}
