#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

#[macro_use]
pub mod fmt;

pub mod duty_cycle;
pub mod greeting;
pub mod net;
pub mod node;
pub mod payload;
pub mod periodic;
pub mod receiver;
pub mod report;
pub mod sensor;
pub mod wake;

pub mod config {
    include!(concat!(env!("OUT_DIR"), "/config.rs"));
}
