//! Datagram payloads exchanged between the nodes.
//!
//! Plain ASCII without framing or version byte; one datagram carries one message.

use core::fmt::Write;

use heapless::String;
use nom::{IResult, Parser, bytes::complete::tag, combinator::all_consuming};

use crate::sensor::Measurement;

/// Sent by the button node on every press.
pub const GREETING: &str = "Hello Thread xd";

/// Receive buffer of the listening nodes. One byte is kept back, so at most
/// `RECEIVE_BUFFER_SIZE - 1` bytes of a datagram are delivered.
pub const RECEIVE_BUFFER_SIZE: usize = 64;

pub const REPORT_PAYLOAD_SIZE: usize = 32;

pub type ReportPayload = String<REPORT_PAYLOAD_SIZE>;

/// `"Light: <lux> lux"`
pub fn format_light_report(measurement: Measurement) -> ReportPayload {
    let mut payload = ReportPayload::new();
    // "Light: 65535 lux" is 16 bytes, always fits
    let _ = write!(payload, "Light: {} lux", measurement.lux());
    payload
}

pub fn parse_light_report(payload: &[u8]) -> Option<Measurement> {
    let text = core::str::from_utf8(payload).ok()?;
    let parsed: IResult<&str, _> = all_consuming((tag("Light: "), nom::character::complete::u16, tag(" lux"))).parse(text);
    let (_, (_, lux, _)) = parsed.ok()?;
    Some(Measurement::from_lux(lux))
}
