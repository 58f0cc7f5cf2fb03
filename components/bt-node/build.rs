use std::net::Ipv6Addr;
use std::path::PathBuf;

fn env_or(name: &str, default: &str) -> String {
    println!("cargo:rerun-if-env-changed={name}");
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_number<T: std::str::FromStr>(name: &str, default: &str) -> T {
    let value = env_or(name, default);
    value
        .parse()
        .unwrap_or_else(|_| panic!("{name}={value} is not a valid number"))
}

fn main() {
    let udp_port: u16 = env_number("BT_NODE_UDP_PORT", "2222");
    let group = env_or("BT_NODE_MULTICAST_GROUP", "ff03::1");
    let group: Ipv6Addr = group
        .parse()
        .unwrap_or_else(|_| panic!("BT_NODE_MULTICAST_GROUP={group} is not an IPv6 address"));
    assert!(group.is_multicast(), "BT_NODE_MULTICAST_GROUP={group} is not a multicast address");
    let normal_period_secs: u64 = env_number("BT_NODE_NORMAL_PERIOD_SECS", "30");
    let burst_count: usize = env_number("BT_NODE_BURST_COUNT", "10");
    let burst_interval_ms: u64 = env_number("BT_NODE_BURST_INTERVAL_MS", "500");
    let send_interval_secs: u64 = env_number("BT_NODE_SEND_INTERVAL_SECS", "2");

    let segments = group.segments().map(|s| format!("0x{s:04x}")).join(", ");

    let out_dir_path = PathBuf::from(std::env::var_os("OUT_DIR").unwrap());
    let out_file_path = out_dir_path.join("config.rs");

    std::fs::write(
        out_file_path,
        format!(
            "
            // generated form env vars
            pub const UDP_PORT: u16 = {udp_port};
            pub const MULTICAST_GROUP: core::net::Ipv6Addr = core::net::Ipv6Addr::new({segments});
            pub const NORMAL_PERIOD_SECS: u64 = {normal_period_secs};
            pub const BURST_COUNT: usize = {burst_count};
            pub const BURST_INTERVAL_MS: u64 = {burst_interval_ms};
            pub const SEND_INTERVAL_SECS: u64 = {send_interval_secs};"
        ),
    )
    .unwrap();
}
