//! Address flag handling.
//!
//! Addresses are `host:port`. A bare `:port` means every interface when
//! listening and the local host when dialing.

pub const DEFAULT_ADDR: &str = ":54321";

/// Address to bind a listener to.
pub fn listen_addr(addr: &str) -> String {
    with_default_host(addr, "0.0.0.0")
}

/// Address to connect to.
pub fn dial_addr(addr: &str) -> String {
    with_default_host(addr, "127.0.0.1")
}

fn with_default_host(addr: &str, host: &str) -> String {
    if addr.starts_with(':') {
        format!("{}{}", host, addr)
    } else {
        addr.to_string()
    }
}
