use std::net::{IpAddr, SocketAddr};

/// Derives a visitor fingerprint from a client address.
///
/// The port is dropped and the host is hex-encoded. This is a reversible
/// encoding, not a hash: it recognizes repeat visitors but hides nothing.
pub fn fingerprint(remote_addr: &str) -> String {
    let host = if let Ok(addr) = remote_addr.parse::<SocketAddr>() {
        addr.ip().to_string()
    } else if let Ok(ip) = remote_addr.parse::<IpAddr>() {
        ip.to_string()
    } else {
        remote_addr.split(':').next().unwrap_or_default().to_string()
    };
    hex::encode(host)
}
