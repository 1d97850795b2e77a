use std::io;
use std::net::{IpAddr, UdpSocket};

/// Port listened on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 9000;

/// Shown in place of the local address when it cannot be determined.
pub const UNKNOWN_ADDRESS: &str = "Unknown";

/// Address of the interface the host would use for outbound traffic, or
/// `UNKNOWN_ADDRESS` when that cannot be determined.
pub fn local_address() -> String {
    match outbound_ip() {
        Ok(ip) if !ip.is_unspecified() => ip.to_string(),
        _ => UNKNOWN_ADDRESS.to_string(),
    }
}

fn outbound_ip() -> io::Result<IpAddr> {
    let sock = UdpSocket::bind("0.0.0.0:0")?;
    // Connecting a UDP socket only picks a route; nothing is sent.
    sock.connect("192.0.2.1:9")?;
    Ok(sock.local_addr()?.ip())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_address_is_an_ip_or_unknown() {
        let addr = local_address();
        assert!(addr == UNKNOWN_ADDRESS || addr.parse::<IpAddr>().is_ok());
    }
}
