//! Wake-on-LAN magic packets.
//!
//! A magic packet is six `0xFF` bytes followed by the target MAC address
//! repeated sixteen times, broadcast over UDP. Frame TVs in standby keep
//! their network card listening for it.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use tokio::net::UdpSocket;

pub const MAGIC_PACKET_LEN: usize = 6 + 16 * 6;
const WOL_PORT: u16 = 9;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MacAddress(pub [u8; 6]);

impl FromStr for MacAddress {
    type Err = crate::error::ConfigError;

    /// Accepts `aa:bb:cc:dd:ee:ff`, `aa-bb-cc-dd-ee-ff` or `aabbccddeeff`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || crate::error::ConfigError::Invalid {
            key: "SAMSUNG_TV_MAC",
            value: s.to_string(),
        };

        let hex: String = s.trim().chars().filter(|c| !matches!(c, ':' | '-')).collect();
        if hex.len() != 12 {
            return Err(invalid());
        }

        let mut bytes = [0u8; 6];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = hex.get(i * 2..i * 2 + 2).ok_or_else(invalid)?;
            *byte = u8::from_str_radix(pair, 16).map_err(|_| invalid())?;
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

pub fn magic_packet(mac: MacAddress) -> [u8; MAGIC_PACKET_LEN] {
    let mut packet = [0xFFu8; MAGIC_PACKET_LEN];
    for chunk in packet[6..].chunks_exact_mut(6) {
        chunk.copy_from_slice(&mac.0);
    }
    packet
}

/// Broadcast a magic packet for `mac` on the local network.
pub async fn wake(mac: MacAddress) -> std::io::Result<()> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
    socket.set_broadcast(true)?;
    let target = SocketAddr::from((Ipv4Addr::BROADCAST, WOL_PORT));
    socket.send_to(&magic_packet(mac), target).await?;
    tracing::debug!("Sent Wake-on-LAN packet to {}", mac);
    Ok(())
}
