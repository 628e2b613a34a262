//! Ethernet hardware addresses.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::ParseMacError;

/// 48-bit Ethernet address, printed as `aa:bb:cc:dd:ee:ff`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MacAddr(pub [u8; 6]);

impl From<[u8; 6]> for MacAddr {
    fn from(octets: [u8; 6]) -> Self {
        Self(octets)
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl FromStr for MacAddr {
    type Err = ParseMacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseMacError(s.to_string());

        let mut octets = [0u8; 6];
        let mut parts = s.split(':');
        for octet in &mut octets {
            let part = parts.next().ok_or_else(invalid)?;
            if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self(octets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_lowercase_hex() {
        let mac = MacAddr([0x00, 0x1B, 0x21, 0x0a, 0xff, 0x01]);
        assert_eq!(mac.to_string(), "00:1b:21:0a:ff:01");
    }

    #[test]
    fn parse_accepts_short_octets() {
        assert_eq!("0:1:2:a:b:FF".parse(), Ok(MacAddr([0, 1, 2, 0x0a, 0x0b, 0xff])));
    }

    #[test]
    fn parse_rejects_malformed() {
        for text in ["", "00:11:22:33:44", "00:11:22:33:44:55:66", "00:11:22:33:44:gg", "000:11:22:33:44:55"] {
            assert_eq!(text.parse::<MacAddr>(), Err(ParseMacError(text.to_string())), "{text}");
        }
    }

    #[test]
    fn display_parse_agree() {
        let mac = MacAddr([0xde, 0xad, 0xbe, 0xef, 0x00, 0x01]);
        assert_eq!(mac.to_string().parse(), Ok(mac));
    }
}
