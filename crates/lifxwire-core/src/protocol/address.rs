//! Device address packing.
//!
//! The target field is 64 bits wide. The 6-byte hardware address occupies the
//! top six byte lanes (`byte[0]` in bits 63..56 down to `byte[5]` in bits
//! 23..16) and the low 16 bits are always zero.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use super::error::{ProtocolError, Result};
use super::layout;

/// 6-byte device hardware address; all zeros addresses every device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceAddress([u8; layout::DEVICE_ADDRESS_LEN]);

impl DeviceAddress {
    pub const BROADCAST: DeviceAddress = DeviceAddress([0; layout::DEVICE_ADDRESS_LEN]);

    pub const fn new(octets: [u8; layout::DEVICE_ADDRESS_LEN]) -> Self {
        Self(octets)
    }

    /// Accept a target given as raw bytes.
    ///
    /// Six bytes are taken as-is; eight bytes are accepted only when the two
    /// trailing bytes are zero; an empty slice means broadcast. Any other
    /// shape is `MalformedTarget`.
    ///
    /// # Examples
    /// ```
    /// use lifxwire_core::protocol::{DeviceAddress, ProtocolError};
    ///
    /// let padded = [1, 2, 3, 4, 5, 6, 0, 0];
    /// assert_eq!(
    ///     DeviceAddress::from_slice(&padded).unwrap(),
    ///     DeviceAddress::new([1, 2, 3, 4, 5, 6])
    /// );
    /// assert!(matches!(
    ///     DeviceAddress::from_slice(&[1, 2, 3]),
    ///     Err(ProtocolError::MalformedTarget { len: 3 })
    /// ));
    /// ```
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        match bytes.len() {
            0 => Ok(Self::BROADCAST),
            layout::DEVICE_ADDRESS_LEN => Ok(Self(copy_octets(bytes))),
            layout::PADDED_TARGET_LEN if bytes[6] == 0 && bytes[7] == 0 => {
                Ok(Self(copy_octets(&bytes[..layout::DEVICE_ADDRESS_LEN])))
            }
            len => Err(ProtocolError::MalformedTarget { len }),
        }
    }

    pub const fn octets(&self) -> [u8; layout::DEVICE_ADDRESS_LEN] {
        self.0
    }

    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }
}

fn copy_octets(bytes: &[u8]) -> [u8; layout::DEVICE_ADDRESS_LEN] {
    let mut octets = [0u8; layout::DEVICE_ADDRESS_LEN];
    octets.copy_from_slice(bytes);
    octets
}

/// Pack an address into the 64-bit target value.
pub fn encode_address(address: &DeviceAddress) -> u64 {
    let [a, b, c, d, e, f] = address.0;
    u64::from_be_bytes([a, b, c, d, e, f, 0, 0])
}

/// Unpack the 64-bit target value; the low 16 bits are ignored.
pub fn decode_address(value: u64) -> DeviceAddress {
    let [a, b, c, d, e, f, _, _] = value.to_be_bytes();
    DeviceAddress([a, b, c, d, e, f])
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl FromStr for DeviceAddress {
    type Err = ProtocolError;

    fn from_str(input: &str) -> Result<Self> {
        let invalid = || ProtocolError::InvalidAddress {
            input: input.to_string(),
        };
        let separator = if input.contains('-') { '-' } else { ':' };
        let mut octets = [0u8; layout::DEVICE_ADDRESS_LEN];
        let mut parts = input.split(separator);
        for octet in octets.iter_mut() {
            let part = parts.next().ok_or_else(invalid)?;
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
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

impl From<[u8; layout::DEVICE_ADDRESS_LEN]> for DeviceAddress {
    fn from(octets: [u8; layout::DEVICE_ADDRESS_LEN]) -> Self {
        Self(octets)
    }
}

impl TryFrom<&[u8]> for DeviceAddress {
    type Error = ProtocolError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_slice(bytes)
    }
}

impl Serialize for DeviceAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{DeviceAddress, decode_address, encode_address};
    use crate::protocol::ProtocolError;

    #[test]
    fn address_occupies_top_six_lanes() {
        let address: DeviceAddress = "01:23:45:67:89:ab".parse().unwrap();
        let packed = encode_address(&address);
        assert_eq!(packed, 0x0123_4567_89ab_0000);
        assert_eq!(packed & 0xffff, 0);
    }

    #[test]
    fn address_survives_packing() {
        let address = DeviceAddress::new([0x01, 0x23, 0x45, 0x67, 0x89, 0xab]);
        let decoded = decode_address(encode_address(&address));
        assert_eq!(decoded.octets(), [0x01, 0x23, 0x45, 0x67, 0x89, 0xab]);
    }

    #[test]
    fn decode_ignores_low_lanes() {
        let decoded = decode_address(0xffee_ddcc_bbaa_1234);
        assert_eq!(decoded.octets(), [0xff, 0xee, 0xdd, 0xcc, 0xbb, 0xaa]);
    }

    #[test]
    fn broadcast_packs_to_zero() {
        assert_eq!(encode_address(&DeviceAddress::BROADCAST), 0);
        assert!(decode_address(0).is_broadcast());
    }

    #[test]
    fn from_slice_accepts_known_shapes() {
        assert!(DeviceAddress::from_slice(&[]).unwrap().is_broadcast());
        assert_eq!(
            DeviceAddress::from_slice(&[9, 8, 7, 6, 5, 4]).unwrap(),
            DeviceAddress::new([9, 8, 7, 6, 5, 4])
        );
        assert_eq!(
            DeviceAddress::from_slice(&[9, 8, 7, 6, 5, 4, 0, 0]).unwrap(),
            DeviceAddress::new([9, 8, 7, 6, 5, 4])
        );
    }

    #[test]
    fn from_slice_rejects_malformed_targets() {
        for bytes in [&[1u8; 5][..], &[1u8; 7][..], &[1, 2, 3, 4, 5, 6, 0, 1][..], &[0u8; 9][..]] {
            let err = DeviceAddress::from_slice(bytes).unwrap_err();
            assert!(matches!(err, ProtocolError::MalformedTarget { len } if len == bytes.len()));
        }
    }

    #[test]
    fn parse_and_display_are_symmetric() {
        let address: DeviceAddress = "d0-73-d5-00-11-22".parse().unwrap();
        assert_eq!(address.to_string(), "d0:73:d5:00:11:22");
    }

    #[test]
    fn parse_rejects_bad_input() {
        for input in ["", "01:23:45:67:89", "01:23:45:67:89:ab:cd", "0g:23:45:67:89:ab", "1:23:45:67:89:ab"] {
            let err = input.parse::<DeviceAddress>().unwrap_err();
            assert!(err.to_string().contains("invalid device address"));
        }
    }

    #[test]
    fn serializes_as_string() {
        let address = DeviceAddress::new([0xd0, 0x73, 0xd5, 0, 0, 1]);
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, "\"d0:73:d5:00:00:01\"");
    }
}
