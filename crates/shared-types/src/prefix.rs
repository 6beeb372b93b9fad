//! # NLRI Prefixes
//!
//! The prefix being announced is committed to by every hop's signature, so
//! its byte form must be identical for signer and verifier.
//!
//! NLRI layout: `length in bits (1) | ceil(length / 8) prefix bytes`.

use crate::errors::{PrefixError, WireError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Address family of a prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Afi {
    /// IPv4 unicast.
    Ipv4,
    /// IPv6 unicast.
    Ipv6,
}

impl Afi {
    /// One-byte tag used in canonical signed bytes.
    pub const fn tag(self) -> u8 {
        match self {
            Afi::Ipv4 => 1,
            Afi::Ipv6 => 2,
        }
    }

    /// Address width in bits.
    pub const fn max_len(self) -> u8 {
        match self {
            Afi::Ipv4 => 32,
            Afi::Ipv6 => 128,
        }
    }
}

/// An announced prefix (NLRI).
///
/// Fields are public because prefixes also arrive from the wire; call
/// [`Prefix::validate`] before trusting one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Prefix {
    /// Network address.
    pub addr: IpAddr,
    /// Prefix length in bits.
    pub len: u8,
}

impl Prefix {
    /// Create a validated prefix.
    pub fn new(addr: IpAddr, len: u8) -> Result<Self, PrefixError> {
        let prefix = Self { addr, len };
        prefix.validate()?;
        Ok(prefix)
    }

    /// Address family.
    pub fn afi(&self) -> Afi {
        match self.addr {
            IpAddr::V4(_) => Afi::Ipv4,
            IpAddr::V6(_) => Afi::Ipv6,
        }
    }

    /// Check the length fits the family and no host bits are set.
    pub fn validate(&self) -> Result<(), PrefixError> {
        let max = self.afi().max_len();
        if self.len > max {
            return Err(PrefixError::LengthOutOfRange { len: self.len, max });
        }

        let host_bits_set = match self.addr {
            IpAddr::V4(v4) => {
                let bits = u32::from(v4);
                let mask = u32::MAX.checked_shl(32 - u32::from(self.len)).unwrap_or(0);
                bits & !mask != 0
            }
            IpAddr::V6(v6) => {
                let bits = u128::from(v6);
                let mask = u128::MAX.checked_shl(128 - u32::from(self.len)).unwrap_or(0);
                bits & !mask != 0
            }
        };

        if host_bits_set {
            return Err(PrefixError::HostBitsSet { len: self.len });
        }
        Ok(())
    }

    /// The `ceil(len / 8)` leading address bytes, capped at the address width.
    pub fn significant_bytes(&self) -> Vec<u8> {
        let count = usize::from(self.len).div_ceil(8);
        let octets = match self.addr {
            IpAddr::V4(v4) => v4.octets().to_vec(),
            IpAddr::V6(v6) => v6.octets().to_vec(),
        };
        octets[..count.min(octets.len())].to_vec()
    }

    /// Append the NLRI encoding of this prefix.
    pub fn encode_nlri_into(&self, out: &mut Vec<u8>) {
        out.push(self.len);
        out.extend_from_slice(&self.significant_bytes());
    }

    /// Size of the NLRI encoding in bytes.
    pub fn nlri_len(&self) -> usize {
        1 + usize::from(self.len).div_ceil(8)
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.len)
    }
}

impl FromStr for Prefix {
    type Err = PrefixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, len) = s
            .split_once('/')
            .ok_or_else(|| PrefixError::Syntax(s.to_string()))?;
        let addr: IpAddr = addr
            .parse()
            .map_err(|_| PrefixError::Syntax(s.to_string()))?;
        let len: u8 = len.parse().map_err(|_| PrefixError::Syntax(s.to_string()))?;
        Prefix::new(addr, len)
    }
}

/// Encode a list of prefixes as consecutive NLRI entries.
///
/// Every prefix is validated first; nothing is written for a bad list.
pub fn encode_nlri(prefixes: &[Prefix]) -> Result<Vec<u8>, PrefixError> {
    let mut out = Vec::with_capacity(prefixes.iter().map(Prefix::nlri_len).sum());
    for prefix in prefixes {
        prefix.validate()?;
        prefix.encode_nlri_into(&mut out);
    }
    Ok(out)
}

/// Decode consecutive NLRI entries of one address family.
///
/// Every decoded prefix is validated; host bits beyond the length are
/// rejected rather than silently masked.
pub fn decode_nlri(data: &[u8], afi: Afi) -> Result<Vec<Prefix>, WireError> {
    let mut prefixes = Vec::new();
    let mut offset = 0;

    while offset < data.len() {
        let len = data[offset];
        offset += 1;

        if len > afi.max_len() {
            return Err(PrefixError::LengthOutOfRange {
                len,
                max: afi.max_len(),
            }
            .into());
        }

        let needed = usize::from(len).div_ceil(8);
        if data.len() - offset < needed {
            return Err(WireError::Truncated {
                needed,
                available: data.len() - offset,
            });
        }
        let bytes = &data[offset..offset + needed];
        offset += needed;

        let addr = match afi {
            Afi::Ipv4 => {
                let mut octets = [0u8; 4];
                octets[..needed].copy_from_slice(bytes);
                IpAddr::V4(Ipv4Addr::from(octets))
            }
            Afi::Ipv6 => {
                let mut octets = [0u8; 16];
                octets[..needed].copy_from_slice(bytes);
                IpAddr::V6(Ipv6Addr::from(octets))
            }
        };
        prefixes.push(Prefix::new(addr, len)?);
    }

    Ok(prefixes)
}
