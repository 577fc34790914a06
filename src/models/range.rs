//! Numeric representation of an IPv4 CIDR block.

use super::ipv4::{broadcast_addr, cut_addr, MAX_LENGTH};
use crate::error::MergeError;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// An aligned IPv4 block as an inclusive `[start, end]` span.
///
/// `start` is always the network address and `end` the last address of a
/// `/prefix_len` block, so `start <= end` holds by construction.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct AddressRange {
    /// Numeric value of the first address.
    pub start: u32,
    /// Numeric value of the last address (inclusive).
    pub end: u32,
    /// Prefix length, 0-32.
    pub prefix_len: u8,
}

impl AddressRange {
    /// Build the block of length `prefix_len` containing `addr`.
    ///
    /// Host bits of `addr` are cleared, so `10.0.0.5/24` becomes `10.0.0.0/24`.
    pub fn new(addr: Ipv4Addr, prefix_len: u8) -> Result<AddressRange, MergeError> {
        let malformed =
            |_: Box<dyn Error>| MergeError::MalformedAddress(format!("{addr}/{prefix_len}"));
        let start = cut_addr(addr, prefix_len).map_err(malformed)?;
        let end = broadcast_addr(addr, prefix_len).map_err(malformed)?;
        Ok(AddressRange {
            start: u32::from(start),
            end: u32::from(end),
            prefix_len,
        })
    }

    /// First address of the block.
    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.start)
    }

    /// Last address of the block.
    pub fn broadcast(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.end)
    }

    /// Number of addresses in the block (`2^(32 - prefix_len)`).
    pub fn size(&self) -> u64 {
        (self.end - self.start) as u64 + 1
    }

    /// True if every address of `other` lies inside `self`.
    pub fn contains(&self, other: &AddressRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl FromStr for AddressRange {
    type Err = MergeError;

    /// Parse `a.b.c.d/n`. A missing prefix is an error, callers normalize
    /// bare addresses to `/32` first.
    fn from_str(s: &str) -> Result<AddressRange, MergeError> {
        let malformed = || MergeError::MalformedAddress(s.to_string());

        let (addr, mask) = s.trim().split_once('/').ok_or_else(malformed)?;
        let addr: Ipv4Addr = addr.parse().map_err(|_| malformed())?;
        // u8::from_str would also take a leading '+'
        if mask.is_empty() || !mask.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let mask: u8 = mask.parse().map_err(|_| malformed())?;
        if mask > MAX_LENGTH {
            return Err(malformed());
        }
        AddressRange::new(addr, mask)
    }
}

impl std::fmt::Display for AddressRange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.network(), self.prefix_len)
    }
}

impl Serialize for AddressRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AddressRange {
    fn deserialize<D>(deserializer: D) -> Result<AddressRange, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        AddressRange::from_str(&s).map_err(de::Error::custom)
    }
}
