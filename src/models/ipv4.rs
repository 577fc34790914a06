//! IPv4 bit arithmetic.
//!
//! Helpers working on the numeric (`u32`) form of IPv4 addresses, used by
//! [`super::AddressRange`] and the merge engine.

use std::error::Error;
use std::net::Ipv4Addr;

/// Maximum length for an IPv4 prefix (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// # Examples
/// ```
/// use azure_net_limit::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32, Box<dyn Error>> {
    if len > MAX_LENGTH {
        Err("Network length is too long".into())
    } else {
        let right_len = MAX_LENGTH - len;
        let all_bits = u32::MAX as u64;

        let mask = (all_bits >> right_len) << right_len;

        Ok(mask as u32)
    }
}

/// Get the network address for a given IP and prefix length.
pub fn cut_addr(addr: Ipv4Addr, len: u8) -> Result<Ipv4Addr, Box<dyn Error>> {
    let mask = get_cidr_mask(len)?;
    Ok(Ipv4Addr::from(u32::from(addr) & mask))
}

/// Calculate the broadcast (last) address for a given IP and prefix length.
pub fn broadcast_addr(addr: Ipv4Addr, len: u8) -> Result<Ipv4Addr, Box<dyn Error>> {
    let mask = get_cidr_mask(len)?;
    let network_bits = u32::from(addr) & mask;
    Ok(Ipv4Addr::from(network_bits | !mask))
}

/// Number of leading bits shared by `lo` and `hi`.
///
/// This is the longest prefix a single aligned block covering both
/// addresses can have. Identical addresses share all 32 bits.
pub fn common_prefix_len(lo: u32, hi: u32) -> u8 {
    (lo ^ hi).leading_zeros() as u8
}

/// True for addresses Azure will not accept as public IP rules.
pub fn is_private(addr: Ipv4Addr) -> bool {
    addr.is_private() || addr.is_loopback() || addr.is_link_local() || addr.is_unspecified()
}

/// Blocks matched by [`is_private`], as `(network, prefix length)`.
const PRIVATE_BLOCKS: [(Ipv4Addr, u8); 6] = [
    (Ipv4Addr::new(0, 0, 0, 0), 32),
    (Ipv4Addr::new(10, 0, 0, 0), 8),
    (Ipv4Addr::new(127, 0, 0, 0), 8),
    (Ipv4Addr::new(169, 254, 0, 0), 16),
    (Ipv4Addr::new(172, 16, 0, 0), 12),
    (Ipv4Addr::new(192, 168, 0, 0), 16),
];

/// True if the inclusive span `[start, end]` shares any address with a
/// private, loopback, link-local or unspecified block.
pub fn overlaps_private(start: u32, end: u32) -> bool {
    PRIVATE_BLOCKS.iter().any(|&(network, len)| {
        let mask = u32::MAX.checked_shl(32 - len as u32).unwrap_or(0);
        let lo = u32::from(network);
        let hi = lo | !mask;
        start <= hi && lo <= end
    })
}
