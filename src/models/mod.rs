//! Domain models for IP allow-list aggregation.
//!
//! - [`AddressRange`] - IPv4 CIDR block as a numeric span
//! - [`ipv4`] helpers - mask, network and broadcast arithmetic

mod ipv4;
mod range;

// Re-export public types
pub use ipv4::{
    broadcast_addr, common_prefix_len, cut_addr, get_cidr_mask, is_private, overlaps_private,
    MAX_LENGTH,
};
pub use range::AddressRange;
