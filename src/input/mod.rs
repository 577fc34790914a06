//! Allowed-address input.
//!
//! - [`address_list`] - tokenizing, validation and de-duplication
//! - [`fetch`] - expansion of list URLs

mod address_list;
mod fetch;

// Re-export public functions
pub use address_list::{is_url, parse_ip_list, split_tokens, validate_ip_addr};
pub use fetch::{collect_ip_list, fetch_list};
