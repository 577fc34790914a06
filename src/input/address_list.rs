//! Address list tokenizing and validation.
//!
//! Turns free-form allow-list text into canonical, de-duplicated CIDR
//! strings ready for the merge engine.

use crate::models::{is_private, overlaps_private, AddressRange};
use itertools::Itertools;
use regex::Regex;
use std::error::Error;
use std::net::Ipv4Addr;
use std::sync::OnceLock;

/// Loose IPv4 shape check, the strict parse happens in [`AddressRange`].
static IPV4_REGEX: OnceLock<Regex> = OnceLock::new();
/// Separators accepted between list entries.
static SEPARATOR_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_ipv4_regex() -> &'static Regex {
    IPV4_REGEX.get_or_init(|| Regex::new(r"^(?:[0-9]{1,3}\.){3}[0-9]{1,3}").expect("Invalid Regex"))
}

fn get_separator_regex() -> &'static Regex {
    SEPARATOR_REGEX.get_or_init(|| Regex::new(r"[\s;,]+").expect("Invalid Regex"))
}

/// Split raw text on whitespace, newlines, `;` and `,`.
pub fn split_tokens(raw: &str) -> Vec<&str> {
    get_separator_regex()
        .split(raw)
        .filter(|t| !t.is_empty())
        .collect()
}

/// True if the token should be fetched rather than parsed.
pub fn is_url(token: &str) -> bool {
    token.starts_with("http://") || token.starts_with("https://")
}

/// Validate one entry as a public IPv4 address or CIDR.
///
/// A bare address is treated as `/32`. Both the typed address and the
/// whole resulting block must stay clear of private ranges.
pub fn validate_ip_addr(token: &str) -> Result<AddressRange, Box<dyn Error>> {
    if !get_ipv4_regex().is_match(token) {
        return Err(format!("Not an IPv4 address: {token}").into());
    }

    let range: AddressRange = if token.contains('/') {
        token.parse()?
    } else {
        format!("{token}/32").parse()?
    };

    // the address as typed, before host bits are masked off
    let typed: Ipv4Addr = token
        .split_once('/')
        .map_or(token, |(addr, _)| addr)
        .parse()
        .map_err(|_| format!("Not an IPv4 address: {token}"))?;
    if is_private(typed) {
        return Err(format!("Private address not allowed: {token}").into());
    }
    if overlaps_private(range.start, range.end) {
        return Err(format!("Block {range} overlaps a private range: {token}").into());
    }
    Ok(range)
}

/// Validate and de-duplicate tokens, keeping first-seen order.
///
/// Invalid tokens and leftover URLs are logged and dropped.
pub fn parse_ip_list<'a, I>(tokens: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    tokens
        .into_iter()
        .filter_map(|token| {
            if is_url(token) {
                log::warn!("Skipping nested list URL: {token}");
                return None;
            }
            match validate_ip_addr(token) {
                Ok(range) => Some(range.to_string()),
                Err(e) => {
                    log::warn!("Skipping entry: {e}");
                    None
                }
            }
        })
        .unique()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tokens() {
        let raw = " 1.2.3.4; 5.6.7.0/24\n\n8.8.8.8,https://example.com/list.txt\t9.9.9.9 ";
        assert_eq!(
            split_tokens(raw),
            vec![
                "1.2.3.4",
                "5.6.7.0/24",
                "8.8.8.8",
                "https://example.com/list.txt",
                "9.9.9.9"
            ]
        );
        assert!(split_tokens("  \n ;").is_empty());
    }

    #[test]
    fn test_validate_ip_addr() {
        assert_eq!(validate_ip_addr("8.8.8.8").unwrap().to_string(), "8.8.8.8/32");
        assert_eq!(
            validate_ip_addr("52.1.2.3/24").unwrap().to_string(),
            "52.1.2.0/24"
        );
        assert!(validate_ip_addr("10.1.2.3").is_err());
        assert!(validate_ip_addr("192.168.1.0/24").is_err());
        assert!(validate_ip_addr("hello").is_err());
        assert!(validate_ip_addr("300.1.1.1").is_err());
        assert!(validate_ip_addr("8.8.8.8/40").is_err());
    }

    #[test]
    fn test_validate_checks_typed_address() {
        let err = validate_ip_addr("192.168.5.5/8").unwrap_err();
        assert_eq!(err.to_string(), "Private address not allowed: 192.168.5.5/8");
        assert!(validate_ip_addr("10.20.30.40/4").is_err());
    }

    #[test]
    fn test_validate_rejects_blocks_covering_private() {
        let err = validate_ip_addr("172.0.0.0/8").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Block 172.0.0.0/8 overlaps a private range: 172.0.0.0/8"
        );
        // public as typed, but the /7 spans 10.0.0.0/8
        assert!(validate_ip_addr("11.0.0.0/7").is_err());
        assert_eq!(
            validate_ip_addr("11.0.0.0/8").unwrap().to_string(),
            "11.0.0.0/8"
        );
        assert!(validate_ip_addr("8.8.8.8/0").is_err());
        assert_eq!(
            validate_ip_addr("172.32.1.1/16").unwrap().to_string(),
            "172.32.0.0/16"
        );
    }

    #[test]
    fn test_parse_ip_list() {
        let raw = "8.8.8.8 8.8.8.8/32 10.0.0.1 1.1.1.1;junk\nhttp://x/y 8.8.4.4";
        assert_eq!(
            parse_ip_list(split_tokens(raw)),
            vec!["8.8.8.8/32", "1.1.1.1/32", "8.8.4.4/32"]
        );
    }

    #[test]
    fn test_parse_ip_list_fixture() {
        let raw = std::fs::read_to_string("src/tests/test_data/allow_list_01.txt")
            .expect("Error reading allow list fixture");
        let list = parse_ip_list(split_tokens(&raw));
        assert_eq!(list.len(), 6);
        assert_eq!(list[0], "20.38.98.1/32");
        assert!(list.iter().all(|e| !e.starts_with("10.")));
    }
}
