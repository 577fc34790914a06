//! Storage account network rules.
//!
//! [`AclStore`] is the boundary to wherever a resource's IP rules live.
//! [`AzCliAclStore`] backs it with the `az` CLI.

use super::cli;
use super::resource_id::ResourceId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::net::Ipv4Addr;

/// The only provider whose IP rules can be managed.
pub const STORAGE_ACCOUNTS: &str = "Microsoft.Storage/storageAccounts";

/// Read and replace the IP allow rules of a resource.
pub trait AclStore {
    /// Current rules as CIDR strings (`a.b.c.d/n`).
    fn get_current_rules(&self, resource: &ResourceId) -> Result<Vec<String>, Box<dyn Error>>;
    /// Replace all IP rules with `rules`.
    fn set_rules(&self, resource: &ResourceId, rules: &[String]) -> Result<(), Box<dyn Error>>;
}

/// One entry of `networkRuleSet.ipRules`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IpRule {
    pub ip_address_or_range: String,
    #[serde(default = "default_action")]
    pub action: String,
}

fn default_action() -> String {
    "Allow".to_string()
}

/// Azure stores single addresses without a prefix.
pub fn rule_to_cidr(rule: &str) -> String {
    if rule.contains('/') {
        rule.to_string()
    } else {
        format!("{rule}/32")
    }
}

/// Inverse of [`rule_to_cidr`], as the rules Azure will accept.
///
/// Azure refuses `/31` (and `/32`) ranges, so a `/31` becomes its two
/// single addresses.
pub fn cidr_to_rules(cidr: &str) -> Vec<String> {
    if let Some(addr) = cidr.strip_suffix("/32") {
        return vec![addr.to_string()];
    }
    match cidr.strip_suffix("/31").map(str::parse::<Ipv4Addr>) {
        Some(Ok(addr)) => {
            let first = u32::from(addr) & !1;
            vec![
                Ipv4Addr::from(first).to_string(),
                Ipv4Addr::from(first | 1).to_string(),
            ]
        }
        _ => vec![cidr.to_string()],
    }
}

/// Parse `az ... --query networkRuleSet.ipRules` JSON output.
pub fn parse_ip_rules(output: &str) -> Result<Vec<IpRule>, Box<dyn Error>> {
    let mut deserializer = serde_json::Deserializer::from_str(output);
    let rules: Option<Vec<IpRule>> = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| {
            log::error!("OUTPUT START:\n\n{}\n\nOUTPUT END\n", output);
            format!("Error parsing ipRules JSON: path={} error={}", e.path(), e)
        })?;
    Ok(rules.unwrap_or_default())
}

fn check_provider(resource: &ResourceId) -> Result<(), Box<dyn Error>> {
    if resource.is_provider(STORAGE_ACCOUNTS) {
        Ok(())
    } else {
        Err(format!(
            "Unsupported resource provider {} for {}",
            resource.provider, resource.name
        )
        .into())
    }
}

/// [`AclStore`] using the logged-in `az` CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct AzCliAclStore;

impl AclStore for AzCliAclStore {
    fn get_current_rules(&self, resource: &ResourceId) -> Result<Vec<String>, Box<dyn Error>> {
        check_provider(resource)?;
        let cmd = format!(
            "az storage account show --ids {resource} --query networkRuleSet.ipRules --output json"
        );
        let output = cli::run(&cmd)?;
        let rules = parse_ip_rules(&output)?;
        log::info!("{} has {} IP rules", resource.name, rules.len());

        Ok(rules
            .iter()
            .filter(|r| r.action.eq_ignore_ascii_case("Allow"))
            .map(|r| rule_to_cidr(&r.ip_address_or_range))
            .collect())
    }

    fn set_rules(&self, resource: &ResourceId, rules: &[String]) -> Result<(), Box<dyn Error>> {
        check_provider(resource)?;
        let ip_rules: Vec<IpRule> = rules
            .iter()
            .flat_map(|cidr| cidr_to_rules(cidr))
            .map(|rule| IpRule {
                ip_address_or_range: rule,
                action: default_action(),
            })
            .collect();
        if ip_rules.len() > rules.len() {
            log::warn!(
                "{}: splitting /31 blocks raised the rule count from {} to {}",
                resource.name,
                rules.len(),
                ip_rules.len()
            );
        }
        let json = serde_json::to_string(&ip_rules)
            .map_err(|e| format!("Error serializing ipRules: {e}"))?;

        let id = resource.to_string();
        let set = format!("networkRuleSet.ipRules={json}");
        cli::run_args(&[
            "az",
            "storage",
            "account",
            "update",
            "--ids",
            id.as_str(),
            "--default-action",
            "Deny",
            "--set",
            set.as_str(),
            "--output",
            "none",
        ])?;
        log::info!("Wrote {} IP rules to {}", ip_rules.len(), resource.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_cidr_conversion() {
        assert_eq!(rule_to_cidr("20.38.98.1"), "20.38.98.1/32");
        assert_eq!(rule_to_cidr("52.239.148.64/26"), "52.239.148.64/26");
        assert_eq!(cidr_to_rules("20.38.98.1/32"), vec!["20.38.98.1"]);
        assert_eq!(cidr_to_rules("52.239.148.64/26"), vec!["52.239.148.64/26"]);
    }

    #[test]
    fn test_cidr_to_rules_splits_31() {
        assert_eq!(cidr_to_rules("40.1.1.0/31"), vec!["40.1.1.0", "40.1.1.1"]);
        assert_eq!(
            cidr_to_rules("255.255.255.254/31"),
            vec!["255.255.255.254", "255.255.255.255"]
        );
        assert_eq!(cidr_to_rules("40.1.1.0/30"), vec!["40.1.1.0/30"]);
        for rule in ["20.38.98.1/32", "40.1.1.0/31", "13.64.0.0/16"]
            .iter()
            .flat_map(|c| cidr_to_rules(c))
        {
            assert!(!rule.ends_with("/31") && !rule.ends_with("/32"), "{rule}");
        }
    }

    #[test]
    fn test_parse_ip_rules_fixture() {
        let json = std::fs::read_to_string("src/tests/test_data/ip_rules_01.json")
            .expect("Error reading ipRules fixture");
        let rules = parse_ip_rules(&json).expect("Error parsing ipRules");
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].ip_address_or_range, "20.38.98.1");
        assert_eq!(rules[1].action, "Allow");
    }

    #[test]
    fn test_parse_ip_rules_null_and_bad() {
        assert!(parse_ip_rules("null").unwrap().is_empty());
        assert!(parse_ip_rules("[]").unwrap().is_empty());
        let err = parse_ip_rules(r#"[{"action": "Allow"}]"#).unwrap_err();
        assert!(err.to_string().contains("ipAddressOrRange"), "{err}");
    }

    #[test]
    fn test_ip_rule_serialize() {
        let rule = IpRule {
            ip_address_or_range: "1.2.3.4".to_string(),
            action: default_action(),
        };
        assert_eq!(
            serde_json::to_string(&rule).unwrap(),
            r#"{"ipAddressOrRange":"1.2.3.4","action":"Allow"}"#
        );
    }

    #[test]
    fn test_unsupported_provider() {
        let id: ResourceId = "/subscriptions/0b1f6471-1bf0-4dda-aec3-111122223333/resourceGroups/rg/providers/Microsoft.KeyVault/vaults/kv01"
            .parse()
            .unwrap();
        let err = AzCliAclStore.get_current_rules(&id).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported resource provider Microsoft.KeyVault/vaults for kv01"
        );
    }
}
