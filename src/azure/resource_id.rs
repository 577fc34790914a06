//! Azure resource id parsing.

use regex::Regex;
use std::error::Error;
use std::str::FromStr;
use std::sync::OnceLock;

/// `/subscriptions/<id>/resourceGroups/<rg>/providers/<ns>/<type>/<name>`
static RESOURCE_ID_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_resource_id_regex() -> &'static Regex {
    RESOURCE_ID_REGEX.get_or_init(|| {
        Regex::new(
            r"^(?i:/subscriptions)/([^/]{36})(?i:/resourceGroups)/([^/]+)(?i:/providers)/([A-Za-z0-9]+\.[A-Za-z0-9]+/[A-Za-z0-9]+)/([^/]+)/?$",
        )
        .expect("Invalid Regex")
    })
}

/// The parts of an Azure resource id this tool needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    pub subscription_id: String,
    pub resource_group: String,
    /// Provider namespace and type, e.g. `Microsoft.Storage/storageAccounts`.
    pub provider: String,
    pub name: String,
}

impl ResourceId {
    /// Case-insensitive provider check, Azure ids are not case stable.
    pub fn is_provider(&self, provider: &str) -> bool {
        self.provider.eq_ignore_ascii_case(provider)
    }
}

impl FromStr for ResourceId {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<ResourceId, Box<dyn Error>> {
        let s = s.trim();
        let caps = get_resource_id_regex()
            .captures(s)
            .ok_or_else(|| format!("Resource id is malformed: {s}"))?;

        Ok(ResourceId {
            subscription_id: caps[1].to_string(),
            resource_group: caps[2].to_string(),
            provider: caps[3].to_string(),
            name: caps[4].to_string(),
        })
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "/subscriptions/{}/resourceGroups/{}/providers/{}/{}",
            self.subscription_id, self.resource_group, self.provider, self.name
        )
    }
}
