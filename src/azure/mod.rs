//! Azure resource interaction.
//!
//! This module handles all Azure-related operations:
//! - [`cli`] - Command execution for Azure CLI
//! - [`resource_id`] - Resource id validation and parsing
//! - [`acl`] - Reading and writing storage account IP rules
//! - [`update`] - Fitting an allow list under the rule cap

mod acl;
mod cli;
mod resource_id;
mod update;

// Re-export public types and functions
pub use acl::{
    cidr_to_rules, parse_ip_rules, rule_to_cidr, AclStore, AzCliAclStore, IpRule, STORAGE_ACCOUNTS,
};
pub use cli::{run, run_args};
pub use resource_id::ResourceId;
pub use update::{update_net_acl, AclUpdate};
