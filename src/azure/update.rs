//! Applying an allow list to one resource within its rule cap.

use super::acl::{AclStore, STORAGE_ACCOUNTS};
use super::resource_id::ResourceId;
use crate::processing::{parse_ranges, reduce_to, waste};
use colored::Colorize;
use std::error::Error;

/// What [`update_net_acl`] did to a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclUpdate {
    /// Resource name.
    pub resource: String,
    /// Rule count before the update.
    pub before: usize,
    /// Entries from the allow list not already present.
    pub added: usize,
    /// Rule count written (or that would be written on a dry run).
    pub after: usize,
    /// Merge calls needed to fit the rule cap.
    pub merges: usize,
    /// Addresses allowed by the new rules that nobody asked for.
    pub waste: u64,
    /// True if the rules were written.
    pub applied: bool,
    /// The resulting rule set.
    pub rules: Vec<String>,
}

/// Add `allow_list` to the IP rules of `resource`, merging if needed.
///
/// Existing rules come first, new entries follow in allow-list order.
/// When the combined list exceeds `rule_cap` it is reduced by repeated
/// closest-pair merges. Nothing is written when no entry is new or when
/// `dry_run` is set.
pub fn update_net_acl<A: AclStore + ?Sized>(
    store: &A,
    resource: &ResourceId,
    allow_list: &[String],
    rule_cap: usize,
    dry_run: bool,
) -> Result<AclUpdate, Box<dyn Error>> {
    if !resource.is_provider(STORAGE_ACCOUNTS) {
        return Err(format!(
            "Unsupported resource provider {} for {}",
            resource.provider, resource.name
        )
        .into());
    }

    let current: Vec<String> = parse_ranges(&store.get_current_rules(resource)?)?
        .iter()
        .map(|r| r.to_string())
        .collect();
    let before = current.len();

    let mut combined = current;
    for entry in allow_list {
        if !combined.contains(entry) {
            combined.push(entry.clone());
        }
    }
    let added = combined.len() - before;

    if added == 0 {
        log::info!("{}: all {} entries already allowed", resource.name, allow_list.len());
        return Ok(AclUpdate {
            resource: resource.name.clone(),
            before,
            added,
            after: before,
            merges: 0,
            waste: 0,
            applied: false,
            rules: combined,
        });
    }

    let (rules, merges, wasted) = if combined.len() > rule_cap {
        log::warn!(
            "{}: {} rules exceed cap {}, merging",
            resource.name,
            combined.len(),
            rule_cap.to_string().yellow()
        );
        let reduction = reduce_to(&combined, rule_cap)?;
        let wasted = waste(&parse_ranges(&combined)?, &parse_ranges(&reduction.cidrs)?);
        log::info!(
            "{}: {} merges allow {} extra addresses",
            resource.name,
            reduction.merges,
            wasted
        );
        (reduction.cidrs, reduction.merges, wasted)
    } else {
        (combined, 0, 0)
    };

    if dry_run {
        log::info!("{}: dry run, {} rules not written", resource.name, rules.len());
    } else {
        store.set_rules(resource, &rules)?;
    }

    Ok(AclUpdate {
        resource: resource.name.clone(),
        before,
        added,
        after: rules.len(),
        merges,
        waste: wasted,
        applied: !dry_run,
        rules,
    })
}
