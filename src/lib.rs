// cargo watch -x 'fmt' -x 'test'

pub mod args;
pub mod azure;
pub mod config;
pub mod error;
pub mod input;
pub mod models;
pub mod output;
pub mod processing;

use azure::{update_net_acl, AclStore, AclUpdate, ResourceId};
use futures::future::join_all;
use std::sync::Arc;

pub use error::MergeError;
pub use processing::{merge_closest_pair, reduce_to};

/// Outcome for one resource id, errors already rendered to text.
pub type ResourceResult = (String, Result<AclUpdate, String>);

/// Apply `allow_list` to every resource, one blocking task each.
///
/// A failing resource is logged and reported in its own result; the
/// others carry on. Results keep the order of `resources`.
pub async fn update_resources<A>(
    store: Arc<A>,
    resources: Vec<String>,
    allow_list: Vec<String>,
    rule_cap: usize,
    dry_run: bool,
) -> Vec<ResourceResult>
where
    A: AclStore + Send + Sync + 'static,
{
    let allow_list = Arc::new(allow_list);

    let handles: Vec<_> = resources
        .iter()
        .map(|resource| {
            let resource = resource.clone();
            let store = Arc::clone(&store);
            let allow_list = Arc::clone(&allow_list);
            tokio::task::spawn_blocking(move || {
                resource
                    .parse::<ResourceId>()
                    .and_then(|id| update_net_acl(&*store, &id, &allow_list, rule_cap, dry_run))
                    .map_err(|e| e.to_string())
            })
        })
        .collect();

    let joined = join_all(handles).await;

    resources
        .into_iter()
        .zip(joined)
        .map(|(resource, joined)| {
            let result = joined.unwrap_or_else(|e| Err(format!("Task failed: {e}")));
            if let Err(e) = &result {
                log::error!("{resource}: {e}");
            }
            (resource, result)
        })
        .collect()
}
