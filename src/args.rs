//! CLI argument parsing with clap.

use crate::input::split_tokens;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "aznet")]
#[command(version, about = "CLI tool to set Azure PaaS network access")]
pub struct Cli {
    /// PaaS resource ids, separated by whitespace, ';' or ','
    #[arg(short, long)]
    pub source: String,

    /// Allowed IPs/CIDRs, or URLs of lists of them
    #[arg(short, long)]
    pub ips: String,

    /// Maximum IP rules per resource (overrides AZNET_RULE_CAP)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub rule_cap: Option<u32>,

    /// Compute the rules but do not write them
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// The resource ids given with `--source`.
    pub fn resource_ids(&self) -> Vec<&str> {
        split_tokens(&self.source)
    }
}
