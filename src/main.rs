use azure_net_limit::args::Cli;
use azure_net_limit::azure::AzCliAclStore;
use azure_net_limit::config::Config;
use azure_net_limit::input::collect_ip_list;
use azure_net_limit::output::print_summary;
use azure_net_limit::update_resources;
use clap::Parser;
use std::error::Error;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let config = Config::from_env()?;
    log4rs::init_file(&config.log_config, Default::default()).expect("Error initializing log4rs");
    let args = Cli::parse();
    //
    log::info!("#Start main()");

    let rule_cap = args.rule_cap.map_or(config.rule_cap, |cap| cap as usize);
    let allow_list = collect_ip_list(&args.ips, config.fetch_timeout).await?;
    if allow_list.is_empty() {
        return Err("No valid public IPv4 addresses in --ips".into());
    }

    let resources = args.resource_ids().into_iter().map(str::to_string).collect();
    let results = update_resources(
        Arc::new(AzCliAclStore),
        resources,
        allow_list,
        rule_cap,
        args.dry_run,
    )
    .await;

    let failed = print_summary(&results);
    if failed > 0 {
        return Err(format!("{failed} of {} resources failed", results.len()).into());
    }
    log::info!("#End main()");
    Ok(())
}
