mod cli;

use crate::cli::{parse_deploy_args, parse_limit, Cli, Commands};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::info;
use std::sync::Arc;
use vagrant_deploy::api::deploy::Invocation;
use vagrant_deploy::api::inventory::Inventory;
use vagrant_deploy::api::pseudo;
use vagrant_deploy::api::state::State;
use vagrant_deploy::{deploys, make_names_data, VagrantConnector};

fn main() -> Result<()> {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    run()
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    VagrantConnector::configure(cli.connector_config())?;

    match &cli.cmd {
        Commands::Inventory { limit } => {
            let hosts = make_names_data(parse_limit(limit))?;

            for host in hosts {
                println!("{}", host.name);
                println!("  data: {}", serde_json::to_string(&host.data)?);
                println!("  groups: {}", host.groups.join(", "));
            }
        }
        Commands::Deploy {
            deploy,
            limit,
            args,
        } => {
            let deploy = deploys::find(deploy)
                .with_context(|| anyhow!("Unknown deploy '{deploy}'"))?;
            let args = parse_deploy_args(args)?;

            let hosts = make_names_data(parse_limit(limit))?;
            let state = Arc::new(State::new(Inventory::from_names_data(hosts)));

            for host in state.inventory().iter() {
                let _context = pseudo::activate(state.clone(), host.clone());
                deploy
                    .call(Invocation::Ambient { args: args.clone() })
                    .with_context(|| format!("Deploy '{}' failed on {}", deploy.name(), host.name))?;
            }

            let operations = state.operations();
            info!(
                "Prepared {} operations on {} hosts",
                operations.len(),
                state.inventory().len()
            );

            let mut current_host = None;
            for op in &operations {
                if current_host != Some(&op.host) {
                    println!("{}", op.host);
                    current_host = Some(&op.host);
                }
                println!(
                    "  [{}] {} {}",
                    op.deploy.as_deref().unwrap_or("-"),
                    op.name,
                    op.args.join(" ")
                );
            }
        }
    }

    Ok(())
}
