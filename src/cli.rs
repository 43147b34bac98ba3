use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use vagrant_deploy::api::deploy::DeployArgs;
use vagrant_deploy::connectors::vagrant::options::DEFAULT_OPTIONS_FILE;
use vagrant_deploy::connectors::vagrant::ConnectorConfig;
use vagrant_deploy::Limit;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// JSON file with per-host data and group overrides
    #[arg(long, value_name = "FILE", default_value = DEFAULT_OPTIONS_FILE)]
    pub options_file: PathBuf,

    /// vagrant executable to run
    #[arg(long, value_name = "BIN", default_value = "vagrant")]
    pub vagrant_bin: String,

    /// run at most this many `vagrant ssh-config` calls at once
    #[arg(long, value_name = "N")]
    pub max_workers: Option<usize>,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the running vagrant machines with their data and groups
    Inventory {
        /// only consider these vagrant machines
        #[arg(short, long, value_name = "NAME")]
        limit: Vec<String>,
    },

    /// Run a built-in deploy against every running vagrant machine
    Deploy {
        /// name of the deploy: bootstrap or docker
        deploy: String,

        /// only consider these vagrant machines
        #[arg(short, long, value_name = "NAME")]
        limit: Vec<String>,

        /// deploy arguments in key=value format, values may be JSON
        #[arg(short, long, value_name = "KEY=VALUE")]
        args: Vec<String>,
    },
}

impl Cli {
    pub fn connector_config(&self) -> ConnectorConfig {
        ConnectorConfig {
            vagrant_bin: self.vagrant_bin.clone(),
            options_file: self.options_file.clone(),
            max_workers: self.max_workers,
        }
    }
}

pub fn parse_limit(limit: &[String]) -> Option<Limit> {
    if limit.is_empty() {
        None
    } else {
        Some(Limit::from(limit.to_vec()))
    }
}

pub fn parse_deploy_args(args: &[String]) -> Result<DeployArgs> {
    let mut deploy_args = DeployArgs::new();

    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid deploy argument '{arg}', expected key=value"))?;
        let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
        deploy_args = deploy_args.kwarg(key.trim(), value);
    }

    Ok(deploy_args)
}
