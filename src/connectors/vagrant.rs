pub mod fetch;
pub mod names;
pub mod options;
pub mod parser;

use crate::error::VagrantError;
use crate::local::{CommandRunner, LocalShell};
use fetch::fetch_ssh_config;
use log::{debug, info};
use names::make_name_data;
use once_cell::sync::OnceCell;
use options::{VagrantOptions, DEFAULT_OPTIONS_FILE};
use parser::parse_host_blocks;
use std::path::PathBuf;
use std::sync::Arc;

pub use fetch::Limit;
pub use names::NamedHostEntry;

#[derive(Clone, Debug)]
pub struct ConnectorConfig {
    pub vagrant_bin: String,
    pub options_file: PathBuf,
    /// Upper bound on concurrent `vagrant ssh-config` calls, one per target if unset.
    pub max_workers: Option<usize>,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        ConnectorConfig {
            vagrant_bin: String::from("vagrant"),
            options_file: PathBuf::from(DEFAULT_OPTIONS_FILE),
            max_workers: None,
        }
    }
}

/// Discovers running vagrant machines. The ssh-config output and the options
/// file are each read once per connector and reused afterwards.
pub struct VagrantConnector {
    config: ConnectorConfig,
    runner: Arc<dyn CommandRunner>,
    ssh_config: OnceCell<Vec<String>>,
    options: OnceCell<VagrantOptions>,
}

static CONNECTOR: OnceCell<VagrantConnector> = OnceCell::new();

impl VagrantConnector {
    pub fn new(config: ConnectorConfig, runner: Arc<dyn CommandRunner>) -> Self {
        VagrantConnector {
            config,
            runner,
            ssh_config: OnceCell::new(),
            options: OnceCell::new(),
        }
    }

    /// Installs the process-wide connector. Must happen before the first call
    /// to [`VagrantConnector::instance`].
    pub fn configure(config: ConnectorConfig) -> Result<&'static VagrantConnector, VagrantError> {
        CONNECTOR
            .set(VagrantConnector::new(config, Arc::new(LocalShell)))
            .map_err(|_| VagrantError::AlreadyConfigured)?;

        Ok(VagrantConnector::instance())
    }

    pub fn instance() -> &'static VagrantConnector {
        CONNECTOR.get_or_init(|| {
            VagrantConnector::new(ConnectorConfig::default(), Arc::new(LocalShell))
        })
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// Returns the ssh-config lines of all running machines. Only the first
    /// call looks at `limit`; later calls return the cached lines as they are.
    pub fn get_vagrant_config(&self, limit: Option<&Limit>) -> Result<&[String], VagrantError> {
        self.ssh_config
            .get_or_try_init(|| {
                info!("Getting vagrant config...");
                fetch_ssh_config(
                    self.runner.as_ref(),
                    &self.config.vagrant_bin,
                    limit,
                    self.config.max_workers,
                )
            })
            .map(Vec::as_slice)
    }

    pub fn get_vagrant_options(&self) -> Result<&VagrantOptions, VagrantError> {
        self.options
            .get_or_try_init(|| VagrantOptions::load(&self.config.options_file))
    }

    pub fn make_names_data(
        &self,
        limit: Option<&Limit>,
    ) -> Result<Vec<NamedHostEntry>, VagrantError> {
        let vagrant_ssh_info = self.get_vagrant_config(limit)?;
        debug!("Got Vagrant SSH info: \n{vagrant_ssh_info:?}");

        let records = parse_host_blocks(vagrant_ssh_info)?;
        if records.is_empty() {
            return Err(VagrantError::NoRunningInstances);
        }

        let options = self.get_vagrant_options()?;

        Ok(records
            .iter()
            .map(|record| make_name_data(record, options))
            .collect())
    }
}

/// Discovers hosts through the process-wide connector.
pub fn make_names_data(limit: Option<Limit>) -> Result<Vec<NamedHostEntry>, VagrantError> {
    VagrantConnector::instance().make_names_data(limit.as_ref())
}
