use crate::error::VagrantError;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const DEFAULT_OPTIONS_FILE: &str = "@vagrant.json";

/// Per-host overrides read from the optional `@vagrant.json` sidecar file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VagrantOptions {
    /// host name -> data merged over the values taken from ssh-config
    #[serde(default)]
    pub data: IndexMap<String, IndexMap<String, Value>>,

    /// host name -> groups the host belongs to
    #[serde(default)]
    pub groups: IndexMap<String, Vec<String>>,
}

impl VagrantOptions {
    /// A missing file is not an error and yields empty options.
    pub fn load(path: &Path) -> Result<Self, VagrantError> {
        if !path.exists() {
            debug!("No vagrant options file at {}", path.display());
            return Ok(VagrantOptions::default());
        }

        debug!("Loading vagrant options from {}", path.display());

        let file = File::open(path).map_err(|source| VagrantError::OptionsIo {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(|source| VagrantError::OptionsJson {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn host_data(&self, host: &str) -> Option<&IndexMap<String, Value>> {
        self.data.get(host)
    }

    pub fn host_groups(&self, host: &str) -> Option<&Vec<String>> {
        self.groups.get(host)
    }
}
