use crate::api::host::Host;
use crate::api::inventory::Inventory;
use crate::api::options::DeployOptions;
use indexmap::IndexMap;
use log::debug;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One open named deploy region. Name, options and data already include
/// those of the regions it is nested in.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DeployFrame {
    pub name: String,
    pub options: DeployOptions,
    pub data: IndexMap<String, Value>,
}

/// An operation queued for a host, tagged with the deploy it was queued in.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OperationMeta {
    pub host: String,
    pub name: String,
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deploy: Option<String>,
    #[serde(skip_serializing_if = "DeployOptions::is_empty")]
    pub options: DeployOptions,
}

pub struct State {
    inventory: Inventory,
    deploys: Mutex<Vec<DeployFrame>>,
    operations: Mutex<Vec<OperationMeta>>,
}

impl State {
    pub fn new(inventory: Inventory) -> Self {
        State {
            inventory,
            deploys: Mutex::new(Vec::new()),
            operations: Mutex::new(Vec::new()),
        }
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Opens a named deploy region that stays open until the returned guard
    /// is dropped. Regions nest: names are joined with `" | "` and options and
    /// data of the outer region are overridden by the inner ones.
    pub fn deploy(
        &self,
        name: &str,
        options: DeployOptions,
        data: Option<IndexMap<String, Value>>,
    ) -> DeployRegion<'_> {
        let mut deploys = self.lock_deploys();

        let frame = match deploys.last() {
            Some(parent) => {
                let mut merged = parent.data.clone();
                merged.extend(data.unwrap_or_default());
                DeployFrame {
                    name: format!("{} | {}", parent.name, name),
                    options: parent.options.overlay(&options),
                    data: merged,
                }
            }
            None => DeployFrame {
                name: name.to_string(),
                options,
                data: data.unwrap_or_default(),
            },
        };

        debug!("Starting deploy {}", frame.name);
        deploys.push(frame);

        DeployRegion { state: self }
    }

    pub fn named_deploy(&self, name: &str) -> DeployRegion<'_> {
        self.deploy(name, DeployOptions::default(), None)
    }

    pub fn current_deploy(&self) -> Option<DeployFrame> {
        self.lock_deploys().last().cloned()
    }

    pub fn deploy_depth(&self) -> usize {
        self.lock_deploys().len()
    }

    pub fn add_op<I, S>(&self, host: &Host, name: &str, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let current = self.current_deploy();
        let (deploy, options) = match current {
            Some(frame) => (Some(frame.name), frame.options),
            None => (None, DeployOptions::default()),
        };

        let op = OperationMeta {
            host: host.name.clone(),
            name: name.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            deploy,
            options,
        };
        debug!("Adding operation {} to {}", op.name, op.host);

        self.operations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(op);
    }

    pub fn operations(&self) -> Vec<OperationMeta> {
        self.operations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn lock_deploys(&self) -> MutexGuard<'_, Vec<DeployFrame>> {
        self.deploys.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Guard of an open deploy region; the region closes when it is dropped.
#[must_use = "the deploy region closes as soon as this guard is dropped"]
pub struct DeployRegion<'a> {
    state: &'a State,
}

impl Drop for DeployRegion<'_> {
    fn drop(&mut self) {
        if let Some(frame) = self.state.lock_deploys().pop() {
            debug!("Finished deploy {}", frame.name);
        }
    }
}
