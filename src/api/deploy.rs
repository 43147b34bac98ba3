//! Reusable deploys.
//!
//! A [`Deploy`] wraps a body `fn(&State, &Host, &DeployArgs)` together with
//! the name and default data it runs under. It can be called with an explicit
//! state and host (API mode) or pick them up from the ambient context set by
//! the command line (CLI mode); either way the body runs inside a named deploy
//! region on the state.

use crate::api::host::Host;
use crate::api::options::DeployOptions;
use crate::api::pseudo;
use crate::api::state::State;
use crate::error::DeployError;
use anyhow::Result;
use indexmap::IndexMap;
use log::debug;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Extra positional and keyword arguments handed to a deploy body.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeployArgs {
    pub args: Vec<Value>,
    pub kwargs: IndexMap<String, Value>,
}

impl DeployArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn kwarg(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.kwargs.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.kwargs.get(key)
    }
}

pub enum Invocation<'a> {
    /// API mode: state and host are given by the caller.
    Explicit {
        state: &'a State,
        host: &'a Host,
        args: DeployArgs,
    },
    /// CLI mode: state and host come from the ambient context.
    Ambient { args: DeployArgs },
}

pub type DeployBody = dyn Fn(&State, &Host, &DeployArgs) -> Result<()> + Send + Sync;

#[derive(Clone)]
pub struct Deploy {
    ident: String,
    name: Option<String>,
    data_defaults: Option<IndexMap<String, Value>>,
    body: Arc<DeployBody>,
}

/// Builds a [`Deploy`] from a function, using the function's name as the
/// deploy name.
#[macro_export]
macro_rules! deploy {
    ($func:ident) => {
        $crate::api::deploy::Deploy::new(stringify!($func), $func)
    };
}

impl Deploy {
    pub fn new<F>(ident: &str, body: F) -> Self
    where
        F: Fn(&State, &Host, &DeployArgs) -> Result<()> + Send + Sync + 'static,
    {
        Deploy {
            ident: ident.to_string(),
            name: None,
            data_defaults: None,
            body: Arc::new(body),
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_data(mut self, data: IndexMap<String, Value>) -> Self {
        self.data_defaults = Some(data);
        self
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.ident)
    }

    pub fn data_defaults(&self) -> Option<&IndexMap<String, Value>> {
        self.data_defaults.as_ref()
    }

    /// Runs the deploy body inside a named deploy region. Reserved option keys
    /// are taken out of the keyword arguments and applied to the region. An
    /// error from the body is returned as is, after the region is closed.
    pub fn call(&self, invocation: Invocation<'_>) -> Result<()> {
        match invocation {
            Invocation::Explicit { state, host, args } => self.run(state, host, args),
            Invocation::Ambient { args } => {
                let context = pseudo::current().ok_or(DeployError::NoContext)?;
                self.run(&context.state, &context.host, args)
            }
        }
    }

    fn run(&self, state: &State, host: &Host, mut args: DeployArgs) -> Result<()> {
        let options = DeployOptions::pop_from(&mut args.kwargs)?;

        debug!("Running deploy {} on {}", self.name(), host.name);

        let _region = state.deploy(self.name(), options, self.data_defaults.clone());
        (self.body)(state, host, &args)
    }
}

impl fmt::Debug for Deploy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deploy")
            .field("ident", &self.ident)
            .field("name", &self.name)
            .field("data_defaults", &self.data_defaults)
            .finish_non_exhaustive()
    }
}

/// Runs `deploy` once for every host in the state's inventory, exactly as
/// an explicit [`Deploy::call`] would: each run gets its own named region with
/// the deploy's options and default data. Stops at the first failing host.
pub fn add_deploy(state: &State, deploy: &Deploy, args: &DeployArgs) -> Result<()> {
    for host in state.inventory().iter() {
        deploy.run(state, host, args.clone())?;
    }

    Ok(())
}
