//! Deploys shipped with the binary.

use crate::api::deploy::{Deploy, DeployArgs, Invocation};
use crate::api::host::Host;
use crate::api::state::State;
use crate::deploy;
use anyhow::{bail, Result};
use indexmap::IndexMap;
use serde_json::{json, Value};

const DEFAULT_PACKAGES: [&str; 3] = ["curl", "git", "ca-certificates"];

fn string_list(value: &Value) -> Result<Vec<String>> {
    match value {
        Value::String(s) => Ok(s.split(',').map(|p| p.trim().to_string()).collect()),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => bail!("expected a package name, got {other}"),
            })
            .collect(),
        other => bail!("expected a list of packages, got {other}"),
    }
}

/// Creates the ssh user and installs the base packages.
pub fn bootstrap(state: &State, host: &Host, args: &DeployArgs) -> Result<()> {
    let user = host
        .get_data(state, "ssh_user")
        .and_then(|user| user.as_str().map(String::from))
        .unwrap_or_else(|| String::from("vagrant"));
    state.add_op(host, "server.user", [user]);

    let packages = match args.get("packages") {
        Some(value) => string_list(value)?,
        None => DEFAULT_PACKAGES.iter().map(|p| p.to_string()).collect(),
    };
    state.add_op(host, "apt.update", Vec::<String>::new());
    state.add_op(host, "apt.packages", packages);

    Ok(())
}

pub fn docker(state: &State, host: &Host, _args: &DeployArgs) -> Result<()> {
    bootstrap_deploy().call(Invocation::Explicit {
        state,
        host,
        args: DeployArgs::new(),
    })?;

    let version = match host.get_data(state, "docker_version") {
        Some(Value::String(version)) => version,
        Some(other) => other.to_string(),
        None => String::from("stable"),
    };

    state.add_op(
        host,
        "apt.repo",
        [format!("deb https://download.docker.com/linux/ubuntu {version}")],
    );
    state.add_op(host, "apt.packages", ["docker-ce", "docker-ce-cli"]);
    state.add_op(host, "systemd.service", ["docker", "running"]);

    Ok(())
}

pub fn bootstrap_deploy() -> Deploy {
    deploy!(bootstrap).named("Bootstrap host")
}

pub fn docker_deploy() -> Deploy {
    deploy!(docker)
        .named("Install Docker")
        .with_data(IndexMap::from([(
            String::from("docker_version"),
            json!("stable"),
        )]))
}

pub fn builtin_deploys() -> Vec<Deploy> {
    vec![bootstrap_deploy(), docker_deploy()]
}

/// Looks a built-in deploy up by its function name.
pub fn find(ident: &str) -> Option<Deploy> {
    builtin_deploys()
        .into_iter()
        .find(|deploy| deploy.ident() == ident)
}
