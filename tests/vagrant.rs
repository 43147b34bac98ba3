use anyhow::Result;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use vagrant_deploy::connectors::vagrant::parser::parse_host_blocks;
use vagrant_deploy::connectors::vagrant::ConnectorConfig;
use vagrant_deploy::error::VagrantError;
use vagrant_deploy::local::MockRunner;
use vagrant_deploy::{Limit, NamedHostEntry, VagrantConnector};

const STATUS: &str = "\
1700000000,web1,metadata,provider,virtualbox
1700000000,web1,provider-name,virtualbox
1700000000,web1,state,running
1700000000,web1,state-human-short,running
1700000000,web2,state,poweroff
1700000000,db1,state,running
1700000000,,ui,info,Current machine states:
";

fn ssh_config(host: &str, port: u16) -> String {
    format!(
        "Host {host}\n  HostName 127.0.0.1\n  User vagrant\n  Port {port}\n  \
         UserKnownHostsFile /dev/null\n  StrictHostKeyChecking no\n  PasswordAuthentication no\n  \
         IdentityFile /home/user/project/.vagrant/machines/{host}/virtualbox/private_key\n  \
         IdentitiesOnly yes\n  LogLevel FATAL\n\n"
    )
}

fn runner() -> Arc<MockRunner> {
    Arc::new(
        MockRunner::new()
            .with_output("vagrant status --machine-readable", STATUS)
            .with_output("vagrant ssh-config web1", &ssh_config("web1", 2222))
            .with_output("vagrant ssh-config db1", &ssh_config("db1", 2200)),
    )
}

fn options_fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/@vagrant.json")
}

fn setup_connector(runner: Arc<MockRunner>, max_workers: Option<usize>) -> VagrantConnector {
    let config = ConnectorConfig {
        options_file: options_fixture(),
        max_workers,
        ..ConnectorConfig::default()
    };
    VagrantConnector::new(config, runner)
}

fn find<'a>(hosts: &'a [NamedHostEntry], name: &str) -> &'a NamedHostEntry {
    hosts
        .iter()
        .find(|h| h.name == name)
        .unwrap_or_else(|| panic!("host {name} not discovered"))
}

#[test]
fn test_one_record_per_running_target() -> Result<()> {
    let connector = setup_connector(runner(), None);

    let lines = connector.get_vagrant_config(None)?;
    let records = parse_host_blocks(lines)?;

    let mut hosts: Vec<&str> = records.iter().map(|r| r.host()).collect();
    hosts.sort();
    assert_eq!(hosts, vec!["db1", "web1"]);

    Ok(())
}

#[test]
fn test_names_data_with_options_fixture() -> Result<()> {
    let connector = setup_connector(runner(), None);
    let hosts = connector.make_names_data(None)?;
    assert_eq!(hosts.len(), 2);

    let web1 = find(&hosts, "@vagrant/web1");
    assert_eq!(web1.data["ssh_hostname"], json!("127.0.0.1"));
    assert_eq!(web1.data["ssh_port"], json!("2222"));
    assert_eq!(web1.data["ssh_user"], json!("deploy"));
    assert_eq!(web1.data["app_port"], json!(8080));
    assert_eq!(
        web1.data["ssh_key"],
        json!("/home/user/project/.vagrant/machines/web1/virtualbox/private_key")
    );
    assert_eq!(web1.groups, vec!["webservers", "prod", "@vagrant"]);

    let db1 = find(&hosts, "@vagrant/db1");
    assert_eq!(db1.data["ssh_user"], json!("vagrant"));
    assert_eq!(db1.data["docker_version"], json!("24.0"));
    assert_eq!(db1.groups, vec!["dbservers", "@vagrant", "prod"]);

    Ok(())
}

#[test]
fn test_worker_cap_gives_same_hosts() -> Result<()> {
    let unbounded = setup_connector(runner(), None).make_names_data(None)?;
    let capped = setup_connector(runner(), Some(1)).make_names_data(None)?;

    let mut unbounded: Vec<String> = unbounded.into_iter().map(|h| h.name).collect();
    let mut capped: Vec<String> = capped.into_iter().map(|h| h.name).collect();
    unbounded.sort();
    capped.sort();
    assert_eq!(unbounded, capped);

    Ok(())
}

#[test]
fn test_limit_is_only_used_by_the_first_call() -> Result<()> {
    let runner = runner();
    let connector = setup_connector(runner.clone(), None);

    let first = connector.make_names_data(Some(&Limit::from("web1")))?;
    let second = connector.make_names_data(Some(&Limit::from(vec![String::from("db1")])))?;
    let third = connector.make_names_data(None)?;

    assert_eq!(first.len(), 1);
    assert_eq!(first[0].name, "@vagrant/web1");
    assert_eq!(second, first);
    assert_eq!(third, first);
    assert_eq!(
        runner.executed_commands(),
        vec!["vagrant status --machine-readable", "vagrant ssh-config web1"]
    );

    Ok(())
}

#[test]
fn test_nothing_running_is_an_inventory_error() {
    let runner = Arc::new(
        MockRunner::new().with_output(
            "vagrant status --machine-readable",
            "1700000000,web1,state,poweroff\n1700000000,web2,state,saved\n",
        ),
    );
    let connector = setup_connector(runner, None);

    let err = connector.make_names_data(None).unwrap_err();
    assert!(matches!(err, VagrantError::NoRunningInstances));
    assert_eq!(err.to_string(), "No running Vagrant instances found!");
}

#[test]
fn test_missing_vagrant_is_a_command_error() {
    let runner = Arc::new(MockRunner::new());
    let connector = setup_connector(runner, None);

    assert!(matches!(
        connector.make_names_data(None),
        Err(VagrantError::Command(_))
    ));
}
