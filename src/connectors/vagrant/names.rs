use super::options::VagrantOptions;
use super::parser::HostRecord;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

pub const VAGRANT_GROUP: &str = "@vagrant";
const NAME_PREFIX: &str = "@vagrant/";

// (inventory data key, ssh-config key)
const SSH_DATA_KEYS: [(&str, &str); 4] = [
    ("ssh_hostname", "HostName"),
    ("ssh_port", "Port"),
    ("ssh_user", "User"),
    ("ssh_key", "IdentityFile"),
];

/// One discovered host, ready to be added to an inventory.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NamedHostEntry {
    pub name: String,
    pub data: IndexMap<String, Value>,
    pub groups: Vec<String>,
}

pub fn make_name_data(host: &HostRecord, options: &VagrantOptions) -> NamedHostEntry {
    let vagrant_host = host.host();

    let mut data: IndexMap<String, Value> = SSH_DATA_KEYS
        .iter()
        .filter_map(|(data_key, ssh_key)| {
            host.get(ssh_key)
                .map(|value| (data_key.to_string(), Value::String(value.to_string())))
        })
        .collect();

    if let Some(overrides) = options.host_data(vagrant_host) {
        data.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    let mut groups = options
        .host_groups(vagrant_host)
        .cloned()
        .unwrap_or_default();

    if !groups.iter().any(|group| group == VAGRANT_GROUP) {
        groups.push(VAGRANT_GROUP.to_string());
    }

    NamedHostEntry {
        name: format!("{NAME_PREFIX}{vagrant_host}"),
        data,
        groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(settings: &[(&str, &str)]) -> HostRecord {
        let mut host = HostRecord::new("web1");
        for (key, value) in settings {
            host.set(key, value);
        }
        host
    }

    fn full_record() -> HostRecord {
        record(&[
            ("HostName", "10.0.0.1"),
            ("Port", "2222"),
            ("User", "vagrant"),
            ("IdentityFile", "/k1"),
            ("IdentitiesOnly", "yes"),
        ])
    }

    #[test]
    fn test_name_and_ssh_data() {
        let entry = make_name_data(&full_record(), &VagrantOptions::default());

        assert_eq!(entry.name, "@vagrant/web1");
        assert_eq!(
            serde_json::to_value(&entry.data).unwrap(),
            json!({
                "ssh_hostname": "10.0.0.1",
                "ssh_port": "2222",
                "ssh_user": "vagrant",
                "ssh_key": "/k1",
            })
        );
        assert_eq!(entry.groups, vec!["@vagrant"]);
    }

    #[test]
    fn test_missing_keys_stay_absent() {
        let entry = make_name_data(&record(&[("HostName", "10.0.0.1")]), &VagrantOptions::default());

        assert_eq!(entry.data.len(), 1);
        assert!(!entry.data.contains_key("ssh_port"));
        assert!(!entry.data.contains_key("ssh_key"));
    }

    #[test]
    fn test_option_data_overrides() {
        let mut options = VagrantOptions::default();
        options.data.insert(
            String::from("web1"),
            IndexMap::from([
                (String::from("ssh_user"), json!("deploy")),
                (String::from("roles"), json!(["web", "cache"])),
            ]),
        );
        options.data.insert(
            String::from("web2"),
            IndexMap::from([(String::from("ssh_user"), json!("other"))]),
        );

        let entry = make_name_data(&full_record(), &options);

        assert_eq!(entry.data["ssh_user"], json!("deploy"));
        assert_eq!(entry.data["ssh_hostname"], json!("10.0.0.1"));
        assert_eq!(entry.data["roles"], json!(["web", "cache"]));
    }

    #[test]
    fn test_groups_from_options() {
        let mut options = VagrantOptions::default();
        options.groups.insert(
            String::from("web1"),
            vec![String::from("webservers"), String::from("prod")],
        );

        let entry = make_name_data(&full_record(), &options);
        assert_eq!(entry.groups, vec!["webservers", "prod", "@vagrant"]);
    }

    #[test]
    fn test_vagrant_group_added_once() {
        let mut options = VagrantOptions::default();
        options.groups.insert(
            String::from("web1"),
            vec![String::from("@vagrant"), String::from("webservers")],
        );

        let entry = make_name_data(&full_record(), &options);
        assert_eq!(entry.groups, vec!["@vagrant", "webservers"]);

        // options are not modified by building an entry
        let again = make_name_data(&full_record(), &options);
        assert_eq!(again.groups, entry.groups);
    }
}
