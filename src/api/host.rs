use crate::api::state::State;
use crate::connectors::vagrant::NamedHostEntry;
use indexmap::IndexMap;
use serde_json::Value;

#[derive(Clone, Debug, PartialEq)]
pub struct Host {
    pub name: String,
    data: IndexMap<String, Value>,
    groups: Vec<String>,
}

impl Host {
    pub fn new(name: &str) -> Self {
        Host {
            name: name.to_string(),
            data: IndexMap::new(),
            groups: Vec::new(),
        }
    }

    pub fn from_entry(entry: NamedHostEntry) -> Self {
        let mut host = Host::new(&entry.name);
        host.data = entry.data;
        for group in &entry.groups {
            host.add_group(group);
        }
        host
    }

    pub fn data(&self) -> &IndexMap<String, Value> {
        &self.data
    }

    pub fn set_data(&mut self, key: &str, value: Value) {
        self.data.insert(key.to_string(), value);
    }

    /// Looks `key` up in the host's own data, falling back to the data
    /// defaults of the deploy currently running on `state`.
    pub fn get_data(&self, state: &State, key: &str) -> Option<Value> {
        self.data.get(key).cloned().or_else(|| {
            state
                .current_deploy()
                .and_then(|deploy| deploy.data.get(key).cloned())
        })
    }

    pub fn add_group(&mut self, group: &str) {
        let group_name = group.to_string();
        if !self.groups.contains(&group_name) {
            self.groups.push(group_name);
        }
    }

    pub fn get_groups(&self) -> &Vec<String> {
        &self.groups
    }

    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }
}
