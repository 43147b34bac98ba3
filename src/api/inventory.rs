use crate::api::host::Host;
use crate::connectors::vagrant::NamedHostEntry;
use indexmap::IndexMap;
use std::sync::Arc;

/// Hosts in discovery order, plus the members of every group they name.
#[derive(Clone, Debug, Default)]
pub struct Inventory {
    hosts: IndexMap<String, Arc<Host>>,
    groups: IndexMap<String, Vec<String>>,
}

impl Inventory {
    pub fn from_names_data(entries: Vec<NamedHostEntry>) -> Self {
        let mut inventory = Inventory::default();
        for entry in entries {
            inventory.add_host(Host::from_entry(entry));
        }
        inventory
    }

    pub fn add_host(&mut self, host: Host) {
        for group in host.get_groups() {
            let members = self.groups.entry(group.clone()).or_default();
            if !members.contains(&host.name) {
                members.push(host.name.clone());
            }
        }
        self.hosts.insert(host.name.clone(), Arc::new(host));
    }

    pub fn get_host(&self, name: &str) -> Option<&Arc<Host>> {
        self.hosts.get(name)
    }

    pub fn get_group(&self, name: &str) -> Vec<&Arc<Host>> {
        self.groups
            .get(name)
            .map(|members| members.iter().filter_map(|m| self.hosts.get(m)).collect())
            .unwrap_or_default()
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Host>> {
        self.hosts.values()
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}
