use crate::error::VagrantError;
use indexmap::IndexMap;
use log::debug;

/// Settings of one `Host` block of `vagrant ssh-config` output, in the order
/// they appeared. Always contains the `Host` key.
#[derive(Clone, Debug, PartialEq)]
pub struct HostRecord {
    settings: IndexMap<String, String>,
}

impl HostRecord {
    pub fn new(host: &str) -> Self {
        let mut settings = IndexMap::new();
        settings.insert(String::from("Host"), host.to_string());
        HostRecord { settings }
    }

    pub fn host(&self) -> &str {
        self.get("Host").unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.settings.insert(key.to_string(), value.to_string());
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.settings.keys().map(String::as_str)
    }
}

/// Splits concatenated ssh-config output into one record per host. A block
/// ends at a blank line or at the next `Host` line; settings seen outside any
/// block are logged and dropped.
pub fn parse_host_blocks<S: AsRef<str>>(lines: &[S]) -> Result<Vec<HostRecord>, VagrantError> {
    let mut hosts = Vec::new();
    let mut current: Option<HostRecord> = None;

    for line in lines {
        let line = line.as_ref().trim();

        // vagrant prints an empty line after each host
        if line.is_empty() {
            if let Some(host) = current.take() {
                hosts.push(host);
            }
            continue;
        }

        let (key, value) = line
            .split_once(' ')
            .ok_or_else(|| VagrantError::MalformedConfigLine(line.to_string()))?;
        let value = value.trim_start();

        if key == "Host" {
            if let Some(host) = current.take() {
                hosts.push(host);
            }
            current = Some(HostRecord::new(value));
        } else if let Some(host) = current.as_mut() {
            host.set(key, value);
        } else {
            debug!("Extra Vagrant SSH key/value ({key}={value})");
        }
    }

    if let Some(host) = current {
        hosts.push(host);
    }

    Ok(hosts)
}
