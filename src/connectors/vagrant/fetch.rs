use crate::error::VagrantError;
use crate::local::CommandRunner;
use hashbrown::HashSet;
use log::debug;
use std::sync::mpsc;
use std::thread;

/// Set of vagrant target names discovery is restricted to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Limit(HashSet<String>);

impl Limit {
    pub fn contains(&self, target: &str) -> bool {
        self.0.contains(target)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Limit {
    fn from(target: &str) -> Self {
        Limit(HashSet::from_iter([target.to_string()]))
    }
}

impl From<String> for Limit {
    fn from(target: String) -> Self {
        Limit(HashSet::from_iter([target]))
    }
}

impl From<Vec<String>> for Limit {
    fn from(targets: Vec<String>) -> Self {
        Limit(targets.into_iter().collect())
    }
}

impl From<&[&str]> for Limit {
    fn from(targets: &[&str]) -> Self {
        Limit(targets.iter().map(|t| t.to_string()).collect())
    }
}

impl FromIterator<String> for Limit {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Limit(iter.into_iter().collect())
    }
}

#[derive(Debug, PartialEq)]
pub(crate) struct StatusRow<'a> {
    pub target: &'a str,
    pub kind: &'a str,
    pub data: &'a str,
}

/// Splits one `timestamp,target,type,data` line of `vagrant status
/// --machine-readable`. Blank lines yield `None`.
pub(crate) fn parse_status_line(line: &str) -> Result<Option<StatusRow<'_>>, VagrantError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = line.splitn(4, ',').collect();
    match fields[..] {
        [_, target, kind, data] => Ok(Some(StatusRow { target, kind, data })),
        _ => Err(VagrantError::MalformedStatusLine(line.to_string())),
    }
}

pub fn running_targets<S: AsRef<str>>(
    status: &[S],
    limit: Option<&Limit>,
) -> Result<Vec<String>, VagrantError> {
    let mut targets: Vec<String> = Vec::new();

    for line in status {
        let Some(row) = parse_status_line(line.as_ref())? else {
            continue;
        };

        if let Some(limit) = limit {
            if !limit.contains(row.target) {
                continue;
            }
        }

        if row.kind == "state" && row.data == "running" && !targets.iter().any(|t| t == row.target)
        {
            targets.push(row.target.to_string());
        }
    }

    Ok(targets)
}

/// Queries `vagrant status`, then runs `vagrant ssh-config` for every running
/// target on its own thread. Output blocks are concatenated in the order the
/// workers finish, each block kept whole. `max_workers` caps how many threads
/// run at once; `None` starts one per target.
pub fn fetch_ssh_config(
    runner: &dyn CommandRunner,
    vagrant_bin: &str,
    limit: Option<&Limit>,
    max_workers: Option<usize>,
) -> Result<Vec<String>, VagrantError> {
    let status = runner.run(&format!("{vagrant_bin} status --machine-readable"))?;
    let targets = running_targets(&status, limit)?;

    if targets.is_empty() {
        debug!("No running vagrant targets");
        return Ok(Vec::new());
    }

    let batch_size = max_workers
        .filter(|workers| *workers > 0)
        .unwrap_or(targets.len());

    let (sender, receiver) = mpsc::channel();

    for batch in targets.chunks(batch_size) {
        thread::scope(|scope| {
            for target in batch {
                let sender = sender.clone();
                scope.spawn(move || {
                    debug!("Loading SSH config for {target}");
                    let output = runner.run(&format!("{vagrant_bin} ssh-config {target}"));
                    // the receiver is alive until every batch is joined
                    let _ = sender.send(output);
                });
            }
        });
    }

    drop(sender);

    let mut lines = Vec::new();
    for output in receiver {
        lines.extend(output?);
    }

    Ok(lines)
}
