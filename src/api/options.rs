use crate::error::DeployError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keyword arguments reserved for the deploy wrapper. Deploy bodies never see
/// these, so their own parameters must use other names.
pub const DEPLOY_OPTION_KEYS: [&str; 16] = [
    "sudo",
    "sudo_user",
    "use_sudo_login",
    "use_sudo_password",
    "preserve_sudo_env",
    "su_user",
    "use_su_login",
    "preserve_su_env",
    "env",
    "chdir",
    "ignore_errors",
    "timeout",
    "get_pty",
    "serial",
    "run_once",
    "parallel",
];

/// Execution options applied to every operation recorded inside a deploy.
/// Unset fields inherit from the enclosing deploy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeployOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sudo: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sudo_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_sudo_login: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_sudo_password: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preserve_sudo_env: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub su_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_su_login: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preserve_su_env: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chdir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_errors: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get_pty: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_once: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<u64>,
}

impl DeployOptions {
    /// Removes the reserved keys from `kwargs` and parses them. On error the
    /// reserved keys have still been removed.
    pub fn pop_from(kwargs: &mut IndexMap<String, Value>) -> Result<Self, DeployError> {
        let mut options = Map::new();
        for key in DEPLOY_OPTION_KEYS {
            if let Some(value) = kwargs.shift_remove(key) {
                options.insert(key.to_string(), value);
            }
        }

        if options.is_empty() {
            return Ok(DeployOptions::default());
        }

        Ok(serde_json::from_value(Value::Object(options))?)
    }

    pub fn is_empty(&self) -> bool {
        *self == DeployOptions::default()
    }

    /// Returns these options with every field set in `inner` taken from it.
    /// `env` maps are merged key by key.
    pub fn overlay(&self, inner: &DeployOptions) -> DeployOptions {
        let env = match (&self.env, &inner.env) {
            (Some(outer), Some(inner)) => {
                let mut env = outer.clone();
                env.extend(inner.iter().map(|(k, v)| (k.clone(), v.clone())));
                Some(env)
            }
            (outer, inner) => inner.clone().or_else(|| outer.clone()),
        };

        DeployOptions {
            sudo: inner.sudo.or(self.sudo),
            sudo_user: inner.sudo_user.clone().or_else(|| self.sudo_user.clone()),
            use_sudo_login: inner.use_sudo_login.or(self.use_sudo_login),
            use_sudo_password: inner.use_sudo_password.or(self.use_sudo_password),
            preserve_sudo_env: inner.preserve_sudo_env.or(self.preserve_sudo_env),
            su_user: inner.su_user.clone().or_else(|| self.su_user.clone()),
            use_su_login: inner.use_su_login.or(self.use_su_login),
            preserve_su_env: inner.preserve_su_env.or(self.preserve_su_env),
            env,
            chdir: inner.chdir.clone().or_else(|| self.chdir.clone()),
            ignore_errors: inner.ignore_errors.or(self.ignore_errors),
            timeout: inner.timeout.or(self.timeout),
            get_pty: inner.get_pty.or(self.get_pty),
            serial: inner.serial.or(self.serial),
            run_once: inner.run_once.or(self.run_once),
            parallel: inner.parallel.or(self.parallel),
        }
    }
}
