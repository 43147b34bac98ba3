pub mod api;
pub mod connectors;
pub mod deploys;
pub mod error;
pub mod local;

pub use api::deploy::{add_deploy, Deploy, DeployArgs, Invocation};
pub use connectors::vagrant::{make_names_data, Limit, NamedHostEntry, VagrantConnector};
