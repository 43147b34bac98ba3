pub mod deploy;
pub mod host;
pub mod inventory;
pub mod options;
pub mod pseudo;
pub mod state;
