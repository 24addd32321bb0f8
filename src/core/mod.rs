pub mod config;
pub mod error;

pub use config::{PolgenConfig, TransportKind};
pub use error::{AwsCommandError, PolgenError, Result};
