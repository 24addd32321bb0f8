//! AWS command execution
//!
//! One executor, two transports:
//! OperationRequest -> AwsExecutor -> (SdkTransport | CliTransport) -> OperationOutput
//!
//! Provider failures come back as `AwsCommandError` whichever transport ran.

pub mod cli;
pub mod executor;
pub mod flags;
pub mod request;
#[cfg(feature = "sdk")]
pub mod sdk;
pub mod transport;

pub use cli::{CliTransport, CommandOutput, CommandRunner, SystemRunner};
pub use executor::AwsExecutor;
pub use request::{ArgValue, OperationOutput, OperationRequest};
pub use transport::{StackPhase, StackWaiter, Transport};
