//! Bootstrap of the AWS account a wiki deployment runs in
//!
//! repo/branch -> postfix -> template -> BootstrapStack (describe, create or update, wait)

pub mod init;
pub mod postfix;
pub mod repo;
pub mod stack;
pub mod template;

pub use init::{run_init, InitOptions, InitSummary, Prompt, StackAction, StdinPrompt};
pub use postfix::{deployment_seed, derive_postfix};
pub use stack::{BootstrapStack, StackDescription, UpdateOutcome};
pub use template::render_template;
