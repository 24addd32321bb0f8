//! Idempotent create-or-update of the bootstrap stack

use crate::aws::{AwsExecutor, OperationRequest, StackPhase};
use crate::bootstrap::template::render_template;
use crate::core::config::PolgenConfig;
use crate::core::error::{PolgenError, Result};
use serde::Deserialize;
use std::thread;

/// Error code CloudFormation uses both for "no such stack" and "nothing to update"
pub const VALIDATION_ERROR: &str = "ValidationError";

/// Detail prefix of the "nothing to update" validation error
pub const NO_UPDATES_PREFIX: &str = "No updates are to be performed";

const IAM_CAPABILITY: &str = "CAPABILITY_IAM";

/// The parts of a described stack this tool reads
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackDescription {
    pub stack_id: String,
    pub stack_name: String,
    pub stack_status: String,
    #[serde(default)]
    pub outputs: Vec<StackOutput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackOutput {
    pub output_key: String,
    pub output_value: String,
}

impl StackDescription {
    pub fn output(&self, key: &str) -> Result<&str> {
        self.outputs
            .iter()
            .find(|o| o.output_key == key)
            .map(|o| o.output_value.as_str())
            .ok_or_else(|| PolgenError::MissingOutput {
                stack: self.stack_name.clone(),
                key: key.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    UpToDate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeStacksResponse {
    #[serde(default)]
    stacks: Vec<StackDescription>,
}

/// The bootstrap stack of one repository/branch
pub struct BootstrapStack<'a> {
    executor: &'a AwsExecutor,
    config: &'a PolgenConfig,
    postfix: String,
}

impl<'a> BootstrapStack<'a> {
    pub fn new(executor: &'a AwsExecutor, config: &'a PolgenConfig, postfix: impl Into<String>) -> Self {
        Self {
            executor,
            config,
            postfix: postfix.into(),
        }
    }

    pub fn stack_name(&self) -> String {
        format!("{}{}", self.config.stack_name_prefix, self.postfix)
    }

    /// Describe the stack; `None` if it does not exist
    pub fn describe(&self) -> Result<Option<StackDescription>> {
        let request = OperationRequest::new("cloudformation", "describe_stacks")
            .arg("StackName", self.stack_name());
        let output = match self.executor.run(&request) {
            Ok(output) => output,
            // describe_stacks reports an unknown stack name as a validation error
            Err(PolgenError::Aws(e)) if e.is_code(VALIDATION_ERROR) => {
                tracing::debug!("Stack {} not found: {}", self.stack_name(), e.detail);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        let response: DescribeStacksResponse =
            serde_json::from_value(serde_json::Value::Object(output))?;
        Ok(response.stacks.into_iter().next())
    }

    /// Describe the stack, failing if it does not exist
    pub fn require(&self) -> Result<StackDescription> {
        self.describe()?
            .ok_or_else(|| PolgenError::StackMissing(self.stack_name()))
    }

    pub fn create(&self, wait: bool) -> Result<()> {
        let request = self.request("create_stack", self.stack_name());
        let output = self.executor.run(&request)?;
        let stack_id = output
            .get("StackId")
            .and_then(|v| v.as_str())
            .map(String::from)
            .unwrap_or_else(|| self.stack_name());
        tracing::info!("Creating stack {}", stack_id);
        if wait {
            self.wait_for(&stack_id, StackPhase::Create)?;
        }
        Ok(())
    }

    /// Update the stack; an unchanged template is not an error
    pub fn update(&self, stack: &StackDescription, wait: bool) -> Result<UpdateOutcome> {
        let request = self.request("update_stack", stack.stack_id.clone());
        let output = match self.executor.run(&request) {
            Ok(output) => output,
            Err(PolgenError::Aws(e))
                if e.is_code(VALIDATION_ERROR) && e.detail.starts_with(NO_UPDATES_PREFIX) =>
            {
                tracing::info!("Stack {} is up to date", stack.stack_name);
                return Ok(UpdateOutcome::UpToDate);
            }
            Err(e) => return Err(e),
        };
        let stack_id = output
            .get("StackId")
            .and_then(|v| v.as_str())
            .unwrap_or(&stack.stack_id)
            .to_string();
        tracing::info!("Updating stack {}", stack_id);
        if wait {
            self.wait_for(&stack_id, StackPhase::Update)?;
        }
        Ok(UpdateOutcome::Updated)
    }

    fn request(&self, operation: &str, stack_name: String) -> OperationRequest {
        OperationRequest::new("cloudformation", operation)
            .arg("StackName", stack_name)
            .arg("TemplateBody", render_template(&self.postfix))
            .arg("Capabilities", [IAM_CAPABILITY])
    }

    /// Block until the stack reaches the terminal status of `phase`
    pub fn wait_for(&self, stack_id: &str, phase: StackPhase) -> Result<()> {
        if let Some(waiter) = self.executor.stack_waiter() {
            return waiter.wait(stack_id, phase, self.config.wait_timeout());
        }
        self.poll(phase)
    }

    /// Fixed-interval poll used when the transport has no native waiter
    fn poll(&self, phase: StackPhase) -> Result<()> {
        let attempts = self.config.max_poll_attempts;
        for attempt in 1..=attempts {
            thread::sleep(self.config.poll_interval());
            tracing::debug!("Check stack {:?} ({}/{})", phase, attempt, attempts);
            let stack = self.require()?;
            if stack.stack_status == phase.target_status() {
                tracing::info!("Stack {} reached {}", stack.stack_name, stack.stack_status);
                return Ok(());
            }
            if !phase.is_pending(&stack.stack_status) {
                return Err(PolgenError::StackFailed {
                    stack: stack.stack_id,
                    status: stack.stack_status,
                });
            }
        }
        Err(PolgenError::StackTimeout {
            stack: self.stack_name(),
            attempts,
        })
    }
}
