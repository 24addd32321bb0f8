//! Structured-client transport built on the AWS SDK
//!
//! Only the operations the bootstrap flow uses are mapped. Results are
//! rendered into the same JSON shape the AWS CLI prints, so callers see one
//! result format whichever transport is active.

use crate::aws::request::{OperationOutput, OperationRequest};
use crate::aws::transport::{StackPhase, StackWaiter, Transport};
use crate::core::error::{AwsCommandError, PolgenError, Result};
use aws_sdk_cloudformation::client::Waiters;
use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cloudformation::types::{Capability, Output, Stack};
use serde_json::Value;
use std::time::Duration;
use tokio::runtime::Runtime;

pub struct SdkTransport {
    runtime: Runtime,
    region: Option<String>,
    cloudformation: aws_sdk_cloudformation::Client,
    sts: aws_sdk_sts::Client,
}

impl SdkTransport {
    /// Load credentials and region from the default provider chain
    pub fn load() -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let config = runtime.block_on(aws_config::load_defaults(
            aws_config::BehaviorVersion::latest(),
        ));
        Ok(Self {
            region: config.region().map(|r| r.to_string()),
            cloudformation: aws_sdk_cloudformation::Client::new(&config),
            sts: aws_sdk_sts::Client::new(&config),
            runtime,
        })
    }

    fn get_caller_identity(&self) -> Result<OperationOutput> {
        let out = self
            .runtime
            .block_on(self.sts.get_caller_identity().send())
            .map_err(|e| normalize("GetCallerIdentity", e))?;
        let mut result = OperationOutput::new();
        put(&mut result, "UserId", out.user_id());
        put(&mut result, "Account", out.account());
        put(&mut result, "Arn", out.arn());
        Ok(result)
    }

    fn describe_stacks(&self, request: &OperationRequest) -> Result<OperationOutput> {
        let call = self
            .cloudformation
            .describe_stacks()
            .set_stack_name(request.text("StackName").map(String::from));
        let out = self
            .runtime
            .block_on(call.send())
            .map_err(|e| normalize("DescribeStacks", e))?;
        let mut result = OperationOutput::new();
        result.insert(
            "Stacks".into(),
            Value::Array(out.stacks().iter().map(stack_json).collect()),
        );
        Ok(result)
    }

    fn create_stack(&self, request: &OperationRequest) -> Result<OperationOutput> {
        let mut call = self
            .cloudformation
            .create_stack()
            .set_stack_name(request.text("StackName").map(String::from))
            .set_template_body(request.text("TemplateBody").map(String::from));
        for capability in request.list("Capabilities").unwrap_or_default() {
            call = call.capabilities(Capability::from(capability));
        }
        let out = self
            .runtime
            .block_on(call.send())
            .map_err(|e| normalize("CreateStack", e))?;
        let mut result = OperationOutput::new();
        put(&mut result, "StackId", out.stack_id());
        Ok(result)
    }

    fn update_stack(&self, request: &OperationRequest) -> Result<OperationOutput> {
        let mut call = self
            .cloudformation
            .update_stack()
            .set_stack_name(request.text("StackName").map(String::from))
            .set_template_body(request.text("TemplateBody").map(String::from));
        for capability in request.list("Capabilities").unwrap_or_default() {
            call = call.capabilities(Capability::from(capability));
        }
        let out = self
            .runtime
            .block_on(call.send())
            .map_err(|e| normalize("UpdateStack", e))?;
        let mut result = OperationOutput::new();
        put(&mut result, "StackId", out.stack_id());
        Ok(result)
    }
}

impl Transport for SdkTransport {
    fn name(&self) -> &'static str {
        "aws-sdk"
    }

    fn execute(&self, request: &OperationRequest) -> Result<OperationOutput> {
        match (request.service(), request.operation()) {
            ("sts", "get_caller_identity") => self.get_caller_identity(),
            ("cloudformation", "describe_stacks") => self.describe_stacks(request),
            ("cloudformation", "create_stack") => self.create_stack(request),
            ("cloudformation", "update_stack") => self.update_stack(request),
            (service, operation) => Err(PolgenError::UnsupportedOperation {
                service: service.to_string(),
                operation: operation.to_string(),
            }),
        }
    }

    fn region(&self) -> Result<String> {
        Ok(self.region.clone().unwrap_or_default())
    }

    fn stack_waiter(&self) -> Option<&dyn StackWaiter> {
        Some(self)
    }
}

impl StackWaiter for SdkTransport {
    fn wait(&self, stack: &str, phase: StackPhase, timeout: Duration) -> Result<()> {
        let waited = match phase {
            StackPhase::Create => self
                .runtime
                .block_on(
                    self.cloudformation
                        .wait_until_stack_create_complete()
                        .stack_name(stack)
                        .wait(timeout),
                )
                .map(|_| ())
                .map_err(|e| DisplayErrorContext(&e).to_string()),
            StackPhase::Update => self
                .runtime
                .block_on(
                    self.cloudformation
                        .wait_until_stack_update_complete()
                        .stack_name(stack)
                        .wait(timeout),
                )
                .map(|_| ())
                .map_err(|e| DisplayErrorContext(&e).to_string()),
        };
        waited.map_err(|reason| {
            PolgenError::Sdk(format!(
                "waiting for {stack} to reach {}: {reason}",
                phase.target_status()
            ))
        })
    }
}

/// Service errors become normalized errors; everything else is passed on
fn normalize<E, R>(operation: &str, err: SdkError<E, R>) -> PolgenError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err.as_service_error() {
        Some(service) => AwsCommandError::provider(
            operation,
            service.code().unwrap_or_default(),
            service.message().unwrap_or_default(),
        )
        .into(),
        None => PolgenError::Sdk(DisplayErrorContext(&err).to_string()),
    }
}

fn put(map: &mut OperationOutput, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        map.insert(key.into(), Value::String(value.into()));
    }
}

fn stack_json(stack: &Stack) -> Value {
    let mut map = OperationOutput::new();
    put(&mut map, "StackId", stack.stack_id());
    put(&mut map, "StackName", stack.stack_name());
    put(&mut map, "StackStatus", stack.stack_status().map(|s| s.as_str()));
    put(&mut map, "StackStatusReason", stack.stack_status_reason());
    map.insert(
        "Outputs".into(),
        Value::Array(stack.outputs().iter().map(output_json).collect()),
    );
    Value::Object(map)
}

fn output_json(output: &Output) -> Value {
    let mut map = OperationOutput::new();
    put(&mut map, "OutputKey", output.output_key());
    put(&mut map, "OutputValue", output.output_value());
    put(&mut map, "Description", output.description());
    Value::Object(map)
}
