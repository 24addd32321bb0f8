//! Command executor - runs AWS operations through the transport chosen at startup

use crate::aws::cli::{CliTransport, SystemRunner};
use crate::aws::request::{ArgValue, OperationOutput, OperationRequest};
use crate::aws::transport::{StackWaiter, Transport};
use crate::core::config::{PolgenConfig, TransportKind};
use crate::core::error::{PolgenError, Result};

/// Executes AWS operations and normalizes provider failures
///
/// The transport is fixed for the executor's lifetime; nothing is re-probed
/// per call.
pub struct AwsExecutor {
    transport: Box<dyn Transport>,
}

impl AwsExecutor {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Pick a transport according to `config.transport`
    ///
    /// `auto` prefers the structured client when it is compiled in and falls
    /// back to an installed AWS CLI. Returns `NoAwsInterface` if neither is
    /// usable.
    pub fn detect(config: &PolgenConfig) -> Result<Self> {
        let transport: Box<dyn Transport> = match config.transport {
            TransportKind::Sdk => sdk_transport()?.ok_or(PolgenError::NoAwsInterface)?,
            TransportKind::Cli => Box::new(cli_transport(config)?),
            TransportKind::Auto => match sdk_transport()? {
                Some(sdk) => sdk,
                None => Box::new(cli_transport(config)?),
            },
        };
        tracing::info!("Using {} transport", transport.name());
        Ok(Self::new(transport))
    }

    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    pub fn run(&self, request: &OperationRequest) -> Result<OperationOutput> {
        tracing::debug!(
            "{} {}/{} ({} args)",
            self.transport.name(),
            request.service(),
            request.operation(),
            request.arguments().len()
        );
        self.transport.execute(request)
    }

    /// Run `operation` on `service` with named arguments
    pub fn execute<K, V, I>(&self, service: &str, operation: &str, arguments: I) -> Result<OperationOutput>
    where
        K: Into<String>,
        V: Into<ArgValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let request = arguments
            .into_iter()
            .fold(OperationRequest::new(service, operation), |req, (k, v)| req.arg(k, v));
        self.run(&request)
    }

    pub fn account_id(&self) -> Result<String> {
        let identity = self.run(&OperationRequest::new("sts", "get_caller_identity"))?;
        identity
            .get("Account")
            .and_then(|v| v.as_str())
            .map(String::from)
            .ok_or_else(|| PolgenError::UnexpectedResponse {
                operation: "get_caller_identity".into(),
                reason: "no Account in response".into(),
            })
    }

    pub fn region(&self) -> Result<String> {
        self.transport.region()
    }

    pub fn stack_waiter(&self) -> Option<&dyn StackWaiter> {
        self.transport.stack_waiter()
    }
}

fn cli_transport(config: &PolgenConfig) -> Result<CliTransport> {
    CliTransport::probe(config.aws_program.clone(), Box::new(SystemRunner))
        .ok_or(PolgenError::NoAwsInterface)
}

#[cfg(feature = "sdk")]
fn sdk_transport() -> Result<Option<Box<dyn Transport>>> {
    Ok(Some(Box::new(crate::aws::sdk::SdkTransport::load()?)))
}

#[cfg(not(feature = "sdk"))]
fn sdk_transport() -> Result<Option<Box<dyn Transport>>> {
    Ok(None)
}
