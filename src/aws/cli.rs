//! AWS CLI transport
//!
//! Runs `aws <service> <operation> --flag=value... --output=json` and parses
//! the JSON the CLI prints. Provider failures are recognised by the fixed
//! text the CLI writes to stderr; anything else is reported unchanged.

use crate::aws::flags::{encode_value, flag_arg, subcommand_name};
use crate::aws::request::{OperationOutput, OperationRequest};
use crate::aws::transport::Transport;
use crate::core::error::{AwsCommandError, PolgenError, Result};
use regex::Regex;
use std::io::{self, Write};
use std::process::Command;
use std::sync::OnceLock;
use tempfile::NamedTempFile;

/// Arguments that must be passed through a file rather than inline
const TEMPLATE_BODY: &str = "TemplateBody";

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Process launcher, replaceable in tests
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput>;
}

/// Runs real processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        let output = Command::new(program).args(args).output()?;
        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

fn provider_error_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)^An error occurred \(([^)]+)\) when calling the (\w+) operation: ?(.*)$")
            .expect("provider error pattern is valid")
    })
}

/// Parse the CLI's provider error text into a normalized error
///
/// Returns `None` when stderr does not follow the provider format, e.g. usage
/// errors or connection failures.
pub fn parse_provider_error(stderr: &str) -> Option<AwsCommandError> {
    let caps = provider_error_pattern().captures(stderr.trim())?;
    Some(AwsCommandError::provider(&caps[2], &caps[1], &caps[3]))
}

pub struct CliTransport {
    program: String,
    runner: Box<dyn CommandRunner>,
}

impl CliTransport {
    pub fn new(program: impl Into<String>, runner: Box<dyn CommandRunner>) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    /// Check that `program` is an installed AWS CLI and wrap it
    pub fn probe(program: impl Into<String>, runner: Box<dyn CommandRunner>) -> Option<Self> {
        let transport = Self::new(program, runner);
        match transport.runner.run(&transport.program, &["--version".to_string()]) {
            Ok(out) if out.success() => {
                // v1 prints its version to stderr, v2 to stdout
                let version = if out.stdout.trim().is_empty() { &out.stderr } else { &out.stdout };
                if version.trim().starts_with("aws-cli") {
                    tracing::debug!("Found {}", version.trim());
                    Some(transport)
                } else {
                    tracing::debug!("{} is not the AWS CLI: {}", transport.program, version.trim());
                    None
                }
            }
            Ok(out) => {
                tracing::debug!("{} --version exited with {:?}", transport.program, out.code);
                None
            }
            Err(e) => {
                tracing::debug!("Unable to run {}: {}", transport.program, e);
                None
            }
        }
    }

    fn run(&self, args: &[String]) -> Result<CommandOutput> {
        self.runner
            .run(&self.program, args)
            .map_err(|e| PolgenError::ToolUnavailable {
                program: self.program.clone(),
                reason: e.to_string(),
            })
    }
}

impl Transport for CliTransport {
    fn name(&self) -> &'static str {
        "aws-cli"
    }

    fn execute(&self, request: &OperationRequest) -> Result<OperationOutput> {
        let mut args = vec![
            request.service().to_string(),
            subcommand_name(request.operation()),
        ];

        // Held until the call returns; dropping it removes the file
        let mut template_file: Option<NamedTempFile> = None;

        for (key, value) in request.arguments() {
            if key == TEMPLATE_BODY {
                let mut file = NamedTempFile::new()?;
                file.write_all(encode_value(value).as_bytes())?;
                file.flush()?;
                args.push(format!("--template-body=file://{}", file.path().display()));
                template_file = Some(file);
                continue;
            }
            args.push(flag_arg(key, value));
        }
        args.push("--output=json".to_string());

        tracing::debug!("Running {} {}", self.program, args.join(" "));
        let output = self.run(&args);
        drop(template_file);
        let output = output?;

        if !output.success() {
            let stderr = output.stderr.trim();
            if let Some(err) = parse_provider_error(stderr) {
                tracing::debug!("Provider error {}: {}", err.code, err.detail);
                return Err(err.into());
            }
            return Err(PolgenError::CommandFailed {
                program: self.program.clone(),
                code: output.code,
                stderr: stderr.to_string(),
            });
        }

        let stdout = output.stdout.trim();
        if stdout.is_empty() {
            return Ok(OperationOutput::new());
        }
        Ok(serde_json::from_str(stdout)?)
    }

    fn region(&self) -> Result<String> {
        let args = ["configure", "get", "region"].map(String::from);
        let output = self.run(&args)?;
        if !output.success() {
            return Err(PolgenError::CommandFailed {
                program: self.program.clone(),
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output.stdout.trim().to_string())
    }
}
