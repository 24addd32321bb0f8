//! Scripted stand-ins for AWS used by the integration tests

#![allow(dead_code)]

use polgen::aws::{
    AwsExecutor, CommandOutput, CommandRunner, OperationOutput, OperationRequest, StackPhase,
    StackWaiter, Transport,
};
use polgen::core::config::PolgenConfig;
use polgen::core::error::{AwsCommandError, PolgenError, Result};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

pub type Reply = std::result::Result<Value, AwsCommandError>;

/// Config that never sleeps between status checks
pub fn fast_config(max_poll_attempts: u32) -> PolgenConfig {
    PolgenConfig {
        poll_interval_secs: 0,
        max_poll_attempts,
        ..PolgenConfig::default()
    }
}

/// Replays queued replies in order and records every request
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    replies: Rc<RefCell<VecDeque<(String, Reply)>>>,
    pub requests: Rc<RefCell<Vec<OperationRequest>>>,
    /// Present when the transport should offer a native waiter
    pub waits: Option<Rc<RefCell<Vec<(String, StackPhase, Duration)>>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_native_waiter() -> Self {
        Self {
            waits: Some(Rc::default()),
            ..Self::default()
        }
    }

    /// Queue the reply for the next call, which must be `operation`
    pub fn reply(&self, operation: &str, reply: Reply) -> &Self {
        self.replies
            .borrow_mut()
            .push_back((operation.to_string(), reply));
        self
    }

    pub fn executor(&self) -> AwsExecutor {
        AwsExecutor::new(Box::new(self.clone()))
    }

    pub fn operations(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|r| r.operation().to_string())
            .collect()
    }

    pub fn remaining(&self) -> usize {
        self.replies.borrow().len()
    }
}

impl Transport for ScriptedTransport {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn execute(&self, request: &OperationRequest) -> Result<OperationOutput> {
        self.requests.borrow_mut().push(request.clone());
        let (operation, reply) = self
            .replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected call {}", request.operation()));
        assert_eq!(operation, request.operation(), "calls out of order");
        match reply {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => panic!("scripted reply must be an object, got {other}"),
            Err(e) => Err(PolgenError::Aws(e)),
        }
    }

    fn region(&self) -> Result<String> {
        Ok("eu-central-1".into())
    }

    fn stack_waiter(&self) -> Option<&dyn StackWaiter> {
        self.waits.as_ref().map(|_| self as &dyn StackWaiter)
    }
}

impl StackWaiter for ScriptedTransport {
    fn wait(&self, stack: &str, phase: StackPhase, timeout: Duration) -> Result<()> {
        if let Some(waits) = &self.waits {
            waits.borrow_mut().push((stack.to_string(), phase, timeout));
        }
        Ok(())
    }
}

pub fn stack_json(name: &str, status: &str) -> Value {
    json!({
        "StackId": format!("arn:aws:cloudformation:eu-central-1:123456789012:stack/{name}/42"),
        "StackName": name,
        "StackStatus": status,
        "Outputs": [
            {"OutputKey": "BucketName", "OutputValue": "state-abc"},
            {"OutputKey": "AccessKeyID", "OutputValue": "AKIAEXAMPLE"},
            {"OutputKey": "SecretAccessKey", "OutputValue": "wJalrXUtnFEMI"}
        ]
    })
}

pub fn described(name: &str, status: &str) -> Reply {
    Ok(json!({ "Stacks": [stack_json(name, status)] }))
}

pub fn not_found(name: &str) -> Reply {
    Err(AwsCommandError::provider(
        "DescribeStacks",
        "ValidationError",
        &format!("Stack with id {name} does not exist"),
    ))
}

pub fn identity() -> Reply {
    Ok(json!({"UserId": "AIDA", "Account": "123456789012", "Arn": "arn:aws:iam::123456789012:user/dev"}))
}

/// What a scripted CLI run observed about the template file
#[derive(Debug, Clone)]
pub struct TemplateFileSeen {
    pub path: PathBuf,
    pub existed: bool,
    pub content: String,
}

/// Stands in for the `aws` binary
#[derive(Clone)]
pub struct ScriptedRunner {
    output: CommandOutput,
    pub calls: Rc<RefCell<Vec<Vec<String>>>>,
    pub template_files: Rc<RefCell<Vec<TemplateFileSeen>>>,
}

impl ScriptedRunner {
    pub fn new(code: i32, stdout: &str, stderr: &str) -> Self {
        Self {
            output: CommandOutput {
                code: Some(code),
                stdout: stdout.into(),
                stderr: stderr.into(),
            },
            calls: Rc::default(),
            template_files: Rc::default(),
        }
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, _program: &str, args: &[String]) -> io::Result<CommandOutput> {
        for arg in args {
            if let Some(path) = arg.strip_prefix("--template-body=file://") {
                let path = PathBuf::from(path);
                self.template_files.borrow_mut().push(TemplateFileSeen {
                    existed: path.exists(),
                    content: std::fs::read_to_string(&path).unwrap_or_default(),
                    path,
                });
            }
        }
        self.calls.borrow_mut().push(args.to_vec());
        Ok(self.output.clone())
    }
}
