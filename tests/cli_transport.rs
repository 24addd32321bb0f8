//! AWS CLI transport behaviour against a scripted `aws` binary

mod common;

use common::{ScriptedRunner, ScriptedTransport};
use polgen::aws::{AwsExecutor, CliTransport, OperationRequest};
use polgen::bootstrap::render_template;
use polgen::core::error::{AwsCommandError, PolgenError};
use proptest::prelude::*;
use serde_json::json;

fn cli_executor(runner: &ScriptedRunner) -> AwsExecutor {
    AwsExecutor::new(Box::new(CliTransport::new("aws", Box::new(runner.clone()))))
}

fn create_request(body: &str) -> OperationRequest {
    OperationRequest::new("cloudformation", "create_stack")
        .arg("StackName", "PolGenBootstrapabc123")
        .arg("TemplateBody", body)
        .arg("Capabilities", ["CAPABILITY_IAM"])
}

#[test]
fn test_template_body_goes_through_removed_file_on_success() {
    let runner = ScriptedRunner::new(0, r#"{"StackId": "arn:stack/PolGenBootstrapabc123/1"}"#, "");
    let body = render_template("abc123");

    let out = cli_executor(&runner).run(&create_request(&body)).unwrap();
    assert_eq!(out["StackId"], "arn:stack/PolGenBootstrapabc123/1");

    let seen = runner.template_files.borrow();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].existed);
    assert_eq!(seen[0].content, body);
    assert!(!seen[0].path.exists());

    let args = &runner.calls.borrow()[0];
    assert!(!args.iter().any(|a| a.contains("AWSTemplateFormatVersion")));
    assert!(args.contains(&"--capabilities=CAPABILITY_IAM".to_string()));
    assert_eq!(args.last().map(String::as_str), Some("--output=json"));
}

#[test]
fn test_template_file_removed_on_failure() {
    let runner = ScriptedRunner::new(
        254,
        "",
        "An error occurred (AccessDenied) when calling the CreateStack operation: User is not authorized",
    );

    let err = cli_executor(&runner).run(&create_request("{}")).unwrap_err();
    let aws = err.as_aws().expect("normalized error");
    assert_eq!(aws.code, "AccessDenied");
    assert_eq!(aws.detail, "User is not authorized");

    let seen = runner.template_files.borrow();
    assert!(seen[0].existed);
    assert!(!seen[0].path.exists());
}

#[test]
fn test_unrecognized_stderr_is_not_normalized() {
    let runner = ScriptedRunner::new(255, "", "Could not connect to the endpoint URL: \"https://cloudformation.eu-central-1.amazonaws.com/\"");
    let err = cli_executor(&runner)
        .run(&OperationRequest::new("cloudformation", "describe_stacks"))
        .unwrap_err();
    assert!(err.as_aws().is_none());
    assert!(matches!(err, PolgenError::CommandFailed { code: Some(255), .. }));
}

#[test]
fn test_results_match_structured_transport() {
    let result = json!({
        "Stacks": [common::stack_json("PolGenBootstrapabc123", "CREATE_COMPLETE")]
    });
    let runner = ScriptedRunner::new(0, &serde_json::to_string_pretty(&result).unwrap(), "");
    let scripted = ScriptedTransport::new();
    scripted.reply("describe_stacks", Ok(result));

    let request = OperationRequest::new("cloudformation", "describe_stacks")
        .arg("StackName", "PolGenBootstrapabc123");
    let via_cli = cli_executor(&runner).run(&request).unwrap();
    let via_client = scripted.executor().run(&request).unwrap();
    assert_eq!(via_cli, via_client);
    assert_eq!(
        runner.calls.borrow()[0],
        vec![
            "cloudformation",
            "describe-stacks",
            "--stack-name=PolGenBootstrapabc123",
            "--output=json"
        ]
    );
}

proptest! {
    #[test]
    fn errors_match_structured_transport(
        code in "[A-Z][A-Za-z]{2,20}",
        detail in "[A-Za-z0-9 .,:'-]{0,60}",
        op in "[A-Z][a-z]{2,8}[A-Z][a-z]{2,8}",
    ) {
        let stderr = format!("An error occurred ({code}) when calling the {op} operation: {detail}");
        let runner = ScriptedRunner::new(254, "", &stderr);
        let scripted = ScriptedTransport::new();
        scripted.reply("describe_stacks", Err(AwsCommandError::provider(&op, &code, &detail)));

        let request = OperationRequest::new("cloudformation", "describe_stacks");
        let via_cli = cli_executor(&runner).run(&request).unwrap_err();
        let via_client = scripted.executor().run(&request).unwrap_err();

        let (cli, client) = (via_cli.as_aws().unwrap(), via_client.as_aws().unwrap());
        prop_assert_eq!(&cli.code, &code);
        prop_assert_eq!(&cli.detail, detail.trim_end());
        prop_assert_eq!(&cli.code, &client.code);
        prop_assert_eq!(cli.detail.as_str(), client.detail.trim_end());
    }

    #[test]
    fn list_arguments_are_comma_joined(items in prop::collection::vec("[A-Z_]{1,12}", 1..5)) {
        let runner = ScriptedRunner::new(0, "{}", "");
        let request = OperationRequest::new("cloudformation", "update_stack")
            .arg("Capabilities", items.clone());
        cli_executor(&runner).run(&request).unwrap();
        let expected = format!("--capabilities={}", items.join(","));
        prop_assert!(runner.calls.borrow()[0].contains(&expected));
    }
}
