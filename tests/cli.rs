use assert_cmd::cargo::cargo_bin_cmd;
use polgen::bootstrap::derive_postfix;
use serde_json::Value;
use tempfile::TempDir;

#[test]
fn test_template_command_prints_valid_template() {
    let dir = TempDir::new().expect("create temp dir");
    let mut cmd = cargo_bin_cmd!("polgen");
    let out = cmd
        .current_dir(dir.path())
        .args(["template", "--repo", "acme/policy-wiki", "--branch", "dev"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let doc: Value = serde_json::from_slice(&out).expect("valid json template");
    let postfix = derive_postfix("acme/policy-wiki/dev");
    assert_eq!(
        doc["Resources"]["S3Bucket"]["Properties"]["BucketName"]["Fn::Sub"],
        format!("state-{postfix}")
    );
}

#[test]
fn test_template_rejects_bad_repo_name() {
    let dir = TempDir::new().expect("create temp dir");
    let mut cmd = cargo_bin_cmd!("polgen");
    cmd.current_dir(dir.path())
        .args(["template", "--repo", "policy-wiki"])
        .assert()
        .failure();
}

#[test]
fn test_bad_config_fails_fast() {
    let dir = TempDir::new().expect("create temp dir");
    std::fs::write(dir.path().join("polgen.toml"), "max_poll_attempts = 0\n").expect("write config");
    let mut cmd = cargo_bin_cmd!("polgen");
    cmd.current_dir(dir.path())
        .args(["template", "--repo", "acme/policy-wiki"])
        .assert()
        .failure();
}

#[test]
fn test_init_with_forced_missing_cli_fails() {
    let dir = TempDir::new().expect("create temp dir");
    std::fs::write(
        dir.path().join("polgen.toml"),
        "aws_program = \"polgen-test-no-such-aws-binary\"\n",
    )
    .expect("write config");
    let mut cmd = cargo_bin_cmd!("polgen");
    let out = cmd
        .current_dir(dir.path())
        .args(["init", "--repo", "acme/policy-wiki", "--branch", "main", "--transport", "cli"])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    assert!(String::from_utf8_lossy(&out).contains("AWS CLI"));
}

#[cfg(not(feature = "sdk"))]
#[test]
fn test_init_without_any_aws_interface_fails() {
    let dir = TempDir::new().expect("create temp dir");
    std::fs::write(
        dir.path().join("polgen.toml"),
        "aws_program = \"polgen-test-no-such-aws-binary\"\n",
    )
    .expect("write config");
    let mut cmd = cargo_bin_cmd!("polgen");
    let out = cmd
        .current_dir(dir.path())
        .args(["init", "--repo", "acme/policy-wiki", "--branch", "main"])
        .assert()
        .failure()
        .get_output()
        .clone();
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("AWS CLI"));
    assert!(stderr.contains("sdk"));
    assert!(!String::from_utf8_lossy(&out.stdout).contains("PolGen init done."));
}
