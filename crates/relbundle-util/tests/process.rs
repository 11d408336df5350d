use relbundle_util::errors::ReleaseError;
use relbundle_util::process::CommandBuilder;

#[test]
fn test_builder_simple_command() {
    let output = CommandBuilder::new("echo").arg("hello").exec().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "hello");
}

#[test]
fn test_builder_with_env() {
    let output = CommandBuilder::new("sh")
        .arg("-c")
        .arg("echo $MY_TEST_VAR")
        .env("MY_TEST_VAR", "relbundle_test_value")
        .exec()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "relbundle_test_value");
}

#[test]
fn test_builder_passes_args_in_order() {
    let output = CommandBuilder::new("echo")
        .args(["--batch", "--armor"])
        .arg("x")
        .exec()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "--batch --armor x");
}

#[test]
fn test_builder_nonexistent_program() {
    let result = CommandBuilder::new("nonexistent_program_xyz_123").exec();
    assert!(result.is_err());
}

#[cfg(unix)]
#[test]
fn test_exec_checked_reports_stderr_on_failure() {
    let err = CommandBuilder::new("sh")
        .args(["-c", "echo boom >&2; exit 3"])
        .exec_checked()
        .unwrap_err();
    assert!(matches!(err, ReleaseError::Signing { .. }));
    assert!(err.to_string().contains("boom"), "got: {err}");
}

#[test]
fn test_exec_checked_missing_program_is_signing_error() {
    let err = CommandBuilder::new("nonexistent_program_xyz_123")
        .exec_checked()
        .unwrap_err();
    assert!(matches!(err, ReleaseError::Signing { .. }));
}
