use std::process::Command;
use std::str;

/// CLI interface tests
#[cfg(test)]
mod cli_tests {
    use super::*;

    fn crowcom() -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_crowcom"));
        // keep log files out of the user's cache directory
        let logs = std::env::temp_dir().join("crowcom-cli-tests.log");
        let config = std::env::temp_dir().join("crowcom-cli-tests.toml");
        std::fs::write(&config, format!("[logging]\nfile = {:?}\n", logs)).expect("write config");
        command.arg("--config").arg(config);
        command
    }

    #[test]
    fn test_cli_help() {
        let output = crowcom().arg("--help").output().expect("Failed to execute command");
        let stdout = str::from_utf8(&output.stdout).expect("Invalid UTF-8");

        assert!(output.status.success());
        assert!(stdout.contains("Usage:"));
        assert!(stdout.contains("Commands:"));
        assert!(stdout.contains("repl"));
        assert!(stdout.contains("list"));
        assert!(stdout.contains("run"));
        assert!(stdout.contains("upload"));
        assert!(stdout.contains("--port"));
    }

    #[test]
    fn test_cli_version() {
        let output = crowcom().arg("--version").output().expect("Failed to execute command");
        let stdout = str::from_utf8(&output.stdout).expect("Invalid UTF-8");
        assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_cli_upload_help() {
        let output = crowcom()
            .args(["upload", "--help"])
            .output()
            .expect("Failed to execute command");
        let stdout = str::from_utf8(&output.stdout).expect("Invalid UTF-8");
        assert!(stdout.contains("--listen"));
    }

    #[test]
    fn test_missing_device_exits_with_one() {
        let output = crowcom()
            .args(["--port", "/dev/crowcom-missing-device"])
            .output()
            .expect("Failed to execute command");
        let stderr = str::from_utf8(&output.stderr).expect("Invalid UTF-8");

        assert_eq!(output.status.code(), Some(1));
        assert!(stderr.contains("Device not found"));
        assert!(!str::from_utf8(&output.stdout).unwrap().contains("bye."));
    }

    #[test]
    fn test_invalid_output_format() {
        let output = crowcom()
            .args(["list", "--output", "xml"])
            .output()
            .expect("Failed to execute command");
        assert!(!output.status.success());
    }
}
