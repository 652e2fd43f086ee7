use crowcom::core::communication::{MemorySink, MockTransport};
use crowcom::infrastructure::serial::{send_script, ScriptMode, ScriptTiming};
use crowcom::{CommandInterpreter, CrowComError, CrowComResult, Outcome, Transport};
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

/// Error handling and resilience tests
#[cfg(test)]
mod error_handling_tests {
    use super::*;

    #[test]
    fn test_error_types() {
        let errors = vec![
            CrowComError::DeviceNotFound { criteria: "usb 0483:5740".to_string() },
            CrowComError::NotConnected,
            CrowComError::Timeout(Duration::from_secs(2)),
            CrowComError::Config { message: "Config error".to_string() },
            CrowComError::Session { message: "Session error".to_string() },
            CrowComError::Script { path: PathBuf::from("a.lua"), message: "too big".to_string() },
            CrowComError::Tui("TUI error".to_string()),
            CrowComError::Output("Output error".to_string()),
        ];

        for error in errors {
            assert!(!error.to_string().is_empty(), "Error display should not be empty");
        }

        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<CrowComError>();
    }

    #[test]
    fn test_link_failures() {
        let io_error: CrowComError = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone").into();
        assert!(matches!(io_error, CrowComError::Io(_)));
        assert!(io_error.is_link_failure());
        assert!(CrowComError::NotConnected.is_link_failure());
        assert!(!CrowComError::Config { message: "x".to_string() }.is_link_failure());
        assert!(!CrowComError::Session { message: "x".to_string() }.is_link_failure());
    }

    #[test]
    fn test_error_chain() {
        let root_cause = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Access denied");
        let error: CrowComError = root_cause.into();

        let mut current_error: &dyn Error = &error;
        let mut depth = 0;
        while let Some(source) = current_error.source() {
            current_error = source;
            depth += 1;
            if depth > 10 {
                break;
            }
        }

        assert!(depth > 0, "Should have at least one source error");
        assert_eq!(current_error.to_string(), "Access denied");
    }

    #[test]
    fn test_error_formatting() {
        let error = CrowComError::Script {
            path: PathBuf::from("/tmp/sketch.lua"),
            message: "script is 9000 bytes, device accepts at most 8192".to_string(),
        };

        let display = format!("{}", error);
        let debug = format!("{:?}", error);

        assert_eq!(
            display,
            "Script error (/tmp/sketch.lua): script is 9000 bytes, device accepts at most 8192"
        );
        assert_ne!(display, debug);

        let missing = CrowComError::DeviceNotFound { criteria: "port /dev/ttyACM0".to_string() };
        assert!(missing.to_string().contains("port /dev/ttyACM0"));
    }

    #[tokio::test]
    async fn test_async_error_propagation() {
        async fn failing_async_function() -> CrowComResult<()> {
            Err(CrowComError::Timeout(Duration::from_millis(2000)))
        }

        async fn calling_function() -> CrowComResult<()> {
            failing_async_function().await?;
            Ok(())
        }

        let error = calling_function().await.unwrap_err();
        assert!(error.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_write_while_disconnected_is_a_command_fault() {
        let transport = MockTransport::new();
        let sink = MemorySink::new();
        let interpreter = CommandInterpreter::new("./sketch.lua");

        let error = interpreter
            .interpret("print(1)", &transport, &sink)
            .await
            .unwrap_err();
        assert!(matches!(error, CrowComError::NotConnected));

        // quit never needs the link
        let outcome = interpreter.interpret("q", &transport, &sink).await.unwrap();
        assert_eq!(outcome, Outcome::Terminate);
    }

    #[tokio::test]
    async fn test_missing_script_is_reported_not_sent() {
        let transport = MockTransport::connected();
        let path = PathBuf::from("/no/such/dir/sketch.lua");

        let error = send_script(&transport, &path, ScriptMode::Upload, ScriptTiming::immediate())
            .await
            .unwrap_err();
        assert!(matches!(error, CrowComError::Script { .. }));
        assert!(error.to_string().contains("/no/such/dir/sketch.lua"));
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn test_writes_recover_after_reconnect() {
        let transport = MockTransport::new();
        tokio_test::assert_err!(tokio_test::block_on(transport.write("x")));
        tokio_test::assert_ok!(tokio_test::block_on(transport.connect()));
        tokio_test::assert_ok!(tokio_test::block_on(transport.write("x")));
    }

    #[test]
    fn test_error_size() {
        let error_size = std::mem::size_of::<CrowComError>();
        assert!(error_size <= 128, "CrowComError too large: {} bytes", error_size);
    }
}
