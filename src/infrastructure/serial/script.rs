// Script transfer framing shared by execute and upload
use crate::core::communication::Transport;
use crate::domain::error::{CrowComError, CrowComResult};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Opens script reception on the device.
pub const START_SCRIPT: &str = "^^s";
/// Ends reception and runs the received script.
pub const END_EXECUTE: &str = "^^e";
/// Ends reception and stores the received script in flash.
pub const END_WRITE: &str = "^^w";

/// Largest write the device's receive buffer accepts comfortably.
pub const CHUNK_SIZE: usize = 64;
/// Device-side script buffer.
pub const MAX_SCRIPT_BYTES: usize = 8 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptMode {
    Execute,
    Upload,
}

impl ScriptMode {
    fn end_marker(self) -> &'static str {
        match self {
            ScriptMode::Execute => END_EXECUTE,
            ScriptMode::Upload => END_WRITE,
        }
    }

    fn verb(self) -> &'static str {
        match self {
            ScriptMode::Execute => "Executing",
            ScriptMode::Upload => "Uploading",
        }
    }
}

/// Pauses the device needs around a transfer.
#[derive(Debug, Clone, Copy)]
pub struct ScriptTiming {
    /// After the start marker and before the end marker
    pub settle: Duration,
    /// Between consecutive chunks
    pub chunk_delay: Duration,
}

impl Default for ScriptTiming {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(200),
            chunk_delay: Duration::from_millis(1),
        }
    }
}

impl ScriptTiming {
    pub fn immediate() -> Self {
        Self {
            settle: Duration::ZERO,
            chunk_delay: Duration::ZERO,
        }
    }
}

/// Read a script from disk and check that the device can hold it.
pub async fn load_script(path: &Path) -> CrowComResult<String> {
    let source = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CrowComError::Script {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if source.len() > MAX_SCRIPT_BYTES {
        return Err(CrowComError::Script {
            path: path.to_path_buf(),
            message: format!(
                "script is {} bytes, device accepts at most {}",
                source.len(),
                MAX_SCRIPT_BYTES
            ),
        });
    }

    Ok(source)
}

/// Split `source` into pieces of at most [`CHUNK_SIZE`] bytes without
/// breaking a UTF-8 sequence.
pub fn chunks(source: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = source;

    while !rest.is_empty() {
        let mut end = rest.len().min(CHUNK_SIZE);
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        let (piece, tail) = rest.split_at(end);
        pieces.push(piece);
        rest = tail;
    }

    pieces
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Send a script file through `transport` framed for `mode`.
pub async fn send_script<T>(
    transport: &T,
    path: &Path,
    mode: ScriptMode,
    timing: ScriptTiming,
) -> CrowComResult<()>
where
    T: Transport + ?Sized,
{
    let source = load_script(path).await?;
    info!("{} {} ({} bytes)", mode.verb(), path.display(), source.len());

    transport.writeline(START_SCRIPT).await?;
    pause(timing.settle).await;

    for piece in chunks(&source) {
        transport.write(piece).await?;
        pause(timing.chunk_delay).await;
    }

    pause(timing.settle).await;
    transport.writeline(mode.end_marker()).await?;
    debug!("{} {} finished", mode.verb(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::communication::{MockTransport, TransportCall};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn script_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_chunks_respect_size() {
        let source = "x".repeat(150);
        let pieces = chunks(&source);
        assert_eq!(pieces.iter().map(|p| p.len()).collect::<Vec<_>>(), vec![64, 64, 22]);
        assert_eq!(pieces.concat(), source);
    }

    #[test]
    fn test_chunks_keep_characters_whole() {
        let source = format!("{}é{}", "a".repeat(63), "b".repeat(10));
        let pieces = chunks(&source);
        assert_eq!(pieces[0].len(), 63);
        assert!(pieces[1].starts_with('é'));
        assert_eq!(pieces.concat(), source);
    }

    #[test]
    fn test_empty_script_has_no_chunks() {
        assert!(chunks("").is_empty());
    }

    #[tokio::test]
    async fn test_execute_framing() {
        let file = script_file("print('hi')\n");
        let transport = MockTransport::connected();

        send_script(&transport, file.path(), ScriptMode::Execute, ScriptTiming::immediate())
            .await
            .unwrap();

        assert_eq!(
            transport.calls(),
            vec![
                TransportCall::WriteLine("^^s".to_string()),
                TransportCall::Write("print('hi')\n".to_string()),
                TransportCall::WriteLine("^^e".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_upload_ends_with_write_marker() {
        let file = script_file(&"-- comment\n".repeat(10));
        let transport = MockTransport::connected();

        send_script(&transport, file.path(), ScriptMode::Upload, ScriptTiming::immediate())
            .await
            .unwrap();

        let calls = transport.calls();
        assert_eq!(calls.first(), Some(&TransportCall::WriteLine("^^s".to_string())));
        assert_eq!(calls.last(), Some(&TransportCall::WriteLine("^^w".to_string())));
        assert_eq!(calls.len(), 2 + 2);
    }

    #[tokio::test]
    async fn test_missing_script_sends_nothing() {
        let transport = MockTransport::connected();
        let err = send_script(
            &transport,
            Path::new("/no/such/file.lua"),
            ScriptMode::Execute,
            ScriptTiming::immediate(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CrowComError::Script { .. }));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_script_is_rejected() {
        let file = script_file(&"x".repeat(MAX_SCRIPT_BYTES + 1));
        let transport = MockTransport::connected();

        let result = send_script(&transport, file.path(), ScriptMode::Upload, ScriptTiming::immediate()).await;
        assert!(result.is_err());
        assert!(transport.calls().is_empty());
    }
}
