use crate::cli::args::OutputFormat;
use crate::core::communication::Sink;
use crate::infrastructure::serial::PortSummary;
use std::io::{self, Write};
use tabled::{Table, Tabled};

/// Output writer trait for different formats
pub trait OutputWriter {
    fn write_ports(&self, ports: &[PortSummary]) -> Result<(), OutputError>;
}

/// Output formatting errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl From<OutputError> for crate::domain::error::CrowComError {
    fn from(err: OutputError) -> Self {
        Self::Output(err.to_string())
    }
}

/// Console output writer
pub struct ConsoleWriter {
    format: OutputFormat,
}

impl ConsoleWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render `ports` in this writer's format.
    pub fn format_ports(&self, ports: &[PortSummary]) -> Result<String, OutputError> {
        let text = match self.format {
            OutputFormat::Text => {
                if ports.is_empty() {
                    return Ok("No serial ports found".to_string());
                }
                ports
                    .iter()
                    .map(|port| {
                        let marker = if port.matches { "*" } else { " " };
                        match port.product.as_deref() {
                            Some(product) => format!("{} {} ({}, {})", marker, port.name, port.kind, product),
                            None => format!("{} {} ({})", marker, port.name, port.kind),
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            OutputFormat::Json => serde_json::to_string_pretty(ports)?,
            OutputFormat::Table => {
                let rows: Vec<PortTableRow> = ports.iter().map(PortTableRow::from).collect();
                Table::new(rows).to_string()
            }
        };
        Ok(text)
    }
}

impl OutputWriter for ConsoleWriter {
    fn write_ports(&self, ports: &[PortSummary]) -> Result<(), OutputError> {
        println!("{}", self.format_ports(ports)?);
        Ok(())
    }
}

/// Table row for a serial port
#[derive(Tabled)]
struct PortTableRow {
    port: String,
    kind: String,
    #[tabled(rename = "usb id")]
    usb_id: String,
    product: String,
    crow: String,
}

impl From<&PortSummary> for PortTableRow {
    fn from(port: &PortSummary) -> Self {
        Self {
            port: port.name.clone(),
            kind: port.kind.clone(),
            usb_id: match (port.vid, port.pid) {
                (Some(vid), Some(pid)) => format!("{:04x}:{:04x}", vid, pid),
                _ => "-".to_string(),
            },
            product: port.product.clone().unwrap_or_else(|| "-".to_string()),
            crow: if port.matches { "yes" } else { "" }.to_string(),
        }
    }
}

/// Sink printing device output straight to stdout, for the one-shot commands.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl Sink for ConsoleSink {
    fn show(&self, text: &str) {
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ports() -> Vec<PortSummary> {
        vec![
            PortSummary {
                name: "/dev/ttyACM0".to_string(),
                kind: "usb".to_string(),
                vid: Some(0x0483),
                pid: Some(0x5740),
                product: Some("crow: telephone line".to_string()),
                matches: true,
            },
            PortSummary {
                name: "/dev/ttyS0".to_string(),
                kind: "unknown".to_string(),
                vid: None,
                pid: None,
                product: None,
                matches: false,
            },
        ]
    }

    #[test]
    fn test_text_marks_matching_ports() {
        let text = ConsoleWriter::new(OutputFormat::Text).format_ports(&ports()).unwrap();
        assert_eq!(
            text,
            "* /dev/ttyACM0 (usb, crow: telephone line)\n  /dev/ttyS0 (unknown)"
        );
    }

    #[test]
    fn test_json_output_is_parseable() {
        let text = ConsoleWriter::new(OutputFormat::Json).format_ports(&ports()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["name"], "/dev/ttyACM0");
        assert_eq!(value[0]["matches"], true);
        assert_eq!(value[1]["vid"], serde_json::Value::Null);
    }

    #[test]
    fn test_table_output() {
        let text = ConsoleWriter::new(OutputFormat::Table).format_ports(&ports()).unwrap();
        assert!(text.contains("usb id"));
        assert!(text.contains("0483:5740"));
        assert!(text.contains("/dev/ttyS0"));
    }

    #[test]
    fn test_no_ports() {
        let text = ConsoleWriter::new(OutputFormat::Text).format_ports(&[]).unwrap();
        assert_eq!(text, "No serial ports found");
    }
}
