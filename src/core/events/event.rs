use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker that opens a structured record in device output.
pub const EVENT_PREFIX: &str = "^^";

/// Structured notification kinds the console reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Periodic reading of an input in stream mode
    Stream,
    /// Threshold crossing of an input in change mode
    Change,
}

impl EventKind {
    pub const ALL: [EventKind; 2] = [EventKind::Stream, EventKind::Change];

    pub fn name(self) -> &'static str {
        match self {
            EventKind::Stream => "stream",
            EventKind::Change => "change",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "stream" => Some(EventKind::Stream),
            "change" => Some(EventKind::Change),
            _ => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Payload of a structured record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventArgs {
    /// Device input number
    pub index: u32,
    /// Reading reported for that input
    pub value: f64,
}

/// One complete line of device output, classified.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    Stream { index: u32, value: f64 },
    Change { index: u32, value: f64 },
    RawLine(String),
}

impl DeviceEvent {
    /// Classify a complete line (terminator already removed).
    ///
    /// Recognized shapes are `^^stream(<index>,<value>)` and
    /// `^^change(<index>,<value>)`; everything else is plain text.
    pub fn classify(line: &str) -> Self {
        match parse_record(line) {
            Some((EventKind::Stream, args)) => DeviceEvent::Stream {
                index: args.index,
                value: args.value,
            },
            Some((EventKind::Change, args)) => DeviceEvent::Change {
                index: args.index,
                value: args.value,
            },
            None => DeviceEvent::RawLine(line.to_string()),
        }
    }

    pub fn kind(&self) -> Option<EventKind> {
        match self {
            DeviceEvent::Stream { .. } => Some(EventKind::Stream),
            DeviceEvent::Change { .. } => Some(EventKind::Change),
            DeviceEvent::RawLine(_) => None,
        }
    }

    pub fn args(&self) -> Option<EventArgs> {
        match *self {
            DeviceEvent::Stream { index, value } | DeviceEvent::Change { index, value } => {
                Some(EventArgs { index, value })
            }
            DeviceEvent::RawLine(_) => None,
        }
    }
}

fn parse_record(line: &str) -> Option<(EventKind, EventArgs)> {
    let body = line.trim().strip_prefix(EVENT_PREFIX)?;
    let (name, rest) = body.split_once('(')?;
    let kind = EventKind::from_name(name)?;
    let fields = rest.strip_suffix(')')?;

    let mut parts = fields.split(',');
    let index = parts.next()?.trim().parse::<u32>().ok()?;
    let value = parts.next()?.trim().parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }

    Some((kind, EventArgs { index, value }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_record() {
        assert_eq!(
            DeviceEvent::classify("^^stream(1,0.25)"),
            DeviceEvent::Stream { index: 1, value: 0.25 }
        );
    }

    #[test]
    fn test_change_record_with_integer_value() {
        assert_eq!(
            DeviceEvent::classify("^^change(2,1)"),
            DeviceEvent::Change { index: 2, value: 1.0 }
        );
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(
            DeviceEvent::classify("  ^^stream( 2 , -3.5 )\r"),
            DeviceEvent::Stream { index: 2, value: -3.5 }
        );
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(
            DeviceEvent::classify("hello from lua"),
            DeviceEvent::RawLine("hello from lua".to_string())
        );
    }

    #[test]
    fn test_unknown_and_malformed_records_are_plain_text() {
        for line in [
            "^^ready()",
            "^^identity(0x1234)",
            "^^stream(1)",
            "^^stream(1,2,3)",
            "^^stream(a,2)",
            "^^change(1,high)",
            "^^change(1,2",
            "stream(1,2)",
        ] {
            assert_eq!(DeviceEvent::classify(line), DeviceEvent::RawLine(line.to_string()));
        }
    }

    #[test]
    fn test_kind_and_args() {
        let event = DeviceEvent::classify("^^change(1,0)");
        assert_eq!(event.kind(), Some(EventKind::Change));
        assert_eq!(event.args(), Some(EventArgs { index: 1, value: 0.0 }));

        let raw = DeviceEvent::classify("text");
        assert_eq!(raw.kind(), None);
        assert_eq!(raw.args(), None);
    }

    #[test]
    fn test_kind_names() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(EventKind::Stream.to_string(), "stream");
    }
}
