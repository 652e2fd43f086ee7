use crate::core::communication::Sink;
use crate::core::events::{EventArgs, EventKind, HandlerRegistry};

use super::{pane::TextPane, state::CAPTURE_PANES};

/// Render an event value the way the device prints it: integral values
/// keep one decimal place.
pub fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

pub fn capture_text(args: &EventArgs) -> String {
    format!("\ninput[{}] = {}\n", args.index, format_value(args.value))
}

/// Handlers mirroring input 1 and input 2 into their capture panes.
///
/// Each pane is keyed to one input instead of mirroring every stream and
/// change event: the left pane only shows input 1 and the right pane only
/// input 2. Events for other indices are left to the output pane.
pub fn capture_handlers(panes: &[TextPane; CAPTURE_PANES]) -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();

    for (slot, pane) in panes.iter().enumerate() {
        let input = slot as u32 + 1;
        for kind in EventKind::ALL {
            let pane = pane.clone();
            registry.register(kind, move |_line, _kind, args| {
                if args.index == input {
                    pane.show(&capture_text(args));
                }
                Ok(())
            });
        }
    }

    registry
}
