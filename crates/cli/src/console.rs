//! Text rendering for the terminal.

use std::fmt::Write as _;

use wms_inventory::LocationRef;
use wms_opname::{Level, Notification, Notifier, OpnameSnapshot};

/// Prints notifications to stdout as they happen.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        println!("{}", format_notification(&notification));
    }
}

pub fn format_notification(n: &Notification) -> String {
    let tag = match n.level {
        Level::Info => "info",
        Level::Success => " ok ",
        Level::Error => "FAIL",
    };
    format!("[{tag}] {}", n.message)
}

pub fn render_snapshot(s: &OpnameSnapshot) -> String {
    let mut out = String::new();
    let dash = "-".to_string();

    let product = s.product.as_ref().map(|p| p.label()).unwrap_or_else(|| dash.clone());
    let location = s.location.as_ref().map(|l| l.name.clone()).unwrap_or_else(|| dash.clone());
    let physical = s.physical_count.map(|c| c.to_string()).unwrap_or_else(|| dash.clone());
    let variance = s.variance.map(|v| format!("{v:+}")).unwrap_or(dash);

    let _ = writeln!(out, "  product  : {product}");
    let _ = writeln!(out, "  location : {location}");
    let _ = writeln!(out, "  system   : {}", s.system_count);
    let _ = writeln!(out, "  physical : {physical}");
    let _ = writeln!(out, "  variance : {variance}");
    if !s.reason.is_empty() {
        let _ = writeln!(out, "  reason   : {}", s.reason);
    }
    let _ = write!(
        out,
        "  [{:?}] submit {}",
        s.phase,
        if s.can_submit { "enabled" } else { "disabled" }
    );
    out
}

pub fn render_locations(locations: &[LocationRef]) -> String {
    if locations.is_empty() {
        return "  (no locations loaded)".to_string();
    }
    locations
        .iter()
        .map(|l| match l.remaining_capacity() {
            Some(left) => format!("  {:>4}  {}  ({left} free)", l.id, l.name),
            None => format!("  {:>4}  {}", l.id, l.name),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
