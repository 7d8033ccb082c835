//! Output formatting for human and JSON modes

use drivefs_core::domain::StorageAttributes;
use serde_json::{json, Value};

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Trait for formatting CLI output
pub trait OutputFormatter {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn info(&self, message: &str);
    /// One listing or stat record
    fn entry(&self, attributes: &StorageAttributes);
    fn print_json(&self, value: &Value);
}

/// Human-readable output, one line per record
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn success(&self, message: &str) {
        println!("\u{2713} {}", message);
    }
    fn error(&self, message: &str) {
        eprintln!("\u{2717} Error: {}", message);
    }
    fn info(&self, message: &str) {
        println!("  {}", message);
    }
    fn entry(&self, attributes: &StorageAttributes) {
        println!("{}", human_line(attributes));
    }
    fn print_json(&self, _value: &Value) {
        // Human formatter doesn't print JSON
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn success(&self, message: &str) {
        println!("{}", json!({"success": true, "message": message}));
    }
    fn error(&self, message: &str) {
        eprintln!("{}", json!({"success": false, "error": message}));
    }
    fn info(&self, _message: &str) {}
    fn entry(&self, attributes: &StorageAttributes) {
        println!("{}", serde_json::to_string(attributes).unwrap_or_default());
    }
    fn print_json(&self, value: &Value) {
        println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Human => Box::new(HumanFormatter),
    }
}

/// `d  -           2026-01-15 10:00  docs/` style line
pub fn human_line(attributes: &StorageAttributes) -> String {
    let modified = attributes
        .last_modified()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".repeat(16));

    match attributes {
        StorageAttributes::Directory(dir) => {
            format!("d  {:>10}  {}  {}/", "-", modified, dir.path)
        }
        StorageAttributes::File(file) => {
            let size = file
                .file_size
                .map(format_size)
                .unwrap_or_else(|| "-".to_string());
            format!("-  {:>10}  {}  {}", size, modified, file.path)
        }
    }
}

/// Formats a byte count with binary units
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
