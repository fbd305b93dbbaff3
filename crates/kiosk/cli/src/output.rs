//! Output formatting

use crate::error::CliResult;
use crate::scenario::Report;

/// Output format for scenario reports
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human readable text
    #[default]
    Text,
    /// JSON document
    Json,
}

pub fn print_report(report: &Report, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Text => print!("{}", render_text(report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}

fn render_text(report: &Report) -> String {
    let mut out = String::new();
    out.push_str(&format!("scenario: {}\n", report.scenario));
    out.push_str(&format!("state: {}\n", report.state));
    out.push_str(&format!("device owner: {}\n", report.device_owner));
    out.push_str(&format!("lock task mode: {}\n", report.device.lock_task_mode));

    if !report.steps.is_empty() {
        out.push_str("steps:\n");
        for step in &report.steps {
            match step.result {
                Some(result) => out.push_str(&format!(
                    "  {} -> {} (active: {})\n",
                    step.operation, result, step.active
                )),
                None => out.push_str(&format!(
                    "  {} (active: {})\n",
                    step.operation, step.active
                )),
            }
        }
    }

    out.push_str(&format!("calls ({}):\n", report.calls.len()));
    for call in &report.calls {
        out.push_str(&format!("  {}\n", call.kind()));
    }

    out.push_str(&format!(
        "events ({} delivered, {} dropped):\n",
        report.relay.delivered, report.relay.dropped
    ));
    for event in &report.events {
        out.push_str(&format!("  {}\n", event));
    }
    out
}
