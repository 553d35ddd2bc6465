//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::fmt::Display;
use std::io::Write;

use ops_endpoints::EndpointRow;
use ops_workflow::BatchReport;
use serde::Serialize;

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }

    /// Write a serializable value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TableDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// Sorted endpoint listing.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct EndpointTable {
    /// Rows, already sorted by name.
    pub rows: Vec<EndpointRow>,
}

impl EndpointTable {
    /// Wraps sorted rows.
    #[must_use]
    pub const fn new(rows: Vec<EndpointRow>) -> Self {
        Self { rows }
    }
}

impl TableDisplay for EndpointTable {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "{:<50}{:<50}{:<20}", "Name", "IP Addresses", "Ports")?;
        for row in &self.rows {
            writeln!(
                writer,
                "{:<50}{:<50}{:<20}",
                row.name,
                bracketed(&row.ips),
                bracketed(&row.ports)
            )?;
        }
        Ok(())
    }
}

/// `[a, b]`, or an empty string for an empty list.
fn bracketed<T: Display>(items: &[T]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let joined = items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{joined}]")
}

impl TableDisplay for BatchReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Workflow Test: {}", self.scenario)?;
        writeln!(writer, "══════════════════════════════════")?;
        writeln!(writer, "Run ID:      {}", self.run_id)?;
        writeln!(writer, "Workplaces:  {}", self.workplaces)?;
        writeln!(writer, "Issued:      {}", self.issued)?;
        writeln!(writer, "Succeeded:   {}", self.succeeded)?;
        writeln!(writer, "Failed:      {}", self.failed)?;

        if !self.failures.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "Failures")?;
            for outcome in &self.failures {
                let request = outcome.request();
                let reason = outcome
                    .failure()
                    .map_or("unknown", |failure| failure.reason.as_str());
                writeln!(
                    writer,
                    "  #{:<5} {} in {}: {}",
                    request.sequence(),
                    request.workflow_id(),
                    request.workplace(),
                    reason
                )?;
            }
        }
        Ok(())
    }
}
