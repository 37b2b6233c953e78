// Output formatting for CLI

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde_json::{json, Value};
use tagscan::Extraction;

use super::config::OutputFormat;

/// Format and output data
pub struct OutputFormatter {
    format: OutputFormat,
    quiet: bool,
    cover_data: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, quiet: bool, cover_data: bool) -> Self {
        Self {
            format,
            quiet,
            cover_data,
        }
    }

    /// JSON document for one file. Cover bytes are left out unless asked for.
    pub fn document(&self, path: &Path, extraction: &Extraction) -> Result<Value> {
        let mut value = serde_json::to_value(extraction)?;
        if !self.cover_data {
            if let Some(picture) = value.pointer_mut("/record/picture").and_then(Value::as_object_mut) {
                picture.remove("data");
            }
        }
        if let Some(obj) = value.as_object_mut() {
            obj.insert("file".to_string(), json!(path.display().to_string()));
        }
        Ok(value)
    }

    /// Output one file's extraction
    pub fn output_extraction(&self, path: &Path, extraction: &Extraction, writer: &mut dyn Write) -> Result<()> {
        let document = self.document(path, extraction)?;
        match self.format {
            OutputFormat::Pretty => writeln!(writer, "{}", serde_json::to_string_pretty(&document)?)?,
            OutputFormat::Json => writeln!(writer, "{}", serde_json::to_string(&document)?)?,
            OutputFormat::Table => self.output_table(path, extraction, writer)?,
        }
        Ok(())
    }

    /// Output as table
    fn output_table(&self, path: &Path, extraction: &Extraction, writer: &mut dyn Write) -> Result<()> {
        let record = &extraction.record;
        let number = |n: Option<u32>| n.map(|n| n.to_string());
        let picture = record.picture().map(|p| {
            format!(
                "{}, {} bytes ({})",
                p.mime_type(),
                p.data().len(),
                p.picture_type().as_str()
            )
        });
        let rows: [(&str, Option<String>); 9] = [
            ("format", Some(extraction.format.to_string())),
            ("title", record.title().map(str::to_string)),
            ("artist", record.artist().map(str::to_string)),
            ("album", record.album().map(str::to_string)),
            ("album artist", record.album_artist().map(str::to_string)),
            ("year", record.year().map(str::to_string)),
            ("track", number(record.track_no())),
            ("disc", number(record.disc_no())),
            ("cover", picture),
        ];
        let width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0) + 1;

        writeln!(writer, "{}", path.display())?;
        writeln!(writer, "{}", "=".repeat(width + 30))?;
        for (key, value) in &rows {
            writeln!(
                writer,
                "{:<width$} {}",
                format!("{}:", key),
                value.as_deref().unwrap_or("(none)"),
                width = width
            )?;
        }
        for issue in &extraction.issues {
            writeln!(writer, "{:<width$} {}", "issue:", issue, width = width)?;
        }
        writeln!(writer, "{}", "=".repeat(width + 30))?;
        Ok(())
    }

    /// Print success message
    pub fn print_success(&self, message: &str) {
        if !self.quiet {
            println!("✓ {}", message);
        }
    }

    /// Print error message
    pub fn print_error(&self, message: &str) {
        eprintln!("✗ {}", message);
    }

    /// Print info message
    pub fn print_info(&self, message: &str) {
        if !self.quiet {
            println!("  {}", message);
        }
    }
}
