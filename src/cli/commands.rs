// CLI command implementations
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use tagscan::{detect_format, extract, ExtractOptions, Extraction};

use super::config::{Commands, Config};
use super::output::OutputFormatter;

/// Run the selected subcommand
pub fn run(config: &Config) -> Result<()> {
    let formatter = OutputFormatter::new(config.format, config.quiet, config.cover_data);
    let options = config.extract_options();

    match &config.command {
        Commands::Read { files, output } => command_read(files, output.as_deref(), &options, &formatter),
        Commands::Detect { files } => command_detect(files, &formatter),
        Commands::Batch { directory, pattern } => command_batch(directory, pattern, &options, &formatter),
        Commands::ExportCover { file, output } => {
            command_export_cover(file, output, &options, &formatter).map(|_| ())
        }
        Commands::Info { files } => command_info(files, &options, &formatter),
    }
}

fn load(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

fn extract_file(path: &Path, options: &ExtractOptions) -> Result<Extraction> {
    let buffer = load(path)?;
    let extraction = extract(&buffer, options);
    log::info!(
        "{}: {} tag, {} issue(s)",
        path.display(),
        extraction.format,
        extraction.issues.len()
    );
    Ok(extraction)
}

fn finish(failed: usize, total: usize) -> Result<()> {
    if failed > 0 {
        bail!("{} of {} file(s) could not be read", failed, total);
    }
    Ok(())
}

/// Read metadata from files
pub fn command_read(
    files: &[PathBuf],
    output: Option<&Path>,
    options: &ExtractOptions,
    formatter: &OutputFormatter,
) -> Result<()> {
    let mut writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };

    let mut failed = 0;
    for path in files {
        match extract_file(path, options) {
            Ok(extraction) => formatter.output_extraction(path, &extraction, &mut *writer)?,
            Err(e) => {
                formatter.print_error(&format!("{:#}", e));
                failed += 1;
            }
        }
    }
    writer.flush()?;

    if let Some(path) = output {
        formatter.print_success(&format!("Wrote {} record(s) to {}", files.len() - failed, path.display()));
    }
    finish(failed, files.len())
}

/// Detect the tag container of each file
pub fn command_detect(files: &[PathBuf], formatter: &OutputFormatter) -> Result<()> {
    let mut failed = 0;
    for path in files {
        match load(path) {
            Ok(buffer) => formatter.print_info(&format!("{}: {}", path.display(), detect_format(&buffer))),
            Err(e) => {
                formatter.print_error(&format!("{:#}", e));
                failed += 1;
            }
        }
    }
    finish(failed, files.len())
}

/// Glob pattern for a batch run. Bare names are searched recursively.
fn batch_pattern(directory: &Path, pattern: &str) -> String {
    if pattern.contains('*') || pattern.contains('?') {
        format!("{}/{}", directory.display(), pattern)
    } else {
        format!("{}/**/{}", directory.display(), pattern)
    }
}

/// Batch process directory
pub fn command_batch(
    directory: &Path,
    pattern: &str,
    options: &ExtractOptions,
    formatter: &OutputFormatter,
) -> Result<()> {
    if !directory.is_dir() {
        bail!("not a directory: {}", directory.display());
    }

    let glob_pattern = batch_pattern(directory, pattern);
    let mut files = Vec::new();
    for entry in glob::glob(&glob_pattern).with_context(|| format!("invalid glob pattern: {}", glob_pattern))? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => log::warn!("skipping unreadable entry: {}", e),
        }
    }

    if files.is_empty() {
        formatter.print_info(&format!("No files matching {}", glob_pattern));
        return Ok(());
    }
    formatter.print_info(&format!("Found {} file(s)", files.len()));

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    let mut failed = 0;
    let mut tagged = 0;
    for path in &files {
        match extract_file(path, options) {
            Ok(extraction) => {
                if !extraction.record.is_empty() {
                    tagged += 1;
                }
                formatter.output_extraction(path, &extraction, &mut writer)?;
            }
            Err(e) => {
                formatter.print_error(&format!("{:#}", e));
                failed += 1;
            }
        }
    }
    writer.flush()?;
    drop(writer);

    formatter.print_success(&format!(
        "Processed {} file(s): {} tagged, {} failed",
        files.len(),
        tagged,
        failed
    ));
    finish(failed, files.len())
}

/// Export cover art
pub fn command_export_cover(
    file: &Path,
    output_dir: &Path,
    options: &ExtractOptions,
    formatter: &OutputFormatter,
) -> Result<PathBuf> {
    let extraction = extract_file(file, options)?;
    let picture = match extraction.record.into_picture() {
        Some(picture) => picture,
        None => bail!("no cover art in {}", file.display()),
    };

    fs::create_dir_all(output_dir).with_context(|| format!("failed to create {}", output_dir.display()))?;
    let stem = file.file_stem().and_then(|s| s.to_str()).unwrap_or("cover");
    let target = output_dir.join(format!("{}.{}", stem, picture.extension()));
    fs::write(&target, picture.data()).with_context(|| format!("failed to write {}", target.display()))?;

    formatter.print_success(&format!(
        "Exported {} ({} bytes) to {}",
        picture.mime_type(),
        picture.data().len(),
        target.display()
    ));
    Ok(target)
}

/// Show file information and parser diagnostics
pub fn command_info(files: &[PathBuf], options: &ExtractOptions, formatter: &OutputFormatter) -> Result<()> {
    let mut failed = 0;
    for path in files {
        let meta = match fs::metadata(path) {
            Ok(meta) => meta,
            Err(e) => {
                formatter.print_error(&format!("{}: {}", path.display(), e));
                failed += 1;
                continue;
            }
        };
        let extraction = match extract_file(path, options) {
            Ok(extraction) => extraction,
            Err(e) => {
                formatter.print_error(&format!("{:#}", e));
                failed += 1;
                continue;
            }
        };

        let modified = meta
            .modified()
            .map(|time| DateTime::<Utc>::from(time).format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|_| "N/A".to_string());

        println!("File: {}", path.display());
        println!("  Size: {} bytes", meta.len());
        println!("  Modified: {}", modified);
        println!("  Container: {}", extraction.format);
        println!("  Fields: {}", if extraction.record.is_empty() { "none" } else { "present" });
        if extraction.issues.is_empty() {
            println!("  Issues: none");
        } else {
            println!("  Issues:");
            for issue in &extraction.issues {
                println!("    - {}", issue);
            }
        }
    }
    finish(failed, files.len())
}
