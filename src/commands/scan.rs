use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::commands::Workspace;
use crate::logging;
use crate::scanner::{find_candidate_spans, Dialect};
use crate::text_index::TextIndex;

/// One hardcoded string found by `scan`
#[derive(Debug, Serialize)]
pub struct Finding {
    pub file: String,
    /// 1-based
    pub line: usize,
    /// 1-based, UTF-16 units
    pub column: usize,
    /// UTF-16 offsets into the file
    pub start: usize,
    pub end: usize,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct ScanResult {
    pub files_checked: usize,
    pub findings: Vec<Finding>,
}

/// Scan one document and report its spans with line/column positions
pub fn scan_source(content: &str, dialect: Dialect, file: &str) -> Vec<Finding> {
    let index = TextIndex::new(content);
    find_candidate_spans(content, dialect)
        .into_iter()
        .map(|span| {
            let position = index.position_of_utf16(span.start);
            Finding {
                file: file.to_string(),
                line: position.line + 1,
                column: position.column + 1,
                start: span.start,
                end: span.end,
                text: span.text,
            }
        })
        .collect()
}

/// Scan every file matched by `patterns` (relative to the workspace root)
pub fn scan_from_glob(
    workspace: &Workspace,
    patterns: &[String],
    dialect: Option<Dialect>,
) -> Result<ScanResult> {
    let mut result = ScanResult::default();

    for pattern in patterns {
        let full_pattern = workspace.resolve(Path::new(pattern));
        let full_pattern = full_pattern.to_string_lossy();
        let matches = glob::glob(&full_pattern)
            .with_context(|| format!("Invalid glob pattern: {}", pattern))?;

        for entry in matches {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    logging::warn(&format!("Glob error: {}", e));
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }
            let Some(file_dialect) = dialect.or_else(|| Dialect::from_path(&path)) else {
                logging::debug(&format!("Skipping {} (unknown file type)", path.display()));
                continue;
            };

            match std::fs::read_to_string(&path) {
                Ok(content) => {
                    result.files_checked += 1;
                    let display = workspace.display_path(&path);
                    result
                        .findings
                        .extend(scan_source(&content, file_dialect, &display));
                }
                Err(e) => logging::warn(&format!("Cannot read {}: {}", path.display(), e)),
            }
        }
    }

    Ok(result)
}

pub fn run(
    workspace: &Workspace,
    patterns: &[String],
    dialect: Option<Dialect>,
    fail_on_found: bool,
    json: bool,
) -> Result<()> {
    let result = scan_from_glob(workspace, patterns, dialect)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result.findings)?);
    } else {
        print_report(patterns, &result);
    }

    if fail_on_found && !result.findings.is_empty() {
        bail!(
            "{} hardcoded string(s) found (--fail-on-found enabled)",
            result.findings.len()
        );
    }

    Ok(())
}

fn print_report(patterns: &[String], result: &ScanResult) {
    println!("=== ngx-translate-assist scan ===\n");

    println!("Patterns: {:?}", patterns);
    println!("  Files checked: {}", result.files_checked);
    println!("  Hardcoded strings: {}", result.findings.len());
    println!();

    if result.findings.is_empty() {
        println!("No hardcoded strings found. All text appears to be translated!");
        return;
    }

    println!("{}", "=".repeat(60));
    for finding in &result.findings {
        println!("\n{}:{}:{}", finding.file, finding.line, finding.column);
        println!("  Text: \"{}\"", finding.text);
    }
    println!("\n{}", "=".repeat(60));
    println!("Total: {} hardcoded string(s)", result.findings.len());
}
