use anyhow::{bail, Context, Result};
use std::io::{self, Write};
use std::ops::Range;
use std::path::Path;

use crate::commands::Workspace;
use crate::extraction::{extract_selection, ExtractRequest, ExtractionResult, KeyPrompt};
use crate::fs::{FileSystem, RealFileSystem};
use crate::key_path::DottedKey;
use crate::logging;
use crate::scanner::Dialect;
use crate::text_index::{Position, TextIndex};

/// Answers every prompt with the key given on the command line
pub struct FixedKey(pub String);

impl KeyPrompt for FixedKey {
    fn confirm(&mut self, _proposed: &DottedKey) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Accepts every proposal (`--yes`)
pub struct AcceptProposal;

impl KeyPrompt for AcceptProposal {
    fn confirm(&mut self, _proposed: &DottedKey) -> Option<String> {
        Some(String::new())
    }
}

/// Asks on stdin. End of input or `-` cancels.
pub struct StdinPrompt;

impl KeyPrompt for StdinPrompt {
    fn confirm(&mut self, proposed: &DottedKey) -> Option<String> {
        print!(
            "Translation key [{}] (Enter to accept, '-' to cancel): ",
            proposed
        );
        if let Err(e) = io::stdout().flush() {
            logging::warn(&format!("Cannot write prompt: {}", e));
            return None;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => None,
            Ok(_) => {
                let answer = input.trim();
                (answer != "-").then(|| answer.to_string())
            }
            Err(e) => {
                logging::warn(&format!("Cannot read answer: {}", e));
                None
            }
        }
    }
}

/// Byte range of the selection in `content`. With a 1-based `line`, the
/// selection must start on that line.
pub fn find_selection(content: &str, text: &str, line: Option<usize>) -> Result<Range<usize>> {
    if text.trim().is_empty() {
        bail!("The selection is empty. Pass the text to extract with --text.");
    }

    let search_from = match line {
        Some(line) => {
            let index = TextIndex::new(content);
            let start = line
                .checked_sub(1)
                .and_then(|line| index.byte_offset_of(Position { line, column: 0 }));
            match start {
                Some(start) => start,
                None => bail!("Line {} is outside the file ({} lines)", line, index.line_count()),
            }
        }
        None => 0,
    };

    let Some(rel) = content[search_from..].find(text) else {
        bail!("Text \"{}\" was not found in the file", text);
    };
    let start = search_from + rel;

    if line.is_some() {
        let index = TextIndex::new(content);
        if index.line_of(start) != index.line_of(search_from) {
            bail!("Text \"{}\" was not found on the given line", text);
        }
    }

    Ok(start..start + text.len())
}

/// In sources, a selection that fills a string literal replaces the quotes too.
pub fn replacement_range(content: &str, selection: Range<usize>, dialect: Dialect) -> Range<usize> {
    if dialect != Dialect::Script || selection.start == 0 {
        return selection;
    }
    let before = content.as_bytes()[selection.start - 1];
    let after = content.as_bytes().get(selection.end).copied();
    if matches!(before, b'\'' | b'"' | b'`') && after == Some(before) {
        selection.start - 1..selection.end + 1
    } else {
        selection
    }
}

pub fn run(
    workspace: &Workspace,
    file: &Path,
    text: &str,
    line: Option<usize>,
    key: Option<String>,
    yes: bool,
    write: bool,
) -> Result<()> {
    let path = workspace.resolve(file);
    let Some(dialect) = Dialect::from_path(&path) else {
        bail!(
            "Unsupported file type: {}. Expected an .html template or a .ts/.js source.",
            path.display()
        );
    };

    let fs = RealFileSystem;
    let content = fs
        .read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let selection = find_selection(&content, text, line)?;
    let index = TextIndex::new(&content);
    let request = ExtractRequest {
        file_path: &path,
        dialect,
        selection: text,
        line_text: index.line_at(selection.start),
        file_content: &content,
    };

    let mut prompt: Box<dyn KeyPrompt> = match key {
        Some(key) => Box::new(FixedKey(key)),
        None if yes => Box::new(AcceptProposal),
        None => Box::new(StdinPrompt),
    };

    let result = extract_selection(
        &fs,
        &workspace.settings,
        &workspace.root,
        &request,
        prompt.as_mut(),
    )?;

    let ExtractionResult::Extracted {
        key,
        replacement,
        write: outcome,
    } = result
    else {
        println!("Extraction cancelled. Nothing was written.");
        return Ok(());
    };

    println!("=== ngx-translate-assist extract ===\n");
    println!("  Key: {}", key);
    println!(
        "  Catalog: {} ({})",
        workspace.display_path(&outcome.path),
        if outcome.created { "created" } else { "updated" }
    );
    if let Some(previous) = &outcome.replaced {
        println!("  Replaced previous value: \"{}\"", previous);
    }
    for coercion in &outcome.coercions {
        println!("  Warning: {}", coercion);
    }
    println!("  Replacement: {}", replacement.text);
    if let Some(advisory) = &replacement.advisory {
        println!("\nNote: {}", advisory);
    }

    if write {
        let range = replacement_range(&content, selection, dialect);
        let mut updated = String::with_capacity(content.len() + replacement.text.len());
        updated.push_str(&content[..range.start]);
        updated.push_str(&replacement.text);
        updated.push_str(&content[range.end..]);
        fs.write(&path, &updated)
            .with_context(|| format!("Failed to update {}", path.display()))?;
        println!("\nUpdated {}", workspace.display_path(&path));
    }

    Ok(())
}
