use regex::Regex;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::config::{LocateStrategy, Settings};
use crate::error::{AssistError, Result};
use crate::fs::FileSystem;
use crate::json_positions::PositionedValue;
use crate::key_path::{Catalog, Coercion, DottedKey};
use crate::logging;
use crate::text_index::{Position, TextIndex};

/// Parse catalog text. Empty or whitespace-only content is an empty catalog.
pub fn parse_catalog(content: &str, path: &Path) -> Result<Catalog> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    if content.trim().is_empty() {
        return Ok(Catalog::new());
    }

    let value: Value =
        serde_json::from_str(content).map_err(|source| AssistError::CatalogParse {
            path: path.to_path_buf(),
            source,
        })?;

    match value {
        Value::Object(map) => Ok(Catalog::from_map(map)),
        _ => Err(AssistError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}

/// Read a catalog file, returning an empty catalog if it doesn't exist
pub fn read_catalog<F: FileSystem>(fs: &F, path: &Path) -> Result<Catalog> {
    match fs
        .read_optional(path)
        .map_err(|err| AssistError::io(path, err))?
    {
        Some(content) => parse_catalog(&content, path),
        None => Ok(Catalog::new()),
    }
}

/// Result of writing one key into a catalog file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub path: PathBuf,
    /// Whether the file existed before this write
    pub created: bool,
    /// Previous value of the key, if it was overwritten
    pub replaced: Option<String>,
    /// Data-losing structural changes made to fit the key in
    pub coercions: Vec<Coercion>,
}

/// Set `key` to `value` in the catalog at `path` and rewrite the whole file.
///
/// The parent directory is created if needed. A file that fails to parse is
/// left untouched and the parse error is returned.
pub fn write_key<F: FileSystem>(
    fs: &F,
    path: &Path,
    key: &DottedKey,
    value: &str,
) -> Result<WriteOutcome> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs.create_dir_all(parent)
            .map_err(|err| AssistError::io(parent, err))?;
    }

    let created = !fs.exists(path);
    let mut catalog = read_catalog(fs, path)?;
    let outcome = catalog.set(key, value);

    for coercion in &outcome.coercions {
        logging::warn(&format!("{}: {}", path.display(), coercion));
    }

    fs.write(path, &catalog.to_pretty_json())
        .map_err(|err| AssistError::io(path, err))?;

    logging::debug(&format!("Wrote '{}' to {}", key, path.display()));

    Ok(WriteOutcome {
        path: path.to_path_buf(),
        created,
        replaced: outcome.replaced,
        coercions: outcome.coercions,
    })
}

/// Position of the definition of `key` in catalog text.
///
/// Malformed JSON and unknown keys both yield `None`.
pub fn locate_key(content: &str, key: &DottedKey, strategy: LocateStrategy) -> Option<Position> {
    let offset = match strategy {
        LocateStrategy::Scoped => PositionedValue::parse(content)?.leaf_offset(key)?,
        LocateStrategy::FirstMatch => first_match_offset(content, key)?,
    };
    Some(TextIndex::new(content).position(offset))
}

/// Textual lookup kept for compatibility with catalogs navigated by older tooling.
///
/// Only the first segment is searched: `"seg": {` when more segments follow,
/// `"seg": "` when it is the only one. The first match anywhere in the file
/// wins, regardless of nesting.
fn first_match_offset(content: &str, key: &DottedKey) -> Option<usize> {
    let first = key.segments().first()?;
    let opener = if key.len() > 1 { r"\{" } else { "\"" };
    let pattern = format!(r#""{}"\s*:\s*{}"#, regex::escape(first), opener);
    let re = Regex::new(&pattern).ok()?;
    re.find(content).map(|m| m.start())
}

/// Resolve `key` in the workspace catalog.
///
/// Returns `None` when the catalog file is absent, unparsable, or lacks the
/// key. I/O failures other than "not found" are errors.
pub fn locate_in_workspace<F: FileSystem>(
    fs: &F,
    settings: &Settings,
    workspace_root: &Path,
    key: &DottedKey,
) -> Result<Option<(PathBuf, Position)>> {
    settings.validate()?;
    let path = settings.catalog_path(workspace_root);
    let Some(content) = fs
        .read_optional(&path)
        .map_err(|err| AssistError::io(&path, err))?
    else {
        logging::debug(&format!("No catalog at {}", path.display()));
        return Ok(None);
    };

    Ok(locate_key(&content, key, settings.locate_strategy).map(|pos| (path, pos)))
}

/// All dotted keys of the catalog at `path`; an absent file has none.
pub fn catalog_keys<F: FileSystem>(fs: &F, path: &Path) -> Result<Vec<String>> {
    Ok(read_catalog(fs, path)?.keys())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::InMemoryFileSystem;
    use serde_json::json;

    fn key(s: &str) -> DottedKey {
        DottedKey::parse(s).unwrap()
    }

    const CATALOG: &str = "assets/i18n/en.json";

    #[test]
    fn test_read_absent_catalog_is_empty() {
        let fs = InMemoryFileSystem::new();
        let catalog = read_catalog(&fs, Path::new(CATALOG)).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_read_whitespace_catalog_is_empty() {
        let fs = InMemoryFileSystem::new();
        fs.add_file(CATALOG, "  \n");
        assert!(read_catalog(&fs, Path::new(CATALOG)).unwrap().is_empty());
    }

    #[test]
    fn test_read_rejects_non_object() {
        let fs = InMemoryFileSystem::new();
        fs.add_file(CATALOG, "[1, 2]");
        assert!(matches!(
            read_catalog(&fs, Path::new(CATALOG)),
            Err(AssistError::NotAnObject { .. })
        ));
    }

    #[test]
    fn test_write_key_creates_file_and_directory() {
        let fs = InMemoryFileSystem::new();
        let outcome = write_key(
            &fs,
            Path::new(CATALOG),
            &key("home.text.hello_world"),
            "Hello World",
        )
        .unwrap();

        assert!(outcome.created);
        assert!(fs.has_dir("assets/i18n"));
        let written: Value = serde_json::from_str(&fs.file(CATALOG).unwrap()).unwrap();
        assert_eq!(
            written,
            json!({"home": {"text": {"hello_world": "Hello World"}}})
        );
    }

    #[test]
    fn test_write_key_preserves_existing_order() {
        let fs = InMemoryFileSystem::new();
        fs.add_file(CATALOG, r#"{"zeta": "Z", "alpha": {"one": "1"}}"#);

        write_key(&fs, Path::new(CATALOG), &key("alpha.two"), "2").unwrap();

        assert_eq!(
            fs.file(CATALOG).unwrap(),
            "{\n  \"zeta\": \"Z\",\n  \"alpha\": {\n    \"one\": \"1\",\n    \"two\": \"2\"\n  }\n}\n"
        );
    }

    #[test]
    fn test_write_key_reports_coercion() {
        let fs = InMemoryFileSystem::new();
        fs.add_file(CATALOG, r#"{"home": "Home"}"#);

        let outcome = write_key(&fs, Path::new(CATALOG), &key("home.title"), "Title").unwrap();

        assert!(!outcome.created);
        assert_eq!(outcome.coercions.len(), 1);
        assert!(matches!(
            &outcome.coercions[0],
            Coercion::ScalarReplacedByObject { key_path, .. } if key_path == "home"
        ));
    }

    #[test]
    fn test_write_key_leaves_malformed_file_untouched() {
        let fs = InMemoryFileSystem::new();
        fs.add_file(CATALOG, "{ not json");

        let err = write_key(&fs, Path::new(CATALOG), &key("a.b"), "x").unwrap_err();

        assert!(matches!(err, AssistError::CatalogParse { .. }));
        assert_eq!(fs.file(CATALOG).as_deref(), Some("{ not json"));
    }

    #[test]
    fn test_write_key_propagates_io_failure() {
        let fs = InMemoryFileSystem::new();
        fs.add_file(CATALOG, "{}");
        fs.deny_writes(CATALOG);

        let err = write_key(&fs, Path::new(CATALOG), &key("a"), "x").unwrap_err();
        assert!(matches!(err, AssistError::Io { .. }));
    }

    #[test]
    fn test_written_key_is_locatable() {
        let fs = InMemoryFileSystem::new();
        fs.add_file(CATALOG, r#"{"other": {"c": "x"}, "a": {"x": "y"}}"#);
        write_key(&fs, Path::new(CATALOG), &key("a.b.c"), "v").unwrap();

        let content = fs.file(CATALOG).unwrap();
        for strategy in [LocateStrategy::Scoped, LocateStrategy::FirstMatch] {
            assert!(locate_key(&content, &key("a.b.c"), strategy).is_some());
        }
    }

    #[test]
    fn test_deepest_written_key_is_locatable_and_rereadable() {
        let fs = InMemoryFileSystem::new();
        let deepest = key(&vec!["a"; crate::key_path::MAX_DEPTH].join("."));
        write_key(&fs, Path::new(CATALOG), &deepest, "v").unwrap();

        let content = fs.file(CATALOG).unwrap();
        assert!(locate_key(&content, &deepest, LocateStrategy::Scoped).is_some());
        let reread = read_catalog(&fs, Path::new(CATALOG)).unwrap();
        assert_eq!(reread.get_str(&deepest), Some("v"));
    }

    #[test]
    fn test_scoped_locate_finds_nested_duplicate() {
        let content = "{\n  \"about\": {\n    \"title\": \"About\"\n  },\n  \"home\": {\n    \"title\": \"Home\"\n  }\n}\n";

        assert_eq!(
            locate_key(content, &key("home.title"), LocateStrategy::Scoped),
            Some(Position { line: 5, column: 4 })
        );
        assert_eq!(
            locate_key(content, &key("about.title"), LocateStrategy::Scoped),
            Some(Position { line: 2, column: 4 })
        );
    }

    #[test]
    fn test_first_match_returns_first_segment() {
        let content = "{\n  \"home\": {\n    \"title\": \"Home\"\n  }\n}\n";

        assert_eq!(
            locate_key(content, &key("home.title"), LocateStrategy::FirstMatch),
            Some(Position { line: 1, column: 2 })
        );
        assert_eq!(
            locate_key(content, &key("missing.title"), LocateStrategy::FirstMatch),
            None
        );
    }

    #[test]
    fn test_first_match_single_segment_needs_string_value() {
        let content = r#"{"home": {"x": "y"}, "title": "T"}"#;
        assert_eq!(
            locate_key(content, &key("home"), LocateStrategy::FirstMatch),
            None
        );
        assert_eq!(
            locate_key(content, &key("title"), LocateStrategy::FirstMatch),
            Some(Position { line: 0, column: 21 })
        );
    }

    #[test]
    fn test_locate_in_malformed_json_is_none() {
        assert_eq!(
            locate_key("{ \"home\": ", &key("home"), LocateStrategy::Scoped),
            None
        );
    }

    #[test]
    fn test_locate_in_workspace_without_catalog() {
        let fs = InMemoryFileSystem::new();
        let found =
            locate_in_workspace(&fs, &Settings::default(), Path::new(""), &key("a.b")).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_locate_in_workspace_finds_key() {
        let fs = InMemoryFileSystem::new();
        fs.add_file("/ws/assets/i18n/en.json", "{\n  \"home\": {\n    \"title\": \"Home\"\n  }\n}\n");

        let (path, pos) = locate_in_workspace(
            &fs,
            &Settings::default(),
            Path::new("/ws"),
            &key("home.title"),
        )
        .unwrap()
        .unwrap();

        assert_eq!(path, Path::new("/ws/assets/i18n/en.json"));
        assert_eq!(pos, Position { line: 2, column: 4 });
    }

    #[test]
    fn test_catalog_keys() {
        let fs = InMemoryFileSystem::new();
        fs.add_file(CATALOG, r#"{"home": {"title": "T", "text": {"hi": "Hi"}}, "ok": "OK"}"#);
        assert_eq!(
            catalog_keys(&fs, Path::new(CATALOG)).unwrap(),
            vec!["home.title", "home.text.hi", "ok"]
        );
    }
}
