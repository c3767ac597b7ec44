//! ngx-translate-assist: find hardcoded text in Angular templates and
//! sources, move it into an ngx-translate JSON catalog, and resolve keys back
//! to their definitions.
//!
//! The engine works on strings and offsets. File access goes through
//! [`fs::FileSystem`], configuration through [`config::Settings`], and key
//! confirmation through [`extraction::KeyPrompt`].

pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod extraction;
pub mod fs;
pub mod json_positions;
pub mod key_path;
pub mod keygen;
pub mod logging;
pub mod reference;
pub mod replacement;
pub mod scanner;
pub mod text_index;

pub use error::{AssistError, Result};
pub use key_path::{Catalog, DottedKey};
pub use scanner::{find_candidate_spans, Dialect, TranslatableSpan};
