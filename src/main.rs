use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ngx_translate_assist::commands::{self, Workspace};
use ngx_translate_assist::config::Settings;
use ngx_translate_assist::logging;
use ngx_translate_assist::scanner::Dialect;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ngx-translate-assist")]
#[command(author, version, about = "Find hardcoded text and manage ngx-translate keys", long_about = None)]
struct Cli {
    /// Path to settings file (defaults to <root>/ngx-translate.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Workspace root (defaults to the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Translation directory relative to the root (overrides settings)
    #[arg(long, global = true)]
    translation_path: Option<String>,

    /// Default language (overrides settings)
    #[arg(long, global = true)]
    lang: Option<String>,

    /// Log level: error, warn, info or debug
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum DialectArg {
    Html,
    Ts,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Html => Dialect::Markup,
            DialectArg::Ts => Dialect::Script,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Report hardcoded text in templates and sources
    Scan {
        /// Glob patterns relative to the root (e.g. "src/**/*.html")
        #[arg(required = true)]
        patterns: Vec<String>,

        /// Treat every file as this dialect instead of using its extension
        #[arg(long, value_enum)]
        dialect: Option<DialectArg>,

        /// Exit with an error when anything is found
        #[arg(long)]
        fail_on_found: bool,

        /// Print findings as JSON
        #[arg(long)]
        json: bool,
    },

    /// Move a piece of text into the translation catalog
    Extract {
        /// Template or source file containing the text
        file: PathBuf,

        /// The selected text
        #[arg(long)]
        text: String,

        /// 1-based line the selection starts on (defaults to the first occurrence)
        #[arg(long)]
        line: Option<usize>,

        /// Use this key instead of asking
        #[arg(long, conflicts_with = "yes")]
        key: Option<String>,

        /// Accept the proposed key without asking
        #[arg(short, long)]
        yes: bool,

        /// Replace the selection in the file
        #[arg(long)]
        write: bool,
    },

    /// Show where the key under a position is defined
    Goto {
        file: PathBuf,

        /// 1-based line
        #[arg(long)]
        line: usize,

        /// 1-based column
        #[arg(long)]
        column: usize,

        /// Key location strategy: scoped or first-match
        #[arg(long)]
        strategy: Option<String>,
    },

    /// Show where a key is defined
    Locate {
        key: String,

        /// Key location strategy: scoped or first-match
        #[arg(long)]
        strategy: Option<String>,
    },

    /// List every key of the catalog
    Keys,

    /// Create a settings file and an empty catalog
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.log_level.as_deref()).map_err(|e| anyhow!(e))?;

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to determine the current directory")?,
    };

    // init writes the settings file, so a broken existing one must not stop it
    let settings = match &cli.command {
        Commands::Init { .. } => Settings::default(),
        _ => Settings::load_or_default(cli.config.as_deref(), &root)?,
    };
    let settings = settings.with_overrides(cli.translation_path, cli.lang);
    let workspace = Workspace::new(root, settings);

    match cli.command {
        Commands::Scan {
            patterns,
            dialect,
            fail_on_found,
            json,
        } => {
            commands::scan::run(
                &workspace,
                &patterns,
                dialect.map(Dialect::from),
                fail_on_found,
                json,
            )?;
        }
        Commands::Extract {
            file,
            text,
            line,
            key,
            yes,
            write,
        } => {
            commands::extract::run(&workspace, &file, &text, line, key, yes, write)?;
        }
        Commands::Goto {
            file,
            line,
            column,
            strategy,
        } => {
            commands::goto::run(&workspace, &file, line, column, strategy.as_deref())?;
        }
        Commands::Locate { key, strategy } => {
            commands::locate::run(&workspace, &key, strategy.as_deref())?;
        }
        Commands::Keys => {
            commands::keys::run(&workspace)?;
        }
        Commands::Init { force } => {
            commands::init::run(&workspace, force)?;
        }
    }

    Ok(())
}
