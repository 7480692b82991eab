mod binding;

use anyhow::{Context, Result};
use binding::{parse_binding, Binding};
use clap::{Args, Parser, Subcommand};
use colored::*;
use confparse_core::{config_parse_dir, ConfigParser, ConfigTableItem, VERSION};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "confparse")]
#[command(author = "confparse Team")]
#[command(version = VERSION)]
#[command(about = "Table-driven INI config parser - CLI", long_about = None)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, env = "CONFPARSE_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse files in order and show the bound values
    Check {
        /// Config files, parsed in the given order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        opts: ParseOpts,
    },

    /// Parse every regular file of a directory, skipping files that fail
    ScanDir {
        /// Directory to scan (not recursive)
        dir: PathBuf,

        #[command(flatten)]
        opts: ParseOpts,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct ParseOpts {
    /// Key to collect, as [SECTION.]KEY=TYPE (int|bool|string|bytes|percent|strv|float)
    #[arg(short, long = "bind", value_name = "BINDING", value_parser = parse_binding, required = true)]
    bind: Vec<Binding>,

    /// Print the values as JSON
    #[arg(long)]
    json: bool,

    /// Maximum number of distinct sections per file
    #[arg(long, conflicts_with = "legacy_limit")]
    max_sections: Option<usize>,

    /// Limit each file to 64 sections
    #[arg(long)]
    legacy_limit: bool,
}

impl ParseOpts {
    fn parser(&self) -> ConfigParser {
        let parser = match (self.max_sections, self.legacy_limit) {
            (Some(max), _) => ConfigParser::new().with_max_sections(max),
            (None, true) => ConfigParser::legacy(),
            (None, false) => ConfigParser::new(),
        };

        match parser.max_sections() {
            Some(max) => debug!("Section limit: {}", max),
            None => debug!("Section limit: none"),
        }
        parser
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level);

    match cli.command {
        Commands::Check { files, opts } => check_files(files, opts),
        Commands::ScanDir { dir, opts } => scan_dir(dir, opts),
        Commands::Version => {
            println!("confparse v{}", VERSION);
            println!("Table-driven INI config parser");
            Ok(())
        }
    }
}

fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| level.into()),
        )
        .init();

    debug!("Logging initialized");
}

fn check_files(files: Vec<PathBuf>, mut opts: ParseOpts) -> Result<()> {
    let parser = opts.parser();

    {
        let mut table: Vec<ConfigTableItem<'_>> =
            opts.bind.iter_mut().map(Binding::table_item).collect();

        for file in &files {
            info!("Parsing {}", file.display());
            parser
                .parse(file, &mut table)
                .with_context(|| format!("Failed to parse {}", file.display()))?;
        }
    }

    print_values(&opts.bind, opts.json)
}

fn scan_dir(dir: PathBuf, mut opts: ParseOpts) -> Result<()> {
    let parser = opts.parser();
    let mut parsed = 0usize;
    let mut failed = 0usize;

    {
        let mut table: Vec<ConfigTableItem<'_>> =
            opts.bind.iter_mut().map(Binding::table_item).collect();

        config_parse_dir(&dir, |path| {
            let result = parser.parse(path, &mut table);
            match &result {
                Ok(()) => parsed += 1,
                Err(e) => {
                    failed += 1;
                    eprintln!(
                        "{}",
                        format!("⚠️  Skipping {}: {}", path.display(), e).yellow()
                    );
                }
            }
            result
        })
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;
    }

    info!("Parsed {} file(s), skipped {}", parsed, failed);
    print_values(&opts.bind, opts.json)
}

fn print_values(bindings: &[Binding], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(bindings)?);
        return Ok(());
    }

    println!("{}", "=== confparse ===".green().bold());
    for binding in bindings {
        println!("  {} = {}", binding.label().cyan(), binding.value);
    }

    Ok(())
}
