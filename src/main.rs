use clap::{Parser, Subcommand, ValueEnum};
use mdseries::config::{self, Overrides};
use mdseries::pipeline;
use mdseries::report::{self, ExitStatus};
use mdseries::types::LanguageVariant;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mdseries")]
#[command(about = "Index and link-check a tree of Markdown article series")]
#[command(long_about = "\
Index and link-check a tree of Markdown article series

Directories are series, files are articles ordered by numeric prefix, and a
suffix on the file stem marks the translated variant of an article.

Content structure:

  content/
  ├── mdseries.toml                # Scan config (optional)
  ├── README.md                    # Root-level article
  ├── csharp/                      # Series \"csharp\"
  │   ├── 01_OOP_Basics.md         # Ordered by number prefix
  │   ├── 01_OOP_Basics_CN.md      # Translated variant (suffix _CN)
  │   └── 10_Generics.md
  └── design-patterns/
      └── 01_Adapter.md

Exit codes:
  0  no broken links (unpaired translations are warnings only)
  1  one or more broken links
  2  fatal error: content root missing or unreadable, invalid config

Run 'mdseries gen-config' to print a documented mdseries.toml.")]
#[command(version)]
struct Cli {
    /// Log debug events to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Flags shared by every command that scans a content tree.
#[derive(clap::Args, Clone)]
struct ScanArgs {
    /// Content root directory
    root: PathBuf,

    /// Suffix on the file stem marking the translated variant
    #[arg(long, value_name = "SUFFIX")]
    variant_suffix: Option<String>,

    /// Document extension; repeat for several (default: md)
    #[arg(long = "ext", value_name = "EXT")]
    extensions: Vec<String>,

    /// Maximum parallel file readers (default: CPU cores)
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Config file to use instead of <ROOT>/mdseries.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Do not list documents that nothing links to
    #[arg(long)]
    no_orphans: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum Variant {
    Base,
    Cn,
}

impl From<Variant> for LanguageVariant {
    fn from(v: Variant) -> Self {
        match v {
            Variant::Base => LanguageVariant::Base,
            Variant::Cn => LanguageVariant::Cn,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Scan, validate links and variant pairs, and print the report
    Scan {
        #[command(flatten)]
        args: ScanArgs,

        /// Report format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print the generated series index as a Markdown table of contents
    Index {
        #[command(flatten)]
        args: ScanArgs,

        /// Language variant to list
        #[arg(long, value_enum, default_value_t = Variant::Base)]
        variant: Variant,
    },
    /// Print a stock mdseries.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match execute(cli.command) {
        Ok(status) => ExitCode::from(status.code()),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(ExitStatus::Fatal.code())
        }
    }
}

fn execute(command: Command) -> Result<ExitStatus, Box<dyn std::error::Error>> {
    match command {
        Command::Scan { args, format } => {
            let output = run_pipeline(&args)?;
            match format {
                Format::Text => report::print_report(&output.report),
                Format::Json => println!("{}", serde_json::to_string_pretty(&output.report)?),
            }
            Ok(output.report.exit_status())
        }
        Command::Index { args, variant } => {
            let output = run_pipeline(&args)?;
            report::print_markdown_index(&output.index, variant.into());
            Ok(ExitStatus::Clean)
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(ExitStatus::Clean)
        }
    }
}

fn run_pipeline(args: &ScanArgs) -> Result<pipeline::RunOutput, Box<dyn std::error::Error>> {
    let overrides = Overrides {
        variant_suffix: args.variant_suffix.clone(),
        extensions: args.extensions.clone(),
        concurrency: args.concurrency,
        no_orphans: args.no_orphans,
    };
    let scan_config =
        config::load_config(&args.root, args.config.as_deref())?.with_overrides(&overrides)?;
    Ok(pipeline::run(&args.root, &scan_config)?)
}

/// Log to stderr so stdout carries only the report.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
