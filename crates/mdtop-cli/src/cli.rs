use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "mdtop - Preprocess molecular-dynamics topology files with C-style conditionals, macros and includes.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Expand a topology file: resolve conditionals, substitute macros and
    /// inline included files.
    Preprocess(PreprocessArgs),
}

/// Arguments for the `preprocess` subcommand.
#[derive(Args, Debug)]
pub struct PreprocessArgs {
    /// Input topology file.
    #[arg(short = 'p', long = "input", required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Output topology file. Must not be the input file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Preprocessor define, as NAME or NAME=VALUE. Can be given multiple times.
    #[arg(short = 'D', long = "define", value_name = "NAME[=VALUE]")]
    pub defines: Vec<String>,

    /// Include directory searched by #include. Can be given multiple times.
    #[arg(short = 'I', long = "include-dir", value_name = "DIR")]
    pub include_dirs: Vec<PathBuf>,

    /// Do not substitute macros in emitted lines.
    #[arg(long)]
    pub no_substitute: bool,

    /// Do not evaluate conditionals; echo the directives through instead.
    #[arg(long)]
    pub no_conditionals: bool,
}
