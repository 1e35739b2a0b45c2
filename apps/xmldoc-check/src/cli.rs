//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "xmldoc-check",
    version,
    about = "Documentation coverage gate for compiled libraries",
    long_about = "xmldoc-check audits a library's public API against its documentation-comment file and reports every namespace, type, constructor, method, field, and property without a summary.\n\nConfiguration precedence: CLI > xmldoc.toml > defaults.",
    after_help = "Examples:\n  xmldoc-check check bin/Release/Acme.dll\n  xmldoc-check check 'bin/Release/*.dll' --output json\n  xmldoc-check check --report-all --include-delegate-members",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[arg(short, long, global = true, action = clap::ArgAction::SetTrue, help = "Verbose diagnostics on stderr")]
    pub verbose: bool,
    #[arg(short, long, global = true, action = clap::ArgAction::SetTrue, help = "Only errors on stderr")]
    pub quiet: bool,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current xmldoc-check version.")]
    Version,
    /// Check documentation coverage
    #[command(
        about = "Check documentation coverage",
        long_about = "Resolve every public element of each library against its documentation file (<stem>.xml) using the metadata snapshot (<stem>.api.json). Exits 1 when summaries are missing, 2 when a library cannot be checked.",
        after_help = "Examples:\n  xmldoc-check check bin/Acme.dll\n  xmldoc-check check --output json"
    )]
    Check {
        #[arg(help = "Library paths or glob patterns (default: [libraries] from xmldoc.toml)")]
        libraries: Vec<String>,
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Also report elements that have a summary")]
        report_all: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Check constructors/methods of delegate types too")]
        include_delegate_members: bool,
    },
}
