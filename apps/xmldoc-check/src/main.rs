//! xmldoc-check CLI binary entry point.
//! Resolves configuration, checks each library, and prints results.

use clap::Parser;
use rayon::prelude::*;
use std::path::Path;
use xmldoc_check::cli::{Cli, Commands};
use xmldoc_check::config;
use xmldoc_check::docs::xml::DocCache;
use xmldoc_check::output::{self, ConsoleReporter, LibraryReport};
use xmldoc_check::report::CollectingReporter;
use xmldoc_check::walker;

fn init_logging(verbose: bool, quiet: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if quiet {
        builder.filter_level(log::LevelFilter::Error);
    } else if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn display_path(root: &Path, path: &Path) -> String {
    pathdiff::diff_paths(path, root)
        .unwrap_or_else(|| path.to_path_buf())
        .to_string_lossy()
        .to_string()
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Check {
            libraries,
            repo_root,
            output,
            report_all,
            include_delegate_members,
        } => {
            let eff = config::resolve_effective(
                repo_root.as_deref(),
                &libraries,
                output.as_deref(),
                if report_all { Some(false) } else { None },
                if include_delegate_members { Some(false) } else { None },
            );
            if !eff.libraries_configured {
                eprintln!(
                    "{} No libraries to check. Pass paths or set `libraries` in xmldoc.toml.",
                    output::error_prefix()
                );
                std::process::exit(2);
            }
            if eff.output != "json" && config::load_config(&eff.repo_root).is_none() {
                eprintln!(
                    "{} No xmldoc.toml found; using defaults.",
                    output::note_prefix()
                );
            }

            let (paths, unmatched) = config::expand_libraries(&eff.repo_root, &eff.libraries);
            for pat in &unmatched {
                eprintln!(
                    "{} No library matched pattern '{}'",
                    output::note_prefix(),
                    pat
                );
            }
            if paths.is_empty() {
                eprintln!("{} No libraries found.", output::error_prefix());
                std::process::exit(2);
            }

            let options = eff.check_options();
            let cache = DocCache::new();
            // Findings are buffered per library so output order matches input order.
            let outcomes: Vec<(LibraryReport, CollectingReporter)> = paths
                .par_iter()
                .map(|path| {
                    let mut findings = CollectingReporter::default();
                    let library = display_path(&eff.repo_root, path);
                    let report =
                        match walker::check_library(path, &cache, &options, &mut findings) {
                            Ok(result) => LibraryReport {
                                library,
                                result: Some(result),
                                error: None,
                            },
                            Err(e) => LibraryReport {
                                library,
                                result: None,
                                error: Some(e.to_string()),
                            },
                        };
                    (report, findings)
                })
                .collect();

            let mut console = ConsoleReporter::new(&eff.output);
            let mut reports = Vec::with_capacity(outcomes.len());
            for (report, findings) in outcomes {
                if eff.output != "json" {
                    findings.replay(&mut console);
                }
                reports.push(report);
            }
            output::print_reports(&reports, &eff.output);

            if reports.iter().any(|r| r.error.is_some()) {
                std::process::exit(2);
            }
            if reports.iter().any(LibraryReport::failed) {
                std::process::exit(1);
            }
        }
    }
}
