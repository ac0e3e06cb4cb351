//! Attachment MIME Audit CLI (bzmime) - Main binary entry point

use bzmime::cli::args::{CliArgs, parse_args};
use bzmime::cli::output::{format_json, format_text};
use bzmime::io::{http, report, results_log};
use bzmime::models::BugProgress;
use bzmime::services::rpc::JsonRpcClient;
use bzmime::services::{aggregate, buglist};
use bzmime::{CancelFlag, RunOptions, RunSummary};
use std::process;
use std::sync::Arc;

fn main() {
    // Verbosity is controlled by RUST_LOG; warnings stay visible without it.
    // Example: RUST_LOG=debug bzmime --download
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("--help" | "-h") => {
            print_help();
            return;
        }
        Some("--version" | "-v") => {
            print_version();
            return;
        }
        _ => {}
    }

    // Parse arguments; running with none at all is a valid default audit
    let cli = match parse_args(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Use --help for usage information");
            process::exit(2);
        }
    };

    process::exit(handle_run(&cli));
}

fn handle_run(cli: &CliArgs) -> i32 {
    // Ctrl+C trips the shared flag; the collection loop checks it per bug
    let cancel = CancelFlag::default();
    {
        let flag = cancel.clone();
        if let Err(e) = ctrlc::set_handler(move || flag.cancel()) {
            log::warn!("could not install interrupt handler: {e}");
        }
    }

    let mut opts = RunOptions {
        base_url: cli.base_url.clone(),
        product: cli.product.clone(),
        mimetype: cli.mimetype.clone(),
        max_bugs: cli.max_bugs,
        download_attachments: cli.download,
        log_results: cli.log_results,
        html_report: cli.html_report,
        attachments_dir: cli.attachments_dir.clone(),
        report_path: cli.report.clone(),
        results_log_path: cli.results_log.clone(),
        cancel,
        progress: None,
    };

    if !cli.quiet {
        opts.progress = Some(Arc::new(|p: &BugProgress| {
            eprintln!(
                "[{}/{}] bug {}: {} attachment(s)",
                p.index, p.total, p.bug_id, p.attachments
            );
        }));

        eprintln!(
            "Searching {} for '{}' attachments in {}",
            opts.base_url, opts.mimetype, opts.product
        );
    }

    let client = match http::build_client() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            return 4;
        }
    };

    let list = match buglist::fetch_bug_list(&client, &opts) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error: {e}");
            return exit_code_for(&e);
        }
    };

    if !cli.quiet {
        eprintln!("Query URL: {}", list.query_url);
        eprintln!("{} bugs to process", list.bugs.len());
    }

    let rpc = JsonRpcClient::new(client, &opts.base_url);
    let outcome = match aggregate::collect_attachments(&rpc, &list.bugs, &opts) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {e}");
            return exit_code_for(&e);
        }
    };

    let report_path = if opts.html_report {
        let html = report::render_report(&outcome.aggregate, &opts);
        if let Err(e) = report::write_report(&opts.report_path, &html) {
            eprintln!("Error: failed to write report to {}: {e}", opts.report_path);
            return 4;
        }
        Some(opts.report_path.clone())
    } else {
        None
    };

    // The report already exists at this point, so a log append failure
    // must not fail the run
    if opts.log_results {
        let today = chrono::Local::now().format("%d/%m/%Y").to_string();
        if let Err(e) = results_log::append_match_count(
            &opts.results_log_path,
            &today,
            outcome.counters.mimetype_matches,
        ) {
            log::warn!("could not append to {}: {e}", opts.results_log_path);
        }
    }

    let summary = RunSummary {
        query_url: list.query_url,
        mimetype: opts.mimetype.clone(),
        total_listed: list.bugs.len(),
        processed: outcome.processed,
        aggregate: outcome.aggregate,
        counters: outcome.counters,
        skipped: outcome.skipped,
        report_path,
    };

    if cli.json {
        println!("{}", format_json(&summary));
    } else {
        format_text(&summary);
    }

    // Return appropriate exit code
    if summary.skipped.is_empty() {
        0 // Success
    } else {
        3 // Partial failure
    }
}

fn exit_code_for(err: &bzmime::Error) -> i32 {
    match err {
        bzmime::Error::InvalidInput(_) => 2,
        bzmime::Error::Cancelled => 130,
        _ => 4,
    }
}

fn print_help() {
    println!("Attachment MIME Audit CLI (bzmime) - Flag mislabeled bug-tracker attachments");
    println!();
    println!("USAGE:");
    println!("    bzmime [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --base-url <URL>          Tracker root (default: https://bugs.libreoffice.org)");
    println!("    --product <NAME>          Product to search within (default: LibreOffice)");
    println!("    --mimetype <TYPE>         Target MIME type (default: application/octet-stream)");
    println!("    --max-bugs <N>            Process at most N bugs (default: 1000)");
    println!("    --download                Download attachment bytes and sniff their real type");
    println!("    --attachments-dir <DIR>   Directory for downloaded bytes (default: attachments)");
    println!("    --report <FILE>           HTML report path (default: mimetypestats.html)");
    println!("    --no-report               Skip writing the HTML report");
    println!("    --log-results             Append the run's match count to the results log");
    println!("    --results-log <FILE>      Results log path (default: mimetypecount.csv)");
    println!("    --json                    Emit a machine-readable run summary");
    println!("    --quiet                   Suppress progress output");
    println!("    -h, --help                Show this help message");
    println!("    -v, --version             Show version information");
    println!();
    println!("EXIT CODES:");
    println!("    0  clean run    2  usage error    3  some bugs skipped    4  fatal failure");
    println!();
    println!("EXAMPLES:");
    println!("    bzmime");
    println!("    bzmime --mimetype application/pdf --download --log-results");
    println!("    RUST_LOG=debug bzmime --max-bugs 50 --no-report --json");
}

fn print_version() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_DATE: &str = env!("GIT_DATE");
    const BUILD_TARGET: &str = env!("BUILD_TARGET");

    println!("bzmime {VERSION}");
    println!("Commit: {GIT_HASH} ({GIT_DATE})");
    println!("Target: {BUILD_TARGET}");

    #[cfg(debug_assertions)]
    println!("Build: debug");
    #[cfg(not(debug_assertions))]
    println!("Build: release");
}
