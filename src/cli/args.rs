//! CLI argument parsing

use crate::RunOptions;

#[derive(Debug, Clone)]
pub struct CliArgs {
    pub base_url: String,
    pub product: String,
    pub mimetype: String,
    pub max_bugs: usize,
    pub download: bool,
    pub log_results: bool,
    pub html_report: bool,
    pub report: String,
    pub attachments_dir: String,
    pub results_log: String,
    pub json: bool,
    pub quiet: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        // Defaults come from the run options so the two layers cannot drift.
        let opts = RunOptions::default();
        Self {
            base_url: opts.base_url,
            product: opts.product,
            mimetype: opts.mimetype,
            max_bugs: opts.max_bugs,
            download: opts.download_attachments,
            log_results: opts.log_results,
            html_report: opts.html_report,
            report: opts.report_path,
            attachments_dir: opts.attachments_dir,
            results_log: opts.results_log_path,
            json: false,
            quiet: false,
        }
    }
}

/// Parse command line arguments
pub fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--base-url" => {
                i += 1;
                if i >= args.len() {
                    return Err("--base-url requires a value".to_string());
                }
                cli.base_url = args[i].trim_end_matches('/').to_string();
            }
            "--product" => {
                i += 1;
                if i >= args.len() {
                    return Err("--product requires a value".to_string());
                }
                cli.product.clone_from(&args[i]);
            }
            "--mimetype" => {
                i += 1;
                if i >= args.len() {
                    return Err("--mimetype requires a value".to_string());
                }
                let well_formed = matches!(
                    args[i].split_once('/'),
                    Some((t, s)) if !t.is_empty() && !s.is_empty()
                );
                if !well_formed {
                    return Err("--mimetype must be a type/subtype string".to_string());
                }
                cli.mimetype.clone_from(&args[i]);
            }
            "--max-bugs" => {
                i += 1;
                if i >= args.len() {
                    return Err("--max-bugs requires a value".to_string());
                }
                let max: usize = args[i]
                    .parse()
                    .map_err(|_| "--max-bugs must be a number".to_string())?;
                if max == 0 {
                    return Err("--max-bugs must be greater than zero".to_string());
                }
                cli.max_bugs = max;
            }
            "--download" => {
                cli.download = true;
            }
            "--log-results" => {
                cli.log_results = true;
            }
            "--no-report" => {
                cli.html_report = false;
            }
            "--report" => {
                i += 1;
                if i >= args.len() {
                    return Err("--report requires a file path".to_string());
                }
                cli.report.clone_from(&args[i]);
            }
            "--attachments-dir" => {
                i += 1;
                if i >= args.len() {
                    return Err("--attachments-dir requires a directory".to_string());
                }
                cli.attachments_dir = args[i].trim_end_matches('/').to_string();
            }
            "--results-log" => {
                i += 1;
                if i >= args.len() {
                    return Err("--results-log requires a file path".to_string());
                }
                cli.results_log.clone_from(&args[i]);
            }
            "--json" => {
                cli.json = true;
            }
            "--quiet" => {
                cli.quiet = true;
            }
            _ => return Err(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    Ok(cli)
}
