use crate::bundler::{bundle_dir, BundleSummary};
use crate::config::{ResolvedConfig, ResolvedConfigFile};
use crate::errors::{AppError, AppResult};
use crate::fetcher::{fetch, DayWindow, FetchSummary};
use crate::models::Credentials;
use crate::utils::format_duration;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

// CLI metadata constants
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
const APP_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");

fn output_dir_arg() -> Arg<'static> {
    Arg::new("output_dir")
        .short('o')
        .long("output-dir")
        .help("Directory for daily and yearly CSV files [default: output]")
        .value_parser(clap::value_parser!(PathBuf))
        .action(ArgAction::Set)
}

/// Arguments shared by the subcommands that talk to the API.
fn fetch_args() -> Vec<Arg<'static>> {
    vec![
        Arg::new("username")
            .short('u')
            .long("username")
            .help("Enelogic account e-mail address")
            .required(true)
            .action(ArgAction::Set),
        Arg::new("app_id")
            .long("app-id")
            .help("Developer app id")
            .required(true)
            .action(ArgAction::Set),
        Arg::new("app_secret")
            .long("app-secret")
            .help("Developer app secret")
            .required(true)
            .action(ArgAction::Set),
        Arg::new("api_key")
            .long("api-key")
            .help("Personal API key")
            .required(true)
            .action(ArgAction::Set),
        Arg::new("start")
            .short('s')
            .long("start")
            .help("First day to fetch (YYYY-MM-DD, inclusive)")
            .action(ArgAction::Set),
        Arg::new("end")
            .short('e')
            .long("end")
            .help("Day to stop before (YYYY-MM-DD, exclusive)")
            .action(ArgAction::Set),
        Arg::new("base_url")
            .long("base-url")
            .help("Root of the Enelogic API [default: https://enelogic.com/api]")
            .action(ArgAction::Set),
        Arg::new("timeout")
            .long("timeout")
            .help("Request timeout in seconds [default: 60]")
            .value_parser(clap::value_parser!(u64))
            .action(ArgAction::Set),
        output_dir_arg(),
    ]
}

/// Builds the command-line definition.
pub fn build_command() -> Command<'static> {
    Command::new("enelogic-cli")
        .version(APP_VERSION)
        .author(APP_AUTHOR)
        .about(APP_ABOUT)
        .subcommand(
            Command::new("fetch")
                .about("Download every missing day into daily CSV files")
                .after_help("Days whose file already exists are skipped; delete a file to download it again.\nExample:\n  enelogic-cli fetch -u me@example.com --app-id 1_abc --app-secret s3cr3t --api-key k3y")
                .args(fetch_args()),
        )
        .subcommand(
            Command::new("bundle")
                .about("Rebuild the yearly CSV files from the daily ones")
                .arg(output_dir_arg()),
        )
        .subcommand(
            Command::new("run")
                .about("Fetch, then bundle")
                .args(fetch_args()),
        )
        .subcommand(
            Command::new("toml")
                .about("Run using a TOML configuration file")
                .arg(
                    Arg::new("config")
                        .help("Path to the TOML config file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}

/// Parses command-line arguments and executes the selected subcommand.
///
/// - `fetch`: download missing daily files
/// - `bundle`: rebuild yearly files from daily files
/// - `run`: `fetch` followed by `bundle`
/// - `toml`: same as `run`, with credentials and options read from a file
///
/// # Errors
///
/// Returns an error if arguments are invalid, a request fails, or a file cannot
/// be read or written. Nothing is retried; re-running resumes from the first
/// missing day.
pub async fn cli() -> AppResult<()> {
    let cmd = build_command();
    let mut cmd_for_help = cmd.clone();
    let matches = cmd.get_matches();

    match matches.subcommand() {
        Some(("fetch", sub)) => {
            let (credentials, config, window) = fetch_settings(sub)?;
            run_fetch(credentials, &config, &window).await?;
        }
        Some(("bundle", sub)) => {
            let mut config = ResolvedConfig::default();
            if let Some(dir) = sub.get_one::<PathBuf>("output_dir") {
                config.output_dir = dir.clone();
            }
            run_bundle(&config)?;
        }
        Some(("run", sub)) => {
            let (credentials, config, window) = fetch_settings(sub)?;
            run_fetch(credentials, &config, &window).await?;
            run_bundle(&config)?;
        }
        Some(("toml", sub)) => {
            let config_path = sub
                .get_one::<PathBuf>("config")
                .expect("config is required");

            let file_config = ResolvedConfigFile::from_toml_file(config_path)?;
            let window = DayWindow::parse(file_config.start.as_deref(), file_config.end.as_deref())?;

            run_fetch(file_config.credentials(), &file_config.resolved, &window).await?;
            if file_config.bundle {
                run_bundle(&file_config.resolved)?;
            }
        }
        _ => {
            cmd_for_help
                .print_help()
                .map_err(|e| AppError::IoError(format!("Failed to print help: {e}")))?;
        }
    }

    Ok(())
}

/// Resolves credentials, pipeline config and day window from `fetch`/`run` arguments.
pub fn fetch_settings(sub: &ArgMatches) -> AppResult<(Credentials, ResolvedConfig, DayWindow)> {
    let arg = |id: &str| sub.get_one::<String>(id).map(String::as_str);

    let credentials = Credentials::new(
        arg("username").unwrap_or_default(),
        arg("app_id").unwrap_or_default(),
        arg("app_secret").unwrap_or_default(),
        arg("api_key").unwrap_or_default(),
    );

    let mut config = ResolvedConfig::default();
    if let Some(dir) = sub.get_one::<PathBuf>("output_dir") {
        config.output_dir = dir.clone();
    }
    if let Some(base_url) = arg("base_url") {
        config.base_url = base_url.to_string();
    }
    if let Some(&timeout) = sub.get_one::<u64>("timeout") {
        config.request_timeout_secs = timeout;
    }
    config.validate()?;

    let window = DayWindow::parse(arg("start"), arg("end"))?;
    Ok((credentials, config, window))
}

async fn run_fetch(
    credentials: Credentials,
    config: &ResolvedConfig,
    window: &DayWindow,
) -> AppResult<FetchSummary> {
    info!(
        identity = credentials.identity(),
        output_dir = %config.output_dir.display(),
        base_url = %config.base_url,
        "Starting fetch"
    );
    let started = Instant::now();
    let summary = fetch(credentials, config, window).await?;
    info!(
        points = summary.points,
        requested = summary.requested(),
        written = summary.written,
        skipped = summary.skipped,
        elapsed = %format_duration(started.elapsed()),
        "All measuring points processed"
    );
    Ok(summary)
}

fn run_bundle(config: &ResolvedConfig) -> AppResult<BundleSummary> {
    info!(output_dir = %config.output_dir.display(), "Bundling data into years");
    bundle_dir(config)
}
