use std::env;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wingetup_core::{BootstrapConfig, Collaborators, Orchestrator};
use wingetup_installer::{
    detect_host_platform, AppxBootstrapper, HttpFetcher, PathToolProbe, ProcessUpgradeRunner,
    SystemPrivilegeGate,
};

mod render;

use render::{resolve_output_style, OutputStyle, TerminalPresenter};

const LOG_ENV_VAR: &str = "WINGETUP_LOG";

#[derive(Parser, Debug)]
#[command(name = "wingetup")]
#[command(
    about = "Install winget when missing, then upgrade every package",
    long_about = None
)]
struct Cli {
    /// TOML file overriding the built-in defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    #[arg(long, value_name = "URL")]
    artifact_url: Option<String>,
    /// Expected SHA-256 of the downloaded bundle; enables verification.
    #[arg(long, value_name = "HEX")]
    artifact_sha256: Option<String>,
    #[arg(long)]
    plain: bool,
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(env::var(LOG_ENV_VAR).ok().as_deref(), cli.verbose);

    let config = resolve_config(&cli)?;
    let style = if cli.plain {
        OutputStyle::Plain
    } else {
        resolve_output_style(io::stdout().is_terminal())
    };

    let privilege = SystemPrivilegeGate;
    let probe = PathToolProbe::new();
    let fetcher = HttpFetcher::new(config.artifact_sha256.clone())
        .context("failed to build HTTP client")?;
    let bootstrapper = AppxBootstrapper;
    let runner = ProcessUpgradeRunner;
    let steps = Collaborators {
        privilege: &privilege,
        probe: &probe,
        fetcher: &fetcher,
        bootstrapper: &bootstrapper,
        runner: &runner,
    };

    let platform = detect_host_platform();
    let relaunch_args = env::args_os().skip(1).collect();
    let mut presenter = TerminalPresenter::new(style);
    let report = Orchestrator::new(&config, platform, relaunch_args, steps, &mut presenter).run();
    presenter.finish();

    let code = report.outcome.exit_code();
    info!(code, states = report.history.len(), "run finished");
    if code != 0 {
        process::exit(code);
    }
    Ok(())
}

fn init_tracing(env_directive: Option<&str>, verbose: bool) {
    let directive = log_filter_directive(env_directive, verbose);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

pub(crate) fn log_filter_directive(env_directive: Option<&str>, verbose: bool) -> String {
    if verbose {
        return "debug".to_string();
    }
    match env_directive.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => "warn".to_string(),
    }
}

fn resolve_config(cli: &Cli) -> Result<BootstrapConfig> {
    let base = match &cli.config {
        Some(path) => BootstrapConfig::load(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => BootstrapConfig::default(),
    };
    let merged = apply_overrides(base, cli.artifact_url.clone(), cli.artifact_sha256.clone());
    merged
        .validate()
        .context("invalid configuration after applying command-line overrides")?;
    Ok(merged)
}

pub(crate) fn apply_overrides(
    mut config: BootstrapConfig,
    artifact_url: Option<String>,
    artifact_sha256: Option<String>,
) -> BootstrapConfig {
    if let Some(url) = artifact_url {
        config.artifact_url = url;
    }
    if let Some(digest) = artifact_sha256 {
        config.artifact_sha256 = Some(digest);
    }
    config
}
