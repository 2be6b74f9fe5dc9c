//! Minecraft Splitscreen Steam shortcut installer.

mod app;
mod cli;
mod config;
mod launcher;

use clap::Parser;
use splitdeck_artwork::FetchOutcome;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    let config = cli.apply(config::Config::load(cli.config.as_deref())?);
    config.validate()?;

    let fallback_script_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()));
    let resolver = launcher::ProbingResolver::new(config.launcher_data_dir()?, fallback_script_dir);

    let rt = tokio::runtime::Runtime::new()?;
    let summary = rt.block_on(app::run(&config, &resolver))?;

    for report in &summary.artwork {
        match &report.outcome {
            FetchOutcome::Saved { .. } => {
                tracing::info!(role = %report.role, path = %report.path.display(), "saved")
            }
            FetchOutcome::Skipped => {
                tracing::info!(role = %report.role, "skipped, already present")
            }
            FetchOutcome::Failed { error } => {
                tracing::warn!(role = %report.role, %error, "not downloaded")
            }
        }
    }

    tracing::info!(
        index = summary.index,
        app_id = summary.app_id,
        artwork_failures = summary.artwork_failures(),
        "all done, restart Steam to see {} in your library",
        config.app_name
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}
