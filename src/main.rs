use clap::{Parser, Subcommand};
use cortex_sentinel_connector::config::Config;
use cortex_sentinel_connector::constants::DEFAULT_SETTINGS_PATH;
use cortex_sentinel_connector::scheduler::{build_pipelines, resolve_jobs, run_all, run_forever};
use cortex_sentinel_connector::{logging, metrics};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "cortex_sentinel")]
#[command(about = "Forward Cortex Cloud audit logs and endpoints to Azure Log Analytics")]
#[command(version = "0.1.0")]
struct Cli {
    /// Settings file with optional [poller] overrides
    #[arg(long, global = true, default_value = DEFAULT_SETTINGS_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the selected jobs once
    Run {
        /// Jobs to run (comma-separated). Available: audit-logs, endpoints, all
        #[arg(long, default_value = "all")]
        job: String,
    },
    /// Run every job on the configured interval until interrupted
    Schedule,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _log_guard = logging::init_logging();

    let cli = Cli::parse();

    // Fail before any network call if credentials are missing or malformed.
    let config = Config::load(&cli.config)?;
    metrics::init_metrics();

    match cli.command {
        Commands::Run { job } => {
            let pipelines = build_pipelines(&resolve_jobs(&job), &config)?;
            let outcomes = run_all(&pipelines).await;
            let failed = outcomes.iter().filter(|(_, outcome)| outcome.is_err()).count();
            for (log_type, outcome) in &outcomes {
                if let Ok(report) = outcome {
                    info!(
                        run_id = %report.run_id,
                        outcome = ?report.outcome,
                        "{} run finished: {} records sent",
                        log_type,
                        report.records_sent
                    );
                }
            }
            if failed > 0 {
                error!("{} of {} runs failed", failed, outcomes.len());
                anyhow::bail!("{} of {} runs failed", failed, outcomes.len());
            }
        }
        Commands::Schedule => {
            let pipelines = build_pipelines(&resolve_jobs("all"), &config)?;
            run_forever(pipelines, config.poller.interval(), async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("Failed to listen for Ctrl-C: {}", e);
                    std::future::pending::<()>().await;
                }
            })
            .await;
        }
    }

    Ok(())
}
