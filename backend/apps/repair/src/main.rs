//! Repair tool
//!
//! One-shot passes over worker credentials: clearing identifiers left on
//! unverified workers, expiring lapsed approvals, and writing missing or
//! outdated QR codes. Every pass can be rerun safely.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use workforce::{FsMediaStore, PgWorkforceRepository, RepairReport, RepairUseCase, WorkforceConfig};

#[derive(Parser, Debug)]
#[command(name = "repair")]
#[command(version, about, long_about = None)]
struct Cli {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Base URL encoded in QR codes
    #[arg(long, env = "FRONTEND_BASE_URL")]
    frontend_base_url: Option<String>,

    /// Directory QR images are written to
    #[arg(long, env = "UPLOAD_DIR", default_value = "uploads")]
    upload_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Null identifier and QR fields on workers that are not verified
    ClearUnverified,
    /// Render QR codes for verified workers that have none
    BackfillQr,
    /// Re-render every verified worker's QR code under the current base URL
    RegenerateQr,
    /// Expire workers whose approval validity has passed
    ExpireLapsed,
    /// clear-unverified, expire-lapsed and backfill-qr in order
    All,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repair=info,workforce=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&cli.database_url)
        .await
        .context("connecting to database")?;

    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await
        .context("running migrations")?;

    let mut config = WorkforceConfig {
        upload_dir: cli.upload_dir.clone(),
        ..WorkforceConfig::default()
    };
    if let Some(base) = &cli.frontend_base_url {
        config = config.with_frontend_base_url(base);
    }

    let repair = RepairUseCase::new(
        Arc::new(PgWorkforceRepository::new(pool)),
        Arc::new(FsMediaStore::new(cli.upload_dir.clone())),
        Arc::new(config),
    );

    tracing::info!(command = ?cli.command, "Starting repair pass");
    let report = match cli.command {
        Command::ClearUnverified => repair.clear_unverified().await,
        Command::BackfillQr => repair.backfill_qr().await,
        Command::RegenerateQr => repair.regenerate_qr().await,
        Command::ExpireLapsed => repair.expire_lapsed().await,
        Command::All => repair.all().await,
    }
    .context("repair pass failed")?;

    summarize(&report)
}

fn summarize(report: &RepairReport) -> Result<()> {
    tracing::info!(
        cleared = report.cleared,
        expired = report.expired,
        backfilled = report.backfilled,
        regenerated = report.regenerated,
        failed = report.failed,
        "Repair finished"
    );
    if report.failed > 0 {
        anyhow::bail!("{} QR codes could not be written", report.failed);
    }
    Ok(())
}
