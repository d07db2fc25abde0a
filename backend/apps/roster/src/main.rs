//! Roster Import Tool
//!
//! Pre-creates `student` profiles from a JSON roster and prints the derived
//! credential of every imported row as tab-separated values.
//!
//! Usage: `roster <roster.json>` with `DATABASE_URL` and `ROSTER_SECRET`
//! (base64, 32 bytes) in the environment.

use access::application::roster::{RosterEntry, RosterImport};
use access::{PgProfileStore, RetryingProfileStore};
use anyhow::{Context, bail};
use platform::crypto::from_base64;
use platform::retry::RetryConfig;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster=info,access=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Some(path) = env::args().nth(1) else {
        bail!("usage: roster <roster.json>");
    };

    let secret = roster_secret()?;

    let raw = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("failed to read roster file {path}"))?;
    let entries: Vec<RosterEntry> =
        serde_json::from_str(&raw).with_context(|| format!("invalid roster file {path}"))?;

    tracing::info!(path = %path, rows = entries.len(), "Roster loaded");

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await?;

    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    let store = RetryingProfileStore::new(PgProfileStore::new(pool), RetryConfig::default());
    let report = RosterImport::new(Arc::new(store), secret)
        .execute(&entries)
        .await?;

    println!("id\tsubject\tcredential\tcreated");
    for issued in &report.issued {
        println!(
            "{}\t{}\t{}\t{}",
            issued.id, issued.subject, issued.credential, issued.created
        );
    }

    for rejected in &report.rejected {
        eprintln!("row {}: {}", rejected.row, rejected.reason);
    }

    Ok(())
}

fn roster_secret() -> anyhow::Result<[u8; 32]> {
    let encoded = env::var("ROSTER_SECRET").context("ROSTER_SECRET must be set in environment")?;
    let bytes = from_base64(encoded.trim()).context("ROSTER_SECRET is not valid base64")?;

    bytes
        .try_into()
        .map_err(|bytes: Vec<u8>| anyhow::anyhow!("ROSTER_SECRET must decode to 32 bytes, got {}", bytes.len()))
}
