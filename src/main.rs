use anyhow::{Context, Result};
use deskboard::{config::Config, select::SelectionController, store::DatasetStore};
use serde::Serialize;
use std::{path::PathBuf, sync::Arc};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Printed once at startup: the dropdown options and the static map
/// outline, everything the presentation layer needs before the first
/// selection arrives.
#[derive(Serialize)]
struct Bootstrap<'a> {
    categories: &'a [String],
    boundary: geojson::Feature,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) config ───────────────────────────────────────────────────
    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&PathBuf::from(&path))
            .with_context(|| format!("loading config {}", path))?,
        None => Config::default(),
    };

    // ─── 3) load datasets, all or nothing ────────────────────────────
    let store = DatasetStore::load(&config).context("loading datasets")?;

    // ─── 4) bootstrap payload for the presentation layer ─────────────
    let bootstrap = Bootstrap {
        categories: store.categories(),
        boundary: store.boundary().to_feature(),
    };
    println!("{}", serde_json::to_string(&bootstrap)?);

    // ─── 5) controller + subscriber printing every published update ──
    let (controller, mut rx) = SelectionController::new(Arc::clone(&store));
    let printer = tokio::spawn(async move {
        while let Some(update) = rx.recv().await {
            match serde_json::to_string(update.as_ref()) {
                Ok(line) => println!("{line}"),
                Err(err) => error!(%err, "serializing update"),
            }
        }
    });

    // ─── 6) default selection: the first category ────────────────────
    match store.default_category() {
        Some(first) => {
            let first = first.to_string();
            controller
                .select(&first)
                .await
                .with_context(|| format!("initial selection `{first}`"))?;
        }
        None => warn!("city table has no category columns"),
    }

    // ─── 7) follow selections from stdin, one category per line ──────
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let category = line.trim();
        if category.is_empty() {
            continue;
        }
        match controller.select(category).await {
            Ok(Some(_)) => {}
            Ok(None) => debug!(category, "selection superseded before publish"),
            // invalid selections keep the previous views; just say so
            Err(err) => warn!(%err, category, "selection rejected"),
        }
    }

    // ─── 8) stdin closed: drop the controller so the printer drains ──
    drop(controller);
    let _ = printer.await;
    info!("done");
    Ok(())
}
