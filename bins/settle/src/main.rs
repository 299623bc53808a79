//! Profit-share settlement runner
//!
//! Settles one plan year against a JSON plan snapshot and prints the update and
//! edit reports. Nothing is posted; the output is for review.

use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use profitshare_core::edit::{ProfitShareEditResponse, ProfitShareEditService};
use profitshare_core::settlement::{
    ProfitShareUpdateRequest, ProfitShareUpdateResponse, SettlementService,
};
use profitshare_shared::{AppConfig, config::LoggingConfig};
use profitshare_store::JsonSnapshotStore;

/// Both reports of one run.
#[derive(Serialize)]
struct SettlementReports {
    update: ProfitShareUpdateResponse,
    edit: ProfitShareEditResponse,
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    if logging.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Cancels the run on Ctrl-C.
fn cancel_on_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupted, cancelling settlement");
                cancel.cancel();
            }
            Err(err) => warn!(error = %err, "Unable to listen for Ctrl-C"),
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(&config.logging);

    let store = Arc::new(JsonSnapshotStore::load(&config.snapshot.path).await?);
    let settlement = Arc::new(SettlementService::new(Arc::clone(&store), store));
    let edit = ProfitShareEditService::new(Arc::clone(&settlement));

    let request = ProfitShareUpdateRequest::from(&config.settlement);
    info!(
        profit_year = request.profit_year,
        earnings_percent = %request.earnings_percent,
        secondary_earnings_percent = %request.secondary_earnings_percent,
        "Settling plan year"
    );

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    let reports = SettlementReports {
        update: settlement.update_report(&request, &cancel).await?,
        edit: edit.edit_report(&request, &cancel).await?,
    };

    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}
