//! Shared application state

use crate::config::ServiceConfig;
use sales_forecast::models::seasonal_trend::SeasonalTrend;
use sales_forecast::ModelSlot;
use sales_ledger::LedgerStore;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use water_quality::WaterQualityClient;

pub type SalesModel = ModelSlot<SeasonalTrend>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub ledgers: Arc<LedgerStore>,
    /// Serialises ledger read-modify-write cycles within this process
    pub ledger_lock: Arc<Mutex<()>>,
    pub model: Arc<SalesModel>,
    pub water: Arc<WaterQualityClient>,
}

impl AppState {
    pub fn new(config: &ServiceConfig) -> Self {
        Self {
            ledgers: Arc::new(LedgerStore::new(
                config.aggregate_path.clone(),
                config.branch_dir.clone(),
            )),
            ledger_lock: Arc::new(Mutex::new(())),
            model: Arc::new(ModelSlot::new(SeasonalTrend::default())),
            water: Arc::new(
                WaterQualityClient::new(config.water_api_url.clone(), config.water_api_key.clone())
                    .with_page_size(config.water_page_size),
            ),
        }
    }

    /// Fit the model once against the full aggregate ledger, unfiltered
    ///
    /// A failure is logged and leaves the model untrained; the service still
    /// starts and the next month batch triggers another fit.
    pub async fn fit_initial_model(&self) {
        let model = Arc::clone(&self.model);
        let path = self.ledgers.aggregate_path().to_path_buf();

        let outcome = tokio::task::spawn_blocking(move || model.refit_from_csv(&path)).await;
        match outcome {
            Ok(Ok(())) => info!("initial forecast model fitted"),
            Ok(Err(err)) => warn!(error = %err, "initial fit failed, model untrained"),
            Err(err) => warn!(error = %err, "initial fit task failed, model untrained"),
        }
    }
}
