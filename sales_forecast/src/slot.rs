//! Process-wide holder for the current fitted model

use crate::data::{preprocess, DataLoader, SalesSeries};
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, TrainedForecastModel};
use crate::output::{postprocess, ForecastRow};
use serde::Serialize;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

/// Lifecycle state of a [`ModelSlot`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    /// No fit has succeeded yet
    Untrained,
    /// A fitted model is serving predictions
    Fitted,
    /// A refit is running; the previous model (if any) still serves
    Refitting,
}

/// Current fitted model, replaced wholesale on every successful refit
///
/// Training runs outside the lock; only the swap takes the write lock, so a
/// prediction sees either the old or the new model in full. A failed refit
/// leaves the previous model in place.
#[derive(Debug)]
pub struct ModelSlot<M: ForecastModel> {
    model: M,
    trained: RwLock<Option<Arc<M::Trained>>>,
    refitting: AtomicBool,
}

impl<M: ForecastModel> ModelSlot<M> {
    /// Create an untrained slot
    pub fn new(model: M) -> Self {
        Self {
            model,
            trained: RwLock::new(None),
            refitting: AtomicBool::new(false),
        }
    }

    pub fn status(&self) -> ModelStatus {
        if self.refitting.load(Ordering::Acquire) {
            ModelStatus::Refitting
        } else if self.current().is_some() {
            ModelStatus::Fitted
        } else {
            ModelStatus::Untrained
        }
    }

    /// The model currently serving predictions
    pub fn current(&self) -> Option<Arc<M::Trained>> {
        let guard = self.trained.read().unwrap_or_else(|e| e.into_inner());
        guard.clone()
    }

    /// Train a fresh model on `series` as given and swap it in
    pub fn refit(&self, series: &SalesSeries) -> Result<()> {
        self.refitting.store(true, Ordering::Release);
        let outcome = self.model.train(series);
        self.refitting.store(false, Ordering::Release);

        match outcome {
            Ok(trained) => {
                info!(
                    model = self.model.name(),
                    observations = series.len(),
                    last_date = %trained.last_date(),
                    "refit forecast model"
                );
                let mut guard = self.trained.write().unwrap_or_else(|e| e.into_inner());
                *guard = Some(Arc::new(trained));
                Ok(())
            }
            Err(err) => {
                warn!(model = self.model.name(), error = %err, "refit failed, keeping previous model");
                Err(err)
            }
        }
    }

    /// Drop non-positive and outlier days from `series`, then refit
    pub fn refit_preprocessed(&self, series: &SalesSeries) -> Result<()> {
        self.refit(&preprocess(series))
    }

    /// Fit on a ledger file exactly as stored
    pub fn refit_from_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let series = DataLoader::from_csv(path)?;
        self.refit(&series)
    }

    /// Reload a ledger file and refit on its preprocessed rows
    pub fn refit_preprocessed_from_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let series = DataLoader::from_csv(path)?;
        self.refit_preprocessed(&series)
    }

    /// Published forecast rows for the `horizon` days after the training data
    pub fn predict(&self, horizon: usize) -> Result<Vec<ForecastRow>> {
        let trained = self.current().ok_or_else(|| {
            ForecastError::ModelNotTrained("no successful fit yet".to_string())
        })?;
        let forecast = trained.forecast(horizon)?;
        postprocess(&forecast)
    }
}
