use chrono::{Duration, NaiveDate};
use pretty_assertions::assert_eq;
use sales_forecast::models::seasonal_trend::SeasonalTrend;
use sales_forecast::{ModelSlot, ModelStatus};
use sales_ledger::{LedgerStore, MonthBatch};
use tempfile::TempDir;

fn seed_history(store: &LedgerStore) {
    let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    for i in 0..90 {
        let date = start + Duration::days(i);
        let sales = 80 + (i % 7) * 5;
        store.insert_sale(1, date, sales).unwrap();
    }
}

#[test]
fn test_full_forecast_workflow() {
    let dir = TempDir::new().unwrap();
    let store = LedgerStore::new(dir.path().join("sales_data.csv"), dir.path().join("branch"));
    seed_history(&store);

    let slot = ModelSlot::new(SeasonalTrend::default());
    slot.refit_from_csv(store.aggregate_path()).unwrap();
    assert_eq!(slot.status(), ModelStatus::Fitted);

    let rows = slot.predict(10).unwrap();
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0].ds, NaiveDate::from_ymd_opt(2024, 5, 30).unwrap());
    for row in &rows {
        assert!(row.yhat_lower >= 0);
        assert!(row.yhat_lower <= row.yhat && row.yhat <= row.yhat_upper);
        assert!(row.yhat > 50 && row.yhat < 150);
    }
}

#[test]
fn test_month_batch_moves_forecast_origin() {
    let dir = TempDir::new().unwrap();
    let store = LedgerStore::new(dir.path().join("sales_data.csv"), dir.path().join("branch"));
    seed_history(&store);

    let today = NaiveDate::from_ymd_opt(2024, 6, 19).unwrap();
    store
        .replace_month(&MonthBatch::new(today, vec![100; 19]))
        .unwrap();

    let slot = ModelSlot::new(SeasonalTrend::default());
    slot.refit_preprocessed_from_csv(store.aggregate_path()).unwrap();

    let rows = slot.predict(3).unwrap();
    assert_eq!(rows[0].ds, NaiveDate::from_ymd_opt(2024, 6, 20).unwrap());
}

#[test]
fn test_refit_on_missing_ledger_fails() {
    let dir = TempDir::new().unwrap();
    let slot = ModelSlot::new(SeasonalTrend::default());

    assert!(slot.refit_from_csv(dir.path().join("missing.csv")).is_err());
    assert_eq!(slot.status(), ModelStatus::Untrained);
}

#[test]
fn test_plain_fit_keeps_trailing_zero_day() {
    let dir = TempDir::new().unwrap();
    let store = LedgerStore::new(dir.path().join("sales_data.csv"), dir.path().join("branch"));
    seed_history(&store);
    let last = NaiveDate::from_ymd_opt(2024, 5, 30).unwrap();
    store.insert_sale(1, last, 0).unwrap();

    let slot = ModelSlot::new(SeasonalTrend::default());
    slot.refit_from_csv(store.aggregate_path()).unwrap();
    assert_eq!(slot.predict(1).unwrap()[0].ds, last + Duration::days(1));

    slot.refit_preprocessed_from_csv(store.aggregate_path()).unwrap();
    assert_eq!(slot.predict(1).unwrap()[0].ds, last);
}
