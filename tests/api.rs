use axum::body::Body;
use axum::extract::Query;
use axum::http::{header, Request, StatusCode};
use axum::routing::get;
use axum::Router;
use chrono::{Duration, NaiveDate};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use sales_forecast_service::{build_router, AppState, ServiceConfig};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use tower::ServiceExt;

const FEED_PAGE: &str = "<response><header><resultCode>00</resultCode><resultMsg>OK</resultMsg></header>\
    <body><items><item><ptNo>S1</ptNo><ptNm>Weir</ptNm><wmyr>2024</wmyr><wmod>06</wmod>\
    <itemTemp>20.0</itemTemp><itemPh>7.0</itemPh><itemDoc>9.0</itemDoc><itemTn>0.5</itemTn>\
    <itemTp>0.01</itemTp><itemPhen>0.0</itemPhen><itemCn>0.0</itemCn></item></items>\
    <totalCount>1</totalCount></body></response>";

struct TestApp {
    dir: TempDir,
    state: AppState,
}

impl TestApp {
    fn new(water_api_url: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let config = ServiceConfig {
            aggregate_path: dir.path().join("sales_data.csv"),
            branch_dir: dir.path().join("branch"),
            water_api_url: water_api_url.to_string(),
            ..ServiceConfig::default()
        };
        let state = AppState::new(&config);
        Self { dir, state }
    }

    fn aggregate_path(&self) -> PathBuf {
        self.dir.path().join("sales_data.csv")
    }

    fn branch_path(&self, branch: i64) -> PathBuf {
        self.dir
            .path()
            .join("branch")
            .join(format!("Branch_{}_sales_data.csv", branch))
    }

    /// Daily history from 2024-03-01 with a weekly cycle
    fn seed_history(&self, days: i64) {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut contents = String::from("date,sales\n");
        for i in 0..days {
            let date = start + Duration::days(i);
            contents.push_str(&format!("{},{}\n", date, 100 + (i % 7) * 10));
        }
        fs::write(self.aggregate_path(), contents).unwrap();
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = build_router(self.state.clone())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

async fn spawn_feed() -> String {
    async fn feed(Query(params): Query<HashMap<String, String>>) -> (StatusCode, String) {
        match params.get("numOfRows").map(String::as_str) {
            Some("5") => (StatusCode::OK, FEED_PAGE.to_string()),
            _ => (StatusCode::BAD_REQUEST, String::new()),
        }
    }

    let app = Router::new().route("/feed", get(feed));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/feed", addr)
}

fn read_ledger(path: &PathBuf) -> Vec<(String, i64)> {
    let contents = fs::read_to_string(path).unwrap();
    contents
        .lines()
        .skip(1)
        .map(|line| {
            let (date, sales) = line.split_once(',').unwrap();
            (date.to_string(), sales.parse().unwrap())
        })
        .collect()
}

#[tokio::test]
async fn test_health_reports_untrained_model() {
    let app = TestApp::new("http://127.0.0.1:9/feed");

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "alive");
    assert_eq!(body["model"], "untrained");
}

#[tokio::test]
async fn test_predict_without_model_is_unavailable() {
    let app = TestApp::new("http://127.0.0.1:9/feed");
    app.state.fit_initial_model().await;

    let (status, body) = app.get("/predictAll?days=3").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["detail"].as_str().unwrap().contains("not trained"));
}

#[tokio::test]
async fn test_predict_all_returns_future_rows() {
    let app = TestApp::new("http://127.0.0.1:9/feed");
    app.seed_history(70);
    app.state.fit_initial_model().await;

    let (status, body) = app.get("/predictAll?days=4").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 4);
    // 70 days from 2024-03-01 end on 2024-05-09
    assert_eq!(rows[0]["ds"], "2024-05-10");
    assert_eq!(rows[3]["ds"], "2024-05-13");
    for row in rows {
        let yhat = row["yhat"].as_i64().unwrap();
        let lower = row["yhat_lower"].as_i64().unwrap();
        let upper = row["yhat_upper"].as_i64().unwrap();
        assert!(lower >= 0);
        assert!(lower <= yhat && yhat <= upper);
    }
}

#[tokio::test]
async fn test_startup_fit_uses_every_ledger_day() {
    let app = TestApp::new("http://127.0.0.1:9/feed");
    let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let mut contents = String::from("date,sales\n");
    for i in 0..30 {
        let sales = if i == 29 { 0 } else { 100 + (i % 7) * 10 };
        contents.push_str(&format!("{},{}\n", start + Duration::days(i), sales));
    }
    fs::write(app.aggregate_path(), contents).unwrap();
    app.state.fit_initial_model().await;

    let (status, rows) = app.get("/predictAll?days=1").await;
    assert_eq!(status, StatusCode::OK);
    // the zero day 2024-03-30 still counts as history
    assert_eq!(rows[0]["ds"], "2024-03-31");
}

#[tokio::test]
async fn test_predict_all_requires_days() {
    let app = TestApp::new("http://127.0.0.1:9/feed");

    let (status, _) = app.get("/predictAll").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.get("/predictAll?days=-2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sales_insert_merges_branches() {
    let app = TestApp::new("http://127.0.0.1:9/feed");

    for (branch, sales) in [(1, 40), (2, 15), (1, 25)] {
        let (status, body) = app
            .post(
                "/sales/insert",
                json!({ "branch": branch, "date": "2024-06-01", "sales": sales }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Data inserted successfully" }));
    }

    assert_eq!(read_ledger(&app.branch_path(1)), vec![("2024-06-01".to_string(), 25)]);
    assert_eq!(read_ledger(&app.branch_path(2)), vec![("2024-06-01".to_string(), 15)]);
    assert_eq!(read_ledger(&app.aggregate_path()), vec![("2024-06-01".to_string(), 40)]);
}

#[tokio::test]
async fn test_sales_insert_validation() {
    let app = TestApp::new("http://127.0.0.1:9/feed");

    let (status, _) = app
        .post("/sales/insert", json!({ "branch": 1, "date": "2024-06-01" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            "/sales/insert",
            json!({ "branch": 1, "date": "June 1st", "sales": 3 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("Invalid date"));

    assert!(!app.aggregate_path().exists());
}

#[tokio::test]
async fn test_sales_insert_surfaces_ledger_failure() {
    let app = TestApp::new("http://127.0.0.1:9/feed");
    fs::write(app.aggregate_path(), "date,sales\n2024-06-01,many\n").unwrap();

    let (status, body) = app
        .post(
            "/sales/insert",
            json!({ "branch": 1, "date": "2024-06-01", "sales": 3 }),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Failed to write data to file"));
}

#[tokio::test]
async fn test_insert_month_requires_all_fields() {
    let app = TestApp::new("http://127.0.0.1:9/feed");

    let (status, body) = app
        .post("/insert/data", json!({ "today": "2024-06-19", "data": [1, 2] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "today, data and count are required");
}

#[tokio::test]
async fn test_insert_month_overwrites_and_forecasts() {
    let app = TestApp::new("http://127.0.0.1:9/feed");
    app.seed_history(92); // 2024-03-01 ..= 2024-05-31
    app.state.fit_initial_model().await;

    let data: Vec<i64> = (0..19).map(|i| 150 + (i % 7) * 5).collect();
    let (status, body) = app
        .post(
            "/insert/data",
            json!({ "today": "2024-06-19", "data": data, "count": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 200);

    let forecast = body["data"].as_array().unwrap();
    assert_eq!(forecast.len(), 5);
    assert!(forecast.iter().all(|v| v.as_i64().unwrap() >= 0));

    let ledger = read_ledger(&app.aggregate_path());
    let june: Vec<_> = ledger.iter().filter(|(d, _)| d.starts_with("2024-06")).collect();
    assert_eq!(june.len(), 19);
    assert_eq!(june[0], &("2024-06-01".to_string(), 150));
    assert_eq!(june[18].0, "2024-06-19");

    let (_, rows) = app.get("/predictAll?days=1").await;
    assert_eq!(rows[0]["ds"], "2024-06-20");

    let (_, health) = app.get("/health").await;
    assert_eq!(health["model"], "fitted");
}

#[tokio::test]
async fn test_water_quality_routes() {
    let url = spawn_feed().await;
    let app = TestApp::new(&url);

    let (status, body) = app.get("/water/quality?site_id=nonexistent").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "no data found" }));

    let (status, body) = app.get("/water/quality?site_id=S1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["temperature"], "fair");
    assert_eq!(body[0]["total_organic_carbon"], "no data");

    let (status, _) = app.get("/water/quality").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unreachable_feed_is_bad_gateway() {
    let app = TestApp::new("http://127.0.0.1:9/feed");

    let (status, _) = app.get("/water/quality?site_id=S1").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_cors_is_open() {
    let app = TestApp::new("http://127.0.0.1:9/feed");
    let response = build_router(app.state.clone())
        .oneshot(
            Request::get("/health")
                .header(header::ORIGIN, "http://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
