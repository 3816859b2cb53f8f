//! End-to-end pipeline tests: a mock HTTP server serves a fixture SQLite
//! snapshot and the full loader (fetch → persist → open → reduce) runs
//! against it.

use std::path::PathBuf;

use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection};

use livescore_viewer::cache::SnapshotLoader;
use livescore_viewer::config::Config;
use livescore_viewer::error::{AppError, FetchError, QueryError};
use livescore_viewer::loader::HttpSnapshotLoader;

fn scratch(tag: &str) -> PathBuf {
    let n = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("livescore-pipeline-{tag}-{n}"))
}

fn test_config(snapshot_url: String, scratch_dir: PathBuf) -> Config {
    Config {
        snapshot_url,
        log_level: "info".to_string(),
        scratch_dir,
        api_port: 0,
        fetch_timeout_secs: 5,
        cache_ttl_secs: 10,
        history_limit: 10_000,
    }
}

/// Build a snapshot database with the upstream `raw` schema and the given
/// (match_id, ts, score) rows, returning its bytes.
async fn fixture_db(rows: &[(&str, i64, &str)]) -> Vec<u8> {
    let path = scratch("fixture").with_extension("db");
    let mut conn = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .connect()
        .await
        .unwrap();

    sqlx::query(
        r#"
        CREATE TABLE raw (
            ts INTEGER NOT NULL,
            mac_id TEXT NOT NULL,
            lig TEXT NOT NULL,
            ev TEXT NOT NULL,
            dep TEXT NOT NULL,
            skor TEXT NOT NULL,
            dakika TEXT NOT NULL,
            oran TEXT NOT NULL,
            tarih TEXT NOT NULL,
            saat TEXT NOT NULL
        )
        "#,
    )
    .execute(&mut conn)
    .await
    .unwrap();

    for (match_id, ts, score) in rows {
        sqlx::query(
            "INSERT INTO raw (ts, mac_id, lig, ev, dep, skor, dakika, oran, tarih, saat)
             VALUES (?, ?, 'Süper Lig', 'Ev', 'Dep', ?, '45', 'AÇIK', '01.05.2024', '20:31')",
        )
        .bind(ts)
        .bind(match_id)
        .bind(score)
        .execute(&mut conn)
        .await
        .unwrap();
    }

    conn.close().await.unwrap();
    let bytes = tokio::fs::read(&path).await.unwrap();
    tokio::fs::remove_file(&path).await.ok();
    bytes
}

async fn loader_for(server: &mockito::ServerGuard, tag: &str) -> HttpSnapshotLoader {
    let cfg = test_config(format!("{}/canli.db", server.url()), scratch(tag));
    HttpSnapshotLoader::new(&cfg).unwrap()
}

#[tokio::test]
async fn full_pipeline_produces_latest_and_history_views() {
    let bytes = fixture_db(&[("m1", 10, "1-0"), ("m1", 20, "2-0"), ("m2", 15, "0-0")]).await;

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/canli.db")
        .with_body(bytes)
        .create_async()
        .await;

    let loader = loader_for(&server, "full").await;
    let data = loader.load().await.unwrap();

    // Latest state: one row per match, max ts, ts-descending.
    assert_eq!(data.latest.len(), 2);
    assert_eq!(data.latest[0].match_id, "m1");
    assert_eq!(data.latest[0].ts, 20);
    assert_eq!(data.latest[0].score, "2-0");
    assert_eq!(data.latest[1].match_id, "m2");
    assert_eq!(data.latest[1].score, "0-0");

    // History: every raw row, ts-descending, no dedup.
    let history_ts: Vec<i64> = data.history.iter().map(|e| e.ts).collect();
    assert_eq!(history_ts, vec![20, 15, 10]);

    assert_eq!(data.last_update_ts(), 20);
    mock.assert_async().await;
}

#[tokio::test]
async fn non_2xx_response_is_an_http_status_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/canli.db")
        .with_status(500)
        .create_async()
        .await;

    let loader = loader_for(&server, "status").await;
    match loader.load().await {
        Err(AppError::Fetch(FetchError::HttpStatus(500))) => {}
        other => panic!("expected HttpStatus(500), got {other:?}"),
    }
}

#[tokio::test]
async fn garbage_payload_is_reported_as_corrupt() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/canli.db")
        .with_body(b"this is not a sqlite file".to_vec())
        .create_async()
        .await;

    let loader = loader_for(&server, "corrupt").await;
    match loader.load().await {
        Err(AppError::Query(QueryError::Corrupt(_))) => {}
        other => panic!("expected Corrupt, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_raw_table_is_a_schema_mismatch() {
    // Valid SQLite file, wrong schema.
    let path = scratch("schema").with_extension("db");
    let mut conn = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .connect()
        .await
        .unwrap();
    sqlx::query("CREATE TABLE something_else (x INTEGER)")
        .execute(&mut conn)
        .await
        .unwrap();
    conn.close().await.unwrap();
    let bytes = tokio::fs::read(&path).await.unwrap();
    tokio::fs::remove_file(&path).await.ok();

    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/canli.db")
        .with_body(bytes)
        .create_async()
        .await;

    let loader = loader_for(&server, "mismatch").await;
    match loader.load().await {
        Err(AppError::Query(QueryError::SchemaMismatch(_))) => {}
        other => panic!("expected SchemaMismatch, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_raw_table_is_an_empty_result() {
    let bytes = fixture_db(&[]).await;

    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/canli.db")
        .with_body(bytes)
        .create_async()
        .await;

    let loader = loader_for(&server, "empty").await;
    match loader.load().await {
        Err(AppError::EmptyResult) => {}
        other => panic!("expected EmptyResult, got {other:?}"),
    }
}
