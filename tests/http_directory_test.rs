//! 整合測試 - 透過本機 HTTP 服務驗證 HttpDirectory 與完整流程

use std::io::Cursor;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use media_provider_probe::ProbeError;
use media_provider_probe::component::directory::{
    DirectoryClient, DirectoryService, HttpDirectory, ProviderProbe,
};
use media_provider_probe::component::orchestrator::{Orchestrator, QueryOutcome};
use media_provider_probe::component::validator::ValidationStatus;
use media_provider_probe::config::ProbeSettings;
use media_provider_probe::tools::Transport;
use serde_json::json;
use std::sync::Arc;

const AUTHORITY: &str = "com.neilturner.aerialviews.media";

fn png_bytes() -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    image::RgbImage::new(3, 2)
        .write_to(&mut bytes, image::ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

fn media_router() -> Router {
    Router::new()
        .route(
            &format!("/provider/{AUTHORITY}"),
            get(|| async {
                Json(json!({"package_name": "com.neilturner.aerialviews", "exported": true}))
            }),
        )
        .route(
            &format!("/query/{AUTHORITY}/local"),
            get(|| async {
                Json(json!({
                    "columns": ["_id", "url"],
                    "rows": [["42", "content://provider/42"]],
                    "count": 1
                }))
            }),
        )
        .route(
            "/query/provider/42",
            get(|| async {
                Json(json!({
                    "columns": ["_display_name"],
                    "rows": [["sunset.png"]]
                }))
            }),
        )
        .route(
            "/type/provider/42",
            get(|| async { Json(json!({"mime_type": "image/png"})) }),
        )
        .route("/open/provider/42", get(|| async { png_bytes() }))
}

fn denied_router() -> Router {
    Router::new().route(
        &format!("/query/{AUTHORITY}/local"),
        get(|| async { (StatusCode::FORBIDDEN, "caller lacks READ_MEDIA").into_response() }),
    )
}

fn empty_router() -> Router {
    Router::new().route(
        &format!("/query/{AUTHORITY}/local"),
        get(|| async { StatusCode::NO_CONTENT }),
    )
}

async fn serve(router: Router) -> Transport {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Transport::new(Some(&format!("http://{addr}")), Duration::from_secs(5)).unwrap()
}

/// 測試 1: 目錄查詢與服務註冊檢查
#[tokio::test]
async fn test_http_query_and_probe() {
    let transport = serve(media_router()).await;
    let directory = HttpDirectory::new(transport);

    assert_eq!(
        directory.probe(AUTHORITY).await.unwrap(),
        ProviderProbe::Found {
            package_name: "com.neilturner.aerialviews".to_string(),
            exported: true,
        }
    );
    assert_eq!(directory.probe("unknown.authority").await.unwrap(), ProviderProbe::NotFound);

    let rows = DirectoryClient::new(Arc::new(directory)).query().await.unwrap();
    assert_eq!(rows.count(), 1);
    assert_eq!(rows.columns().to_vec(), vec!["_id".to_string(), "url".to_string()]);
    assert_eq!(rows.row(0).unwrap().get("url"), Some("content://provider/42"));
}

/// 測試 2: 次級查詢與內容類型
#[tokio::test]
async fn test_http_resolve_and_content_type() {
    let directory = HttpDirectory::new(serve(media_router()).await);

    let row = directory.resolve("content://provider/42").await.unwrap().unwrap();
    assert_eq!(row.get("_display_name"), Some("sunset.png"));
    assert_eq!(
        directory.content_type("content://provider/42").await.unwrap().as_deref(),
        Some("image/png")
    );
}

/// 測試 3: 403 轉成權限錯誤並保留服務端訊息
#[tokio::test]
async fn test_http_forbidden_is_permission_denied() {
    let client = DirectoryClient::new(Arc::new(HttpDirectory::new(serve(denied_router()).await)));

    let err = client.query().await.unwrap_err();
    assert_eq!(err, ProbeError::PermissionDenied("caller lacks READ_MEDIA".to_string()));
    assert_eq!(err.to_string(), "Permission denied: caller lacks READ_MEDIA");
}

/// 測試 4: 204 代表沒有結果容器
#[tokio::test]
async fn test_http_no_content_is_empty_response() {
    let client = DirectoryClient::new(Arc::new(HttpDirectory::new(serve(empty_router()).await)));

    assert_eq!(client.query().await.unwrap_err(), ProbeError::EmptyResponse);
}

/// 測試 5: 服務無法連線
#[tokio::test]
async fn test_http_unreachable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let transport =
        Transport::new(Some(&format!("http://{addr}")), Duration::from_secs(2)).unwrap();
    let client = DirectoryClient::new(Arc::new(HttpDirectory::new(transport)));

    assert!(matches!(client.query().await.unwrap_err(), ProbeError::Unreachable(_)));
}

/// 測試 6: 完整流程走 HTTP，圖片經由 open 路由下載並解碼
#[tokio::test]
async fn test_full_pipeline_over_http() {
    let transport = serve(media_router()).await;
    let directory = Arc::new(HttpDirectory::new(transport.clone()));
    let orchestrator =
        Orchestrator::from_settings(&ProbeSettings::default(), directory, &transport);

    orchestrator.start().unwrap().await.unwrap();

    let state = orchestrator.state();
    let Some(QueryOutcome::Success {
        summary,
        sample: Some(report),
    }) = &state.outcome
    else {
        panic!("expected a sampled entry, got {:?}", state.outcome);
    };
    assert_eq!(summary.count, 1);
    assert_eq!(report.metadata.display_name.as_deref(), Some("sunset.png"));
    assert_eq!(report.content_type(), Some("image/png"));
    assert_eq!(
        state.image,
        ValidationStatus::Success("content://provider/42".to_string())
    );
    assert_eq!(state.video, ValidationStatus::Idle);
}
