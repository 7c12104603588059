// region:    --- Imports
use crate::auction::SharedAuction;
use crate::bidding::PlaceBidCommand;
use crate::error::AuctionError;
use crate::input;
use crate::loader::{LoadPolicy, RosterLoader, RosterSource};
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, FromRef, Multipart, Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

// endregion: --- Imports

type ApiResult = Result<Json<Value>, AuctionError>;

// region:    --- App State
/// 라우터 공유 상태
#[derive(Clone)]
pub struct AppState {
    pub auction: SharedAuction,
    pub load_policy: Arc<LoadPolicy>,
}

impl AppState {
    pub fn new(auction: SharedAuction, load_policy: LoadPolicy) -> Self {
        Self {
            auction,
            load_policy: Arc::new(load_policy),
        }
    }
}

impl FromRef<AppState> for SharedAuction {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.auction)
    }
}

impl FromRef<AppState> for Arc<LoadPolicy> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.load_policy)
    }
}

/// 본문 추출 실패를 도메인 오류로 변환 (응답 형식 통일)
fn json_body<T>(
    body: Result<Json<T>, JsonRejection>,
    reject: impl FnOnce(String) -> AuctionError,
) -> Result<T, AuctionError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| reject(rejection.body_text()))
}
// endregion: --- App State

// region:    --- Router
/// 라우터 설정
pub fn routes(state: AppState, upload_limit_bytes: usize) -> Router {
    // 테스트 페이지를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/players", get(handle_get_players))
        .route("/api/players/:id", get(handle_get_player))
        .route("/api/bid", post(handle_bid))
        .route("/api/bids", get(handle_get_bids))
        .route("/api/export", get(handle_export))
        .route("/api/timer", get(handle_get_timer))
        .route("/api/reset-bids", post(handle_reset_bids))
        .route("/api/set-duration", post(handle_set_duration))
        .route("/api/restart", post(handle_restart))
        .route("/api/pause", post(handle_pause))
        .route("/api/resume", post(handle_resume))
        .route("/api/upload", post(handle_upload))
        .route("/api/load", post(handle_load))
        .layer(cors)
        .layer(DefaultBodyLimit::max(upload_limit_bytes))
        .with_state(state)
}
// endregion: --- Router

// region:    --- Query Handlers

/// 전체 선수 조회
pub async fn handle_get_players(State(auction): State<SharedAuction>) -> Json<Value> {
    info!("{:<12} --> 전체 선수 조회", "HandlerQuery");
    let auction = auction.lock().await;
    Json(json!(auction.list_items()))
}

/// 선수 조회
pub async fn handle_get_player(
    State(auction): State<SharedAuction>,
    Path(id): Path<String>,
) -> ApiResult {
    info!("{:<12} --> 선수 조회 id: {}", "HandlerQuery", id);
    let id = input::integer_like(&Value::String(id)).ok_or(AuctionError::ItemNotFound)?;
    let auction = auction.lock().await;
    Ok(Json(json!(auction.find_item(id)?)))
}

/// 남은 시간 조회
pub async fn handle_get_timer(State(auction): State<SharedAuction>) -> Json<Value> {
    let auction = auction.lock().await;
    Json(json!(auction.timer()))
}

/// 입찰 로그 조회
pub async fn handle_get_bids(State(auction): State<SharedAuction>) -> Json<Value> {
    info!("{:<12} --> 입찰 로그 조회", "HandlerQuery");
    let auction = auction.lock().await;
    Json(json!(auction.bid_log()))
}

/// 입찰 로그 CSV 다운로드
pub async fn handle_export(
    State(auction): State<SharedAuction>,
) -> Result<impl IntoResponse, AuctionError> {
    info!("{:<12} --> 입찰 로그 내보내기", "HandlerQuery");
    let csv = auction.lock().await.export_bids()?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"bids.csv\""),
        ],
        csv,
    ))
}

// endregion: --- Query Handlers

// region:    --- Command Handlers

/// 입찰 요청 처리
pub async fn handle_bid(
    State(auction): State<SharedAuction>,
    body: Result<Json<PlaceBidCommand>, JsonRejection>,
) -> ApiResult {
    let cmd = json_body(body, AuctionError::InvalidBid)?;
    let item = auction.lock().await.place_bid(&cmd)?;
    Ok(Json(json!({
        "success": true,
        "message": "Bid placed successfully.",
        "player": item,
    })))
}

/// 입찰 상태 초기화
pub async fn handle_reset_bids(State(auction): State<SharedAuction>) -> Json<Value> {
    info!("{:<12} --> 입찰 초기화 요청", "Command");
    auction.lock().await.reset_bids();
    Json(json!({ "success": true, "message": "All bids have been reset." }))
}

#[derive(Debug, Deserialize)]
pub struct SetDurationRequest {
    #[serde(default)]
    pub minutes: Value,
}

/// 경매 시간 설정
pub async fn handle_set_duration(
    State(auction): State<SharedAuction>,
    body: Result<Json<SetDurationRequest>, JsonRejection>,
) -> ApiResult {
    let req = json_body(body, |_| AuctionError::InvalidDuration)?;
    info!("{:<12} --> 경매 시간 설정 요청: {}", "Command", req.minutes);
    let timer = auction.lock().await.set_duration(&req.minutes)?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Auction duration set to {} minutes.", timer.duration_minutes),
        "timer": timer,
    })))
}

/// 경매 재시작
pub async fn handle_restart(State(auction): State<SharedAuction>) -> Json<Value> {
    info!("{:<12} --> 경매 재시작 요청", "Command");
    let timer = auction.lock().await.restart();
    Json(json!({ "success": true, "message": "Auction restarted.", "timer": timer }))
}

/// 경매 일시정지
pub async fn handle_pause(State(auction): State<SharedAuction>) -> ApiResult {
    info!("{:<12} --> 경매 일시정지 요청", "Command");
    let timer = auction.lock().await.pause()?;
    Ok(Json(json!({ "success": true, "message": "Auction paused.", "timer": timer })))
}

/// 경매 재개
pub async fn handle_resume(State(auction): State<SharedAuction>) -> ApiResult {
    info!("{:<12} --> 경매 재개 요청", "Command");
    let timer = auction.lock().await.resume()?;
    Ok(Json(json!({ "success": true, "message": "Auction resumed.", "timer": timer })))
}

/// 명단 CSV 업로드
pub async fn handle_upload(
    State(auction): State<SharedAuction>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult {
    info!("{:<12} --> 명단 업로드 요청", "Command");
    let mut multipart = multipart.map_err(|e| AuctionError::LoadFailed(e.body_text()))?;
    let mut data = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AuctionError::LoadFailed(e.to_string()))?
    {
        if field.name() == Some("file") || field.file_name().is_some() {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AuctionError::LoadFailed(e.to_string()))?;
            data = Some(bytes.to_vec());
            break;
        }
    }
    let data = data.ok_or_else(|| AuctionError::LoadFailed("no file uploaded".to_string()))?;
    install_roster(&auction, RosterSource::Bytes(data)).await
}

#[derive(Debug, Deserialize)]
pub struct LoadRequest {
    pub path: Option<PathBuf>,
    pub url: Option<String>,
}

/// 파일 경로 또는 URL 에서 명단 로드
/// 명단 디렉터리와 URL 허용 목록 안의 소스만 허용한다.
pub async fn handle_load(
    State(auction): State<SharedAuction>,
    State(load_policy): State<Arc<LoadPolicy>>,
    body: Result<Json<LoadRequest>, JsonRejection>,
) -> ApiResult {
    let req = json_body(body, AuctionError::LoadFailed)?;
    info!("{:<12} --> 명단 로드 요청: {:?}", "Command", req);
    let source = match (req.path, req.url) {
        (Some(path), _) => load_policy.resolve_path(&path).await?,
        (None, Some(url)) => load_policy.resolve_url(&url)?,
        (None, None) => {
            return Err(AuctionError::LoadFailed(
                "either path or url is required".to_string(),
            ))
        }
    };
    install_roster(&auction, source).await
}

/// 잠금 밖에서 로드한 뒤 한 번에 교체
async fn install_roster(auction: &SharedAuction, source: RosterSource) -> ApiResult {
    let items = source.load().await?;
    let count = items.len();
    auction.lock().await.replace_roster(items);
    Ok(Json(json!({
        "success": true,
        "message": format!("Loaded {} players.", count),
        "count": count,
    })))
}

// endregion: --- Command Handlers
