// region:    --- Imports
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
// endregion: --- Imports

// region:    --- Auction Error
/// 경매 도메인 오류
/// 모든 오류는 호출자가 복구 가능한 거절이며, 거절 시 내부 상태는 변경되지 않는다.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuctionError {
    #[error("Auction has ended.")]
    AuctionEnded,
    #[error("Player not found.")]
    ItemNotFound,
    #[error("Invalid bid: {0}")]
    InvalidBid(String),
    #[error("Bid must be higher than the current highest bid of {highest}.")]
    BidTooLow { highest: f64 },
    #[error("Duration must be a whole number of minutes between 1 and 120.")]
    InvalidDuration,
    #[error("Timer is already paused.")]
    AlreadyPaused,
    #[error("Timer is not paused.")]
    NotPaused,
    #[error("Roster load failed: {0}")]
    LoadFailed(String),
    #[error("Bid log export failed: {0}")]
    ExportFailed(String),
}

impl AuctionError {
    /// 응답에 포함되는 오류 코드
    pub fn code(&self) -> &'static str {
        match self {
            Self::AuctionEnded => "AUCTION_ENDED",
            Self::ItemNotFound => "ITEM_NOT_FOUND",
            Self::InvalidBid(_) => "INVALID_BID",
            Self::BidTooLow { .. } => "BID_TOO_LOW",
            Self::InvalidDuration => "INVALID_DURATION",
            Self::AlreadyPaused => "ALREADY_PAUSED",
            Self::NotPaused => "NOT_PAUSED",
            Self::LoadFailed(_) => "LOAD_FAILED",
            Self::ExportFailed(_) => "EXPORT_FAILED",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::ItemNotFound => StatusCode::NOT_FOUND,
            Self::AuctionEnded | Self::AlreadyPaused | Self::NotPaused => StatusCode::CONFLICT,
            Self::InvalidBid(_) | Self::BidTooLow { .. } | Self::InvalidDuration => {
                StatusCode::BAD_REQUEST
            }
            Self::LoadFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ExportFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuctionError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(serde_json::json!({
                "success": false,
                "code": self.code(),
                "message": self.to_string(),
            })),
        )
            .into_response()
    }
}
// endregion: --- Auction Error
