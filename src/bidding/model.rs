use crate::input;
use crate::roster::Item;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// 입찰 요청
// playerId, bidAmount 는 숫자와 숫자 문자열 모두 허용
// 형식 검증은 입찰 엔진이 하므로 모든 필드를 Value 로 받는다
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBidCommand {
    #[serde(default)]
    pub player_id: Value,
    #[serde(default)]
    pub bidder_name: Value,
    #[serde(default)]
    pub bid_amount: Value,
}

impl PlaceBidCommand {
    pub fn new(player_id: i64, bidder_name: impl Into<String>, bid_amount: f64) -> Self {
        Self {
            player_id: Value::from(player_id),
            bidder_name: Value::String(bidder_name.into()),
            bid_amount: Value::from(bid_amount),
        }
    }

    pub fn item_id(&self) -> Option<i64> {
        input::integer_like(&self.player_id)
    }

    /// 공백을 제외한 입찰자 이름 (문자열이 아니거나 비어 있으면 None)
    pub fn bidder(&self) -> Option<&str> {
        self.bidder_name
            .as_str()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    pub fn amount(&self) -> Option<f64> {
        input::number_like(&self.bid_amount)
    }
}

// 입찰 로그 항목 (추가 전용)
// 필드 순서가 CSV 내보내기 컬럼 순서다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidLogEntry {
    pub item_id: i64,
    pub item_name: String,
    pub position: Option<String>,
    pub club: Option<String>,
    pub bidder_name: String,
    pub bid_amount: f64,
    pub timestamp: DateTime<Utc>,
}

impl BidLogEntry {
    /// 수락 시점의 선수 정보로 로그 항목 생성
    pub fn accepted(item: &Item, at: DateTime<Utc>) -> Self {
        Self {
            item_id: item.id,
            item_name: item.name.clone(),
            position: item.position.clone(),
            club: item.club.clone(),
            bidder_name: item.highest_bidder.clone(),
            bid_amount: item.highest_bid,
            timestamp: at,
        }
    }
}
