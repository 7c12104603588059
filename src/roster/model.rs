use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 선수(경매 대상) 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club: Option<String>,
    pub highest_bid: f64,
    /// 빈 문자열이면 아직 입찰이 없다
    pub highest_bidder: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Item {
    /// 입찰 기록이 없는 새 선수
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            position: None,
            club: None,
            highest_bid: 0.0,
            highest_bidder: String::new(),
            timestamp: None,
        }
    }

    pub fn with_details(mut self, position: Option<String>, club: Option<String>) -> Self {
        self.position = position;
        self.club = club;
        self
    }

    pub fn has_bid(&self) -> bool {
        !self.highest_bidder.is_empty()
    }
}
