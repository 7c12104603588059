/// 선수 명단 저장소
/// 경매 대상 선수 목록과 각 선수의 최고 입찰 상태를 보관한다.
// region:    --- Imports
use crate::error::AuctionError;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

pub mod model;

pub use model::Item;
// endregion: --- Imports

// region:    --- Roster Store
#[derive(Debug, Default)]
pub struct RosterStore {
    items: Vec<Item>,
}

impl RosterStore {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// 기본 명단 생성 (Player 1..N)
    pub fn seeded(count: usize) -> Self {
        let items = (1..=count)
            .map(|i| Item::new(i as i64, format!("Player {}", i)))
            .collect();
        Self::new(items)
    }

    /// 로드 순서대로 전체 명단 조회
    pub fn list_items(&self) -> &[Item] {
        &self.items
    }

    pub fn find_by_id(&self, id: i64) -> Result<&Item, AuctionError> {
        self.items
            .iter()
            .find(|item| item.id == id)
            .ok_or(AuctionError::ItemNotFound)
    }

    /// 명단 전체 교체
    pub fn replace_all(&mut self, items: Vec<Item>) {
        info!(
            "{:<12} --> 명단 교체: {} -> {} 명",
            "Roster",
            self.items.len(),
            items.len()
        );
        self.items = items;
    }

    /// 모든 선수의 입찰 상태 초기화 (입찰 로그는 유지)
    pub fn reset_bids(&mut self) {
        for item in &mut self.items {
            item.highest_bid = 0.0;
            item.highest_bidder.clear();
            item.timestamp = None;
        }
        info!("{:<12} --> 입찰 상태 초기화: {} 명", "Roster", self.items.len());
    }

    /// 입찰 반영. 검증은 입찰 엔진이 담당한다.
    pub(crate) fn record_bid(
        &mut self,
        id: i64,
        bidder_name: &str,
        bid_amount: f64,
        at: DateTime<Utc>,
    ) -> Result<&Item, AuctionError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(AuctionError::ItemNotFound)?;
        item.highest_bid = bid_amount;
        item.highest_bidder = bidder_name.to_string();
        item.timestamp = Some(at);
        debug!("{:<12} --> 입찰 반영 id: {}, 금액: {}", "Roster", id, bid_amount);
        Ok(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
// endregion: --- Roster Store
