/// 경매 상태
/// 명단, 시계, 입찰 로그를 하나로 묶은 프로세스 단위 상태 객체.
/// 시작 시 한 번 생성되어 요청 핸들러로 전달된다.
// region:    --- Imports
use crate::bidding::commands::handle_place_bid;
use crate::bidding::{BidLog, BidLogEntry, PlaceBidCommand};
use crate::clock::{AuctionClock, Clock, ClockStatus, SystemClock};
use crate::config::AuctionSettings;
use crate::error::AuctionError;
use crate::roster::{Item, RosterStore};
use std::sync::Arc;
use tokio::sync::Mutex;

// endregion: --- Imports

/// 핸들러 간 공유되는 경매 상태
pub type SharedAuction = Arc<Mutex<Auction>>;

// region:    --- Auction
pub struct Auction {
    roster: RosterStore,
    clock: AuctionClock,
    bid_log: BidLog,
    enforce_deadline: bool,
}

impl Auction {
    pub fn new(settings: &AuctionSettings, roster: RosterStore) -> Self {
        Self::with_clock(settings, roster, Arc::new(SystemClock))
    }

    pub fn with_clock(settings: &AuctionSettings, roster: RosterStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            roster,
            clock: AuctionClock::start(clock, settings.duration_minutes, settings.tick_period),
            bid_log: BidLog::new(),
            enforce_deadline: settings.enforce_deadline,
        }
    }

    pub fn into_shared(self) -> SharedAuction {
        Arc::new(Mutex::new(self))
    }

    pub fn list_items(&self) -> &[Item] {
        self.roster.list_items()
    }

    pub fn find_item(&self, id: i64) -> Result<&Item, AuctionError> {
        self.roster.find_by_id(id)
    }

    pub fn place_bid(&mut self, cmd: &PlaceBidCommand) -> Result<Item, AuctionError> {
        handle_place_bid(
            cmd,
            &mut self.roster,
            &mut self.bid_log,
            &self.clock,
            self.enforce_deadline,
        )
    }

    pub fn reset_bids(&mut self) {
        self.roster.reset_bids();
    }

    /// 로드된 명단으로 전체 교체
    pub fn replace_roster(&mut self, items: Vec<Item>) {
        self.roster.replace_all(items);
    }

    pub fn timer(&self) -> ClockStatus {
        self.clock.status()
    }

    pub fn clock(&self) -> &AuctionClock {
        &self.clock
    }

    pub fn set_duration(&mut self, minutes: &serde_json::Value) -> Result<ClockStatus, AuctionError> {
        self.clock.set_duration(minutes)
    }

    pub fn restart(&mut self) -> ClockStatus {
        self.clock.restart()
    }

    pub fn pause(&mut self) -> Result<ClockStatus, AuctionError> {
        self.clock.pause()
    }

    pub fn resume(&mut self) -> Result<ClockStatus, AuctionError> {
        self.clock.resume()
    }

    pub fn bid_log(&self) -> &[BidLogEntry] {
        self.bid_log.entries()
    }

    pub fn export_bids(&self) -> Result<String, AuctionError> {
        self.bid_log.to_csv()
    }
}
// endregion: --- Auction
