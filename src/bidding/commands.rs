/// 입찰 커맨드 처리
/// 검증 순서: 마감 -> 선수 존재 -> 입찰 형식 -> 금액
// region:    --- Imports
use super::log::BidLog;
use super::model::{BidLogEntry, PlaceBidCommand};
use crate::clock::AuctionClock;
use crate::error::AuctionError;
use crate::roster::{Item, RosterStore};
use tracing::{info, warn};
// endregion: --- Imports

// region:    --- Commands
/// 입찰
/// 거절 시 명단과 입찰 로그는 변경되지 않는다.
pub fn handle_place_bid(
    cmd: &PlaceBidCommand,
    roster: &mut RosterStore,
    bid_log: &mut BidLog,
    clock: &AuctionClock,
    enforce_deadline: bool,
) -> Result<Item, AuctionError> {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);

    if enforce_deadline && clock.has_ended() {
        warn!("{:<12} --> 경매가 이미 종료되었습니다.", "Command");
        return Err(AuctionError::AuctionEnded);
    }

    let item_id = cmd.item_id().ok_or(AuctionError::ItemNotFound)?;
    let highest = roster.find_by_id(item_id)?.highest_bid;

    let bidder_name = cmd
        .bidder()
        .ok_or_else(|| AuctionError::InvalidBid("bidder name is required".to_string()))?;
    let bid_amount = cmd
        .amount()
        .ok_or_else(|| AuctionError::InvalidBid("bid amount must be a number".to_string()))?;

    // 동점 입찰은 거절
    if bid_amount <= highest {
        warn!(
            "{:<12} --> 입찰 금액이 현재 최고가보다 낮습니다: {} <= {}",
            "Command", bid_amount, highest
        );
        return Err(AuctionError::BidTooLow { highest });
    }

    let now = clock.now();
    let item = roster.record_bid(item_id, bidder_name, bid_amount, now)?;
    bid_log.append(BidLogEntry::accepted(item, now));
    info!(
        "{:<12} --> 입찰 성공: {} / {} / {}",
        "Command", item.name, bidder_name, bid_amount
    );
    Ok(item.clone())
}
// endregion: --- Commands
