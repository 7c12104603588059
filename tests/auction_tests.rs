use chrono::{DateTime, Duration, TimeZone, Utc};
use player_auction::auction::Auction;
use player_auction::bidding::PlaceBidCommand;
use player_auction::clock::{Clock, ClockState};
use player_auction::config::AuctionSettings;
use player_auction::error::AuctionError;
use player_auction::roster::{Item, RosterStore};
use serde_json::json;
use std::sync::{Arc, Mutex};

/// 트레이싱 초기화
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .without_time()
        .with_target(false)
        .with_test_writer()
        .try_init();
}

/// 테스트에서 직접 움직이는 시계
struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    fn new() -> Arc<Self> {
        Arc::new(Self(Mutex::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        )))
    }

    fn advance(&self, by: Duration) {
        let mut now = self.0.lock().unwrap();
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// 기본 명단(3명)과 30분 시계로 경매 생성
fn setup() -> (Auction, Arc<ManualClock>) {
    setup_with(AuctionSettings::default())
}

fn setup_with(settings: AuctionSettings) -> (Auction, Arc<ManualClock>) {
    init_tracing();
    let clock = ManualClock::new();
    let auction = Auction::with_clock(&settings, RosterStore::seeded(3), clock.clone());
    (auction, clock)
}

fn bid(id: i64, bidder: &str, amount: f64) -> PlaceBidCommand {
    PlaceBidCommand::new(id, bidder, amount)
}

// region:    --- Bidding

#[test]
fn test_end_to_end_scenario() {
    let (mut auction, _) = setup();
    assert!(auction
        .list_items()
        .iter()
        .all(|item| item.highest_bid == 0.0 && item.highest_bidder.is_empty()));

    let item = auction.place_bid(&bid(1, "Alice", 100.0)).unwrap();
    assert_eq!(item.highest_bid, 100.0);
    assert_eq!(item.highest_bidder, "Alice");

    let err = auction.place_bid(&bid(1, "Bob", 50.0)).unwrap_err();
    assert_eq!(err, AuctionError::BidTooLow { highest: 100.0 });

    let item = auction.find_item(1).unwrap();
    assert_eq!(item.highest_bid, 100.0);
    assert_eq!(item.highest_bidder, "Alice");

    let log = auction.bid_log();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].item_id, 1);
    assert_eq!(log[0].bidder_name, "Alice");
    assert_eq!(log[0].bid_amount, 100.0);
}

#[test]
fn test_tie_rejected_and_higher_accepted() {
    let (mut auction, _) = setup();
    auction.place_bid(&bid(2, "Alice", 100.0)).unwrap();

    assert_eq!(
        auction.place_bid(&bid(2, "Bob", 100.0)).unwrap_err(),
        AuctionError::BidTooLow { highest: 100.0 }
    );
    let item = auction.place_bid(&bid(2, "Bob", 101.0)).unwrap();
    assert_eq!(item.highest_bidder, "Bob");
    assert_eq!(auction.bid_log().len(), 2);
}

#[test]
fn test_zero_bid_on_fresh_item_rejected() {
    let (mut auction, _) = setup();
    assert_eq!(
        auction.place_bid(&bid(3, "Alice", 0.0)).unwrap_err(),
        AuctionError::BidTooLow { highest: 0.0 }
    );
    assert!(auction.bid_log().is_empty());
}

#[test]
fn test_highest_bid_never_decreases() {
    let (mut auction, _) = setup();
    let mut last = 0.0;
    for amount in [10.0, 5.0, 20.0, 20.0, 15.0, 30.5, 1.0] {
        let _ = auction.place_bid(&bid(1, "Alice", amount));
        let current = auction.find_item(1).unwrap().highest_bid;
        assert!(current >= last);
        last = current;
    }
    assert_eq!(last, 30.5);
    assert_eq!(auction.bid_log().len(), 3);
}

#[test]
fn test_unknown_item_rejected() {
    let (mut auction, _) = setup();
    assert_eq!(
        auction.place_bid(&bid(99, "Alice", 100.0)).unwrap_err(),
        AuctionError::ItemNotFound
    );

    let cmd = PlaceBidCommand {
        player_id: json!("abc"),
        bidder_name: json!("Alice"),
        bid_amount: json!(100),
    };
    assert_eq!(auction.place_bid(&cmd).unwrap_err(), AuctionError::ItemNotFound);
}

#[test]
fn test_string_inputs_accepted() {
    let (mut auction, _) = setup();
    let cmd = PlaceBidCommand {
        player_id: json!("2"),
        bidder_name: json!("Alice"),
        bid_amount: json!("250"),
    };
    let item = auction.place_bid(&cmd).unwrap();
    assert_eq!(item.id, 2);
    assert_eq!(item.highest_bid, 250.0);
}

#[test]
fn test_invalid_bid_rejected_without_mutation() {
    let (mut auction, _) = setup();

    let err = auction.place_bid(&bid(1, "  ", 100.0)).unwrap_err();
    assert!(matches!(err, AuctionError::InvalidBid(_)));

    let cmd = PlaceBidCommand {
        player_id: json!(1),
        bidder_name: json!("Alice"),
        bid_amount: json!("lots"),
    };
    assert!(matches!(
        auction.place_bid(&cmd).unwrap_err(),
        AuctionError::InvalidBid(_)
    ));

    assert!(!auction.find_item(1).unwrap().has_bid());
    assert!(auction.bid_log().is_empty());
}

#[test]
fn test_non_string_bidder_rejected() {
    let (mut auction, _) = setup();
    for bidder_name in [json!(null), json!(42), json!(["Alice"])] {
        let cmd = PlaceBidCommand {
            player_id: json!(1),
            bidder_name,
            bid_amount: json!(100),
        };
        assert!(matches!(
            auction.place_bid(&cmd).unwrap_err(),
            AuctionError::InvalidBid(_)
        ));
    }
    assert!(auction.bid_log().is_empty());
}

#[test]
fn test_every_accepted_bid_is_logged_at_acceptance_time() {
    let (mut auction, clock) = setup();
    for (i, amount) in [10.0, 20.0, 30.0].into_iter().enumerate() {
        clock.advance(Duration::seconds(7));
        let item = auction.place_bid(&bid(1, "Alice", amount)).unwrap();

        let log = auction.bid_log();
        assert_eq!(log.len(), i + 1);
        let entry = &log[i];
        assert_eq!(entry.timestamp, clock.now());
        assert_eq!(item.timestamp, Some(clock.now()));
        assert_eq!(entry.bid_amount, amount);
        assert_eq!(entry.bidder_name, "Alice");
    }
}

#[test]
fn test_bids_rejected_after_deadline() {
    let (mut auction, clock) = setup();
    clock.advance(Duration::minutes(30) + Duration::seconds(1));

    for cmd in [bid(1, "Alice", 1000.0), bid(99, "Bob", 1.0), bid(2, "", 0.0)] {
        assert_eq!(auction.place_bid(&cmd).unwrap_err(), AuctionError::AuctionEnded);
    }
    assert!(auction.bid_log().is_empty());
}

#[test]
fn test_bid_accepted_exactly_at_deadline() {
    let (mut auction, clock) = setup();
    clock.advance(Duration::minutes(30));
    assert!(auction.place_bid(&bid(1, "Alice", 10.0)).is_ok());
}

#[test]
fn test_deadline_enforcement_can_be_disabled() {
    let (mut auction, clock) = setup_with(AuctionSettings {
        enforce_deadline: false,
        ..AuctionSettings::default()
    });
    clock.advance(Duration::hours(3));
    assert!(auction.timer().ended);
    assert!(auction.place_bid(&bid(1, "Alice", 10.0)).is_ok());
}

// endregion: --- Bidding

// region:    --- Roster

#[test]
fn test_reset_bids_keeps_bid_log() {
    let (mut auction, _) = setup();
    auction.place_bid(&bid(1, "Alice", 100.0)).unwrap();
    auction.place_bid(&bid(2, "Bob", 200.0)).unwrap();

    auction.reset_bids();

    for item in auction.list_items() {
        assert_eq!(item.highest_bid, 0.0);
        assert!(item.highest_bidder.is_empty());
        assert!(item.timestamp.is_none());
    }
    assert_eq!(auction.bid_log().len(), 2);

    // 초기화 후에는 더 낮은 금액도 다시 입찰 가능
    assert!(auction.place_bid(&bid(1, "Carol", 10.0)).is_ok());
}

#[test]
fn test_replace_roster_keeps_bid_log() {
    let (mut auction, _) = setup();
    auction.place_bid(&bid(1, "Alice", 100.0)).unwrap();

    auction.replace_roster(vec![
        Item::new(10, "Striker").with_details(Some("FW".into()), Some("United".into())),
    ]);

    assert_eq!(auction.list_items().len(), 1);
    assert_eq!(auction.place_bid(&bid(1, "Bob", 500.0)).unwrap_err(), AuctionError::ItemNotFound);
    assert_eq!(auction.bid_log().len(), 1);
    assert_eq!(auction.bid_log()[0].item_name, "Player 1");

    auction.place_bid(&bid(10, "Bob", 5.0)).unwrap();
    let entry = &auction.bid_log()[1];
    assert_eq!(entry.position.as_deref(), Some("FW"));
    assert_eq!(entry.club.as_deref(), Some("United"));
}

#[test]
fn test_seeded_roster_in_load_order() {
    let roster = RosterStore::seeded(4);
    let names: Vec<_> = roster.list_items().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Player 1", "Player 2", "Player 3", "Player 4"]);
    assert_eq!(roster.find_by_id(5).unwrap_err(), AuctionError::ItemNotFound);
}

// endregion: --- Roster

// region:    --- Clock

#[test]
fn test_set_duration_validation() {
    let (mut auction, clock) = setup();
    let before = auction.clock().end_time();
    clock.advance(Duration::seconds(5));

    for minutes in [json!(0), json!(121), json!("abc"), json!(5.5), json!(null), json!(-3)] {
        assert_eq!(
            auction.set_duration(&minutes).unwrap_err(),
            AuctionError::InvalidDuration
        );
        assert_eq!(auction.clock().end_time(), before);
    }
}

#[test]
fn test_set_duration_sets_end_time() {
    let (mut auction, clock) = setup();
    clock.advance(Duration::minutes(2));

    let status = auction.set_duration(&json!(5)).unwrap();
    assert_eq!(status.end_time, Some(clock.now() + Duration::minutes(5)));
    assert_eq!(status.duration_minutes, 5);
    assert_eq!(status.remaining_seconds, 300);

    let status = auction.set_duration(&json!("120")).unwrap();
    assert_eq!(status.end_time, Some(clock.now() + Duration::minutes(120)));
}

#[test]
fn test_set_duration_clears_pause() {
    let (mut auction, clock) = setup();
    auction.pause().unwrap();
    auction.set_duration(&json!(1)).unwrap();
    assert!(!auction.clock().is_paused());
    assert_eq!(auction.clock().end_time(), Some(clock.now() + Duration::minutes(1)));
}

#[test]
fn test_pause_resume_preserves_remaining() {
    let (mut auction, clock) = setup();
    clock.advance(Duration::minutes(28) + Duration::seconds(30));

    let status = auction.pause().unwrap();
    assert!(status.paused);
    assert_eq!(status.remaining_seconds, 90);
    assert_eq!(status.end_time, None);

    clock.advance(Duration::seconds(10));
    assert_eq!(auction.timer().remaining_seconds, 90);

    let status = auction.resume().unwrap();
    assert_eq!(status.end_time, Some(clock.now() + Duration::seconds(90)));
    assert_eq!(
        auction.clock().state(),
        ClockState::Running {
            end_time: clock.now() + Duration::seconds(90)
        }
    );
}

#[test]
fn test_redundant_pause_and_resume_rejected() {
    let (mut auction, clock) = setup();
    assert_eq!(auction.resume().unwrap_err(), AuctionError::NotPaused);

    auction.pause().unwrap();
    let paused = auction.clock().state();
    clock.advance(Duration::seconds(20));
    assert_eq!(auction.pause().unwrap_err(), AuctionError::AlreadyPaused);
    assert_eq!(auction.clock().state(), paused);
}

#[test]
fn test_bids_while_paused() {
    let (mut auction, clock) = setup();
    auction.pause().unwrap();
    clock.advance(Duration::hours(1));

    // 일시정지 중에는 시간이 흐르지 않는다
    assert!(auction.place_bid(&bid(1, "Alice", 10.0)).is_ok());
}

#[test]
fn test_paused_after_expiry_stays_ended() {
    let (mut auction, clock) = setup();
    clock.advance(Duration::minutes(31));
    let status = auction.pause().unwrap();
    assert_eq!(status.remaining_seconds, 0);
    assert!(status.ended);
    assert_eq!(
        auction.place_bid(&bid(1, "Alice", 10.0)).unwrap_err(),
        AuctionError::AuctionEnded
    );
}

#[test]
fn test_restart_uses_current_duration() {
    let (mut auction, clock) = setup();
    auction.set_duration(&json!(10)).unwrap();
    clock.advance(Duration::minutes(15));
    assert!(auction.timer().ended);

    auction.pause().unwrap();
    let status = auction.restart();
    assert!(!status.paused);
    assert!(!status.ended);
    assert_eq!(status.end_time, Some(clock.now() + Duration::minutes(10)));
    assert!(auction.place_bid(&bid(1, "Alice", 1.0)).is_ok());
}

#[test]
fn test_no_ticker_outside_runtime() {
    let (auction, _) = setup();
    assert!(!auction.clock().is_ticking());
}

#[tokio::test]
async fn test_ticker_follows_transitions() {
    let (mut auction, _) = setup_with(AuctionSettings {
        tick_period: std::time::Duration::from_millis(10),
        ..AuctionSettings::default()
    });
    assert!(auction.clock().is_ticking());

    auction.pause().unwrap();
    assert!(!auction.clock().is_ticking());

    auction.resume().unwrap();
    assert!(auction.clock().is_ticking());

    auction.restart();
    auction.restart();
    assert!(auction.clock().is_ticking());
}

#[tokio::test]
async fn test_zero_tick_period_does_not_kill_ticker() {
    let (mut auction, _) = setup_with(AuctionSettings {
        tick_period: std::time::Duration::ZERO,
        ..AuctionSettings::default()
    });
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    assert!(auction.clock().is_ticking());

    auction.restart();
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    assert!(auction.clock().is_ticking());
}

#[tokio::test]
async fn test_ticker_stops_at_deadline() {
    let (auction, clock) = setup_with(AuctionSettings {
        tick_period: std::time::Duration::from_millis(10),
        ..AuctionSettings::default()
    });
    clock.advance(Duration::minutes(31));
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert!(!auction.clock().is_ticking());
}

// endregion: --- Clock

// region:    --- Export

#[test]
fn test_export_rows_in_append_order() {
    let (mut auction, _) = setup();
    auction.place_bid(&bid(1, "Alice", 100.0)).unwrap();
    auction.place_bid(&bid(2, "Bob", 75.5)).unwrap();
    auction.place_bid(&bid(1, "Carol", 120.0)).unwrap();

    let csv = auction.export_bids().unwrap();
    let mut rdr = csv::Reader::from_reader(csv.as_bytes());
    let headers: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(
        headers,
        ["itemId", "itemName", "position", "club", "bidderName", "bidAmount", "timestamp"]
    );

    let rows: Vec<csv::StringRecord> = rdr.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[0][0], "1");
    assert_eq!(&rows[0][1], "Player 1");
    assert_eq!(&rows[0][2], "");
    assert_eq!(&rows[0][4], "Alice");
    assert_eq!(rows[0][5].parse::<f64>().unwrap(), 100.0);
    assert_eq!(&rows[1][4], "Bob");
    assert_eq!(&rows[2][4], "Carol");
    assert!(rows[0][6].parse::<DateTime<Utc>>().is_ok());
}

#[test]
fn test_export_empty_log_has_header() {
    let (auction, _) = setup();
    let csv = auction.export_bids().unwrap();
    assert_eq!(
        csv.trim_end(),
        "itemId,itemName,position,club,bidderName,bidAmount,timestamp"
    );
}

// endregion: --- Export
