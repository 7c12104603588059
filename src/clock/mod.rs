/// 경매 시계
/// 마감 시각, 일시정지 상태, 카운트다운 틱 핸들을 소유한다.
// region:    --- Imports
use crate::error::AuctionError;
use crate::input;
use crate::scheduler::Ticker;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

// endregion: --- Imports

/// 허용되는 경매 시간 범위 (분)
pub const MIN_DURATION_MINUTES: i64 = 1;
pub const MAX_DURATION_MINUTES: i64 = 120;

// region:    --- Clock Source
/// 현재 시각 제공자
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
// endregion: --- Clock Source

// region:    --- Clock State
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockState {
    Running { end_time: DateTime<Utc> },
    Paused { remaining: Duration },
}

/// 시계 상태 조회 결과
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClockStatus {
    pub paused: bool,
    /// 일시정지 중에는 None
    pub end_time: Option<DateTime<Utc>>,
    pub remaining_seconds: i64,
    pub duration_minutes: i64,
    pub ended: bool,
}

/// 분 단위 경매 시간 검증
pub fn parse_minutes(value: &serde_json::Value) -> Result<i64, AuctionError> {
    input::integer_like(value)
        .filter(|m| (MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(m))
        .ok_or(AuctionError::InvalidDuration)
}
// endregion: --- Clock State

// region:    --- Auction Clock
pub struct AuctionClock {
    clock: Arc<dyn Clock>,
    state: ClockState,
    duration: Duration,
    tick_period: std::time::Duration,
    ticker: Option<Ticker>,
}

impl AuctionClock {
    /// 지금부터 `minutes` 분 뒤에 마감되는 시계 생성
    pub fn start(clock: Arc<dyn Clock>, minutes: i64, tick_period: std::time::Duration) -> Self {
        let duration = Duration::minutes(minutes);
        let end_time = clock.now() + duration;
        let mut auction_clock = Self {
            clock,
            state: ClockState::Running { end_time },
            duration,
            tick_period,
            ticker: None,
        };
        auction_clock.run_until(end_time);
        auction_clock
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    /// 마감 시각 (일시정지 중에는 None)
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        match self.state {
            ClockState::Running { end_time } => Some(end_time),
            ClockState::Paused { .. } => None,
        }
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, ClockState::Paused { .. })
    }

    /// 남은 시간 (0 미만으로 내려가지 않음)
    pub fn remaining(&self) -> Duration {
        match self.state {
            ClockState::Running { end_time } => (end_time - self.now()).max(Duration::zero()),
            ClockState::Paused { remaining } => remaining,
        }
    }

    /// 마감 여부
    /// 일시정지 중에는 시간이 흐르지 않으므로 남은 시간이 0일 때만 마감이다.
    pub fn has_ended(&self) -> bool {
        match self.state {
            ClockState::Running { end_time } => self.now() > end_time,
            ClockState::Paused { remaining } => remaining <= Duration::zero(),
        }
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(Ticker::is_running)
    }

    pub fn status(&self) -> ClockStatus {
        ClockStatus {
            paused: self.is_paused(),
            end_time: self.end_time(),
            remaining_seconds: self.remaining().num_seconds(),
            duration_minutes: self.duration.num_minutes(),
            ended: self.has_ended(),
        }
    }

    /// 경매 시간 재설정
    /// 검증 실패 시 시계는 변경되지 않는다.
    pub fn set_duration(&mut self, minutes: &serde_json::Value) -> Result<ClockStatus, AuctionError> {
        let minutes = parse_minutes(minutes).map_err(|e| {
            warn!("{:<12} --> 잘못된 경매 시간: {}", "Clock", minutes);
            e
        })?;
        self.duration = Duration::minutes(minutes);
        let end_time = self.now() + self.duration;
        self.state = ClockState::Running { end_time };
        self.run_until(end_time);
        info!("{:<12} --> 경매 시간 설정: {}분", "Clock", minutes);
        Ok(self.status())
    }

    /// 현재 설정된 시간으로 경매 재시작
    pub fn restart(&mut self) -> ClockStatus {
        let end_time = self.now() + self.duration;
        self.state = ClockState::Running { end_time };
        self.run_until(end_time);
        info!(
            "{:<12} --> 경매 재시작: {}분",
            "Clock",
            self.duration.num_minutes()
        );
        self.status()
    }

    pub fn pause(&mut self) -> Result<ClockStatus, AuctionError> {
        let ClockState::Running { end_time } = self.state else {
            return Err(AuctionError::AlreadyPaused);
        };
        let remaining = (end_time - self.now()).max(Duration::zero());
        self.state = ClockState::Paused { remaining };
        self.ticker = None;
        info!(
            "{:<12} --> 경매 일시정지, 남은 시간: {}초",
            "Clock",
            remaining.num_seconds()
        );
        Ok(self.status())
    }

    pub fn resume(&mut self) -> Result<ClockStatus, AuctionError> {
        let ClockState::Paused { remaining } = self.state else {
            return Err(AuctionError::NotPaused);
        };
        let end_time = self.now() + remaining;
        self.state = ClockState::Running { end_time };
        self.run_until(end_time);
        info!(
            "{:<12} --> 경매 재개, 남은 시간: {}초",
            "Clock",
            remaining.num_seconds()
        );
        Ok(self.status())
    }

    /// 기존 틱을 취소하고 새 틱 시작
    fn run_until(&mut self, end_time: DateTime<Utc>) {
        self.ticker = None;
        self.ticker = Ticker::spawn(Arc::clone(&self.clock), end_time, self.tick_period);
    }
}
// endregion: --- Auction Clock
