/// 경매 카운트다운 틱 스케줄러
/// 남은 시간을 주기적으로 기록하기만 하며 경매 상태는 변경하지 않는다.
/// 입찰 마감 여부는 항상 입찰 엔진이 직접 판단한다.
// region:    --- Imports
use crate::clock::Clock;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info};

// endregion: --- Imports

/// 틱 주기 하한 (interval 은 0 주기를 허용하지 않는다)
pub const MIN_TICK_PERIOD: Duration = Duration::from_millis(10);

// region:    --- Ticker
/// 카운트다운 틱 핸들
/// 핸들이 해제되면 틱 작업도 취소된다.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    /// 틱 작업 시작
    /// 런타임 밖에서 호출되면 틱 없이 None을 반환한다.
    pub fn spawn(clock: Arc<dyn Clock>, end_time: DateTime<Utc>, period: Duration) -> Option<Self> {
        let runtime = Handle::try_current().ok()?;
        let period = period.max(MIN_TICK_PERIOD);
        let handle = runtime.spawn(async move {
            let mut interval = interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let remaining = end_time - clock.now();
                if remaining <= ChronoDuration::zero() {
                    info!("{:<12} --> 경매 시간이 종료되었습니다.", "Scheduler");
                    break;
                }
                debug!(
                    "{:<12} --> 남은 시간: {}초",
                    "Scheduler",
                    remaining.num_seconds()
                );
            }
        });
        Some(Self { handle })
    }

    /// 틱 작업이 아직 살아있는지 여부
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
// endregion: --- Ticker
