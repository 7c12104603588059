/// 입찰 로그
/// 수락된 모든 입찰의 추가 전용 기록. 선수 상태 초기화나 명단 교체와 무관하게 유지된다.
// region:    --- Imports
use super::model::BidLogEntry;
use crate::error::AuctionError;
use tracing::info;

// endregion: --- Imports

// region:    --- Bid Log
#[derive(Debug, Default)]
pub struct BidLog {
    entries: Vec<BidLogEntry>,
}

impl BidLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, entry: BidLogEntry) {
        self.entries.push(entry);
    }

    /// 추가된 순서대로 조회
    pub fn entries(&self) -> &[BidLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// CSV 내보내기
    /// 컬럼: itemId, itemName, position, club, bidderName, bidAmount, timestamp
    pub fn to_csv(&self) -> Result<String, AuctionError> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        if self.entries.is_empty() {
            wtr.write_record(EXPORT_HEADER)
                .map_err(|e| AuctionError::ExportFailed(e.to_string()))?;
        }
        for entry in &self.entries {
            wtr.serialize(entry)
                .map_err(|e| AuctionError::ExportFailed(e.to_string()))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AuctionError::ExportFailed(e.to_string()))?;
        info!("{:<12} --> 입찰 로그 내보내기: {} 건", "BidLog", self.entries.len());
        String::from_utf8(bytes).map_err(|e| AuctionError::ExportFailed(e.to_string()))
    }
}

const EXPORT_HEADER: [&str; 7] = [
    "itemId",
    "itemName",
    "position",
    "club",
    "bidderName",
    "bidAmount",
    "timestamp",
];
// endregion: --- Bid Log
