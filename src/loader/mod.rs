/// 명단 일괄 로드
/// CSV 명단 소스(파일, URL, 업로드 데이터)를 읽어 입찰 기록이 없는 선수 목록으로 변환한다.
/// 하나라도 실패하면 전체 로드가 실패한다.
// region:    --- Imports
use crate::error::AuctionError;
use crate::roster::Item;
use async_trait::async_trait;
use reqwest::Url;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{error, info};

// endregion: --- Imports

// region:    --- Roster Loader Trait
/// 명단 로더 트레이트
#[async_trait]
pub trait RosterLoader {
    async fn load(&self) -> Result<Vec<Item>, AuctionError>;
}

/// 명단 소스
#[derive(Debug, Clone)]
pub enum RosterSource {
    File(PathBuf),
    Url(String),
    Bytes(Vec<u8>),
}

#[async_trait]
impl RosterLoader for RosterSource {
    async fn load(&self) -> Result<Vec<Item>, AuctionError> {
        let data = match self {
            Self::File(path) => {
                info!("{:<12} --> 명단 파일 로드: {}", "Loader", path.display());
                tokio::fs::read(path)
                    .await
                    .map_err(|e| load_failed(format!("{}: {}", path.display(), e)))?
            }
            Self::Url(url) => {
                info!("{:<12} --> 명단 URL 로드: {}", "Loader", url);
                fetch(url).await?
            }
            Self::Bytes(bytes) => bytes.clone(),
        };
        parse_roster(&data)
    }
}

/// 리다이렉트는 따라가지 않는다 (허용 목록 밖으로 나가지 않도록)
async fn fetch(url: &str) -> Result<Vec<u8>, AuctionError> {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .map_err(|e| load_failed(e.to_string()))?;
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| load_failed(e.to_string()))?;
    if !response.status().is_success() {
        return Err(load_failed(format!("{}: status {}", url, response.status())));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|e| load_failed(e.to_string()))?;
    Ok(bytes.to_vec())
}

fn load_failed(reason: String) -> AuctionError {
    error!("{:<12} --> 명단 로드 실패: {}", "Loader", reason);
    AuctionError::LoadFailed(reason)
}
// endregion: --- Roster Loader Trait

// region:    --- Load Policy
/// HTTP 요청으로 허용되는 명단 소스 범위
/// 디렉터리나 허용 목록이 설정되지 않으면 해당 소스는 거절한다.
#[derive(Debug, Clone, Default)]
pub struct LoadPolicy {
    pub roster_dir: Option<PathBuf>,
    pub url_allowlist: Vec<Url>,
}

impl LoadPolicy {
    /// 명단 디렉터리 안의 파일만 허용 (심볼릭 링크, `..` 는 정규화 후 검사)
    pub async fn resolve_path(&self, requested: &Path) -> Result<RosterSource, AuctionError> {
        let dir = self
            .roster_dir
            .as_ref()
            .ok_or_else(|| load_failed("file loading is disabled".to_string()))?;
        let dir = tokio::fs::canonicalize(dir)
            .await
            .map_err(|e| load_failed(format!("roster directory unavailable: {}", e)))?;
        let unavailable = || {
            load_failed(format!(
                "{}: not available in roster directory",
                requested.display()
            ))
        };
        let path = tokio::fs::canonicalize(dir.join(requested))
            .await
            .map_err(|_| unavailable())?;
        if !path.starts_with(&dir) {
            return Err(unavailable());
        }
        Ok(RosterSource::File(path))
    }

    /// 허용 목록의 출처와 경로 접두사가 일치하는 URL 만 허용
    pub fn resolve_url(&self, requested: &str) -> Result<RosterSource, AuctionError> {
        let url = Url::parse(requested).map_err(|e| load_failed(format!("invalid url: {}", e)))?;
        let allowed = self
            .url_allowlist
            .iter()
            .any(|prefix| prefix.origin() == url.origin() && url.path().starts_with(prefix.path()));
        if !allowed {
            return Err(load_failed(format!("{}: url is not allowed", url)));
        }
        Ok(RosterSource::Url(url.to_string()))
    }
}
// endregion: --- Load Policy

// region:    --- CSV Parsing
struct Columns {
    id: Option<usize>,
    name: usize,
    position: Option<usize>,
    club: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, AuctionError> {
        let find = |aliases: &[&str]| {
            headers
                .iter()
                .position(|h| aliases.contains(&h.trim().to_lowercase().as_str()))
        };
        Ok(Self {
            id: find(&["id", "player id", "player_id"]),
            name: find(&["name", "player", "player name", "player_name"])
                .ok_or_else(|| load_failed("missing name column".to_string()))?,
            position: find(&["position", "pos"]),
            club: find(&["club", "team"]),
        })
    }
}

/// CSV 명단 파싱
/// id 컬럼이 없거나 비어 있으면 행 순서(1부터)로 지정한다.
pub fn parse_roster(data: &[u8]) -> Result<Vec<Item>, AuctionError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data);
    let headers = rdr
        .headers()
        .map_err(|e| load_failed(e.to_string()))?
        .clone();
    let columns = Columns::from_headers(&headers)?;

    let mut items = Vec::new();
    let mut seen = HashSet::new();
    for (index, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| load_failed(e.to_string()))?;
        let row = index + 1;
        let cell = |col: Option<usize>| {
            col.and_then(|c| record.get(c))
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let id = match cell(columns.id) {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| load_failed(format!("row {}: invalid id '{}'", row, raw)))?,
            None => row as i64,
        };
        if !seen.insert(id) {
            return Err(load_failed(format!("row {}: duplicate id {}", row, id)));
        }
        let name = cell(Some(columns.name))
            .ok_or_else(|| load_failed(format!("row {}: missing name", row)))?;

        items.push(Item::new(id, name).with_details(cell(columns.position), cell(columns.club)));
    }

    if items.is_empty() {
        return Err(load_failed("roster source contained no rows".to_string()));
    }
    info!("{:<12} --> 명단 파싱 완료: {} 명", "Loader", items.len());
    Ok(items)
}
// endregion: --- CSV Parsing
