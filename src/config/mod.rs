/// 환경 변수 기반 설정
// region:    --- Imports
use crate::clock::{MAX_DURATION_MINUTES, MIN_DURATION_MINUTES};
use crate::loader::{LoadPolicy, RosterSource};
use reqwest::Url;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

// endregion: --- Imports

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{key}: invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

// region:    --- Config
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub settings: AuctionSettings,
    pub seed_players: usize,
    pub roster_source: Option<RosterSource>,
    /// HTTP 명단 로드 허용 범위
    pub load_policy: LoadPolicy,
    pub upload_limit_bytes: usize,
}

/// 경매 동작 설정
#[derive(Debug, Clone)]
pub struct AuctionSettings {
    pub duration_minutes: i64,
    /// false 이면 마감 후에도 입찰을 받는다
    pub enforce_deadline: bool,
    pub tick_period: Duration,
}

impl Default for AuctionSettings {
    fn default() -> Self {
        Self {
            duration_minutes: 30,
            enforce_deadline: true,
            tick_period: Duration::from_secs(1),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            settings: AuctionSettings::default(),
            seed_players: 3,
            roster_source: None,
            load_policy: LoadPolicy::default(),
            upload_limit_bytes: 20 * 1024 * 1024,
        }
    }
}

impl Config {
    /// 환경 변수에서 설정 로드 (없는 값은 기본값)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = lookup("AUCTION_BIND_ADDR") {
            config.bind_addr = parse("AUCTION_BIND_ADDR", &v)?;
        }
        if let Some(v) = lookup("AUCTION_DURATION_MINUTES") {
            let minutes: i64 = parse("AUCTION_DURATION_MINUTES", &v)?;
            if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&minutes) {
                return Err(invalid("AUCTION_DURATION_MINUTES", &v));
            }
            config.settings.duration_minutes = minutes;
        }
        if let Some(v) = lookup("AUCTION_ENFORCE_DEADLINE") {
            config.settings.enforce_deadline = match v.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(invalid("AUCTION_ENFORCE_DEADLINE", &v)),
            };
        }
        if let Some(v) = lookup("AUCTION_TICK_SECONDS") {
            let secs: u64 = parse("AUCTION_TICK_SECONDS", &v)?;
            if secs == 0 {
                return Err(invalid("AUCTION_TICK_SECONDS", &v));
            }
            config.settings.tick_period = Duration::from_secs(secs);
        }
        if let Some(v) = lookup("AUCTION_SEED_PLAYERS") {
            config.seed_players = parse("AUCTION_SEED_PLAYERS", &v)?;
        }
        if let Some(v) = lookup("AUCTION_UPLOAD_LIMIT_MB") {
            let mb: usize = parse("AUCTION_UPLOAD_LIMIT_MB", &v)?;
            config.upload_limit_bytes = mb
                .checked_mul(1024 * 1024)
                .ok_or_else(|| invalid("AUCTION_UPLOAD_LIMIT_MB", &v))?;
        }
        if let Some(dir) = lookup("AUCTION_ROSTER_DIR").filter(|d| !d.trim().is_empty()) {
            config.load_policy.roster_dir = Some(PathBuf::from(dir));
        }
        if let Some(v) = lookup("AUCTION_ROSTER_URL_ALLOWLIST") {
            config.load_policy.url_allowlist = v
                .split(',')
                .map(str::trim)
                .filter(|prefix| !prefix.is_empty())
                .map(|prefix| Url::parse(prefix).map_err(|_| invalid("AUCTION_ROSTER_URL_ALLOWLIST", prefix)))
                .collect::<Result<_, _>>()?;
        }
        // 파일 경로가 URL 보다 우선
        config.roster_source = match (lookup("AUCTION_ROSTER_PATH"), lookup("AUCTION_ROSTER_URL")) {
            (Some(path), _) if !path.trim().is_empty() => Some(RosterSource::File(PathBuf::from(path))),
            (_, Some(url)) if !url.trim().is_empty() => Some(RosterSource::Url(url)),
            _ => None,
        };

        Ok(config)
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
    }
}
// endregion: --- Config
