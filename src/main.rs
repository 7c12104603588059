// region:    --- Imports
use player_auction::auction::Auction;
use player_auction::config::Config;
use player_auction::handlers::{self, AppState};
use player_auction::loader::RosterLoader;
use player_auction::roster::RosterStore;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // 설정 로드
    let config = Config::from_env().map_err(|e| {
        error!("{:<12} --> 설정 로드 실패: {}", "Main", e);
        e
    })?;
    info!("{:<12} --> 설정: {:?}", "Main", config);

    // 초기 명단 (소스 로드 실패 시 기본 명단 사용)
    let roster = match &config.roster_source {
        Some(source) => match source.load().await {
            Ok(items) => RosterStore::new(items),
            Err(e) => {
                warn!("{:<12} --> 명단 로드 실패, 기본 명단 사용: {}", "Main", e);
                RosterStore::seeded(config.seed_players)
            }
        },
        None => RosterStore::seeded(config.seed_players),
    };
    info!("{:<12} --> 초기 명단: {} 명", "Main", roster.len());

    // 경매 상태 생성 (시계 시작)
    let auction = Auction::new(&config.settings, roster).into_shared();

    // 라우터 설정
    let state = AppState::new(auction, config.load_policy.clone());
    let routes_all = handlers::routes(state, config.upload_limit_bytes);

    // 리스너 생성
    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
