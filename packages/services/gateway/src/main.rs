//! Table Gateway 서버
//!
//! 엔티티 티어와 인증 티어를 각자의 포트에서 함께 띄웁니다.

use std::net::SocketAddr;
use std::sync::Arc;

use tg_gateway::{create_auth_router, create_basic_router, AppState, Config};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 환경변수 로드
    dotenvy::dotenv().ok();

    // 로깅 초기화
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "tg_gateway=debug,tg_core=info,tower_http=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 설정 로드
    let config = Config::from_env()?;
    tracing::info!("Starting gateway with config: {:?}", config.redacted());

    // 앱 상태 초기화
    let state = Arc::new(AppState::new(&config).await?);

    let basic_addr = SocketAddr::from(([0, 0, 0, 0], config.basic_port));
    let auth_addr = SocketAddr::from(([0, 0, 0, 0], config.auth_port));

    let basic_listener = TcpListener::bind(basic_addr).await?;
    let auth_listener = TcpListener::bind(auth_addr).await?;
    tracing::info!("Entity tier listening on {}", basic_addr);
    tracing::info!("Auth tier listening on {}", auth_addr);

    let basic = axum::serve(basic_listener, create_basic_router(state.clone()))
        .with_graceful_shutdown(shutdown_signal());
    let auth = axum::serve(auth_listener, create_auth_router(state))
        .with_graceful_shutdown(shutdown_signal());

    tokio::try_join!(
        async { basic.await },
        async { auth.await },
    )?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
