use std::net::SocketAddr;
use std::time::Duration;

use dlob_sdk::constants::MarketRegistry;
use dlob_sdk::dlob::{BookBuilder, DLOBSubscriber, DLOBSubscriptionConfig};
use dlob_sdk::types::SdkResult;
use dlob_sdk::usermap::{DlobProvider, OrderSubscriber, UserMap, UserStatsIndex};
use dlob_sdk::{SlotSubscriber, SlotSource};
use dotenv::dotenv;

use dlob_server::config::Config;
use dlob_server::decoders::{
    ORACLE_DECODER, PERP_MARKET_DECODER, SPOT_MARKET_DECODER, USER_ACCOUNT_DECODER,
};
use dlob_server::provider::AccountStreamProvider;
use dlob_server::rate_limit::RateLimitLayer;
use dlob_server::routes;
use dlob_server::rpc_provider::RpcAccountProvider;
use dlob_server::state::{AppState, ServerState};
use dlob_server::supervisor;

const POLLING_FREQUENCY: Duration = Duration::from_millis(1000);

async fn run(config: &Config) -> SdkResult<()> {
    let program_id = drift::ID;
    let markets = MarketRegistry::load(&config.env);
    let registered: Vec<_> = markets.all();

    let account_provider = RpcAccountProvider::new(&config.endpoint);

    let provider = if config.use_order_subscriber {
        AccountStreamProvider::OrderSubscriber(OrderSubscriber::new(
            account_provider.clone(),
            USER_ACCOUNT_DECODER,
            Vec::new(),
            POLLING_FREQUENCY,
        ))
    } else {
        AccountStreamProvider::UserMap(UserMap::new(
            account_provider.clone(),
            USER_ACCOUNT_DECODER,
            Vec::new(),
            POLLING_FREQUENCY,
        ))
    };

    let market_provider = dlob_sdk::dlob::MarketAccountMap::new(
        account_provider,
        &program_id,
        &registered,
        PERP_MARKET_DECODER,
        SPOT_MARKET_DECODER,
        ORACLE_DECODER,
        POLLING_FREQUENCY,
    );

    let mut slot_source = SlotSubscriber::new(&config.ws_endpoint);
    slot_source.subscribe().await?;

    let book_builder = BookBuilder::new(provider.clone());
    let dlob = DLOBSubscriber::new(
        DLOBSubscriptionConfig {
            dlob_source: book_builder,
            slot_source: slot_source.clone(),
            update_frequency: POLLING_FREQUENCY,
        },
        market_provider.clone(),
    );

    provider.subscribe().await?;
    market_provider.subscribe().await?;
    dlob.subscribe().await?;

    let user_stats_index = UserStatsIndex::new(program_id);
    user_stats_index.populate(&provider.get_unique_authorities());

    let app = AppState::new(
        config.clone(),
        provider,
        market_provider,
        dlob,
        markets,
        user_stats_index,
        slot_source,
    );
    app.mark_subscribed();

    let limiter = RateLimitLayer::new(config.rate_limit_calls_per_second as u64, config.allow_load_test);
    let router = routes::build(ServerState { app, limiter });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    log::info!("listening on {addr}, commit {}", config.commit);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| dlob_sdk::types::SdkError::Generic(e.to_string()))?;

    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .map_err(|e| dlob_sdk::types::SdkError::Generic(e.to_string()))?;

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("fatal configuration error: {e}");
            std::process::exit(1);
        }
    };

    supervisor::run_forever(|| run(&config)).await;
}
