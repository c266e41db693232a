// Live checks against the Stronghold sandbox; skipped unless ENABLE_LIVE_TESTS is set
use adapters::stronghold::{StrongholdAdapter, StrongholdAuth, StrongholdConfig};
use adapters::traits::UnifiedRest;

fn live_tests_enabled() -> bool {
    std::env::var("ENABLE_LIVE_TESTS")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false)
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

#[tokio::test]
async fn stronghold_public_time_and_markets() {
    if !live_tests_enabled() {
        eprintln!("skipping live test");
        return;
    }

    load_dotenv();

    let adapter = StrongholdAdapter::public(StrongholdConfig::default().with_sandbox(true));

    let start = std::time::Instant::now();
    let server_time = adapter.fetch_time().await.expect("fetch_time failed");
    eprintln!(
        "stronghold time latency_ms={} server_time={}",
        start.elapsed().as_millis(),
        server_time
    );
    assert!(server_time > 0);

    let markets = adapter.fetch_markets().await.expect("fetch_markets failed");
    assert!(!markets.is_empty(), "sandbox listed no markets");
    for market in &markets {
        assert_eq!(market.symbol, format!("{}/{}", market.base, market.quote));
    }
}

#[tokio::test]
async fn stronghold_private_balance() {
    if !live_tests_enabled() {
        eprintln!("skipping live private test");
        return;
    }

    load_dotenv();

    let Some(auth) = StrongholdAuth::from_env() else {
        eprintln!("skipping: STRONGHOLD_API_KEY / STRONGHOLD_API_SECRET / STRONGHOLD_API_PASSPHRASE not set");
        return;
    };

    let adapter = StrongholdAdapter::new(auth, StrongholdConfig::default().with_sandbox(true));
    let balances = adapter.fetch_balance().await.expect("fetch_balance failed");

    for (code, balance) in balances.iter() {
        eprintln!("{} free={} used={} total={}", code, balance.free, balance.used, balance.total);
        assert_eq!(balance.used, balance.total - balance.free);
    }
}
