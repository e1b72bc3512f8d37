use {
    call_cache::*,
    std::{
        sync::{
            Arc,
            atomic::{AtomicU64, Ordering},
        },
        time::*,
    },
    tokio::*,
    tracing_subscriber::*,
};

// Pay attention to the tracing log to see what the cache is doing!
//
// Run with:
//
//   RUST_LOG=call_cache=trace cargo run --example basic

// Keeping it very short for demonstration purposes
const EXPIRATION: &str = "3s";
const REFRESH_INTERVAL: &str = "1s";

#[main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let configuration =
        CallCacheConfiguration::parse(EXPIRATION, Some(REFRESH_INTERVAL)).expect("CallCacheConfiguration::parse");
    let cache = CallCache::<u64, String>::new(configuration);

    // Pretend this is an expensive query
    let queries = Arc::new(AtomicU64::new(0));
    let query = |queries: Arc<AtomicU64>| {
        move || async move {
            time::sleep(Duration::from_millis(200)).await;
            Ok::<_, String>(queries.fetch_add(1, Ordering::SeqCst) + 1)
        }
    };

    // Concurrent callers share one query
    let mut callers = task::JoinSet::new();
    for _ in 0..5 {
        let cache = cache.clone();
        let query = query(queries.clone());
        callers.spawn(async move { cache.invoke("answer".into(), query).await });
    }
    while let Some(result) = callers.join_next().await {
        tracing::info!("concurrent caller got: {:?}", result.expect("join"));
    }

    // Fresh, then stale (refreshed in the background), then expired
    for pause in [500, 1000, 100, 3500] {
        time::sleep(Duration::from_millis(pause)).await;
        let result = cache.invoke("answer".into(), query(queries.clone())).await;
        tracing::info!("after {} ms got: {:?}", pause, result);
    }

    tracing::info!("queries: {}", queries.load(Ordering::SeqCst));
}
