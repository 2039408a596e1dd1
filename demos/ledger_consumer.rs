//! Consumes ticks in fixed size batches the way a micro-batch engine would:
//! poll the latest offset, read up to it, remember where it got to.
//!
//! Options are taken from `BACKLOG_*` environment variables, e.g.
//! `BACKLOG_PERSISTENCE=sqlite BACKLOG_LOCALSTORAGE=ledger.db`.

use std::{collections::HashMap, time::Duration};

use backlog::{
    memory::MemoryLedgerPersistence, sqlite::SqliteLedgerPersistence,
    transport::bind_multicast_listener, LedgerPersistence, LedgerSource, PersistenceConfig,
    SourceConfig, API_ADDR, LOCAL_STORAGE, LOSSY_UTF8, MULTICAST_ADDR, ON_PARSE_FAILURE,
    PERSISTENCE,
};
use tokio::time::sleep;
use tracing::{info, warn};

const MAX_BATCH: i64 = 5000;

fn options() -> HashMap<String, String> {
    let keys = [API_ADDR, LOCAL_STORAGE, LOSSY_UTF8, ON_PARSE_FAILURE, PERSISTENCE];
    let mut options: HashMap<_, _> = keys
        .into_iter()
        .filter_map(|key| {
            let var = format!("BACKLOG_{}", key.to_uppercase());
            std::env::var(var).ok().map(|value| (key.to_string(), value))
        })
        .collect();
    let multicast_addr =
        std::env::var("BACKLOG_MULTICASTADDR").unwrap_or_else(|_| "224.0.0.123:1234".to_string());
    options.insert(MULTICAST_ADDR.to_string(), multicast_addr);
    options
}

async fn consume<P: LedgerPersistence>(config: SourceConfig, persistence: P) {
    let socket = bind_multicast_listener(&config.multicast_addr).unwrap();
    let source = LedgerSource::new(socket, persistence, config.parser())
        .on_parse_failure(config.on_parse_failure);
    let context = source.run(config.api_addr).await;

    let mut committed = context.latest_offset().await.unwrap();
    info!("Resuming after offset {:?}", committed);

    loop {
        sleep(Duration::from_secs(1)).await;

        let latest = match context.latest_offset().await.unwrap() {
            Some(latest) if Some(latest) != committed => latest,
            _ => continue,
        };
        let end = latest.min(committed.unwrap_or(0) + MAX_BATCH);
        match context.read_range(committed, end).await {
            Ok(records) => {
                if let Some(last) = records.last() {
                    info!(
                        "Batch ({:?}, {}] of {} ticks, last: {} at {}",
                        committed,
                        end,
                        records.len(),
                        last.value,
                        last.timestamp
                    );
                }
                committed = Some(end);
            }
            Err(e) if e.is_retriable() => warn!("Retrying batch: {}", e),
            Err(e) => {
                warn!("Giving up: {}", e);
                break;
            }
        }
    }

    context.stop().await;
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = SourceConfig::from_options(&options()).unwrap();
    match config.persistence.clone() {
        PersistenceConfig::Memory => consume(config, MemoryLedgerPersistence::new()).await,
        PersistenceConfig::Sqlite(url) => {
            let persistence = SqliteLedgerPersistence::connect(&url).await.unwrap();
            consume(config, persistence).await
        }
    }
}
