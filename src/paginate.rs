use std::{collections::HashMap, time::Duration};

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use itertools::Itertools;
use tracing::{debug, info, warn};

use crate::{
    address::Chain,
    blockchair::{ExplorerApi, TransactionDashboard},
    env::AppConfig,
};

#[derive(Debug, Clone, Copy)]
pub struct PageSettings {
    pub batch_size: usize,
    pub retry_delay: Duration,
}

impl From<&AppConfig> for PageSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            batch_size: config.batch_size,
            retry_delay: config.retry_delay,
        }
    }
}

/// Splits hashes into request-sized chunks, dropping repeats but keeping first-seen order.
pub fn batches(hashes: &[String], size: usize) -> Vec<Vec<String>> {
    let chunks = hashes.iter().unique().cloned().chunks(size.max(1));
    chunks.into_iter().map(|chunk| chunk.collect_vec()).collect_vec()
}

async fn fetch_batch(
    api: &(impl ExplorerApi + Sync),
    chain: Chain,
    batch: &[String],
) -> Result<Vec<TransactionDashboard>> {
    let mut dashboards = api.transaction_dashboards(chain, batch).await?;
    take_in_order(&mut dashboards, batch)
}

fn take_in_order(
    dashboards: &mut HashMap<String, TransactionDashboard>,
    batch: &[String],
) -> Result<Vec<TransactionDashboard>> {
    batch
        .iter()
        .map(|hash| {
            dashboards
                .remove(hash)
                .ok_or_else(|| anyhow!("transaction {} missing from response", hash))
        })
        .collect()
}

/*
  The explorer only accepts a handful of hashes per dashboard call and rate limits anonymous
  clients. Batches go out one at a time; a failed batch is resent exactly once after
  `retry_delay`, and a second failure aborts the whole address.
*/
pub async fn fetch_transactions(
    api: &(impl ExplorerApi + Sync),
    chain: Chain,
    hashes: &[String],
    settings: PageSettings,
) -> Result<Vec<TransactionDashboard>> {
    let batches = batches(hashes, settings.batch_size);
    let tx_count: usize = batches.iter().map(Vec::len).sum();
    let begin = Utc::now();

    info!(
        "start requests session - {} transactions in {} batches",
        tx_count,
        batches.len()
    );

    let mut dashboards = Vec::with_capacity(tx_count);

    for (index, batch) in batches.iter().enumerate() {
        debug!(index, size = batch.len(), "fetching batch");

        let fetched = match fetch_batch(api, chain, batch).await {
            Ok(fetched) => fetched,
            Err(err) => {
                warn!(
                    "exceeded API limit - restarting requests session in {} ms: {:#}",
                    settings.retry_delay.as_millis(),
                    err
                );
                tokio::time::sleep(settings.retry_delay).await;
                fetch_batch(api, chain, batch).await.context(
                    "exceeded API limit - increase waiting time or use an API key instead",
                )?
            }
        };

        dashboards.extend(fetched);
    }

    info!(
        "total time taken: {} ms",
        (Utc::now() - begin).num_milliseconds()
    );

    Ok(dashboards)
}
