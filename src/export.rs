use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use itertools::Itertools;
use tracing::{error, info, warn};

use crate::{
    address::{classify, Address, Chain},
    blockchair::ExplorerApi,
    paginate::{fetch_transactions, PageSettings},
    report,
    sink::ReportSink,
};

pub struct ExportRequest {
    pub addresses: Vec<String>,
    pub name: String,
    pub output_dir: PathBuf,
}

#[derive(Debug, Default)]
pub struct ExportSummary {
    pub written: Vec<PathBuf>,
    pub skipped: usize,
    pub failed: usize,
}

impl ExportSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0 && !self.written.is_empty()
    }
}

/// `{dir}/{prefix}_{name}`, with the address appended when a chain shows up more than once
/// so a run never overwrites its own output.
fn output_stem(
    dir: &Path,
    name: &str,
    address: &Address,
    chain_counts: &HashMap<Chain, usize>,
) -> PathBuf {
    let prefix = address.chain.file_prefix();
    let file = if chain_counts.get(&address.chain).copied().unwrap_or(0) > 1 {
        format!("{}_{}_{}", prefix, name, address.raw)
    } else {
        format!("{}_{}", prefix, name)
    };
    dir.join(file)
}

async fn export_address(
    api: &(impl ExplorerApi + Sync),
    sink: &dyn ReportSink,
    address: &Address,
    stem: &Path,
    settings: PageSettings,
) -> Result<PathBuf> {
    let dashboard = api
        .address_dashboard(address)
        .await
        .with_context(|| format!("failed to fetch address dashboard for {}", address))?;

    let hashes = report::transaction_hashes(address, &dashboard);
    let txs = fetch_transactions(api, address.chain, &hashes, settings).await?;

    let report = report::build(address, &dashboard, &txs);
    if report.transaction.is_empty() {
        warn!("no transactions involving {} found", address);
    }

    info!(
        blocks = report.block.rows.len(),
        transactions = report.transaction.rows.len(),
        "writing data to {}",
        stem.display()
    );

    let written = sink.write(&report, stem)?;
    let absolute = std::path::absolute(&written).unwrap_or_else(|_| written.clone());

    info!("exported as {}", written.display());
    info!("saved file path - {}", absolute.display());

    Ok(written)
}

pub async fn export_addresses(
    api: &(impl ExplorerApi + Sync),
    sink: &dyn ReportSink,
    request: &ExportRequest,
    settings: PageSettings,
) -> Result<ExportSummary> {
    let mut summary = ExportSummary::default();

    let addresses = request
        .addresses
        .iter()
        .filter_map(|input| match classify(input) {
            Ok(address) => Some(address),
            Err(err) => {
                warn!("{}", err);
                summary.skipped += 1;
                None
            }
        })
        .collect_vec();

    // the same address twice would write the same file twice
    let addresses = addresses
        .into_iter()
        .unique_by(|address| (address.chain, address.lookup_key()))
        .collect_vec();

    let chain_counts = addresses.iter().counts_by(|address| address.chain);

    for address in &addresses {
        info!("{} address: {}", address.chain.ticker(), address);

        let stem = output_stem(&request.output_dir, &request.name, address, &chain_counts);

        match export_address(api, sink, address, &stem, settings).await {
            Ok(path) => summary.written.push(path),
            Err(err) => {
                error!("failed to export {}: {:#}", address, err);
                summary.failed += 1;
            }
        }
    }

    info!(
        written = summary.written.len(),
        skipped = summary.skipped,
        failed = summary.failed,
        "export finished"
    );

    Ok(summary)
}
