mod bitcoin;
mod ethereum;
pub mod table;
pub mod units;

use crate::{
    address::{Address, Chain},
    blockchair::{AddressDashboard, TransactionDashboard},
};

pub use table::{Cell, Table};

pub const SUMMARY_SHEET: &str = "Summary";
pub const BLOCK_SHEET: &str = "Block";
pub const TRANSACTION_SHEET: &str = "Transaction";

#[derive(Debug, Clone, Default)]
pub struct Report {
    pub summary: Table,
    pub block: Table,
    pub transaction: Table,
}

impl Report {
    /// Sheets in the order they are written.
    pub fn sheets(&self) -> [(&'static str, &Table); 3] {
        [
            (SUMMARY_SHEET, &self.summary),
            (BLOCK_SHEET, &self.block),
            (TRANSACTION_SHEET, &self.transaction),
        ]
    }
}

/// Transaction hashes to fetch dashboards for.
pub fn transaction_hashes(address: &Address, dashboard: &AddressDashboard) -> Vec<String> {
    match address.chain {
        Chain::Bitcoin => dashboard.transactions.clone(),
        Chain::Ethereum => ethereum::call_hashes(dashboard),
    }
}

pub fn build(
    address: &Address,
    dashboard: &AddressDashboard,
    txs: &[TransactionDashboard],
) -> Report {
    match address.chain {
        Chain::Bitcoin => bitcoin::build(address, dashboard, txs),
        Chain::Ethereum => ethereum::build(dashboard, txs),
    }
}
