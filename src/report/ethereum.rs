use super::{table::Table, units::gwei_to_eth, Report};
use crate::blockchair::{AddressDashboard, TransactionDashboard};

const SUMMARY_COLUMNS: &[(&str, &str)] = &[
    ("balance", "Balance (Gwei)"),
    ("balance_eth", "Balance (ETH)"),
    ("balance_usd", "Balance (USD)"),
    ("call_count", "Call Count"),
    ("contract_code_hex", "Contract Code Hex"),
    ("contract_created", "Contract Created"),
    ("contract_destroyed", "Contract Destroyed"),
    ("fees_approximate", "Fees Approximate (Gwei)"),
    ("fees_approximate_eth", "Fees Approximate (ETH)"),
    ("fees_usd", "Fees (USD)"),
    ("first_seen_receiving", "First Seen Receiving"),
    ("first_seen_spending", "First Seen Spending"),
    ("last_seen_receiving", "Last Seen Receiving"),
    ("last_seen_spending", "Last Seen Spending"),
    ("received_approximate", "Received Approximate (Gwei)"),
    ("received_approximate_eth", "Received Approximate (ETH)"),
    ("received_usd", "Received (USD)"),
    ("receiving_call_count", "Receiving Call Count"),
    ("spending_call_count", "Spending Call Count"),
    ("spent_approximate", "Spent Approximate (Gwei)"),
    ("spent_approximate_eth", "Spent Approximate (ETH)"),
    ("spent_usd", "Spent (USD)"),
    ("transaction_count", "Transaction Count"),
    ("type", "Type"),
];

const SUMMARY_AMOUNTS: &[&str] = &[
    "balance",
    "fees_approximate",
    "received_approximate",
    "spent_approximate",
];

const BLOCK_COLUMNS: &[(&str, &str)] = &[
    ("block_id", "Block ID"),
    ("transaction_hash", "Transaction Hash"),
    ("index", "Index"),
    ("time", "DateTime"),
    ("sender", "From"),
    ("recipient", "To"),
    ("value", "Value (Gwei)"),
    ("value_eth", "Value (ETH)"),
    ("value_usd", "Value (USD)"),
    ("transferred", "Transferred"),
];

const TRANSACTION_COLUMNS: &[(&str, &str)] = &[
    ("block_id", "Block ID"),
    ("id", "ID"),
    ("index", "Index"),
    ("hash", "Transaction Hash"),
    ("date", "Date"),
    ("time", "DateTime"),
    ("failed", "Failed"),
    ("type", "Type"),
    ("sender", "From"),
    ("recipient", "To"),
    ("call_count", "Call Count"),
    ("value", "Value (Gwei)"),
    ("value_eth", "Value (ETH)"),
    ("value_usd", "Value (USD)"),
    ("internal_value", "Internal Value"),
    ("internal_value_eth", "Internal Value (ETH)"),
    ("internal_value_usd", "Internal Value (USD)"),
    ("fee", "Fee (Gwei)"),
    ("fee_eth", "Fee (ETH)"),
    ("fee_usd", "Fee (USD)"),
    ("gas_used", "Gas Used"),
    ("gas_limit", "Gas Limit"),
    ("gas_price", "Gas Price (Gwei)"),
    ("gas_price_eth", "Gas Price (ETH)"),
    ("effective_gas_price", "Effective Gas Price (Gwei)"),
    ("effective_gas_price_eth", "Effective Gas Price (ETH)"),
    ("max_fee_per_gas", "Max Fee per Gas (Gwei)"),
    ("max_fee_per_gas_eth", "Max Fee per Gas (ETH)"),
    ("max_priority_fee_per_gas", "Max Priority Fee per Gas (Gwei)"),
    ("max_priority_fee_per_gas_eth", "Max Priority Fee per Gas (ETH)"),
    ("base_fee_per_gas", "Base Fee per Gas (Gwei)"),
    ("base_fee_per_gas_eth", "Base Fee per Gas (ETH)"),
    ("input_hex", "Input Hex"),
    ("nonce", "Nonce"),
    ("version", "Version"),
    ("burned", "Burned"),
    ("v", "v"),
    ("r", "r"),
    ("s", "s"),
    ("type_2718", "type_2718"),
];

const TRANSACTION_AMOUNTS: &[&str] = &[
    "value",
    "internal_value",
    "fee",
    "gas_price",
    "effective_gas_price",
    "max_fee_per_gas",
    "max_priority_fee_per_gas",
    "base_fee_per_gas",
];

fn derive_eth_columns(table: &mut Table, amounts: &[&str]) {
    for amount in amounts {
        table.derive(amount, &format!("{}_eth", amount), gwei_to_eth);
    }
}

pub fn summary(dashboard: &AddressDashboard) -> Table {
    let mut table = Table::from_records([&dashboard.address]);
    derive_eth_columns(&mut table, SUMMARY_AMOUNTS);
    table.rename(SUMMARY_COLUMNS);
    table
}

pub fn calls(dashboard: &AddressDashboard) -> Table {
    let mut table = Table::from_records(&dashboard.calls);
    table.derive("value", "value_eth", gwei_to_eth);
    table.rename(BLOCK_COLUMNS);
    table.reverse_rows();
    table
}

pub fn transactions(txs: &[TransactionDashboard]) -> Table {
    let mut table = Table::from_records(txs.iter().map(|tx| &tx.transaction));
    derive_eth_columns(&mut table, TRANSACTION_AMOUNTS);
    table.rename(TRANSACTION_COLUMNS);
    table.reverse_rows();
    table
}

/// Hashes of every call, in dashboard order. Repeats are removed when batching.
pub fn call_hashes(dashboard: &AddressDashboard) -> Vec<String> {
    dashboard
        .calls
        .iter()
        .filter_map(|call| call.get("transaction_hash"))
        .filter_map(|hash| hash.as_str())
        .map(str::to_string)
        .collect()
}

pub fn build(dashboard: &AddressDashboard, txs: &[TransactionDashboard]) -> Report {
    Report {
        summary: summary(dashboard),
        block: calls(dashboard),
        transaction: transactions(txs),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::{blockchair::Envelope, report::table::Cell};

    const ADDRESS: &str = "0x3f5ce5fbfe3e9af3971dd833d26ba9b5c936f0be";

    fn fixture<T: serde::de::DeserializeOwned>(name: &str) -> Envelope<T> {
        let str = fs::read_to_string(format!("src/report/test_data/{}", name)).unwrap();
        serde_json::from_str(&str).unwrap()
    }

    fn load() -> (AddressDashboard, Vec<TransactionDashboard>) {
        let dashboard = fixture::<AddressDashboard>("eth_address.json")
            .data
            .remove(ADDRESS)
            .unwrap();
        let mut txs = fixture::<TransactionDashboard>("eth_transactions.json").data;
        let txs = call_hashes(&dashboard)
            .iter()
            .map(|hash| txs.remove(hash).unwrap())
            .collect();
        (dashboard, txs)
    }

    #[test]
    fn summary_adds_eth_columns() {
        let (dashboard, _) = load();
        let table = summary(&dashboard);

        assert_eq!(table.cell(0, "Balance (ETH)"), Some(&Cell::Float(1.5)));
        assert_eq!(
            table.cell(0, "Balance (Gwei)"),
            Some(&Cell::Text("1500000000".to_string()))
        );
        assert_eq!(
            table.cell(0, "Spent Approximate (ETH)"),
            Some(&Cell::Float(0.5))
        );
        assert_eq!(table.columns.last().unwrap(), "Spent Approximate (ETH)");
    }

    #[test]
    fn calls_are_reversed() {
        let (dashboard, _) = load();
        let table = calls(&dashboard);

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.cell(0, "Block ID"), Some(&Cell::Int(15_000_000)));
        assert_eq!(table.cell(0, "Value (ETH)"), Some(&Cell::Float(2.0)));
        assert!(table.column_index("From").is_some());
        assert!(table.column_index("To").is_some());
    }

    #[test]
    fn transactions_convert_and_tolerate_nulls() {
        let (_, txs) = load();
        let table = transactions(&txs);

        assert_eq!(table.rows.len(), 2);
        // legacy transaction has no eip-1559 fee fields
        assert_eq!(table.cell(0, "Max Fee per Gas (ETH)"), Some(&Cell::Empty));
        assert_eq!(table.cell(0, "Gas Price (ETH)"), Some(&Cell::Float(30.0)));
        assert_eq!(table.cell(1, "Fee (ETH)"), Some(&Cell::Float(1.05)));
        assert_eq!(table.cell(1, "Gas Limit"), Some(&Cell::Int(21_000)));
        assert!(table.column_index("Base Fee per Gas (ETH)").is_some());
    }

    #[test]
    fn call_hashes_follow_dashboard_order() {
        let (dashboard, _) = load();
        assert_eq!(call_hashes(&dashboard), vec!["0xbeef", "0xdead"]);
    }
}
