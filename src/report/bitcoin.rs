use std::collections::HashMap;

use itertools::Itertools;
use serde_json::Value;

use super::{table::Table, units::satoshi_to_btc, Report};
use crate::{
    address::Address,
    blockchair::{AddressDashboard, Record, TransactionDashboard},
};

const SUMMARY_COLUMNS: &[(&str, &str)] = &[
    ("balance", "Balance (Satoshi)"),
    ("balance_btc", "Balance (BTC)"),
    ("balance_usd", "Balance (USD)"),
    ("first_seen_receiving", "First Seen Receiving"),
    ("first_seen_spending", "First Seen Spending"),
    ("last_seen_receiving", "Last Seen Receiving"),
    ("last_seen_spending", "Last Seen Spending"),
    ("transaction_count", "Transaction Count"),
    ("output_count", "Output Count"),
    ("unspent_output_count", "Unspent Output Count"),
    ("received", "Received (Satoshi)"),
    ("received_btc", "Received (BTC)"),
    ("received_usd", "Received (USD)"),
    ("spent", "Spent (Satoshi)"),
    ("spent_btc", "Spent (BTC)"),
    ("spent_usd", "Spent (USD)"),
    ("script_hex", "Script Hex"),
    ("scripthash_type", "Script Hash Type"),
    ("type", "Type"),
];

const BLOCK_COLUMNS: &[(&str, &str)] = &[
    ("block_id", "Block ID"),
    ("id", "ID"),
    ("hash", "Transaction Hash"),
    ("date", "Date"),
    ("time", "DateTime"),
    ("size", "Size"),
    ("weight", "Weight"),
    ("version", "Version"),
    ("lock_time", "Lock Time"),
    ("is_coinbase", "From Coinbase"),
    ("has_witness", "Has Witness"),
    ("input_count", "Input Count"),
    ("output_count", "Output Count"),
    ("input_total", "Input Total (Satoshi)"),
    ("input_total_btc", "Input Total (BTC)"),
    ("input_total_usd", "Input Total (USD)"),
    ("output_total", "Output Total (Satoshi)"),
    ("output_total_btc", "Output Total (BTC)"),
    ("output_total_usd", "Output Total (USD)"),
    ("fee", "Fee (Satoshi)"),
    ("fee_usd", "Fee (USD)"),
    ("fee_per_kb", "Fee per size (Satoshi)"),
    ("fee_per_kb_usd", "Fee per size (USD)"),
    ("fee_per_kwu", "Fee per weight (Satoshi)"),
    ("fee_per_kwu_usd", "Fee per weight (USD)"),
    ("cdd_total", "CDD (Coin Days Destroyed) Total"),
    ("is_rbf", "Replace-By-Fee (RBF)"),
];

const TRANSACTION_COLUMNS: &[(&str, &str)] = &[
    ("from", "From"),
    ("to", "To"),
    ("block_id", "Block ID"),
    ("transaction_id", "Transaction ID"),
    ("index", "Index"),
    ("transaction_hash", "Transaction Hash"),
    ("date", "Date"),
    ("time", "DateTime"),
    ("value", "Value (Satoshi)"),
    ("value_btc", "Value (BTC)"),
    ("value_usd", "Value (USD)"),
    ("type", "Type"),
    ("script_hex", "Script Hex"),
    ("is_from_coinbase", "From Coinbase"),
    ("is_spendable", "Spendable"),
    ("is_spent", "Spent"),
    ("spending_block_id", "Spending Block ID"),
    ("spending_transaction_id", "Spending Transaction ID"),
    ("spending_index", "Spending Index"),
    ("spending_transaction_hash", "Spending Transaction Hash"),
    ("spending_date", "Spending Date"),
    ("spending_time", "Spending DateTime"),
    ("spending_value_usd", "Spending Value (USD)"),
    ("spending_sequence", "Spending Sequence"),
    ("spending_signature_hex", "Spending Signature Hex"),
    ("spending_witness", "Spending Witness"),
    ("lifespan", "Lifespan"),
    ("cdd", "CDD (Coin Days Destroyed)"),
];

pub fn summary(dashboard: &AddressDashboard) -> Table {
    let mut table = Table::from_records([&dashboard.address]);
    table.rename(SUMMARY_COLUMNS);
    table
}

pub fn blocks(txs: &[TransactionDashboard]) -> Table {
    let mut table = Table::from_records(txs.iter().map(|tx| &tx.transaction));
    table.derive("input_total", "input_total_btc", satoshi_to_btc);
    table.derive("output_total", "output_total_btc", satoshi_to_btc);
    table.rename(BLOCK_COLUMNS);
    table.reverse_rows();
    table
}

/// Join keys compared by their JSON text, null never matches.
fn join_key(value: Option<&Value>) -> Option<String> {
    value
        .filter(|value| !value.is_null())
        .map(Value::to_string)
}

/*
  Pairs every input with the outputs created in the block that input was spent in, so each
  row reads as a `from -> to` movement. Inputs without a match keep a row holding only
  `from`, outputs without a match follow with an empty `from`.
*/
fn join_movements(txs: &[TransactionDashboard]) -> Vec<Record> {
    let inputs = txs.iter().flat_map(|tx| tx.inputs.iter()).collect::<Vec<_>>();
    let outputs = txs.iter().flat_map(|tx| tx.outputs.iter()).collect::<Vec<_>>();

    let movement = |input: Option<&Record>, output: Option<&Record>| {
        let mut row = Record::new();
        row.insert(
            "from".to_string(),
            input
                .and_then(|input| input.get("recipient"))
                .cloned()
                .unwrap_or(Value::Null),
        );
        if let Some(output) = output {
            for (key, value) in output {
                let key = if key == "recipient" { "to" } else { key.as_str() };
                row.insert(key.to_string(), value.clone());
            }
        }
        row
    };

    let outputs_by_block: HashMap<String, Vec<usize>> = outputs
        .iter()
        .enumerate()
        .filter_map(|(i, output)| join_key(output.get("block_id")).map(|key| (key, i)))
        .into_group_map();

    let mut matched = vec![false; outputs.len()];
    let mut rows = Vec::new();

    for input in inputs.iter().copied() {
        let found = join_key(input.get("spending_block_id"))
            .and_then(|key| outputs_by_block.get(&key))
            .map(Vec::as_slice)
            .unwrap_or_default();

        if found.is_empty() {
            rows.push(movement(Some(input), None));
        }

        for &i in found {
            rows.push(movement(Some(input), Some(outputs[i])));
            matched[i] = true;
        }
    }

    for (output, _) in outputs
        .iter()
        .copied()
        .zip(&matched)
        .filter(|(_, matched)| !**matched)
    {
        rows.push(movement(None, Some(output)));
    }

    rows
}

pub fn transactions(address: &Address, txs: &[TransactionDashboard]) -> Table {
    let involves_address = |row: &&Record| {
        ["from", "to"]
            .iter()
            .any(|side| row.get(*side).and_then(Value::as_str) == Some(address.raw.as_str()))
    };

    let rows = join_movements(txs);
    let mut table = Table::from_records(rows.iter().filter(involves_address));
    table.derive("value", "value_btc", satoshi_to_btc);
    table.rename(TRANSACTION_COLUMNS);
    table.reverse_rows();
    table
}

pub fn build(
    address: &Address,
    dashboard: &AddressDashboard,
    txs: &[TransactionDashboard],
) -> Report {
    Report {
        summary: summary(dashboard),
        block: blocks(txs),
        transaction: transactions(address, txs),
    }
}
