mod http;

pub use http::BlockchairClient;

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::address::{Address, Chain};

pub type Record = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Deserialize)]
pub struct AddressDashboard {
    pub address: Record,
    /// Bitcoin only, transaction hashes newest first.
    #[serde(default)]
    pub transactions: Vec<String>,
    /// Ethereum only, one entry per call touching the address.
    #[serde(default)]
    pub calls: Vec<Record>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionDashboard {
    pub transaction: Record,
    #[serde(default)]
    pub inputs: Vec<Record>,
    #[serde(default)]
    pub outputs: Vec<Record>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseContext {
    pub code: u16,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub request_cost: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    #[serde(deserialize_with = "deserialize_data_map")]
    pub data: HashMap<String, T>,
    pub context: ResponseContext,
}

/// Blockchair answers `"data": []` or `"data": null` when nothing matched.
fn deserialize_data_map<'de, D, T>(deserializer: D) -> Result<HashMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum DataShape<T> {
        Map(HashMap<String, T>),
        Empty(Option<Vec<Value>>),
    }

    match DataShape::deserialize(deserializer)? {
        DataShape::Map(map) => Ok(map),
        DataShape::Empty(_) => Ok(HashMap::new()),
    }
}

#[async_trait]
pub trait ExplorerApi {
    async fn address_dashboard(&self, address: &Address) -> Result<AddressDashboard>;

    /// Dashboards keyed by transaction hash, one request for the whole slice.
    async fn transaction_dashboards(
        &self,
        chain: Chain,
        hashes: &[String],
    ) -> Result<HashMap<String, TransactionDashboard>>;
}
