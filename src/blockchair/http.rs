use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{AddressDashboard, Envelope, ExplorerApi, TransactionDashboard};
use crate::{
    address::{Address, Chain},
    env::AppConfig,
};

pub struct BlockchairClient {
    client: reqwest::Client,
    api_url: Url,
    api_key: Option<String>,
    address_limit: u32,
}

impl BlockchairClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            address_limit: config.address_limit,
        }
    }

    fn address_url(&self, address: &Address) -> Result<Url> {
        let limit = self.address_limit.to_string();
        self.endpoint(
            &format!("{}/dashboards/address/{}", address.chain, address.raw),
            &[("limit", limit.as_str())],
        )
    }

    fn transactions_url(&self, chain: Chain, hashes: &[String]) -> Result<Url> {
        self.endpoint(
            &format!("{}/dashboards/transactions/{}", chain, hashes.join(",")),
            &[],
        )
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.api_url.join(path)?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            if let Some(api_key) = &self.api_key {
                query.append_pair("key", api_key);
            }
        }
        // query_pairs_mut leaves a dangling `?` when nothing was appended
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<Envelope<T>> {
        let printable = redact_key(&url);
        debug!(url = %printable, "requesting");

        let res = self.client.get(url).send().await?;
        check_status(res.status(), &printable)?;

        let envelope: Envelope<T> = res
            .json()
            .await
            .with_context(|| format!("failed to decode blockchair response from {}", printable))?;

        check_context(&envelope, &printable)?;

        if let Some(cost) = envelope.context.request_cost {
            debug!(cost, "request cost");
        }

        Ok(envelope)
    }
}

fn check_status(status: StatusCode, url: &Url) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(anyhow!(
            "blockchair request failed. status = {} url = {}",
            status,
            url
        ))
    }
}

fn check_context<T>(envelope: &Envelope<T>, url: &Url) -> Result<()> {
    let context = &envelope.context;
    if context.code != 200 || context.error.is_some() {
        return Err(anyhow!(
            "blockchair returned an error. code = {} error = {} url = {}",
            context.code,
            context.error.as_deref().unwrap_or("none"),
            url
        ));
    }
    Ok(())
}

/// Ethereum keys come back lowercased, the raw input is tried second.
fn take_address(
    mut envelope: Envelope<AddressDashboard>,
    address: &Address,
) -> Result<AddressDashboard> {
    envelope
        .data
        .remove(&address.lookup_key())
        .or_else(|| envelope.data.remove(&address.raw))
        .ok_or_else(|| anyhow!("address not found in response: {}", address))
}

fn redact_key(url: &Url) -> Url {
    let mut printable = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == "key" {
                "***".to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();

    if pairs.is_empty() {
        return printable;
    }

    printable.query_pairs_mut().clear().extend_pairs(pairs);
    printable
}

#[async_trait]
impl ExplorerApi for BlockchairClient {
    async fn address_dashboard(&self, address: &Address) -> Result<AddressDashboard> {
        let url = self.address_url(address)?;
        let envelope = self.get::<AddressDashboard>(url).await?;
        take_address(envelope, address)
    }

    async fn transaction_dashboards(
        &self,
        chain: Chain,
        hashes: &[String],
    ) -> Result<HashMap<String, TransactionDashboard>> {
        let url = self.transactions_url(chain, hashes)?;
        self.get::<TransactionDashboard>(url)
            .await
            .map(|envelope| envelope.data)
    }
}
