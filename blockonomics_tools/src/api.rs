use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::BlockonomicsConfig,
    data_objects::{Crypto, MonitorTxRequest, NewAddressResponse},
    helpers::{reason_phrase, upstream_error_message},
    BlockonomicsApiError,
};

#[derive(Clone)]
pub struct BlockonomicsApi {
    config: BlockonomicsConfig,
    client: Arc<Client>,
}

impl BlockonomicsApi {
    pub fn new(config: BlockonomicsConfig) -> Result<Self, BlockonomicsApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let bearer = format!("Bearer {}", config.api_key.reveal());
        let mut val =
            HeaderValue::from_str(&bearer).map_err(|e| BlockonomicsApiError::Initialization(e.to_string()))?;
        val.set_sensitive(true);
        headers.insert(AUTHORIZATION, val);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| BlockonomicsApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &BlockonomicsConfig {
        &self.config
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/api{path}", self.config.base_url)
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<T, BlockonomicsApiError> {
        let url = self.url(path);
        trace!("🛰️ Sending REST query: {method} {url}");
        let mut req = self.client.request(method, url);
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!("🛰️ Blockonomics responded with {status}: {text}");
        if status.is_success() {
            serde_json::from_str::<T>(&text).map_err(|e| BlockonomicsApiError::JsonError(e.to_string()))
        } else {
            let status = status.as_u16();
            Err(BlockonomicsApiError::QueryError {
                status,
                message: upstream_error_message(&text),
                details: reason_phrase(status),
            })
        }
    }

    /// Asks Blockonomics for a fresh payment address for `crypto`.
    ///
    /// Blockonomics expects every parameter in the query string and no request body.
    pub async fn new_address(&self, crypto: Crypto) -> Result<NewAddressResponse, BlockonomicsApiError> {
        let crypto = crypto.to_string();
        let params = [("match_callback", self.config.callback_url.as_str()), ("crypto", crypto.as_str())];
        debug!("🛰️ Requesting a new {crypto} address");
        let result = self.rest_query::<NewAddressResponse, ()>(Method::POST, "/new_address", &params, None).await?;
        info!("🛰️ New {crypto} address issued: {}", result.address);
        Ok(result)
    }

    /// Registers `txhash` for monitoring. Blockonomics will call back on `match_callback` as the transaction confirms.
    pub async fn monitor_transaction(&self, txhash: &str, crypto: Crypto) -> Result<(), BlockonomicsApiError> {
        let body = MonitorTxRequest {
            txhash: txhash.to_string(),
            crypto,
            match_callback: self.config.callback_url.clone(),
        };
        debug!("🛰️ Registering {crypto} transaction {txhash} for monitoring");
        let _ack = self.rest_query::<serde_json::Value, _>(Method::POST, "/monitor_tx", &[], Some(body)).await?;
        info!("🛰️ {crypto} transaction {txhash} is being monitored");
        Ok(())
    }
}
