// src/blockchain/services/rpc.rs

use anyhow::{anyhow, Context, Result};
use ethers::types::U256;
use reqwest::Client;
use serde_json::{json, Value};

/// Sends one JSON-RPC request and returns its `result`, turning an `error`
/// member into an `Err`.
pub async fn call(client: &Client, rpc_url: &str, method: &str, params: Value) -> Result<Value> {
    let payload = json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params,
        "id": 1
    });

    let response: Value = client
        .post(rpc_url)
        .json(&payload)
        .send()
        .await
        .with_context(|| format!("{} request failed", method))?
        .json()
        .await
        .with_context(|| format!("{} returned a non-JSON body", method))?;

    if let Some(error) = response.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(anyhow!("RPC error from {}: {}", method, message));
    }

    response
        .get("result")
        .cloned()
        .ok_or_else(|| anyhow!("{} response has no result", method))
}

/// Parses a hex quantity such as `"0x1a"`.
pub fn parse_quantity(value: &Value) -> Result<U256> {
    let hex = value
        .as_str()
        .ok_or_else(|| anyhow!("expected hex quantity, got {}", value))?;
    U256::from_str_radix(hex.trim_start_matches("0x"), 16)
        .map_err(|e| anyhow!("invalid hex quantity {}: {}", hex, e))
}
