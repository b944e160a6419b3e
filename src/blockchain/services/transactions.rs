// src/blockchain/services/transactions.rs

use anyhow::{Context, Result};
use ethers::types::{transaction::eip2718::TypedTransaction, TransactionRequest, U256};
use ethers_signers::{LocalWallet, Signer};
use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use crate::blockchain::{nonce_manager::NonceManager, services::rpc};

/// Signs `tx_request` with `wallet` and broadcasts it. Nonce, chain id, gas
/// and gas price are filled in when the request leaves them empty. Returns
/// the transaction hash as soon as the node accepts it.
///
/// Any failure after the nonce is handed out resets the cached nonce, so a
/// reverted estimate or a rejected broadcast never leaves a gap.
pub async fn send_evm_transaction(
    client: &Client,
    rpc_url: &str,
    wallet: &LocalWallet,
    tx_request: TransactionRequest,
    nonce_manager: &NonceManager,
) -> Result<String> {
    let from_address = wallet.address();

    let nonce = nonce_manager
        .get_next_nonce(client, from_address, rpc_url)
        .await?;

    match sign_and_broadcast(client, rpc_url, wallet, tx_request, nonce).await {
        Ok(hash) => Ok(hash),
        Err(e) => {
            warn!(
                "Transaction from {:?} with nonce {} failed, resetting nonce: {:#}",
                from_address, nonce, e
            );
            nonce_manager.reset(from_address).await;
            Err(e)
        }
    }
}

async fn sign_and_broadcast(
    client: &Client,
    rpc_url: &str,
    wallet: &LocalWallet,
    tx_request: TransactionRequest,
    nonce: U256,
) -> Result<String> {
    let from_address = wallet.address();

    let chain_id = rpc::call(client, rpc_url, "eth_chainId", json!([])).await?;
    let chain_id = rpc::parse_quantity(&chain_id)?.as_u64();

    let mut tx = tx_request
        .from(from_address)
        .nonce(nonce)
        .chain_id(chain_id);

    if tx.gas.is_none() {
        let call_obj = serde_json::to_value(&tx)?;
        let gas = rpc::call(client, rpc_url, "eth_estimateGas", json!([call_obj]))
            .await
            .context("Gas estimation failed")?;
        tx = tx.gas(rpc::parse_quantity(&gas)?);
    }

    if tx.gas_price.is_none() {
        let gas_price = rpc::call(client, rpc_url, "eth_gasPrice", json!([])).await?;
        tx = tx.gas_price(rpc::parse_quantity(&gas_price)?);
    }

    let typed: TypedTransaction = tx.clone().into();
    let signature = wallet
        .clone()
        .with_chain_id(chain_id)
        .sign_transaction(&typed)
        .await?;
    let raw_tx = tx.rlp_signed(&signature);

    debug!("Broadcasting transaction from {:?} with nonce {}", from_address, nonce);

    let hash = rpc::call(
        client,
        rpc_url,
        "eth_sendRawTransaction",
        json!([format!("0x{}", hex::encode(raw_tx))]),
    )
    .await?;

    hash.as_str()
        .map(str::to_string)
        .context("Failed to extract transaction hash from response")
}
