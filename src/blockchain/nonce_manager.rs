// src/blockchain/nonce_manager.rs

use dashmap::DashMap;
use ethers::types::{Address, U256};
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::blockchain::services::rpc;

// Hands out sequential nonces per sender so concurrent actions from the same
// key do not collide.
#[derive(Debug, Clone, Default)]
pub struct NonceManager {
    // The DashMap allows concurrent access to different addresses; each
    // address state is guarded by its own Mutex.
    nonces: Arc<DashMap<Address, Arc<Mutex<NonceState>>>>,
}

#[derive(Debug)]
struct NonceState {
    next_nonce: Option<U256>,
}

impl NonceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the nonce to use for the next transaction from `address`.
    /// The first call per address asks the node for the pending count; later
    /// calls increment the cached value.
    pub async fn get_next_nonce(
        &self,
        client: &Client,
        address: Address,
        rpc_url: &str,
    ) -> anyhow::Result<U256> {
        let address_nonce_lock = self
            .nonces
            .entry(address)
            .or_insert_with(|| Arc::new(Mutex::new(NonceState { next_nonce: None })))
            .clone();

        let mut state = address_nonce_lock.lock().await;

        let nonce_to_use = match state.next_nonce {
            Some(nonce) => nonce,
            None => {
                let result = rpc::call(
                    client,
                    rpc_url,
                    "eth_getTransactionCount",
                    json!([format!("{:?}", address), "pending"]),
                )
                .await?;
                rpc::parse_quantity(&result)?
            }
        };

        state.next_nonce = Some(nonce_to_use + U256::one());

        Ok(nonce_to_use)
    }

    /// Drops the cached nonce so the next call re-reads it from the node.
    /// Called after a failed broadcast, when the cached value can no longer
    /// be trusted.
    pub async fn reset(&self, address: Address) {
        if let Some(lock) = self.nonces.get(&address).map(|entry| entry.clone()) {
            lock.lock().await.next_nonce = None;
        }
    }
}
