//! Wallet providers hand out chain-scoped clients that can sign and submit
//! contract calls. Actions only see the [`WalletProvider`] and
//! [`WalletClient`] traits.

use std::str::FromStr;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use ethers::abi::Token;
use ethers::types::{Address, Bytes, TransactionRequest, U256};
use ethers_signers::{LocalWallet, Signer};
use reqwest::Client;
use secrecy::ExposeSecret;
use tracing::{debug, info, warn};

use crate::blockchain::{
    contracts::{ContractBinding, ContractKind},
    nonce_manager::NonceManager,
    services::transactions::send_evm_transaction,
};
use crate::config::Config;

/// Hash returned by the dry-run provider unless told otherwise.
pub const DRY_RUN_HASH: &str = "0xDUMMY_HASH";

#[async_trait]
pub trait WalletClient: Send + Sync {
    /// Address of the signing account.
    fn address(&self) -> Address;

    /// Submits a call to `method` on `contract` and returns the transaction
    /// hash without waiting for inclusion.
    async fn write(
        &self,
        contract: &ContractBinding,
        method: &str,
        args: Vec<Token>,
        value: Option<U256>,
    ) -> Result<String>;
}

pub trait WalletProvider: Send + Sync {
    fn switch_chain(&self, chain_name: &str) -> Result<()>;

    fn wallet_client(&self, chain_name: &str) -> Result<Arc<dyn WalletClient>>;
}

/// Parses a `0x`-prefixed hex private key into a signer.
pub fn wallet_from_private_key(private_key: &str, chain_id: u64) -> Result<LocalWallet> {
    let wallet = LocalWallet::from_str(private_key.trim())
        .map_err(|e| anyhow!("Invalid private key: {}", e))?;
    Ok(wallet.with_chain_id(chain_id))
}

// --- JSON-RPC backed provider ---

#[derive(Clone)]
pub struct EvmWalletProvider {
    chain_name: String,
    chain_id: u64,
    rpc_url: String,
    signer: Option<LocalWallet>,
    default_gas_limit: Option<u64>,
    nonce_manager: NonceManager,
    http: Client,
}

impl EvmWalletProvider {
    pub fn from_config(config: &Config) -> Self {
        let signer = match config.evm_private_key.as_ref() {
            Some(key) => match wallet_from_private_key(key.expose_secret(), config.chain_id) {
                Ok(wallet) => {
                    info!("Loaded signer {:?} for {}", wallet.address(), config.chain_name);
                    Some(wallet)
                }
                Err(e) => {
                    warn!("EVM_PRIVATE_KEY could not be loaded: {}", e);
                    None
                }
            },
            None => None,
        };

        Self {
            chain_name: config.chain_name.clone(),
            chain_id: config.chain_id,
            rpc_url: config.rpc_url.clone(),
            signer,
            default_gas_limit: config.default_gas_limit,
            nonce_manager: NonceManager::new(),
            http: Client::new(),
        }
    }

    pub fn signer_address(&self) -> Option<Address> {
        self.signer.as_ref().map(|wallet| wallet.address())
    }
}

impl WalletProvider for EvmWalletProvider {
    fn switch_chain(&self, chain_name: &str) -> Result<()> {
        if chain_name != self.chain_name {
            bail!(
                "Unsupported chain: {} (configured for {})",
                chain_name,
                self.chain_name
            );
        }
        debug!("Using chain {} ({})", self.chain_name, self.chain_id);
        Ok(())
    }

    fn wallet_client(&self, chain_name: &str) -> Result<Arc<dyn WalletClient>> {
        self.switch_chain(chain_name)?;
        let wallet = self
            .signer
            .clone()
            .ok_or_else(|| anyhow!("No signer available: EVM_PRIVATE_KEY is not set"))?;
        Ok(Arc::new(EvmWalletClient {
            wallet,
            rpc_url: self.rpc_url.clone(),
            default_gas_limit: self.default_gas_limit,
            nonce_manager: self.nonce_manager.clone(),
            http: self.http.clone(),
        }))
    }
}

pub struct EvmWalletClient {
    wallet: LocalWallet,
    rpc_url: String,
    default_gas_limit: Option<u64>,
    nonce_manager: NonceManager,
    http: Client,
}

impl EvmWalletClient {
    pub fn new(wallet: LocalWallet, rpc_url: &str, nonce_manager: NonceManager) -> Self {
        Self {
            wallet,
            rpc_url: rpc_url.to_string(),
            default_gas_limit: None,
            nonce_manager,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl WalletClient for EvmWalletClient {
    fn address(&self) -> Address {
        self.wallet.address()
    }

    async fn write(
        &self,
        contract: &ContractBinding,
        method: &str,
        args: Vec<Token>,
        value: Option<U256>,
    ) -> Result<String> {
        let to = contract
            .address
            .ok_or_else(|| anyhow!("Contract address is not set for {}", contract.kind.name()))?;
        let data = contract.encode_call(method, &args)?;

        let mut tx = TransactionRequest::new().to(to).data(data);
        if let Some(value) = value {
            tx = tx.value(value);
        }
        if let Some(gas) = self.default_gas_limit {
            tx = tx.gas(gas);
        }

        info!("Calling {}.{} at {:?}", contract.kind.name(), method, to);
        send_evm_transaction(&self.http, &self.rpc_url, &self.wallet, tx, &self.nonce_manager).await
    }
}

// --- Dry-run provider ---

/// One call captured by [`DryRunWalletProvider`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub contract: ContractKind,
    pub to: Address,
    pub method: String,
    pub args: Vec<Token>,
    pub value: Option<U256>,
    pub data: Bytes,
}

/// Encodes and records calls without broadcasting them.
#[derive(Clone)]
pub struct DryRunWalletProvider {
    chain_name: String,
    address: Address,
    hash: String,
    failure: Option<String>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl DryRunWalletProvider {
    pub fn new(chain_name: &str, address: Address) -> Self {
        Self {
            chain_name: chain_name.to_string(),
            address,
            hash: DRY_RUN_HASH.to_string(),
            failure: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_hash(mut self, hash: &str) -> Self {
        self.hash = hash.to_string();
        self
    }

    /// Makes every `write` fail with `message`.
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl WalletProvider for DryRunWalletProvider {
    fn switch_chain(&self, chain_name: &str) -> Result<()> {
        if chain_name != self.chain_name {
            bail!("Unsupported chain: {}", chain_name);
        }
        Ok(())
    }

    fn wallet_client(&self, chain_name: &str) -> Result<Arc<dyn WalletClient>> {
        self.switch_chain(chain_name)?;
        Ok(Arc::new(self.clone()))
    }
}

#[async_trait]
impl WalletClient for DryRunWalletProvider {
    fn address(&self) -> Address {
        self.address
    }

    async fn write(
        &self,
        contract: &ContractBinding,
        method: &str,
        args: Vec<Token>,
        value: Option<U256>,
    ) -> Result<String> {
        if let Some(message) = &self.failure {
            bail!("{}", message);
        }
        let to = contract
            .address
            .ok_or_else(|| anyhow!("Contract address is not set for {}", contract.kind.name()))?;
        let data = contract.encode_call(method, &args)?;

        info!("[dry-run] {}.{} at {:?}", contract.kind.name(), method, to);
        let call = RecordedCall {
            contract: contract.kind,
            to,
            method: method.to_string(),
            args,
            value,
            data,
        };
        match self.calls.lock() {
            Ok(mut calls) => calls.push(call),
            Err(poisoned) => poisoned.into_inner().push(call),
        }
        Ok(self.hash.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContractAddresses;

    const TEST_KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    #[test]
    fn private_key_yields_signer() {
        let wallet = wallet_from_private_key(TEST_KEY, 43113).unwrap();
        assert_eq!(wallet.chain_id(), 43113);
        assert!(wallet_from_private_key("not-a-key", 43113).is_err());
    }

    #[test]
    fn evm_provider_without_key_has_no_client() {
        let provider = EvmWalletProvider::from_config(&Config::default());
        assert!(provider.signer_address().is_none());
        let err = provider.wallet_client("avalancheFuji").err().unwrap();
        assert!(err.to_string().contains("EVM_PRIVATE_KEY"));
    }

    #[test]
    fn evm_provider_rejects_other_chains() {
        let config = Config {
            evm_private_key: Some(secrecy::SecretString::new(TEST_KEY.to_string())),
            ..Config::default()
        };
        let provider = EvmWalletProvider::from_config(&config);
        assert!(provider.signer_address().is_some());
        assert!(provider.switch_chain("sepolia").is_err());
        assert!(provider.wallet_client("avalancheFuji").is_ok());
    }

    #[tokio::test]
    async fn dry_run_records_encoded_calls() {
        let provider = DryRunWalletProvider::new("avalancheFuji", Address::zero());
        let client = provider.wallet_client("avalancheFuji").unwrap();
        let binding =
            ContractBinding::from_config(ContractKind::GetPrice, &ContractAddresses::default())
                .unwrap();
        let args = vec![Token::Array(vec![Token::String("ETH".into())])];

        let hash = client.write(&binding, "sendRequest", args, None).await.unwrap();

        assert_eq!(hash, DRY_RUN_HASH);
        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "sendRequest");
        assert_eq!(Some(calls[0].to), binding.address);
    }

    #[tokio::test]
    async fn failing_dry_run_surfaces_message() {
        let provider =
            DryRunWalletProvider::new("avalancheFuji", Address::zero()).failing("nonce too low");
        let client = provider.wallet_client("avalancheFuji").unwrap();
        let binding =
            ContractBinding::from_config(ContractKind::GetPrice, &ContractAddresses::default())
                .unwrap();
        let err = client.write(&binding, "sendRequest", vec![], None).await.unwrap_err();
        assert_eq!(err.to_string(), "nonce too low");
        assert!(provider.calls().is_empty());
    }
}
