// src/config.rs

use anyhow::{Context, Result};
use secrecy::SecretString;
use std::env;

/// Fuji C-chain deployments of the action contracts.
pub const DEFAULT_SIMPLE_TRANSFER_ADDRESS: &str = "0x3372690834E2Ee5AFEd3a2eb0cD6F6427C83b54A";
pub const DEFAULT_BASIC_DEX_ADDRESS: &str = "0x859655f001BE2E9EBcECd6C2f933b2c931722393";
pub const DEFAULT_GET_PRICE_ADDRESS: &str = "0x8412F626cDa0d361810A9A93B1e0d6d601dbb9af";
pub const DEFAULT_GET_DEFI_DATA_ADDRESS: &str = "0x38b285A853d7b13B3F67054430E14962C77a11Da";
pub const DEFAULT_TOKEN_SEARCH_ADDRESS: &str = "0x17594F73ACC6A705730373Ca40e60d3ec1Ac5ba3";

pub const DEFAULT_CHAIN_NAME: &str = "avalancheFuji";
pub const DEFAULT_CHAIN_ID: u64 = 43113;
pub const DEFAULT_RPC_URL: &str = "https://api.avax-test.network/ext/bc/C/rpc";

/// Addresses of the contracts each action calls. An empty string or `0x00`
/// marks a contract that has not been deployed yet.
#[derive(Clone, Debug)]
pub struct ContractAddresses {
    pub simple_transfer: String,
    pub basic_dex: String,
    pub get_price: String,
    pub get_defi_data: String,
    pub token_search: String,
}

impl Default for ContractAddresses {
    fn default() -> Self {
        Self {
            simple_transfer: DEFAULT_SIMPLE_TRANSFER_ADDRESS.to_string(),
            basic_dex: DEFAULT_BASIC_DEX_ADDRESS.to_string(),
            get_price: DEFAULT_GET_PRICE_ADDRESS.to_string(),
            get_defi_data: DEFAULT_GET_DEFI_DATA_ADDRESS.to_string(),
            token_search: DEFAULT_TOKEN_SEARCH_ADDRESS.to_string(),
        }
    }
}

// A struct to hold all configuration, loaded once at startup from the .env file.
#[derive(Clone, Debug)]
pub struct Config {
    // Server settings
    pub port: u16,

    /// Network the actions are bound to. Only one chain is served at a time.
    pub chain_name: String,
    pub chain_id: u64,
    pub rpc_url: String,

    /// Signing key for every action. Handlers refuse to run without it.
    pub evm_private_key: Option<SecretString>,

    pub contracts: ContractAddresses,

    // Transaction settings
    pub default_gas_limit: Option<u64>,

    /// Record calls instead of broadcasting them.
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3001,
            chain_name: DEFAULT_CHAIN_NAME.to_string(),
            chain_id: DEFAULT_CHAIN_ID,
            rpc_url: DEFAULT_RPC_URL.to_string(),
            evm_private_key: None,
            contracts: ContractAddresses::default(),
            default_gas_limit: None,
            dry_run: false,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load variables from the .env file into the environment
        dotenvy::dotenv().ok();

        let rpc_url = env::var("RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string());
        url::Url::parse(&rpc_url).context("RPC_URL must be a valid URL")?;

        let chain_id = env::var("CHAIN_ID")
            .unwrap_or_else(|_| DEFAULT_CHAIN_ID.to_string())
            .parse::<u64>()
            .context("CHAIN_ID must be a valid number")?;

        let default_gas_limit = match env::var("DEFAULT_GAS_LIMIT") {
            Ok(v) => Some(v.parse().context("DEFAULT_GAS_LIMIT must be a valid number")?),
            Err(_) => None,
        };

        let dry_run = env::var("DRY_RUN")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let contracts = ContractAddresses {
            simple_transfer: env_or("SIMPLE_TRANSFER_ADDRESS", DEFAULT_SIMPLE_TRANSFER_ADDRESS),
            basic_dex: env_or("BASIC_DEX_ADDRESS", DEFAULT_BASIC_DEX_ADDRESS),
            get_price: env_or("GET_PRICE_ADDRESS", DEFAULT_GET_PRICE_ADDRESS),
            get_defi_data: env_or("GET_DEFI_DATA_ADDRESS", DEFAULT_GET_DEFI_DATA_ADDRESS),
            token_search: env_or("TOKEN_SEARCH_ADDRESS", DEFAULT_TOKEN_SEARCH_ADDRESS),
        };

        Ok(Config {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            chain_name: env_or("CHAIN_NAME", DEFAULT_CHAIN_NAME),
            chain_id,
            rpc_url,
            evm_private_key: env::var("EVM_PRIVATE_KEY").ok().map(SecretString::new),
            contracts,
            default_gas_limit,
            dry_run,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
