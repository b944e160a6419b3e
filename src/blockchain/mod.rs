// src/blockchain/mod.rs

pub mod contracts;
pub mod models;
pub mod nonce_manager;
pub mod services;
pub mod wallet_provider;

pub use contracts::{ContractBinding, ContractKind};
pub use wallet_provider::{DryRunWalletProvider, EvmWalletProvider, WalletClient, WalletProvider};

// Re-export commonly used types
pub use ethers::types::{Address, Bytes, H256, U256};
