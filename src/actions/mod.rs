//! # Actions
//!
//! Each action calls exactly one method on one contract through a
//! [`WalletProvider`] and returns the resulting [`Transaction`]. Nothing here
//! waits for confirmation.
//!
//! | Action | Contract | Method |
//! |---|---|---|
//! | [`SimpleTransferAction`] | SimpleTransfer | `transferAvax` / `transferToken` |
//! | [`BasicDexOperationsAction`] | BasicDEXOperations | `swapTokens` |
//! | [`GetPriceAction`] | GetPrice | `sendRequest` |
//! | [`GetDefiDataAction`] | GetDeFiData | `sendRequest` |
//! | [`TokenSearchAction`] | TokenSearch | `sendTokenSearchRequest` |

use std::sync::Arc;

use ethers::abi::Token;
use ethers::types::{Address, Bytes, U256};

use crate::blockchain::{
    models::{ActionError, Transaction},
    ContractBinding, WalletProvider,
};

pub mod basic_dex;
pub mod get_defi_data;
pub mod get_price;
pub mod simple_transfer;
pub mod token_search;

pub use basic_dex::BasicDexOperationsAction;
pub use get_defi_data::GetDefiDataAction;
pub use get_price::GetPriceAction;
pub use simple_transfer::SimpleTransferAction;
pub use token_search::TokenSearchAction;

/// A contract bound to a chain and a wallet provider.
#[derive(Clone)]
pub(crate) struct ContractCaller {
    wallet_provider: Arc<dyn WalletProvider>,
    chain_name: String,
    contract: ContractBinding,
}

impl ContractCaller {
    pub(crate) fn new(
        wallet_provider: Arc<dyn WalletProvider>,
        chain_name: &str,
        contract: ContractBinding,
    ) -> Self {
        Self {
            wallet_provider,
            chain_name: chain_name.to_string(),
            contract,
        }
    }

    pub(crate) fn contract(&self) -> &ContractBinding {
        &self.contract
    }

    /// The contract address, or an error if it is still a placeholder.
    pub(crate) fn require_address(&self) -> Result<Address, ActionError> {
        self.contract
            .address
            .ok_or(ActionError::ContractAddressNotSet(self.contract.kind.name()))
    }

    /// Submits one call and shapes the record. `value` is the amount carried
    /// by the record, `call_value` what is attached to the transaction.
    pub(crate) async fn invoke(
        &self,
        method: &str,
        args: Vec<Token>,
        call_value: Option<U256>,
        value: U256,
    ) -> Result<Transaction, ActionError> {
        let to = self.require_address()?;

        self.wallet_provider
            .switch_chain(&self.chain_name)
            .map_err(ActionError::call_failed)?;
        let client = self
            .wallet_provider
            .wallet_client(&self.chain_name)
            .map_err(ActionError::call_failed)?;

        let hash = client
            .write(&self.contract, method, args, call_value)
            .await
            .map_err(ActionError::call_failed)?;

        Ok(Transaction {
            hash,
            from: client.address(),
            to,
            value,
            data: Bytes::default(),
        })
    }
}
