use std::sync::Arc;

use ethers::abi::Token;
use ethers::types::U256;
use tracing::info;

use super::ContractCaller;
use crate::blockchain::{
    models::{ActionError, BasicDexSwapParams, Transaction},
    ContractBinding, ContractKind, WalletProvider,
};
use crate::config::Config;
use crate::utils::{parse_address, parse_amount, parse_integer};

/// Swaps tokens through the BasicDEXOperations contract.
#[derive(Clone)]
pub struct BasicDexOperationsAction {
    caller: ContractCaller,
}

impl BasicDexOperationsAction {
    pub fn new(
        wallet_provider: Arc<dyn WalletProvider>,
        chain_name: &str,
        contract: ContractBinding,
    ) -> Self {
        Self {
            caller: ContractCaller::new(wallet_provider, chain_name, contract),
        }
    }

    pub fn from_config(
        wallet_provider: Arc<dyn WalletProvider>,
        config: &Config,
    ) -> anyhow::Result<Self> {
        let contract =
            ContractBinding::from_config(ContractKind::BasicDexOperations, &config.contracts)?;
        Ok(Self::new(wallet_provider, &config.chain_name, contract))
    }

    pub fn contract(&self) -> &ContractBinding {
        self.caller.contract()
    }

    /// Amounts are scaled to base units; the bin step is passed as-is.
    pub async fn swap_tokens(
        &self,
        params: &BasicDexSwapParams,
    ) -> Result<Transaction, ActionError> {
        self.caller.require_address()?;

        let args = vec![
            Token::Address(parse_address(&params.token_in).map_err(ActionError::call_failed)?),
            Token::Address(parse_address(&params.token_out).map_err(ActionError::call_failed)?),
            Token::Uint(parse_amount(&params.amount_in).map_err(ActionError::call_failed)?),
            Token::Uint(parse_amount(&params.amount_out_min).map_err(ActionError::call_failed)?),
            // Bin step is a plain integer, never scaled to 18 decimals.
            Token::Uint(parse_integer(&params.bin_step).map_err(ActionError::call_failed)?),
        ];

        info!(
            "Swapping {} {} for {} (min out {}, bin step {})",
            params.amount_in,
            params.token_in,
            params.token_out,
            params.amount_out_min,
            params.bin_step
        );

        self.caller.invoke("swapTokens", args, None, U256::zero()).await
    }
}
