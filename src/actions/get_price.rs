use std::sync::Arc;

use ethers::types::U256;
use tracing::info;

use super::ContractCaller;
use crate::blockchain::{
    models::{ActionError, GetPriceParams, Transaction},
    ContractBinding, ContractKind, WalletProvider,
};
use crate::config::Config;
use crate::utils::string_array;

/// Asks the GetPrice oracle contract for a symbol's price.
#[derive(Clone)]
pub struct GetPriceAction {
    caller: ContractCaller,
}

impl GetPriceAction {
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
        let contract = ContractBinding::from_config(ContractKind::GetPrice, &config.contracts)?;
        Ok(Self::new(wallet_provider, &config.chain_name, contract))
    }

    pub fn contract(&self) -> &ContractBinding {
        self.caller.contract()
    }

    pub async fn send_request(&self, params: &GetPriceParams) -> Result<Transaction, ActionError> {
        info!("Requesting {} with {:?}", ContractKind::GetPrice.name(), params.args);
        self.caller
            .invoke("sendRequest", vec![string_array(&params.args)], None, U256::zero())
            .await
    }
}
