use std::sync::Arc;

use ethers::types::U256;
use tracing::info;

use super::ContractCaller;
use crate::blockchain::{
    models::{ActionError, TokenSearchParams, Transaction},
    ContractBinding, ContractKind, WalletProvider,
};
use crate::config::Config;
use crate::utils::string_array;

/// Asks the TokenSearch oracle contract to look up a token by name.
#[derive(Clone)]
pub struct TokenSearchAction {
    caller: ContractCaller,
}

impl TokenSearchAction {
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
        let contract = ContractBinding::from_config(ContractKind::TokenSearch, &config.contracts)?;
        Ok(Self::new(wallet_provider, &config.chain_name, contract))
    }

    pub fn contract(&self) -> &ContractBinding {
        self.caller.contract()
    }

    pub async fn send_token_search_request(
        &self,
        params: &TokenSearchParams,
    ) -> Result<Transaction, ActionError> {
        info!("Requesting {} with {:?}", ContractKind::TokenSearch.name(), params.args);
        self.caller
            .invoke(
                "sendTokenSearchRequest",
                vec![string_array(&params.args)],
                None,
                U256::zero(),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::*;
    use crate::blockchain::DryRunWalletProvider;
    use ethers::types::Address;

    #[tokio::test]
    async fn search_returns_provider_hash() {
        let provider = Arc::new(DryRunWalletProvider::new(CHAIN, signer()).with_hash("0xfeed"));
        let action = TokenSearchAction::from_config(provider.clone(), &config()).unwrap();

        let tx = action
            .send_token_search_request(&TokenSearchParams { args: vec!["USDC".into()] })
            .await
            .unwrap();

        assert_eq!(tx.hash, "0xfeed");
        assert_eq!(Some(tx.to), action.contract().address);
        assert_ne!(tx.to, Address::zero());
        assert_eq!(provider.calls()[0].method, "sendTokenSearchRequest");
    }

    #[tokio::test]
    async fn send_failure_is_wrapped() {
        let action = TokenSearchAction::from_config(failing("replacement underpriced"), &config())
            .unwrap();

        let err = action
            .send_token_search_request(&TokenSearchParams { args: vec!["USDC".into()] })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Function call failed: replacement underpriced");
    }
}
