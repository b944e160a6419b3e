use std::sync::Arc;

use ethers::types::U256;
use tracing::info;

use super::ContractCaller;
use crate::blockchain::{
    models::{ActionError, GetDefiDataParams, Transaction},
    ContractBinding, ContractKind, WalletProvider,
};
use crate::config::Config;
use crate::utils::string_array;

/// Asks the GetDeFiData oracle contract for protocol data (TVL, volume, fees).
#[derive(Clone)]
pub struct GetDefiDataAction {
    caller: ContractCaller,
}

impl GetDefiDataAction {
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
        let contract = ContractBinding::from_config(ContractKind::GetDefiData, &config.contracts)?;
        Ok(Self::new(wallet_provider, &config.chain_name, contract))
    }

    pub fn contract(&self) -> &ContractBinding {
        self.caller.contract()
    }

    pub async fn send_request(
        &self,
        params: &GetDefiDataParams,
    ) -> Result<Transaction, ActionError> {
        info!("Requesting {} with {:?}", ContractKind::GetDefiData.name(), params.args);
        self.caller
            .invoke("sendRequest", vec![string_array(&params.args)], None, U256::zero())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::*;
    use crate::config::DEFAULT_GET_DEFI_DATA_ADDRESS;

    #[tokio::test]
    async fn defi_data_request_hits_oracle() {
        let provider = dry_run();
        let action = GetDefiDataAction::from_config(provider.clone(), &config()).unwrap();
        let params = GetDefiDataParams {
            args: vec!["tvl".into(), "aave".into()],
        };

        let tx = action.send_request(&params).await.unwrap();

        assert_eq!(format!("{:?}", tx.to), DEFAULT_GET_DEFI_DATA_ADDRESS.to_lowercase());
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn placeholder_address_fails() {
        let action = GetDefiDataAction::from_config(dry_run(), &unset_contracts()).unwrap();
        let params = GetDefiDataParams { args: vec![] };
        assert!(matches!(
            action.send_request(&params).await,
            Err(ActionError::ContractAddressNotSet(_))
        ));
    }

    #[tokio::test]
    async fn send_failure_is_wrapped() {
        let provider = failing("gas required exceeds allowance");
        let action = GetDefiDataAction::from_config(provider, &config()).unwrap();
        let params = GetDefiDataParams {
            args: vec!["fees".into(), "gmx".into()],
        };

        let err = action.send_request(&params).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Function call failed: gas required exceeds allowance"
        );
    }
}
