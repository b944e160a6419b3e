// src/blockchain/contracts.rs

use anyhow::{anyhow, Context, Result};
use ethers_core::abi::{parse_abi, Abi, Token};
use ethers::types::{Address, Bytes};
use std::str::FromStr;

use crate::config::ContractAddresses;

/// The fixed set of contracts the agent knows how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractKind {
    SimpleTransfer,
    BasicDexOperations,
    GetPrice,
    GetDefiData,
    TokenSearch,
}

impl ContractKind {
    pub fn name(&self) -> &'static str {
        match self {
            ContractKind::SimpleTransfer => "SimpleTransfer",
            ContractKind::BasicDexOperations => "BasicDEXOperations",
            ContractKind::GetPrice => "GetPrice",
            ContractKind::GetDefiData => "GetDeFiData",
            ContractKind::TokenSearch => "TokenSearch",
        }
    }

    /// ABI fragment for the methods the agent calls on this contract.
    fn abi_fragment(&self) -> &'static [&'static str] {
        match self {
            ContractKind::SimpleTransfer => &[
                "function transferAvax(address to, uint256 amount) payable",
                "function transferToken(address token, address to, uint256 amount)",
            ],
            ContractKind::BasicDexOperations => &[
                "function swapTokens(address tokenIn, address tokenOut, uint256 amountIn, uint256 amountOutMin, uint256 binStep)",
            ],
            ContractKind::GetPrice | ContractKind::GetDefiData => &[
                "function sendRequest(string[] args) returns (bytes32)",
            ],
            ContractKind::TokenSearch => &[
                "function sendTokenSearchRequest(string[] args) returns (bytes32)",
            ],
        }
    }

    pub fn configured_address<'a>(&self, addresses: &'a ContractAddresses) -> &'a str {
        match self {
            ContractKind::SimpleTransfer => &addresses.simple_transfer,
            ContractKind::BasicDexOperations => &addresses.basic_dex,
            ContractKind::GetPrice => &addresses.get_price,
            ContractKind::GetDefiData => &addresses.get_defi_data,
            ContractKind::TokenSearch => &addresses.token_search,
        }
    }
}

/// A contract address paired with the ABI used to encode calls to it.
#[derive(Debug, Clone)]
pub struct ContractBinding {
    pub kind: ContractKind,
    /// `None` while the contract is still a placeholder.
    pub address: Option<Address>,
    abi: Abi,
}

impl ContractBinding {
    pub fn new(kind: ContractKind, address: &str) -> Result<Self> {
        let abi = parse_abi(kind.abi_fragment())
            .map_err(|e| anyhow!("Invalid ABI fragment for {}: {}", kind.name(), e))?;
        Ok(Self {
            kind,
            address: parse_contract_address(address)?,
            abi,
        })
    }

    pub fn from_config(kind: ContractKind, addresses: &ContractAddresses) -> Result<Self> {
        Self::new(kind, kind.configured_address(addresses))
    }

    pub fn abi(&self) -> &Abi {
        &self.abi
    }

    /// ABI-encodes a call to `method`. Fails on unknown methods and on
    /// arguments that do not match the method's inputs.
    pub fn encode_call(&self, method: &str, args: &[Token]) -> Result<Bytes> {
        let function = self
            .abi
            .function(method)
            .with_context(|| format!("{} has no method {}", self.kind.name(), method))?;
        let data = function
            .encode_input(args)
            .with_context(|| format!("Invalid arguments for {}.{}", self.kind.name(), method))?;
        Ok(Bytes::from(data))
    }
}

/// Empty strings, `0x00` and the zero address all mean "not deployed".
fn parse_contract_address(address: &str) -> Result<Option<Address>> {
    let trimmed = address.trim();
    if trimmed.is_empty() || trimmed == "0x00" {
        return Ok(None);
    }
    let parsed = Address::from_str(trimmed)
        .map_err(|e| anyhow!("Invalid contract address {}: {}", trimmed, e))?;
    Ok((!parsed.is_zero()).then_some(parsed))
}
