// src/blockchain/services/mod.rs

pub mod rpc;
pub mod transactions;
