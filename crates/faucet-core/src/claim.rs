//! Claim request and its JSON encoding for the faucet backend.

use crate::chain::{ChainSelection, TypedChainId, WalletAddressKind};
use serde::{Deserialize, Serialize};

/// A user's request for test funds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRequest {
    /// Wallet address as typed by the user. Not validated here; the backend
    /// owns address parsing for each network.
    pub address: String,
    pub chain: ChainSelection,
    /// Dispense only the native token instead of every token/asset type.
    pub only_native_token: bool,
}

impl ClaimRequest {
    pub fn new(address: impl Into<String>, chain: ChainSelection, only_native_token: bool) -> Self {
        Self {
            address: address.into(),
            chain,
            only_native_token,
        }
    }

    /// Build the body posted to `/faucet`.
    pub fn to_payload(&self) -> ClaimPayload {
        ClaimPayload {
            faucet: FaucetClaim {
                wallet_address: WalletAddress {
                    kind: self.chain.address_kind(),
                    value: self.address.clone(),
                },
                typed_chain_id: self.chain.typed_chain_id(),
                only_native_token: self.only_native_token,
            },
        }
    }
}

/// Top-level body of `POST /faucet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimPayload {
    pub faucet: FaucetClaim,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaucetClaim {
    pub wallet_address: WalletAddress,
    pub typed_chain_id: TypedChainId,
    pub only_native_token: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAddress {
    #[serde(rename = "type")]
    pub kind: WalletAddressKind,
    pub value: String,
}
