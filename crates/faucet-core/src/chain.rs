//! Chain selection model.
//!
//! A selection is always exactly one network family plus a numeric chain id.
//! In the claim form it travels as an externally tagged JSON value
//! (`{"Evm":3884533461}`), and on the wire to the faucet backend it becomes a
//! [`TypedChainId`] (`{"type":"Evm","id":3884533461}`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chain id selected by default in the claim form (Athena).
pub const DEFAULT_CHAIN: ChainSelection = ChainSelection::Evm(3_884_533_461);

/// The network a claim targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainSelection {
    Evm(u32),
    Substrate(u32),
}

impl ChainSelection {
    /// Numeric chain id, regardless of family.
    pub fn id(&self) -> u32 {
        match self {
            Self::Evm(id) | Self::Substrate(id) => *id,
        }
    }

    /// Kind of wallet address expected on this chain.
    ///
    /// A zero id never resolves to a network and yields
    /// [`WalletAddressKind::Unknown`].
    pub fn address_kind(&self) -> WalletAddressKind {
        match self {
            Self::Evm(id) if *id != 0 => WalletAddressKind::Ethereum,
            Self::Substrate(id) if *id != 0 => WalletAddressKind::Substrate,
            _ => WalletAddressKind::Unknown,
        }
    }

    /// Wire representation sent to the faucet backend.
    pub fn typed_chain_id(&self) -> TypedChainId {
        match *self {
            Self::Evm(id) => TypedChainId {
                kind: ChainKind::Evm,
                id,
            },
            Self::Substrate(id) => TypedChainId {
                kind: ChainKind::Substrate,
                id,
            },
        }
    }

    /// Value used for the `<option>` element of the chain selector.
    pub fn form_value(&self) -> String {
        match self {
            Self::Evm(id) => format!("{{\"Evm\":{}}}", id),
            Self::Substrate(id) => format!("{{\"Substrate\":{}}}", id),
        }
    }
}

impl Default for ChainSelection {
    fn default() -> Self {
        DEFAULT_CHAIN
    }
}

impl fmt::Display for ChainSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Evm(id) => write!(f, "Evm({})", id),
            Self::Substrate(id) => write!(f, "Substrate({})", id),
        }
    }
}

/// Error returned when a chain selector value cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognised chain selection: {0}")]
pub struct ParseChainError(pub String);

impl FromStr for ChainSelection {
    type Err = ParseChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s.trim()).map_err(|_| ParseChainError(s.to_string()))
    }
}

/// Network family tag of a [`TypedChainId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainKind {
    Evm,
    Substrate,
}

/// Discriminated chain identifier as understood by the faucet backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedChainId {
    #[serde(rename = "type")]
    pub kind: ChainKind,
    pub id: u32,
}

/// Address format tag of the `walletAddress` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletAddressKind {
    #[serde(rename = "ethereum")]
    Ethereum,
    #[serde(rename = "substrate")]
    Substrate,
    Unknown,
}

impl From<TypedChainId> for ChainSelection {
    fn from(typed: TypedChainId) -> Self {
        match typed.kind {
            ChainKind::Evm => Self::Evm(typed.id),
            ChainKind::Substrate => Self::Substrate(typed.id),
        }
    }
}

/// A named entry of the chain selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainOption {
    pub name: String,
    pub kind: ChainKind,
    pub id: u32,
}

impl ChainOption {
    pub fn new(name: impl Into<String>, chain: ChainSelection) -> Self {
        let typed = chain.typed_chain_id();
        Self {
            name: name.into(),
            kind: typed.kind,
            id: typed.id,
        }
    }

    pub fn chain(&self) -> ChainSelection {
        TypedChainId {
            kind: self.kind,
            id: self.id,
        }
        .into()
    }
}

/// Networks offered by the public testnet faucet.
pub fn default_catalogue() -> Vec<ChainOption> {
    vec![
        ChainOption::new("Athena", ChainSelection::Evm(3_884_533_461)),
        ChainOption::new("Hermes", ChainSelection::Evm(3_884_533_462)),
        ChainOption::new("Demeter", ChainSelection::Evm(3_884_533_463)),
        ChainOption::new("Tangle EVM", ChainSelection::Evm(4006)),
        ChainOption::new("Tangle", ChainSelection::Substrate(1081)),
    ]
}
