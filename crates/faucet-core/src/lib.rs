//! # Faucet Core
//!
//! Domain types and outbound HTTP clients shared by the faucet frontend.
//!
//! - [`chain`]: the network a claim targets, as a tagged union
//! - [`claim`]: the claim request and its `/faucet` JSON body
//! - [`oauth`]: callback parameter parsing and the authorization code exchange
//! - [`backend`]: calls to the faucet backend (session bootstrap, claims)
//! - [`session`]: tokens held for an authenticated browser session

pub mod backend;
pub mod chain;
pub mod claim;
pub mod error;
pub mod oauth;
pub mod session;

pub use backend::{BackendClient, BackendReply};
pub use chain::{ChainOption, ChainSelection, TypedChainId, WalletAddressKind};
pub use claim::{ClaimPayload, ClaimRequest};
pub use error::{ClientResult, FaucetClientError};
pub use oauth::{CallbackParams, OAuthClient, OAuthSettings};
pub use session::SessionTokens;
