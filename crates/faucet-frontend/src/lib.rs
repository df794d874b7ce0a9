//! Faucet Frontend - web front end for a testnet token faucet
//!
//! This crate serves the pages a user interacts with:
//! 1. A "log in" control sends the browser to the faucet backend's OAuth entry point
//! 2. The provider redirects back with an authorization code, which is exchanged
//!    for tokens on the server side
//! 3. The tokens live in an in-memory session bound to a cookie
//! 4. The claim form posts the chosen network and wallet address to the backend's
//!    `/faucet` endpoint with the session's bearer token

pub mod config;
pub mod error;
pub mod http;
pub mod pages;
pub mod proxy;
pub mod state;

pub use config::FrontendConfig;
pub use error::{FrontendError, FrontendResult};
