//! `qtransfer` wraps an ICS-20 transfer application with wasm hooks: an inbound
//! transfer whose memo carries a `wasm` section is delivered to an intermediate
//! account and then used to call the named contract, and contracts that sent a
//! transfer are told how it ended.
//!
//! Main entry points:
//! - [`WasmHooks`](crate::ibc_applications::WasmHooks), the [`Middleware`](crate::middleware::Middleware)
//!   wrapping a transfer [`IbcApplication`](crate::ibc_application::IbcApplication);
//! - [`Keeper`](crate::keeper::Keeper), module params, genesis and the intermediate account;
//! - [`parse_memo`](crate::memo::parse_memo), the pure memo classifier.

pub mod account;
pub mod contracts;
pub mod error;
pub mod ibc;
pub mod ibc_application;
pub mod ibc_applications;
pub mod keeper;
pub mod memo;
pub mod middleware;
pub mod params;
pub mod response;

#[cfg(test)]
mod testing;

pub use cw_multi_test;
pub use strum;
pub use strum_macros;
