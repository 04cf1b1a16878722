//! ### [`IbcApplications`](crate::ibc_application::IbcApplication) helpers
//! - [`WasmHooks`] ([`Middleware`](crate::middleware::Middleware)) routing ICS-20 transfers to contracts;
//! - ICS-20 wire types and denom helpers.

mod ics20;
mod wasm_hooks;

pub use ics20::{Acknowledgement, FungibleTokenPacketData, Ics20Helper};

pub use wasm_hooks::{ContractAck, HookRoute, WasmHooks, WASM_HOOK_CALLBACK_EVENT, WASM_HOOK_EVENT};
