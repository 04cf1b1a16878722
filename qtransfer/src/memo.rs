//! Classification of ICS-20 memos.
//!
//! A memo routes the transfer to a contract when it is a JSON object with a `wasm` key:
//!
//! ```json
//! {"wasm": {"contract": "quasar1...", "msg": {"deposit": {}}}}
//! ```

use bech32::{primitives::decode::CheckedHrpstring, Bech32};
use cosmwasm_std::{Addr, Binary};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::AppResult;

pub const WASM_KEY: &str = "wasm";
pub const CONTRACT_KEY: &str = "contract";
pub const MSG_KEY: &str = "msg";

/// Routing decision taken from a memo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedMemo {
    /// The memo doesn't target the hooks. The packet is handled as a plain transfer.
    PassThrough,
    /// The memo has a `wasm` section that can't be honoured.
    Rejected(MetadataError),
    /// Execute `msg` on `contract` with the transferred funds.
    Routed { contract: Addr, msg: Binary },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("wasm metadata is not a JSON map object")]
    WasmNotObject,

    #[error("could not find key wasm[\"contract\"]")]
    MissingContract,

    #[error("wasm[\"contract\"] is not a valid bech32 address")]
    InvalidContractAddress,

    #[error("wasm[\"contract\"] should be the same as the receiver of the packet")]
    ContractReceiverMismatch,

    #[error("could not find key wasm[\"msg\"]")]
    MissingMsg,

    #[error("wasm[\"msg\"] is not a map object")]
    MsgNotObject,

    #[error("cannot serialize wasm[\"msg\"]: {0}")]
    MsgEncoding(String),
}

/// Classify `memo` for a packet addressed to `receiver`.
///
/// `bech32_prefix` is the account prefix of this chain, the contract must be one of its addresses.
pub fn parse_memo(memo: &str, receiver: &str, bech32_prefix: &str) -> ParsedMemo {
    let Some(wasm) = wasm_section(memo) else {
        return ParsedMemo::PassThrough;
    };

    match parse_wasm_section(wasm, receiver, bech32_prefix) {
        Ok((contract, msg)) => ParsedMemo::Routed { contract, msg },
        Err(err) => ParsedMemo::Rejected(err),
    }
}

fn wasm_section(memo: &str) -> Option<Value> {
    if memo.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(memo) {
        Ok(Value::Object(mut metadata)) => metadata.remove(WASM_KEY),
        _ => None,
    }
}

fn parse_wasm_section(
    wasm: Value,
    receiver: &str,
    bech32_prefix: &str,
) -> Result<(Addr, Binary), MetadataError> {
    let Value::Object(mut wasm) = wasm else {
        return Err(MetadataError::WasmNotObject);
    };

    let Some(Value::String(contract)) = wasm.remove(CONTRACT_KEY) else {
        return Err(MetadataError::MissingContract);
    };

    validate_bech32(&contract, bech32_prefix).map_err(|_| MetadataError::InvalidContractAddress)?;

    if contract != receiver {
        return Err(MetadataError::ContractReceiverMismatch);
    }

    let msg = match wasm.remove(MSG_KEY) {
        None | Some(Value::Null) => return Err(MetadataError::MissingMsg),
        Some(Value::Object(msg)) => msg,
        Some(_) => return Err(MetadataError::MsgNotObject),
    };

    Ok((Addr::unchecked(contract), canonical_msg(msg)?))
}

/// Keys of [`serde_json::Map`] are kept sorted, so re-serializing yields a canonical encoding.
fn canonical_msg(msg: Map<String, Value>) -> Result<Binary, MetadataError> {
    serde_json::to_vec(&msg)
        .map(Binary::from)
        .map_err(|err| MetadataError::MsgEncoding(err.to_string()))
}

/// Decode a bech32 address and check it belongs to `prefix`.
///
/// Only the classic bech32 checksum is accepted, bech32m strings are refused.
pub fn validate_bech32(address: &str, prefix: &str) -> AppResult<Vec<u8>> {
    let checked = CheckedHrpstring::new::<Bech32>(address)?;

    if !checked.hrp().as_str().eq_ignore_ascii_case(prefix) {
        anyhow::bail!(
            "invalid bech32 prefix: expected {prefix}, got {}",
            checked.hrp().as_str()
        )
    }

    let data: Vec<u8> = checked.byte_iter().collect();

    if data.is_empty() || data.len() > 255 {
        anyhow::bail!("invalid address length {}", data.len())
    }

    Ok(data)
}

/// Typed memo, handy to build routed transfers.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MemoField<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wasm: Option<WasmField<T>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WasmField<T> {
    pub contract: String,
    pub msg: T,
}

impl<T: Serialize> MemoField<T> {
    pub fn wasm(contract: impl Into<String>, msg: T) -> Self {
        Self {
            wasm: Some(WasmField {
                contract: contract.into(),
                msg,
            }),
        }
    }

    pub fn to_memo(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
