use cosmwasm_schema::cw_serde;
use cosmwasm_std::Storage;
use cw_storage_plus::Item;
use qtransfer_macros::urls;

use crate::error::AppResult;

pub const PARAMS: Item<Params> = Item::new("qtransfer_params");

#[cw_serde]
pub struct Params {
    pub wasm_hooks_enabled: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            wasm_hooks_enabled: true,
        }
    }
}

impl Params {
    /// Stored params, or the defaults when none were saved yet.
    pub fn load(storage: &dyn Storage) -> AppResult<Self> {
        Ok(PARAMS.may_load(storage)?.unwrap_or_default())
    }

    pub fn save(&self, storage: &mut dyn Storage) -> AppResult<()> {
        Ok(PARAMS.save(storage, self)?)
    }
}

#[cw_serde]
#[derive(Default)]
pub struct GenesisState {
    pub params: Params,
}

#[urls]
pub enum QTransferQueryUrls {
    #[strum(serialize = "/quasarlabs.quasarnode.qtransfer.Query/Params")]
    Params,
}

/// Protobuf messages of the query service.
pub mod proto {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Params {
        #[prost(bool, tag = "1")]
        pub wasm_hooks_enabled: bool,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct QueryParamsRequest {}

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct QueryParamsResponse {
        #[prost(message, optional, tag = "1")]
        pub params: Option<Params>,
    }
}

impl From<Params> for proto::Params {
    fn from(value: Params) -> Self {
        Self {
            wasm_hooks_enabled: value.wasm_hooks_enabled,
        }
    }
}

impl From<proto::Params> for Params {
    fn from(value: proto::Params) -> Self {
        Self {
            wasm_hooks_enabled: value.wasm_hooks_enabled,
        }
    }
}
