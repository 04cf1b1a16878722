use std::{rc::Rc, str::FromStr};

use cosmwasm_std::{Addr, Binary, Storage};
use prost::Message;

use crate::{
    account::{bech32_address, can_create_module_account_at_addr, module_address, Account, AccountKeeper},
    error::AppResult,
    params::{proto, GenesisState, Params, QTransferQueryUrls},
};

pub const MODULE_NAME: &str = "qtransfer";

pub const INTERMEDIATE_ACCOUNT_KEY: &[u8] = b"wasm-hook intermediary account";

/// Module state: params and the intermediate account.
#[derive(Clone)]
pub struct Keeper {
    accounts: Rc<dyn AccountKeeper>,
    bech32_prefix: String,
    intermediate_account: Addr,
}

impl Keeper {
    pub fn new(accounts: Rc<dyn AccountKeeper>, bech32_prefix: impl Into<String>) -> AppResult<Self> {
        let bech32_prefix = bech32_prefix.into();

        let intermediate_account = bech32_address(
            &bech32_prefix,
            &module_address(MODULE_NAME, INTERMEDIATE_ACCOUNT_KEY),
        )?;

        Ok(Self {
            accounts,
            bech32_prefix,
            intermediate_account,
        })
    }

    pub fn bech32_prefix(&self) -> &str {
        &self.bech32_prefix
    }

    /// Account holding the funds of routed transfers until the contract is executed.
    pub fn intermediate_account(&self) -> &Addr {
        &self.intermediate_account
    }

    pub fn params(&self, storage: &dyn Storage) -> AppResult<Params> {
        Params::load(storage)
    }

    pub fn set_params(&self, storage: &mut dyn Storage, params: &Params) -> AppResult<()> {
        params.save(storage)
    }

    pub fn wasm_hooks_enabled(&self, storage: &dyn Storage) -> AppResult<bool> {
        Ok(self.params(storage)?.wasm_hooks_enabled)
    }

    /// Create the intermediate account. Meant to run once, at genesis.
    ///
    /// An existing account at the address is only replaced when it can't belong to a user.
    pub fn create_intermediate_account(&self, storage: &mut dyn Storage) -> AppResult<()> {
        can_create_module_account_at_addr(
            self.accounts.as_ref(),
            storage,
            &self.intermediate_account,
        )?;

        let account = Account::new_module(
            self.intermediate_account.clone(),
            self.intermediate_account.to_string(),
        );

        self.accounts.set_account(storage, account)?;

        tracing::info!(
            account = %self.intermediate_account,
            "qtransfer created intermediate account"
        );

        Ok(())
    }

    pub fn init_genesis(&self, storage: &mut dyn Storage, genesis: &GenesisState) -> AppResult<()> {
        self.set_params(storage, &genesis.params)?;
        self.create_intermediate_account(storage)
    }

    pub fn export_genesis(&self, storage: &dyn Storage) -> AppResult<GenesisState> {
        Ok(GenesisState {
            params: self.params(storage)?,
        })
    }

    /// Serve a grpc query of the module, `data` and the result are protobuf encoded.
    pub fn query(&self, storage: &dyn Storage, type_url: &str, data: &Binary) -> AppResult<Binary> {
        match QTransferQueryUrls::from_str(type_url)? {
            QTransferQueryUrls::Params => {
                proto::QueryParamsRequest::decode(data.as_slice())?;

                Ok(Binary::from(
                    proto::QueryParamsResponse {
                        params: Some(self.params(storage)?.into()),
                    }
                    .encode_to_vec(),
                ))
            }
        }
    }
}
