use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, Storage};
use sha2::{Digest, Sha256};

use crate::error::{AppResult, QTransferError};

#[cw_serde]
pub struct Account {
    pub address: Addr,
    pub account_number: u64,
    pub sequence: u64,
    pub pub_key: Option<Binary>,
    pub kind: AccountKind,
}

/// Account types known to the ledger.
#[cw_serde]
pub enum AccountKind {
    Base,
    Module {
        name: String,
        permissions: Vec<String>,
    },
    BaseVesting,
    ContinuousVesting,
    DelayedVesting,
    PeriodicVesting,
    PermanentLocked,
    /// Any account type this module doesn't know about.
    Other { type_url: String },
}

impl Account {
    pub fn new_module(address: Addr, name: impl Into<String>) -> Self {
        Self {
            address,
            account_number: 0,
            sequence: 0,
            pub_key: None,
            kind: AccountKind::Module {
                name: name.into(),
                permissions: vec![],
            },
        }
    }

    /// Whether the account has ever signed a transaction.
    pub fn has_activity(&self) -> bool {
        self.sequence != 0 || self.pub_key.is_some()
    }
}

/// Account store as seen by this module.
pub trait AccountKeeper {
    fn get_account(&self, storage: &dyn Storage, address: &Addr) -> AppResult<Option<Account>>;

    /// Store `account`, assigning it an account number when it has none.
    fn set_account(&self, storage: &mut dyn Storage, account: Account) -> AppResult<()>;
}

/// Address of the account owned by `module` and derived from `key`:
/// `sha256(sha256("module") || module || 0x00 || key)`.
pub fn module_address(module: &str, key: &[u8]) -> Vec<u8> {
    let typ = Sha256::digest(b"module");

    let mut hasher = Sha256::new();
    hasher.update(typ);
    hasher.update(module.as_bytes());
    hasher.update([0_u8]);
    hasher.update(key);
    hasher.finalize().to_vec()
}

pub fn bech32_address(prefix: &str, data: &[u8]) -> AppResult<Addr> {
    let hrp = bech32::Hrp::parse(prefix)?;
    Ok(Addr::unchecked(bech32::encode::<bech32::Bech32>(hrp, data)?))
}

/// Whether a module account may be created at `address` given what is stored there.
///
/// Unused addresses are fine, so are accounts that never signed anything as long as
/// they are plain or vesting accounts. Everything else is refused.
pub fn can_create_module_account_at_addr(
    accounts: &dyn AccountKeeper,
    storage: &dyn Storage,
    address: &Addr,
) -> AppResult<()> {
    let Some(existing) = accounts.get_account(storage, address)? else {
        return Ok(());
    };

    if existing.has_activity() {
        return Err(QTransferError::AccountInUse {
            address: address.to_string(),
        }
        .into());
    }

    match existing.kind {
        AccountKind::Base
        | AccountKind::BaseVesting
        | AccountKind::ContinuousVesting
        | AccountKind::DelayedVesting
        | AccountKind::PeriodicVesting
        | AccountKind::PermanentLocked => Ok(()),
        AccountKind::Module { .. } | AccountKind::Other { .. } => {
            Err(QTransferError::AccountNotOverridable {
                address: address.to_string(),
            }
            .into())
        }
    }
}
