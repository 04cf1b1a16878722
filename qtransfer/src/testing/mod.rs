//! In-memory collaborators used by the unit tests.

mod bank;
mod contracts;
mod transfer;

pub use bank::balance;
pub use contracts::{ContractBehavior, MockContract, MockContracts};
pub use transfer::MockTransfer;

use cosmwasm_std::{Addr, Storage};
use cw_storage_plus::{Item, Map};

use crate::{
    account::{Account, AccountKeeper},
    error::AppResult,
};

const ACCOUNTS: Map<&Addr, Account> = Map::new("accounts");
const NEXT_ACCOUNT_NUMBER: Item<u64> = Item::new("next_account_number");

#[derive(Default)]
pub struct MockAccounts;

impl AccountKeeper for MockAccounts {
    fn get_account(&self, storage: &dyn Storage, address: &Addr) -> AppResult<Option<Account>> {
        Ok(ACCOUNTS.may_load(storage, address)?)
    }

    fn set_account(&self, storage: &mut dyn Storage, mut account: Account) -> AppResult<()> {
        if account.account_number == 0 {
            let next = NEXT_ACCOUNT_NUMBER.may_load(storage)?.unwrap_or(1);
            NEXT_ACCOUNT_NUMBER.save(storage, &(next + 1))?;
            account.account_number = next;
        }

        Ok(ACCOUNTS.save(storage, &account.address.clone(), &account)?)
    }
}
