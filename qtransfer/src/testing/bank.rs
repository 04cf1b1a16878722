//! Ledger of the test doubles, backed by the multi-test [`BankKeeper`].

use cosmwasm_std::{
    from_json, testing::MockQuerier, Addr, Api, BalanceResponse, BankMsg, BankQuery, BlockInfo,
    Coin, Empty, Storage, Uint128,
};
use cw_multi_test::{AppResponse, BankKeeper, BankSudo, MockRouter, Module};

use crate::error::AppResult;

pub fn balance(
    api: &dyn Api,
    block: &BlockInfo,
    storage: &dyn Storage,
    address: &Addr,
    denom: &str,
) -> AppResult<Uint128> {
    let res = BankKeeper::new().query(
        api,
        storage,
        &MockQuerier::<Empty>::new(&[]),
        block,
        BankQuery::Balance {
            address: address.to_string(),
            denom: denom.to_string(),
        },
    )?;

    Ok(from_json::<BalanceResponse>(res)?.amount.amount)
}

pub fn mint(
    api: &dyn Api,
    block: &BlockInfo,
    storage: &mut dyn Storage,
    to: &Addr,
    coin: Coin,
) -> AppResult<AppResponse> {
    BankKeeper::new().sudo::<Empty, Empty>(
        api,
        storage,
        &MockRouter::default(),
        block,
        BankSudo::Mint {
            to_address: to.to_string(),
            amount: vec![coin],
        },
    )
}

pub fn send(
    api: &dyn Api,
    block: &BlockInfo,
    storage: &mut dyn Storage,
    from: &Addr,
    to: &Addr,
    amount: Vec<Coin>,
) -> AppResult<AppResponse> {
    BankKeeper::new().execute::<Empty, Empty>(
        api,
        storage,
        &MockRouter::default(),
        block,
        from.clone(),
        BankMsg::Send {
            to_address: to.to_string(),
            amount,
        },
    )
}
