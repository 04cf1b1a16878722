use std::{cell::RefCell, collections::BTreeMap};

use anyhow::{anyhow, bail};
use cosmwasm_std::{Addr, Api, Binary, BlockInfo, Event, Storage};
use cw_multi_test::AppResponse;

use crate::{
    contracts::{ContractInfo, ContractKeeper, ExecuteContractMsg, IbcHookSudoMsg},
    error::AppResult,
};

use super::bank;

pub enum ContractBehavior {
    /// Take the funds and return `data`.
    Succeed { data: Option<Binary> },
    /// Revert before the funds move.
    Fail(String),
}

pub struct MockContract {
    pub info: ContractInfo,
    pub behavior: ContractBehavior,
    pub fail_callbacks: bool,
}

impl MockContract {
    pub fn new(creator: Addr, ibc_port_id: Option<String>, behavior: ContractBehavior) -> Self {
        Self {
            info: ContractInfo {
                code_id: 1,
                creator,
                admin: None,
                label: "hook".to_string(),
                ibc_port_id,
            },
            behavior,
            fail_callbacks: false,
        }
    }
}

#[derive(Default)]
pub struct ContractCalls {
    pub info_lookups: Vec<Addr>,
    pub executed: Vec<ExecuteContractMsg>,
    pub sudos: Vec<(Addr, IbcHookSudoMsg)>,
}

#[derive(Default)]
pub struct MockContracts {
    contracts: RefCell<BTreeMap<Addr, MockContract>>,
    pub calls: RefCell<ContractCalls>,
}

impl MockContracts {
    pub fn register(&self, address: Addr, contract: MockContract) {
        self.contracts.borrow_mut().insert(address, contract);
    }

    fn fail_callbacks(&self, contract: &Addr) -> AppResult<bool> {
        self.contracts
            .borrow()
            .get(contract)
            .map(|c| c.fail_callbacks)
            .ok_or(anyhow!("no contract at {contract}"))
    }
}

impl ContractKeeper for MockContracts {
    fn contract_info(
        &self,
        _storage: &dyn Storage,
        contract: &Addr,
    ) -> AppResult<Option<ContractInfo>> {
        self.calls.borrow_mut().info_lookups.push(contract.clone());
        Ok(self.contracts.borrow().get(contract).map(|c| c.info.clone()))
    }

    fn execute(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        msg: ExecuteContractMsg,
    ) -> AppResult<AppResponse> {
        self.calls.borrow_mut().executed.push(msg.clone());

        let contracts = self.contracts.borrow();
        let contract = contracts
            .get(&msg.contract)
            .ok_or(anyhow!("no contract at {}", msg.contract))?;

        match &contract.behavior {
            ContractBehavior::Fail(err) => bail!("execute wasm contract failed: {err}"),
            ContractBehavior::Succeed { data } => {
                let mut events = vec![];

                if !msg.funds.is_empty() {
                    let sent = bank::send(
                        api,
                        block,
                        storage,
                        &msg.sender,
                        &msg.contract,
                        msg.funds.clone(),
                    )?;
                    events.extend(sent.events);
                }

                events.push(
                    Event::new("execute").add_attribute("_contract_address", msg.contract.as_str()),
                );

                Ok(AppResponse {
                    events,
                    data: data.clone(),
                    msg_responses: vec![],
                })
            }
        }
    }

    fn sudo(
        &self,
        _api: &dyn Api,
        _block: &BlockInfo,
        _storage: &mut dyn Storage,
        contract: &Addr,
        msg: IbcHookSudoMsg,
    ) -> AppResult<AppResponse> {
        self.calls.borrow_mut().sudos.push((contract.clone(), msg));

        if self.fail_callbacks(contract)? {
            bail!("sudo reverted")
        }

        Ok(AppResponse::default())
    }
}
