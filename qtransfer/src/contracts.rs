use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Api, Binary, BlockInfo, Coin, IbcPacket, Storage};
use cw_multi_test::AppResponse;

use crate::error::{AppResult, QTransferError};

/// Metadata of an instantiated contract.
#[cw_serde]
pub struct ContractInfo {
    pub code_id: u64,
    pub creator: Addr,
    pub admin: Option<Addr>,
    pub label: String,
    /// Set when the contract implements the ibc entry points.
    pub ibc_port_id: Option<String>,
}

impl ContractInfo {
    pub fn accepts_ibc_callbacks(&self) -> bool {
        self.ibc_port_id.as_ref().is_some_and(|port| !port.is_empty())
    }
}

#[cw_serde]
pub struct ExecuteContractMsg {
    pub sender: Addr,
    pub contract: Addr,
    pub msg: Binary,
    pub funds: Vec<Coin>,
}

impl ExecuteContractMsg {
    /// Stateless checks run before handing the message to the contract runtime.
    pub fn validate_basic(&self, bech32_prefix: &str) -> Result<(), QTransferError> {
        for addr in [&self.sender, &self.contract] {
            crate::memo::validate_bech32(addr.as_str(), bech32_prefix).map_err(|err| {
                QTransferError::AddressDecode {
                    address: addr.to_string(),
                    reason: err.to_string(),
                }
            })?;
        }

        if self.msg.is_empty() {
            return Err(QTransferError::InvalidExecuteMsg("empty msg".to_string()));
        }

        if serde_json::from_slice::<serde_json::Value>(&self.msg).is_err() {
            return Err(QTransferError::InvalidExecuteMsg("msg is not valid json".to_string()));
        }

        for coin in &self.funds {
            if coin.amount.is_zero() {
                return Err(QTransferError::InvalidExecuteMsg(format!(
                    "zero amount for {}",
                    coin.denom
                )));
            }

            if !is_valid_denom(&coin.denom) {
                return Err(QTransferError::InvalidExecuteMsg(format!(
                    "invalid denom {}",
                    coin.denom
                )));
            }
        }

        Ok(())
    }
}

/// `[a-zA-Z][a-zA-Z0-9/:._-]{2,127}`
pub fn is_valid_denom(denom: &str) -> bool {
    let mut chars = denom.chars();

    (3..=128).contains(&denom.len())
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-'))
}

/// Delivered to a contract that sent a transfer once the packet was acknowledged.
#[cw_serde]
pub struct IbcAckCallback {
    pub packet: IbcPacket,
    pub ack: Binary,
    pub success: bool,
    pub relayer: Addr,
}

/// Delivered to a contract that sent a transfer once the packet timed out.
#[cw_serde]
pub struct IbcTimeoutCallback {
    pub packet: IbcPacket,
    pub relayer: Addr,
}

#[cw_serde]
pub enum IbcLifecycleComplete {
    IbcAck(IbcAckCallback),
    IbcTimeout(IbcTimeoutCallback),
}

/// Sudo message a contract receives when one of its transfers completes.
#[cw_serde]
pub enum IbcHookSudoMsg {
    IbcLifecycleComplete(IbcLifecycleComplete),
}

/// Contract runtime as seen by the hooks.
pub trait ContractKeeper {
    fn contract_info(&self, storage: &dyn Storage, contract: &Addr)
        -> AppResult<Option<ContractInfo>>;

    /// Execute `msg.msg` on `msg.contract`, moving `msg.funds` from `msg.sender` first.
    fn execute(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        msg: ExecuteContractMsg,
    ) -> AppResult<AppResponse>;

    /// Deliver a sudo message to `contract`.
    fn sudo(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        contract: &Addr,
        msg: IbcHookSudoMsg,
    ) -> AppResult<AppResponse>;
}
