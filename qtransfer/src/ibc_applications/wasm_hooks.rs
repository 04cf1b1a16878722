use std::{rc::Rc, str::FromStr};

use anyhow::Context;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    to_json_binary, Addr, Api, Binary, BlockInfo, Coin, Event, IbcPacketAckMsg,
    IbcPacketReceiveMsg, IbcPacketTimeoutMsg, Storage, Uint128,
};
use cw_multi_test::AppResponse;

use crate::{
    contracts::{
        ContractKeeper, ExecuteContractMsg, IbcAckCallback, IbcHookSudoMsg, IbcLifecycleComplete,
        IbcTimeoutCallback,
    },
    error::{AppResult, QTransferError},
    ibc_application::{IbcApplication, PacketReceiveResponse},
    keeper::Keeper,
    memo::{parse_memo, validate_bech32, ParsedMemo},
    middleware::{MidRecOk, Middleware, MiddlewareResponse},
    response::AppResponseExt,
};

use super::{Acknowledgement, FungibleTokenPacketData, Ics20Helper};

pub const WASM_HOOK_EVENT: &str = "wasm_hook";
pub const WASM_HOOK_CALLBACK_EVENT: &str = "wasm_hook_callback";

/// Success payload of a routed transfer.
#[cw_serde]
pub struct ContractAck {
    /// Data returned by the contract execution.
    pub contract_result: Option<Binary>,
    /// Acknowledgement written by the wrapped transfer application.
    pub ibc_ack: Binary,
}

/// Routing decided on packet receive, carried to the `after` hook.
#[derive(Debug, Clone, PartialEq)]
pub enum HookRoute {
    PassThrough,
    Routed {
        contract: Addr,
        msg: Binary,
        data: FungibleTokenPacketData,
    },
}

/// [`Middleware`] executing a contract with the funds of an ICS-20 transfer when the
/// memo says so, and telling contracts how their own transfers ended.
///
/// ## Receive
///
/// A transfer with memo `{"wasm":{"contract":"<addr>","msg":{..}}}` is credited to the
/// [`Keeper::intermediate_account`] instead of the receiver. Once the inner application
/// minted or unescrowed the funds, `msg` is executed on the contract from the intermediate
/// account with the received coin attached. The ack is a [`ContractAck`] on success.
///
/// The contract address has to be the packet receiver. Malformed `wasm` sections are
/// answered with an error ack without involving the inner application.
///
/// If the contract execution fails the ack is an error but the transfer itself is not
/// reverted, the funds are left on the intermediate account.
///
/// ## Ack and timeout
///
/// After the inner application handled them, contracts with an ibc port that sent the
/// transfer receive an [`IbcHookSudoMsg::IbcLifecycleComplete`] sudo. Errors returned by
/// the contract fail the whole transaction.
pub struct WasmHooks {
    inner: Box<dyn IbcApplication>,
    keeper: Keeper,
    contracts: Rc<dyn ContractKeeper>,
}

impl WasmHooks {
    pub fn new<T: IbcApplication + 'static>(
        inner: T,
        keeper: Keeper,
        contracts: Rc<dyn ContractKeeper>,
    ) -> Self {
        Self {
            inner: Box::new(inner),
            keeper,
            contracts,
        }
    }

    pub fn keeper(&self) -> &Keeper {
        &self.keeper
    }

    fn execute_contract(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        msg: ExecuteContractMsg,
    ) -> AppResult<AppResponse> {
        msg.validate_basic(self.keeper.bech32_prefix())
            .context("invalid wasm contract execution message")?;

        self.contracts.execute(api, block, storage, msg)
    }

    /// The sender of an outbound transfer, when it is a contract accepting ibc callbacks.
    fn callback_target(&self, storage: &dyn Storage, sender: &str) -> AppResult<Option<Addr>> {
        validate_bech32(sender, self.keeper.bech32_prefix()).map_err(|err| {
            anyhow::Error::new(QTransferError::AddressDecode {
                address: sender.to_string(),
                reason: err.to_string(),
            })
            .context("failed to decode transfer packet sender address")
        })?;

        let contract = Addr::unchecked(sender);

        let Some(info) = self.contracts.contract_info(storage, &contract)? else {
            tracing::info!(address = %contract, "ContractInfo not found for address");
            return Ok(None);
        };

        if !info.accepts_ibc_callbacks() {
            tracing::info!(address = %contract, code_id = info.code_id, "Contract does not support ibc");
            return Ok(None);
        }

        Ok(Some(contract))
    }
}

impl Middleware for WasmHooks {
    type RecvState = HookRoute;

    fn get_inner(&self) -> &dyn IbcApplication {
        self.inner.as_ref()
    }

    fn mid_packet_receive_before(
        &self,
        _api: &dyn Api,
        _block: &BlockInfo,
        storage: &mut dyn Storage,
        msg: IbcPacketReceiveMsg,
    ) -> AppResult<MiddlewareResponse<PacketReceiveResponse, (IbcPacketReceiveMsg, HookRoute)>>
    {
        if !self.keeper.wasm_hooks_enabled(storage)? {
            return Ok(MiddlewareResponse::Continue((msg, HookRoute::PassThrough)));
        }

        let Ok(mut data) = FungibleTokenPacketData::decode(&msg.packet.data) else {
            return Ok(MiddlewareResponse::Continue((msg, HookRoute::PassThrough)));
        };

        match parse_memo(&data.memo, &data.receiver, self.keeper.bech32_prefix()) {
            ParsedMemo::PassThrough => {
                Ok(MiddlewareResponse::Continue((msg, HookRoute::PassThrough)))
            }
            ParsedMemo::Rejected(reason) => {
                tracing::debug!(
                    receiver = %data.receiver,
                    sequence = msg.packet.sequence,
                    %reason,
                    "rejecting wasm hook memo"
                );

                Ok(MiddlewareResponse::Stop(PacketReceiveResponse::new(
                    Acknowledgement::error(QTransferError::from(reason)),
                )))
            }
            ParsedMemo::Routed {
                contract,
                msg: contract_msg,
            } => {
                data.receiver = self.keeper.intermediate_account().to_string();

                let packet_data = match data.encode() {
                    Ok(packet_data) => packet_data,
                    Err(err) => {
                        return Ok(MiddlewareResponse::Stop(PacketReceiveResponse::new(
                            Acknowledgement::error(format!(
                                "cannot marshal the ICS20 packet: {err}"
                            )),
                        )))
                    }
                };

                let mut forwarded = msg;
                forwarded.packet.data = packet_data;

                Ok(MiddlewareResponse::Continue((
                    forwarded,
                    HookRoute::Routed {
                        contract,
                        msg: contract_msg,
                        data,
                    },
                )))
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn mid_packet_receive_after(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        _original_msg: IbcPacketReceiveMsg,
        forwarded_msg: IbcPacketReceiveMsg,
        state: HookRoute,
        returning_response: &PacketReceiveResponse,
    ) -> AppResult<MidRecOk> {
        let HookRoute::Routed {
            contract,
            msg,
            data,
        } = state
        else {
            return Ok(MidRecOk::default());
        };

        // The transfer failed, nothing was credited.
        if !returning_response.ack.is_success() {
            return Ok(MidRecOk::default());
        }

        let Ok(amount) = Uint128::from_str(&data.amount) else {
            return Ok(MidRecOk::replace(
                AppResponse::default(),
                Acknowledgement::error(QTransferError::InvalidAmount(data.amount)),
            ));
        };

        let denom = Ics20Helper::local_denom_on_recv(&forwarded_msg.packet, &data.denom);

        let funds = if amount.is_zero() {
            vec![]
        } else {
            vec![Coin::new(amount, denom)]
        };

        let execute_msg = ExecuteContractMsg {
            sender: self.keeper.intermediate_account().clone(),
            contract: contract.clone(),
            msg,
            funds,
        };

        let event = Event::new(WASM_HOOK_EVENT)
            .add_attribute("contract", contract.as_str())
            .add_attribute("sequence", forwarded_msg.packet.sequence.to_string());

        match self.execute_contract(api, block, storage, execute_msg) {
            Ok(response) => {
                let contract_ack = ContractAck {
                    contract_result: response.data.clone(),
                    ibc_ack: returning_response.ack.to_binary()?,
                };

                let ack = match to_json_binary(&contract_ack) {
                    Ok(ack) => Acknowledgement::success(ack),
                    Err(err) => Acknowledgement::error(format!(
                        "cannot marshal the contract acknowledgement: {err}"
                    )),
                };

                Ok(MidRecOk::replace(
                    response.add_event(event.add_attribute("success", "true")),
                    ack,
                ))
            }
            Err(err) => {
                let err = format!("{err:#}");

                tracing::error!(
                    contract = %contract,
                    error = %err,
                    "wasm hook contract execution failed"
                );

                Ok(MidRecOk::replace(
                    AppResponse::default().add_event(
                        event
                            .add_attribute("success", "false")
                            .add_attribute("error", &err),
                    ),
                    Acknowledgement::error(err),
                ))
            }
        }
    }

    fn mid_packet_ack_after(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        original_msg: IbcPacketAckMsg,
        _forwarded_msg: IbcPacketAckMsg,
        _returning_response: &AppResponse,
    ) -> AppResult<AppResponse> {
        let data = FungibleTokenPacketData::decode(&original_msg.original_packet.data)?;
        let ack = Acknowledgement::decode(&original_msg.acknowledgement.data)?;

        let Some(contract) = self.callback_target(storage, &data.sender)? else {
            return Ok(AppResponse::default());
        };

        if let Acknowledgement::Error(error) = &ack {
            tracing::debug!(
                contract_address = %contract,
                error = %error,
                "passing an error acknowledgment to contract"
            );
        }

        let response = self
            .contracts
            .sudo(
                api,
                block,
                storage,
                &contract,
                IbcHookSudoMsg::IbcLifecycleComplete(IbcLifecycleComplete::IbcAck(
                    IbcAckCallback {
                        packet: original_msg.original_packet,
                        ack: original_msg.acknowledgement.data,
                        success: ack.is_success(),
                        relayer: original_msg.relayer,
                    },
                )),
            )
            .inspect_err(|err| {
                tracing::error!(
                    contract_address = %contract,
                    error = %err,
                    "contract returned error for acknowledgment"
                )
            })
            .context("contract returned error for acknowledgment")?;

        Ok(response.add_event(
            Event::new(WASM_HOOK_CALLBACK_EVENT)
                .add_attribute("contract", contract.as_str())
                .add_attribute("callback", "ack")
                .add_attribute("success", ack.is_success().to_string()),
        ))
    }

    fn mid_packet_timeout_after(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        original_msg: IbcPacketTimeoutMsg,
        _forwarded_msg: IbcPacketTimeoutMsg,
        _returning_response: &AppResponse,
    ) -> AppResult<AppResponse> {
        let data = FungibleTokenPacketData::decode(&original_msg.packet.data)?;

        let Some(contract) = self.callback_target(storage, &data.sender)? else {
            return Ok(AppResponse::default());
        };

        let response = self
            .contracts
            .sudo(
                api,
                block,
                storage,
                &contract,
                IbcHookSudoMsg::IbcLifecycleComplete(IbcLifecycleComplete::IbcTimeout(
                    IbcTimeoutCallback {
                        packet: original_msg.packet,
                        relayer: original_msg.relayer,
                    },
                )),
            )
            .inspect_err(|err| {
                tracing::error!(
                    contract_address = %contract,
                    error = %err,
                    "contract returned error for timeout"
                )
            })
            .context("contract returned error for timeout")?;

        Ok(response.add_event(
            Event::new(WASM_HOOK_CALLBACK_EVENT)
                .add_attribute("contract", contract.as_str())
                .add_attribute("callback", "timeout"),
        ))
    }
}
