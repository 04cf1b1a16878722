use cosmwasm_std::{
    Api, BlockInfo, IbcChannelCloseMsg, IbcChannelConnectMsg, IbcChannelOpenMsg, IbcPacketAckMsg,
    IbcPacketReceiveMsg, IbcPacketTimeoutMsg, Storage,
};
use cw_multi_test::AppResponse;

use crate::{error::AppResult, ibc_applications::Acknowledgement};

/// Capability set of an IBC application bound to a port.
///
/// Errors returned from these functions abort the whole enclosing transaction.
/// Business failures on the receive path have to be reported through the
/// acknowledgement of [`PacketReceiveResponse`] instead.
pub trait IbcApplication: IbcPortInterface {
    fn open_channel(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        msg: IbcChannelOpenMsg,
    ) -> AppResult<AppResponse>;

    fn channel_connect(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        msg: IbcChannelConnectMsg,
    ) -> AppResult<AppResponse>;

    fn channel_close(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        msg: IbcChannelCloseMsg,
    ) -> AppResult<AppResponse>;

    fn packet_receive(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        msg: IbcPacketReceiveMsg,
    ) -> AppResult<PacketReceiveResponse>;

    fn packet_ack(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        msg: IbcPacketAckMsg,
    ) -> AppResult<AppResponse>;

    fn packet_timeout(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        msg: IbcPacketTimeoutMsg,
    ) -> AppResult<AppResponse>;
}

pub trait IbcPortInterface {
    fn port_name(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct PacketReceiveResponse {
    pub response: AppResponse,
    pub ack: Acknowledgement,
}

impl PacketReceiveResponse {
    pub fn new(ack: Acknowledgement) -> Self {
        Self {
            response: AppResponse::default(),
            ack,
        }
    }
}
