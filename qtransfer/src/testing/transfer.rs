use std::{cell::RefCell, rc::Rc, str::FromStr};

use anyhow::bail;
use cosmwasm_std::{
    Addr, Api, BlockInfo, Coin, IbcChannelCloseMsg, IbcChannelConnectMsg, IbcChannelOpenMsg,
    IbcPacket, IbcPacketAckMsg, IbcPacketReceiveMsg, IbcPacketTimeoutMsg, Storage, Uint128,
};
use cw_multi_test::AppResponse;
use qtransfer_macros::IbcPort;

use crate::{
    error::AppResult,
    ibc_application::{IbcApplication, PacketReceiveResponse},
    ibc_applications::{Acknowledgement, FungibleTokenPacketData, Ics20Helper},
};

use super::bank;

#[derive(Default, Debug)]
pub struct TransferLog {
    pub received: Vec<IbcPacketReceiveMsg>,
    pub acks: Vec<IbcPacketAckMsg>,
    pub timeouts: Vec<IbcPacketTimeoutMsg>,
    pub channel_events: Vec<&'static str>,
}

/// Transfer application minting received tokens through [`bank`] and refunding
/// senders on error acks and timeouts.
#[derive(Clone, Default, IbcPort)]
#[ibc_port = "transfer"]
pub struct MockTransfer {
    pub log: Rc<RefCell<TransferLog>>,
    /// Make `packet_ack` fail.
    pub fail_acks: bool,
}

impl MockTransfer {
    fn receive(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        packet: &IbcPacket,
    ) -> AppResult<AppResponse> {
        let data = FungibleTokenPacketData::decode(&packet.data)?;
        let receiver = api.addr_validate(&data.receiver)?;
        let amount = Uint128::from_str(&data.amount)?;

        let denom = Ics20Helper::local_denom_on_recv(packet, &data.denom);

        bank::mint(api, block, storage, &receiver, Coin::new(amount, denom))
    }

    fn refund(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        packet: &IbcPacket,
    ) -> AppResult<AppResponse> {
        let data = FungibleTokenPacketData::decode(&packet.data)?;
        let amount = Uint128::from_str(&data.amount)?;

        bank::mint(
            api,
            block,
            storage,
            &Addr::unchecked(data.sender),
            Coin::new(amount, data.denom),
        )
    }
}

impl IbcApplication for MockTransfer {
    fn open_channel(
        &self,
        _api: &dyn Api,
        _block: &BlockInfo,
        _storage: &mut dyn Storage,
        _msg: IbcChannelOpenMsg,
    ) -> AppResult<AppResponse> {
        self.log.borrow_mut().channel_events.push("open");
        Ok(AppResponse::default())
    }

    fn channel_connect(
        &self,
        _api: &dyn Api,
        _block: &BlockInfo,
        _storage: &mut dyn Storage,
        _msg: IbcChannelConnectMsg,
    ) -> AppResult<AppResponse> {
        self.log.borrow_mut().channel_events.push("connect");
        Ok(AppResponse::default())
    }

    fn channel_close(
        &self,
        _api: &dyn Api,
        _block: &BlockInfo,
        _storage: &mut dyn Storage,
        _msg: IbcChannelCloseMsg,
    ) -> AppResult<AppResponse> {
        self.log.borrow_mut().channel_events.push("close");
        Ok(AppResponse::default())
    }

    fn packet_receive(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        msg: IbcPacketReceiveMsg,
    ) -> AppResult<PacketReceiveResponse> {
        let (ack, response) = match self.receive(api, block, storage, &msg.packet) {
            Ok(response) => (Acknowledgement::ics20_success(), response),
            Err(err) => (Acknowledgement::error(err), AppResponse::default()),
        };

        self.log.borrow_mut().received.push(msg);

        Ok(PacketReceiveResponse { response, ack })
    }

    fn packet_ack(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        msg: IbcPacketAckMsg,
    ) -> AppResult<AppResponse> {
        self.log.borrow_mut().acks.push(msg.clone());

        if self.fail_acks {
            bail!("transfer ack handling failed")
        }

        if !Acknowledgement::decode(&msg.acknowledgement.data)?.is_success() {
            self.refund(api, block, storage, &msg.original_packet)?;
        }

        Ok(AppResponse::default())
    }

    fn packet_timeout(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        msg: IbcPacketTimeoutMsg,
    ) -> AppResult<AppResponse> {
        self.log.borrow_mut().timeouts.push(msg.clone());
        self.refund(api, block, storage, &msg.packet)
    }
}
