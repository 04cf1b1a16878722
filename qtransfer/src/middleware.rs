use cosmwasm_std::{
    Api, BlockInfo, IbcChannelCloseMsg, IbcChannelConnectMsg, IbcChannelOpenMsg, IbcPacketAckMsg,
    IbcPacketReceiveMsg, IbcPacketTimeoutMsg, Storage,
};
use cw_multi_test::AppResponse;

use crate::{
    error::AppResult,
    ibc_application::{IbcApplication, IbcPortInterface, PacketReceiveResponse},
    ibc_applications::Acknowledgement,
    response::AppResponseExt,
};

/// Enum rappresenting how the flow has to be controlled when triggering the `before` variant of [`Middleware`] functions.
pub enum MiddlewareResponse<S, C> {
    /// The inner application will not be called and the Value `S` will be returned.
    Stop(S),
    /// The inner application will be called. After the execution of the inner call, the `after` variant of the [`Middleware`] function will be called.
    Continue(C),
}

/// Wraps another [`IbcApplication`] and alters its behaviour around each lifecycle callback.
///
/// Every [`IbcApplication`] function is split in two hooks, `before` and `after`:
/// - the `before` hook runs first and returns a [`MiddlewareResponse`]. With `Stop` the inner
///   application is skipped and the value is returned as is. With `Continue` the carried value is
///   forwarded to the inner application;
/// - the `after` hook runs once the inner application returned successfully, and receives both the
///   original and the forwarded message together with the inner response.
///
/// Errors of the inner application are propagated before the `after` hook is called.
///
/// On packet receive, `Continue` also carries a [`Middleware::RecvState`], letting the `before` hook
/// hand whatever it decided to the `after` hook without decoding the packet twice.
///
/// Implementing [`Middleware`] implements [`IbcApplication`] as well.
pub trait Middleware {
    /// State forwarded from [`Middleware::mid_packet_receive_before`] to [`Middleware::mid_packet_receive_after`].
    type RecvState;

    /// Return the inner [`IbcApplication`]
    fn get_inner(&self) -> &dyn IbcApplication;

    /// Function triggered before the calling of inner [`IbcApplication::packet_receive`].
    fn mid_packet_receive_before(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        msg: IbcPacketReceiveMsg,
    ) -> AppResult<MiddlewareResponse<PacketReceiveResponse, (IbcPacketReceiveMsg, Self::RecvState)>>;

    /// Function triggered after [`IbcApplication::packet_receive`] only if [`Middleware::mid_packet_receive_before`] returned [`MiddlewareResponse::Continue`]
    #[allow(clippy::too_many_arguments)]
    fn mid_packet_receive_after(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        original_msg: IbcPacketReceiveMsg,
        forwarded_msg: IbcPacketReceiveMsg,
        state: Self::RecvState,
        returning_response: &PacketReceiveResponse,
    ) -> AppResult<MidRecOk>;

    /// Function triggered before the calling of inner [`IbcApplication::packet_ack`].
    #[allow(unused_variables)]
    fn mid_packet_ack_before(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        msg: IbcPacketAckMsg,
    ) -> AppResult<MiddlewareResponse<AppResponse, IbcPacketAckMsg>> {
        Ok(MiddlewareResponse::Continue(msg))
    }

    /// Function triggered after [`IbcApplication::packet_ack`] only if [`Middleware::mid_packet_ack_before`] returned [`MiddlewareResponse::Continue`]
    #[allow(unused_variables)]
    #[allow(clippy::too_many_arguments)]
    fn mid_packet_ack_after(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        original_msg: IbcPacketAckMsg,
        forwarded_msg: IbcPacketAckMsg,
        returning_response: &AppResponse,
    ) -> AppResult<AppResponse> {
        Ok(AppResponse::default())
    }

    /// Function triggered before the calling of inner [`IbcApplication::packet_timeout`].
    #[allow(unused_variables)]
    fn mid_packet_timeout_before(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        msg: IbcPacketTimeoutMsg,
    ) -> AppResult<MiddlewareResponse<AppResponse, IbcPacketTimeoutMsg>> {
        Ok(MiddlewareResponse::Continue(msg))
    }

    /// Function triggered after [`IbcApplication::packet_timeout`] only if [`Middleware::mid_packet_timeout_before`] returned [`MiddlewareResponse::Continue`]
    #[allow(unused_variables)]
    #[allow(clippy::too_many_arguments)]
    fn mid_packet_timeout_after(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        original_msg: IbcPacketTimeoutMsg,
        forwarded_msg: IbcPacketTimeoutMsg,
        returning_response: &AppResponse,
    ) -> AppResult<AppResponse> {
        Ok(AppResponse::default())
    }

    /// Function triggered before the calling of inner [`IbcApplication::open_channel`].
    #[allow(unused_variables)]
    fn mid_open_channel_before(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        msg: IbcChannelOpenMsg,
    ) -> AppResult<MiddlewareResponse<AppResponse, IbcChannelOpenMsg>> {
        Ok(MiddlewareResponse::Continue(msg))
    }

    /// Function triggered after [`IbcApplication::open_channel`] only if [`Middleware::mid_open_channel_before`] returned [`MiddlewareResponse::Continue`]
    #[allow(unused_variables)]
    #[allow(clippy::too_many_arguments)]
    fn mid_open_channel_after(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        original_msg: IbcChannelOpenMsg,
        forwarded_msg: IbcChannelOpenMsg,
        returning_response: &AppResponse,
    ) -> AppResult<AppResponse> {
        Ok(AppResponse::default())
    }

    /// Function triggered before the calling of inner [`IbcApplication::channel_connect`].
    #[allow(unused_variables)]
    fn mid_channel_connect_before(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        msg: IbcChannelConnectMsg,
    ) -> AppResult<MiddlewareResponse<AppResponse, IbcChannelConnectMsg>> {
        Ok(MiddlewareResponse::Continue(msg))
    }

    /// Function triggered after [`IbcApplication::channel_connect`] only if [`Middleware::mid_channel_connect_before`] returned [`MiddlewareResponse::Continue`]
    #[allow(unused_variables)]
    #[allow(clippy::too_many_arguments)]
    fn mid_channel_connect_after(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        original_msg: IbcChannelConnectMsg,
        forwarded_msg: IbcChannelConnectMsg,
        returning_response: &AppResponse,
    ) -> AppResult<AppResponse> {
        Ok(AppResponse::default())
    }

    /// Function triggered before the calling of inner [`IbcApplication::channel_close`].
    #[allow(unused_variables)]
    fn mid_channel_close_before(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        msg: IbcChannelCloseMsg,
    ) -> AppResult<MiddlewareResponse<AppResponse, IbcChannelCloseMsg>> {
        Ok(MiddlewareResponse::Continue(msg))
    }

    /// Function triggered after [`IbcApplication::channel_close`] only if [`Middleware::mid_channel_close_before`] returned [`MiddlewareResponse::Continue`]
    #[allow(unused_variables)]
    #[allow(clippy::too_many_arguments)]
    fn mid_channel_close_after(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        original_msg: IbcChannelCloseMsg,
        forwarded_msg: IbcChannelCloseMsg,
        returning_response: &AppResponse,
    ) -> AppResult<AppResponse> {
        Ok(AppResponse::default())
    }
}

impl<T> IbcPortInterface for T
where
    T: Middleware,
{
    fn port_name(&self) -> String {
        self.get_inner().port_name()
    }
}

impl<T> IbcApplication for T
where
    T: Middleware,
{
    fn open_channel(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        msg: IbcChannelOpenMsg,
    ) -> AppResult<AppResponse> {
        match self.mid_open_channel_before(api, block, storage, msg.clone())? {
            MiddlewareResponse::Stop(response) => Ok(response),
            MiddlewareResponse::Continue(next_msg) => {
                let sub_response =
                    self.get_inner()
                        .open_channel(api, block, storage, next_msg.clone())?;

                let res =
                    self.mid_open_channel_after(api, block, storage, msg, next_msg, &sub_response)?;

                Ok(res.merge(sub_response))
            }
        }
    }

    fn channel_connect(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        msg: IbcChannelConnectMsg,
    ) -> AppResult<AppResponse> {
        match self.mid_channel_connect_before(api, block, storage, msg.clone())? {
            MiddlewareResponse::Stop(response) => Ok(response),
            MiddlewareResponse::Continue(next_msg) => {
                let sub_response =
                    self.get_inner()
                        .channel_connect(api, block, storage, next_msg.clone())?;

                let res = self.mid_channel_connect_after(
                    api,
                    block,
                    storage,
                    msg,
                    next_msg,
                    &sub_response,
                )?;

                Ok(res.merge(sub_response))
            }
        }
    }

    fn channel_close(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        msg: IbcChannelCloseMsg,
    ) -> AppResult<AppResponse> {
        match self.mid_channel_close_before(api, block, storage, msg.clone())? {
            MiddlewareResponse::Stop(response) => Ok(response),
            MiddlewareResponse::Continue(next_msg) => {
                let sub_response =
                    self.get_inner()
                        .channel_close(api, block, storage, next_msg.clone())?;

                let res =
                    self.mid_channel_close_after(api, block, storage, msg, next_msg, &sub_response)?;

                Ok(res.merge(sub_response))
            }
        }
    }

    fn packet_receive(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        original_msg: IbcPacketReceiveMsg,
    ) -> AppResult<PacketReceiveResponse> {
        match self.mid_packet_receive_before(api, block, storage, original_msg.clone())? {
            MiddlewareResponse::Stop(response) => Ok(response),
            MiddlewareResponse::Continue((next_msg, state)) => {
                let sub_response =
                    self.get_inner()
                        .packet_receive(api, block, storage, next_msg.clone())?;

                let res = self.mid_packet_receive_after(
                    api,
                    block,
                    storage,
                    original_msg,
                    next_msg,
                    state,
                    &sub_response,
                )?;

                Ok(PacketReceiveResponse {
                    ack: res.ack.merge_ack(sub_response.ack),
                    response: res.response.merge(sub_response.response),
                })
            }
        }
    }

    fn packet_ack(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        msg: IbcPacketAckMsg,
    ) -> AppResult<AppResponse> {
        match self.mid_packet_ack_before(api, block, storage, msg.clone())? {
            MiddlewareResponse::Stop(response) => Ok(response),
            MiddlewareResponse::Continue(next_msg) => {
                let sub_response =
                    self.get_inner()
                        .packet_ack(api, block, storage, next_msg.clone())?;

                let res =
                    self.mid_packet_ack_after(api, block, storage, msg, next_msg, &sub_response)?;

                Ok(res.merge(sub_response))
            }
        }
    }

    fn packet_timeout(
        &self,
        api: &dyn Api,
        block: &BlockInfo,
        storage: &mut dyn Storage,
        msg: IbcPacketTimeoutMsg,
    ) -> AppResult<AppResponse> {
        match self.mid_packet_timeout_before(api, block, storage, msg.clone())? {
            MiddlewareResponse::Stop(response) => Ok(response),
            MiddlewareResponse::Continue(next_msg) => {
                let sub_response =
                    self.get_inner()
                        .packet_timeout(api, block, storage, next_msg.clone())?;

                let res = self.mid_packet_timeout_after(
                    api,
                    block,
                    storage,
                    msg,
                    next_msg,
                    &sub_response,
                )?;

                Ok(res.merge(sub_response))
            }
        }
    }
}

/// Define how the ack has to be handled
#[derive(Debug, Clone, PartialEq)]
pub enum AckSetting {
    /// The returned value override the ack returned from inner application.
    Replace(Acknowledgement),
    /// Use the inner ack.
    UseChildren,
}

impl AckSetting {
    pub(crate) fn merge_ack(self, inner: Acknowledgement) -> Acknowledgement {
        match self {
            AckSetting::Replace(replace) => replace,
            AckSetting::UseChildren => inner,
        }
    }
}

/// [Middleware::mid_packet_receive_after] result type.
pub struct MidRecOk {
    /// Response, it will be merged with inner application Response.
    pub response: AppResponse,
    /// Specifiy how ack has to be managed.
    pub ack: AckSetting,
}

impl MidRecOk {
    /// Create a [`MidRecOk`] with [`MidRecOk::ack`] as [AckSetting::UseChildren]
    pub fn use_children(response: AppResponse) -> Self {
        Self {
            response,
            ack: AckSetting::UseChildren,
        }
    }

    /// Create a [`MidRecOk`] overriding the inner ack
    pub fn replace(response: AppResponse, ack: Acknowledgement) -> Self {
        Self {
            response,
            ack: AckSetting::Replace(ack),
        }
    }
}

impl Default for MidRecOk {
    fn default() -> Self {
        Self::use_children(AppResponse::default())
    }
}
