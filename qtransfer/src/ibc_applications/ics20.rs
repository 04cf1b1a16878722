use cosmwasm_schema::cw_serde;
use cosmwasm_std::{from_json, to_json_binary, Binary, HexBinary, IbcPacket};
use ibc_proto::ibc::apps::transfer::v1::DenomTrace;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{
    error::{AppResult, QTransferError},
    ibc::{Channelable, IbcEndpointExt},
};

/// ICS-20 packet payload.
///
/// Fields are declared in lexicographic order so that serialization matches the
/// sorted JSON produced by the transfer module on the counterparty.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FungibleTokenPacketData {
    pub amount: String,
    pub denom: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub memo: String,
    pub receiver: String,
    pub sender: String,
}

impl FungibleTokenPacketData {
    pub fn decode(data: &Binary) -> Result<Self, QTransferError> {
        from_json(data).map_err(|err| QTransferError::PacketDataDecode(err.to_string()))
    }

    pub fn encode(&self) -> AppResult<Binary> {
        Ok(to_json_binary(self)?)
    }
}

/// Standard channel acknowledgement envelope: `{"result":"<base64>"}` or `{"error":"<message>"}`.
#[cw_serde]
pub enum Acknowledgement {
    Result(Binary),
    Error(String),
}

impl Acknowledgement {
    pub fn success(result: impl Into<Binary>) -> Self {
        Self::Result(result.into())
    }

    /// The result the transfer module writes on a successful receive.
    pub fn ics20_success() -> Self {
        Self::Result(Binary::from(vec![1_u8]))
    }

    pub fn error(err: impl ToString) -> Self {
        Self::Error(err.to_string())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Result(_))
    }

    pub fn to_binary(&self) -> AppResult<Binary> {
        Ok(to_json_binary(self)?)
    }

    pub fn decode(data: &Binary) -> Result<Self, QTransferError> {
        from_json(data).map_err(|err| QTransferError::AckDecode(err.to_string()))
    }
}

pub struct Ics20Helper;

impl Ics20Helper {
    /// Whether the denom was sent from this chain through the packet source
    /// endpoint, i.e. the receiving chain is unwinding its own voucher.
    pub fn receiver_chain_is_source(packet: &IbcPacket, denom: &str) -> bool {
        denom.starts_with(&packet.src.denom_prefix())
    }

    /// Split a denom into its `port/channel` path and base denom.
    ///
    /// Pairs are only taken into the path while the element after the port is a
    /// valid channel id, anything after that is part of the base denom.
    pub fn parse_denom_trace(raw_denom: &str) -> DenomTrace {
        let items: Vec<&str> = raw_denom.split('/').collect();

        if items.len() == 1 {
            return DenomTrace {
                path: String::new(),
                base_denom: raw_denom.to_string(),
            };
        }

        let length = items.len();
        let mut path = vec![];
        let mut base_denom = vec![];

        let mut i = 0;
        while i < length {
            if i < length - 1 && length > 2 && items[i + 1].is_channel_id() {
                path.extend_from_slice(&items[i..i + 2]);
            } else {
                base_denom.extend_from_slice(&items[i..]);
                break;
            }
            i += 2;
        }

        DenomTrace {
            path: path.join("/"),
            base_denom: base_denom.join("/"),
        }
    }

    pub fn full_denom_path(trace: &DenomTrace) -> String {
        if trace.path.is_empty() {
            trace.base_denom.clone()
        } else {
            format!("{}/{}", trace.path, trace.base_denom)
        }
    }

    /// `ibc/{UPPERHEX(sha256(path/base))}`, or the base denom for native tokens.
    pub fn ibc_denom(trace: &DenomTrace) -> String {
        if trace.path.is_empty() {
            return trace.base_denom.clone();
        }

        let hash = Sha256::digest(Self::full_denom_path(trace).as_bytes());

        format!("ibc/{}", HexBinary::from(hash.as_slice()).to_hex().to_uppercase())
    }

    pub fn compute_ibc_denom_from_trace(trace: &str) -> String {
        Self::ibc_denom(&Self::parse_denom_trace(trace))
    }

    /// Denom credited on this chain for a received transfer of `denom` over `packet`.
    pub fn local_denom_on_recv(packet: &IbcPacket, denom: &str) -> String {
        if Self::receiver_chain_is_source(packet, denom) {
            let unprefixed = &denom[packet.src.denom_prefix().len()..];
            let trace = Self::parse_denom_trace(unprefixed);

            if trace.path.is_empty() {
                unprefixed.to_string()
            } else {
                Self::ibc_denom(&trace)
            }
        } else {
            let prefixed = format!("{}{}", packet.dest.denom_prefix(), denom);
            Self::compute_ibc_denom_from_trace(&prefixed)
        }
    }
}
