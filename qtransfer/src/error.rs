use thiserror::Error;

use crate::memo::MetadataError;

/// Default [`Result`] used in the project
pub type AppResult<T> = Result<T, anyhow::Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QTransferError {
    #[error("invalid metadata format: {0}")]
    MalformedMetadata(#[from] MetadataError),

    #[error("cannot unmarshal ICS-20 transfer packet data: {0}")]
    PacketDataDecode(String),

    #[error("cannot unmarshal ICS-20 transfer packet acknowledgement: {0}")]
    AckDecode(String),

    #[error("invalid packet data: amount {0} is not an unsigned integer")]
    InvalidAmount(String),

    #[error("invalid address {address}: {reason}")]
    AddressDecode { address: String, reason: String },

    #[error("invalid contract execute message: {0}")]
    InvalidExecuteMsg(String),

    #[error("cannot create module account {address}, due to an account at that address already existing & having sent txs")]
    AccountInUse { address: String },

    #[error("cannot create module account {address}, due to an account at that address already existing & not being an overrideable type")]
    AccountNotOverridable { address: String },
}
