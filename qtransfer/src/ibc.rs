use anyhow::{anyhow, bail};
use cosmwasm_std::IbcEndpoint;

use crate::error::AppResult;

const CHANNEL_PREFIX: &str = "channel-";

/// Parsing of `channel-{N}` identifiers.
pub trait Channelable {
    fn as_channel_number(&self) -> AppResult<u64>;

    /// Whether the value is a well formed `channel-{N}` identifier.
    fn is_channel_id(&self) -> bool {
        self.as_channel_number().is_ok()
    }
}

impl Channelable for &str {
    fn as_channel_number(&self) -> AppResult<u64> {
        let number = self
            .strip_prefix(CHANNEL_PREFIX)
            .ok_or(anyhow!("invalid channel id: {self}"))?;

        // u64::from_str also takes a leading `+`.
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            bail!("invalid channel id: {self}")
        }

        number
            .parse::<u64>()
            .map_err(|_| anyhow!("invalid channel id: {self}"))
    }
}

pub trait IbcEndpointExt {
    /// `{port}/{channel}/`, the trace element an endpoint adds to a denom.
    fn denom_prefix(&self) -> String;
}

impl IbcEndpointExt for IbcEndpoint {
    fn denom_prefix(&self) -> String {
        format!("{}/{}/", self.port_id, self.channel_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_ids() {
        assert_eq!("channel-0".as_channel_number().unwrap(), 0);
        assert_eq!("channel-42".as_channel_number().unwrap(), 42);

        assert!(!"channel-".is_channel_id());
        assert!("channel-01".is_channel_id());
        assert!(!"channel-+1".is_channel_id());
        assert!(!"connection-0".is_channel_id());
        assert!(!"transfer".is_channel_id());
    }

    #[test]
    fn denom_prefix() {
        let endpoint = IbcEndpoint {
            port_id: "transfer".to_string(),
            channel_id: "channel-141".to_string(),
        };

        assert_eq!(endpoint.denom_prefix(), "transfer/channel-141/");
    }
}
