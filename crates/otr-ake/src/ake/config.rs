use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ProtocolVersion, MIN_VALID_INSTANCE_TAG};

/// Per-conversation settings for one side of the handshake.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AkeConfig {
    pub version: ProtocolVersion,
    pub sender_instance_tag: u32,
    /// `0` until the peer's instance tag is known
    pub receiver_instance_tag: u32,
    /// Identifier of the first DH key handed to the data-message layer
    pub key_id: u32,
}

impl Default for AkeConfig {
    fn default() -> Self {
        Self {
            version: ProtocolVersion::V3,
            sender_instance_tag: MIN_VALID_INSTANCE_TAG,
            receiver_instance_tag: 0,
            key_id: 0,
        }
    }
}

impl AkeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.version.has_instance_tags() {
            return Ok(());
        }
        if self.sender_instance_tag < MIN_VALID_INSTANCE_TAG {
            Err(ConfigError::ReservedInstanceTag {
                field: "sender_instance_tag",
                tag: self.sender_instance_tag,
            })?
        }
        if self.receiver_instance_tag != 0 && self.receiver_instance_tag < MIN_VALID_INSTANCE_TAG {
            Err(ConfigError::ReservedInstanceTag {
                field: "receiver_instance_tag",
                tag: self.receiver_instance_tag,
            })?
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    ReservedInstanceTag { field: &'static str, tag: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ReservedInstanceTag { field, tag } => {
                write!(f, "{field} {tag:#x} is in the reserved range")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
