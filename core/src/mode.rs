//! Create modes.

use serde::{Deserialize, Serialize};

use crate::error::UnknownCreateMode;

/// How a create names its node. Serializes as its stable flag value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum CreateMode {
    /// The node is created at exactly the requested path.
    #[default]
    Persistent,
    /// The parent's counter, zero-padded, is appended to the requested path.
    PersistentSequential,
}

impl CreateMode {
    pub fn is_sequential(self) -> bool {
        matches!(self, CreateMode::PersistentSequential)
    }

    /// Stable flag value.
    pub fn to_flag(self) -> i32 {
        match self {
            CreateMode::Persistent => 0,
            CreateMode::PersistentSequential => 2,
        }
    }

    pub fn from_flag(flag: i32) -> Result<Self, UnknownCreateMode> {
        match flag {
            0 => Ok(CreateMode::Persistent),
            2 => Ok(CreateMode::PersistentSequential),
            other => Err(UnknownCreateMode(other)),
        }
    }
}

impl From<CreateMode> for i32 {
    fn from(mode: CreateMode) -> Self {
        mode.to_flag()
    }
}

impl TryFrom<i32> for CreateMode {
    type Error = UnknownCreateMode;

    fn try_from(flag: i32) -> Result<Self, Self::Error> {
        Self::from_flag(flag)
    }
}
