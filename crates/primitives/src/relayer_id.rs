use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identity of a relayer instance, as assigned by the Layer-2
/// consensus (a bech32 account address in practice).
///
/// Leadership checks only ever compare two of these for equality; nothing
/// in the withdrawal engine inspects the inner encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelayerId(String);

impl RelayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RelayerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RelayerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for RelayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
