use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolVersionError {
    #[error("empty protocol version string")]
    Empty,
    #[error("invalid protocol version component `{0}`")]
    InvalidComponent(String),
}

/// Dotted protocol version ("1.1", "1.4"), compared component-wise.
///
/// A version whose leading components all match a shorter version but which
/// carries additional components is the greater one: "1.2.3" > "1.2".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProtocolVersion(Vec<u32>);

impl ProtocolVersion {
    /// Version assumed for messages that carry no explicit version field.
    pub fn base() -> Self {
        Self(vec![1, 1])
    }

    /// First version supporting multiple authn context class references
    /// and the authentication profile field.
    pub fn v1_4() -> Self {
        Self(vec![1, 4])
    }
}

impl FromStr for ProtocolVersion {
    type Err = ProtocolVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ProtocolVersionError::Empty);
        }

        let components = s
            .split('.')
            .map(|component| {
                component
                    .parse::<u32>()
                    .map_err(|_| ProtocolVersionError::InvalidComponent(component.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self(components))
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self
            .0
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{formatted}")
    }
}
