//! Change-feed positions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An opaque position in a database change feed.
///
/// Servers report either a plain counter or a token of the form
/// `"<n>-<opaque>"`. Both serialize untagged so they round-trip through the
/// wire format unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seq {
    Number(u64),
    Token(String),
}

impl Seq {
    pub const ZERO: Self = Self::Number(0);

    /// Numeric ordinal of this position, if one can be read from it.
    pub fn ordinal(&self) -> Option<u64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Token(token) => token.split('-').next()?.parse().ok(),
        }
    }
}

impl Default for Seq {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<u64> for Seq {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Seq {
    fn from(token: &str) -> Self {
        match token.parse() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Token(token.to_string()),
        }
    }
}

impl fmt::Display for Seq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Token(token) => write!(f, "{token}"),
        }
    }
}

/// The position a checkpoint should be moved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckpointTarget {
    /// The database's current update sequence, read at write time.
    Now,
    /// A literal position.
    At(Seq),
}

impl Default for CheckpointTarget {
    fn default() -> Self {
        Self::At(Seq::ZERO)
    }
}

impl From<Seq> for CheckpointTarget {
    fn from(seq: Seq) -> Self {
        Self::At(seq)
    }
}

impl From<u64> for CheckpointTarget {
    fn from(n: u64) -> Self {
        Self::At(Seq::Number(n))
    }
}

impl FromStr for CheckpointTarget {
    type Err = std::convert::Infallible;

    /// `"now"` selects [`CheckpointTarget::Now`]; anything else is a literal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "now" => Self::Now,
            other => Self::At(Seq::from(other)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_token_ordinals() {
        assert_eq!(Seq::from(42u64).ordinal(), Some(42));
        assert_eq!(Seq::from("17-g1AAAABXeJzLYWBg").ordinal(), Some(17));
        assert_eq!(Seq::Token("garbage".into()).ordinal(), None);
    }

    #[test]
    fn untagged_serde() {
        assert_eq!(serde_json::to_string(&Seq::from(5u64)).unwrap(), "5");
        let token: Seq = serde_json::from_str("\"9-abc\"").unwrap();
        assert_eq!(token, Seq::Token("9-abc".into()));
        let number: Seq = serde_json::from_str("12").unwrap();
        assert_eq!(number, Seq::Number(12));
    }

    #[test]
    fn default_target_is_zero() {
        assert_eq!(CheckpointTarget::default(), CheckpointTarget::At(Seq::ZERO));
    }

    #[test]
    fn parse_target() {
        assert_eq!("now".parse::<CheckpointTarget>().unwrap(), CheckpointTarget::Now);
        assert_eq!(
            "42".parse::<CheckpointTarget>().unwrap(),
            CheckpointTarget::At(Seq::Number(42))
        );
        assert_eq!(
            "3-xyz".parse::<CheckpointTarget>().unwrap(),
            CheckpointTarget::At(Seq::Token("3-xyz".into()))
        );
    }
}
