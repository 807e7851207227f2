//! Text form of paths: `[B0:2, B1:3, B0:-2]`.
//!
//! Parsing accepts the bracketed display form as well as bare tokens separated
//! by commas or whitespace, and reduces the result.

use std::fmt;
use std::str::FromStr;

use super::path::TurnPath;
use super::types::{Singularity, Turn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseTurnPathError {
    #[error("expected `B0:<degree>` or `B1:<degree>`, got `{0}`")]
    BadToken(String),
    #[error("unknown singularity `{0}`")]
    BadSingularity(String),
    #[error("bad degree `{0}`")]
    BadDegree(String),
}

impl FromStr for Singularity {
    type Err = ParseTurnPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "B0" | "b0" => Ok(Singularity::B0),
            "B1" | "b1" => Ok(Singularity::B1),
            other => Err(ParseTurnPathError::BadSingularity(other.to_string())),
        }
    }
}

impl FromStr for Turn {
    type Err = ParseTurnPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sing, deg) = s
            .split_once(':')
            .ok_or_else(|| ParseTurnPathError::BadToken(s.to_string()))?;
        let singularity = sing.parse()?;
        let degree = deg
            .trim()
            .parse::<i64>()
            .map_err(|_| ParseTurnPathError::BadDegree(deg.to_string()))?;
        Ok(Turn::new(degree, singularity))
    }
}

impl FromStr for TurnPath {
    type Err = ParseTurnPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.trim();
        let body = body
            .strip_prefix('[')
            .and_then(|b| b.strip_suffix(']'))
            .unwrap_or(body);
        body.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|tok| !tok.is_empty())
            .map(str::parse::<Turn>)
            .collect()
    }
}

impl fmt::Display for TurnPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, t) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{t}")?;
        }
        f.write_str("]")
    }
}
