use crate::{DiceError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A die with an ordered, immutable list of integer faces.
///
/// Faces may repeat and may be negative or zero. A die always has at
/// least one face.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct Die {
    faces: Vec<i64>,
}

impl Die {
    pub fn new(faces: Vec<i64>) -> Result<Self> {
        if faces.is_empty() {
            return Err(DiceError::configuration("a die must have at least one face"));
        }
        Ok(Self { faces })
    }

    pub fn faces(&self) -> &[i64] {
        &self.faces
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Face at `index`, where `index` comes from a fair roll over `0..face_count()`.
    pub fn face(&self, index: usize) -> Option<i64> {
        self.faces.get(index).copied()
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, face) in self.faces.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", face)?;
        }
        write!(f, "]")
    }
}

impl FromStr for Die {
    type Err = DiceError;

    /// Parses a comma-separated face list such as `2,2,4,4,9,9`.
    fn from_str(s: &str) -> Result<Self> {
        let faces = s
            .split(',')
            .map(|token| {
                let token = token.trim();
                token.parse::<i64>().map_err(|_| {
                    DiceError::configuration(format!(
                        "'{}' in die '{}' is not an integer",
                        token, s
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(faces)
    }
}

impl TryFrom<Vec<i64>> for Die {
    type Error = DiceError;

    fn try_from(faces: Vec<i64>) -> Result<Self> {
        Self::new(faces)
    }
}

impl From<Die> for Vec<i64> {
    fn from(die: Die) -> Self {
        die.faces
    }
}
