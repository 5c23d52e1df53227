use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Side tags offered by the manual renamer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    Center,
    Mid,
}

impl Side {
    pub fn token(self, capital: bool) -> &'static str {
        match (self, capital) {
            (Side::Left, false) => "l",
            (Side::Left, true) => "L",
            (Side::Right, false) => "r",
            (Side::Right, true) => "R",
            (Side::Center, false) => "c",
            (Side::Center, true) => "C",
            (Side::Mid, false) => "m",
            (Side::Mid, true) => "M",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token(false))
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "left" => Ok(Side::Left),
            "r" | "right" => Ok(Side::Right),
            "c" | "center" | "centre" => Ok(Side::Center),
            "m" | "mid" | "middle" => Ok(Side::Mid),
            other => Err(format!("unknown side '{}'", other)),
        }
    }
}
