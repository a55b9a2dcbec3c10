use rand::Rng;
use serde::Deserialize;
use serde::Serialize;

/// One of the two colored baskets at either end of the field.
///
/// A side "starts on" a basket: it scores into that basket for the round.
/// Baskets swap between rounds, so a side's basket is always read from
/// the round it is playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Basket {
    Blue,
    Magenta,
}

impl Basket {
    pub fn opposite(self) -> Self {
        match self {
            Self::Blue => Self::Magenta,
            Self::Magenta => Self::Blue,
        }
    }
    /// Fair coin flip between the two baskets.
    pub fn random(rng: &mut impl Rng) -> Self {
        match rng.random_bool(0.5) {
            true => Self::Blue,
            false => Self::Magenta,
        }
    }
    /// Both baskets, `self` first.
    pub fn pair(self) -> [Self; 2] {
        [self, self.opposite()]
    }
}

impl TryFrom<&str> for Basket {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "blue" => Ok(Self::Blue),
            "magenta" => Ok(Self::Magenta),
            other => Err(anyhow::anyhow!("invalid basket: {}", other)),
        }
    }
}

impl std::fmt::Display for Basket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blue => write!(f, "blue"),
            Self::Magenta => write!(f, "magenta"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn opposite_is_involution() {
        assert_eq!(Basket::Blue.opposite(), Basket::Magenta);
        assert_eq!(Basket::Blue.opposite().opposite(), Basket::Blue);
    }
    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Basket::try_from("Blue").unwrap(), Basket::Blue);
        assert_eq!(Basket::try_from("magenta").unwrap(), Basket::Magenta);
        assert!(Basket::try_from("green").is_err());
    }
    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Basket::Magenta).unwrap(), "\"magenta\"");
    }
}
