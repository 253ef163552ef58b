use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which camera a session asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// Front camera.
    #[default]
    User,
    /// Back camera.
    Environment,
}

impl Facing {
    pub const ALL: &[Facing] = &[Facing::User, Facing::Environment];

    pub fn opposite(self) -> Self {
        match self {
            Facing::User => Facing::Environment,
            Facing::Environment => Facing::User,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Facing::User => "user",
            Facing::Environment => "environment",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Facing::User => "Front Camera",
            Facing::Environment => "Back Camera",
        }
    }
}

impl std::fmt::Display for Facing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Facing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" | "front" => Ok(Facing::User),
            "environment" | "back" => Ok(Facing::Environment),
            other => Err(format!(
                "facing must be 'user' or 'environment', got '{other}'"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_opposite_flips() {
        assert_eq!(Facing::User.opposite(), Facing::Environment);
        assert_eq!(Facing::Environment.opposite().opposite(), Facing::Environment);
    }

    #[rstest]
    #[case("user", Facing::User)]
    #[case("front", Facing::User)]
    #[case("Environment", Facing::Environment)]
    #[case("back", Facing::Environment)]
    fn test_parse(#[case] input: &str, #[case] expected: Facing) {
        assert_eq!(input.parse::<Facing>(), Ok(expected));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("sideways".parse::<Facing>().is_err());
    }
}
