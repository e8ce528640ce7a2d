//! Chemical group tags and their normalization.

use std::{ fmt, str::FromStr, convert::Infallible };
use serde::{ Deserialize, Serialize };

/// Chemical species of the rotating group.
///
/// Any string that is not a recognized alias is passed through unchanged as
/// [`Group::Other`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Group {
    /// Methyl
    CH3,
    /// Deuterated methyl
    CD3,
    /// Amine
    NH3,
    /// Deuterated amine
    ND3,
    /// Unrecognized name, kept verbatim.
    Other(String),
}

fn alias_table() -> [(Group, &'static [&'static str]); 4] {
    [
        (Group::CH3, &["ch", "ch3", "methyl"]),
        (Group::CD3, &["cd", "cd3", "deuterated methyl"]),
        (Group::NH3, &["nh", "nh3", "amine"]),
        (Group::ND3, &["nd", "nd3", "deuterated amine"]),
    ]
}

impl Group {
    /// Map any accepted spelling (case-insensitive, surrounding whitespace
    /// ignored) to its canonical tag.
    pub fn normalize(name: &str) -> Self {
        let lower = name.trim().to_lowercase();
        alias_table().into_iter()
            .find(|(_, aliases)| aliases.contains(&lower.as_str()))
            .map(|(group, _)| group)
            .unwrap_or_else(|| Self::Other(name.to_string()))
    }

    /// Return `true` if `self` is one of the four canonical tags.
    pub fn is_canonical(&self) -> bool { !matches!(self, Self::Other(_)) }

    pub fn as_str(&self) -> &str {
        match self {
            Self::CH3 => "CH3",
            Self::CD3 => "CD3",
            Self::NH3 => "NH3",
            Self::ND3 => "ND3",
            Self::Other(name) => name.as_str(),
        }
    }

    /// All accepted aliases for the canonical tags.
    pub fn aliases() -> impl Iterator<Item = (Group, &'static str)> {
        alias_table().into_iter()
            .flat_map(|(group, names)| {
                names.iter().map(move |name| (group.clone(), *name))
            })
    }
}

impl Default for Group {
    fn default() -> Self { Self::CH3 }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Group {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(Self::normalize(s)) }
}

impl From<String> for Group {
    fn from(s: String) -> Self { Self::normalize(&s) }
}

impl From<&str> for Group {
    fn from(s: &str) -> Self { Self::normalize(s) }
}

impl From<Group> for String {
    fn from(group: Group) -> Self { group.as_str().to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_alias_normalizes() {
        for (group, alias) in Group::aliases() {
            assert_eq!(Group::normalize(alias), group);
            assert_eq!(Group::normalize(&alias.to_uppercase()), group);
        }
    }

    #[test]
    fn pass_through() {
        let g = Group::normalize("OH");
        assert_eq!(g, Group::Other("OH".into()));
        assert!(!g.is_canonical());
        assert_eq!(g.to_string(), "OH");
    }

    #[test]
    fn serde_as_string() {
        let json = serde_json::to_string(&Group::CD3).unwrap();
        assert_eq!(json, "\"CD3\"");
        let back: Group = serde_json::from_str("\"Deuterated Amine\"").unwrap();
        assert_eq!(back, Group::ND3);
    }
}
