//! Person records as delivered by the genealogy API.
//!
//! A person is identified by its name only. Relation lists hold names
//! of other persons; any of them may be dangling (absent from the
//! dataset), which every consumer must tolerate.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Categorical gender as recorded in the source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gender {
    /// Recorded as "Femme".
    Female,
    /// Recorded as "Homme".
    Male,
    /// Missing or any other value.
    #[default]
    Unknown,
}

impl Gender {
    /// Parse a source label. Anything but "Femme"/"Homme" is unknown.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Femme" => Self::Female,
            "Homme" => Self::Male,
            _ => Self::Unknown,
        }
    }

    /// The wire label for this gender.
    pub fn label(self) -> &'static str {
        match self {
            Self::Female => "Femme",
            Self::Male => "Homme",
            Self::Unknown => "Inconnu",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Gender {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Gender {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label.map(|l| Self::from_label(&l)).unwrap_or_default())
    }
}

/// Deserialize a relation list, treating `null` like an absent list.
pub(crate) fn name_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Gender from the `genre` label, else the `gender` label.
///
/// Empty labels count as missing.
pub(crate) fn gender_from_labels(genre: Option<String>, gender: Option<String>) -> Gender {
    genre
        .filter(|label| !label.is_empty())
        .or_else(|| gender.filter(|label| !label.is_empty()))
        .map(|label| Gender::from_label(&label))
        .unwrap_or_default()
}

/// A raw person record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPerson")]
pub struct Person {
    /// Unique identifier and display label.
    pub name: String,
    /// Gender (`genre` on the wire, `gender` as fallback).
    pub genre: Gender,
    /// Names of the parents, in source order.
    pub parents: Vec<String>,
    /// Names of the children, in source order.
    pub enfants: Vec<String>,
    /// Names of the spouses, in source order.
    pub conjoints: Vec<String>,
}

/// Wire shape of a person: French or English keys, both gender keys
/// allowed on the same record.
#[derive(Deserialize)]
struct RawPerson {
    name: String,
    #[serde(default)]
    genre: Option<String>,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default, deserialize_with = "name_list")]
    parents: Vec<String>,
    #[serde(default, alias = "children", deserialize_with = "name_list")]
    enfants: Vec<String>,
    #[serde(default, alias = "spouses", deserialize_with = "name_list")]
    conjoints: Vec<String>,
}

impl From<RawPerson> for Person {
    fn from(raw: RawPerson) -> Self {
        Self {
            name: raw.name,
            genre: gender_from_labels(raw.genre, raw.gender),
            parents: raw.parents,
            enfants: raw.enfants,
            conjoints: raw.conjoints,
        }
    }
}

impl Person {
    /// Create a person with no relations and unknown gender.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder: set gender.
    pub fn with_gender(mut self, genre: Gender) -> Self {
        self.genre = genre;
        self
    }

    /// Builder: set parent names.
    pub fn with_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parents = parents.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set children names.
    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enfants = children.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set spouse names.
    pub fn with_spouses<I, S>(mut self, spouses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conjoints = spouses.into_iter().map(Into::into).collect();
        self
    }
}
