use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Reserved selector value that matches every record.
pub const ALL_SENTINEL: &str = "all";

/// Opaque identifier for a species record (also the detail-view slug).
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesId(pub String);

/// Stable identifier for a category definition (e.g. `fungi`).
///
/// Records carry these as free strings; nothing guarantees the id is known to
/// the registry.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

/// Active category criterion for the logbook filter.
///
/// `All` is the `"all"` sentinel. Any other string becomes `Category`, known to
/// the registry or not; an unknown id simply matches nothing.
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub enum CategorySelector {
    #[default]
    All,
    Category(CategoryId),
}

impl SpeciesId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl CategoryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl CategorySelector {
    pub fn as_str(&self) -> &str {
        match self {
            CategorySelector::All => ALL_SENTINEL,
            CategorySelector::Category(id) => id.as_str(),
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            ALL_SENTINEL => CategorySelector::All,
            other => CategorySelector::Category(CategoryId(other.to_string())),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, CategorySelector::All)
    }
}

impl From<&str> for CategorySelector {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<CategoryId> for CategorySelector {
    fn from(id: CategoryId) -> Self {
        if id.0 == ALL_SENTINEL {
            CategorySelector::All
        } else {
            CategorySelector::Category(id)
        }
    }
}

impl fmt::Display for CategorySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CategorySelector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CategorySelector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}
