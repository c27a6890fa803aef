use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a statistic in a catalog
///
/// Statistics are identified by their canonical name, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatisticId(String);

impl StatisticId {
    pub fn new(name: impl AsRef<str>) -> Self {
        StatisticId(name.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StatisticId {
    fn from(s: &str) -> Self {
        StatisticId::new(s)
    }
}

impl From<String> for StatisticId {
    fn from(s: String) -> Self {
        StatisticId::new(s)
    }
}

impl fmt::Display for StatisticId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which group a statistic belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticGroup {
    Attribute,
    Skill,
}

impl fmt::Display for StatisticGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatisticGroup::Attribute => write!(f, "attribute"),
            StatisticGroup::Skill => write!(f, "skill"),
        }
    }
}

/// Kind-specific data of a statistic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatisticKind {
    /// A root statistic
    Attribute,
    /// A statistic governed by exactly one attribute
    Skill {
        /// The governing attribute
        attribute: StatisticId,
        /// Minimum value at which the skill is usable
        min_value: Option<i32>,
    },
}

/// A named, described quantity a character can hold a value for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistic {
    pub id: StatisticId,
    /// Display name
    pub name: String,
    /// Alternative names accepted on lookup
    pub aliases: Vec<String>,
    pub description: String,
    pub kind: StatisticKind,
}

impl Statistic {
    /// Create a new attribute
    pub fn attribute(name: impl Into<String>, description: impl Into<String>) -> Self {
        let name = name.into();
        Statistic {
            id: StatisticId::new(&name),
            name,
            aliases: Vec::new(),
            description: description.into(),
            kind: StatisticKind::Attribute,
        }
    }

    /// Create a new skill governed by `attribute`
    pub fn skill(
        name: impl Into<String>,
        description: impl Into<String>,
        attribute: impl Into<StatisticId>,
    ) -> Self {
        let name = name.into();
        Statistic {
            id: StatisticId::new(&name),
            name,
            aliases: Vec::new(),
            description: description.into(),
            kind: StatisticKind::Skill {
                attribute: attribute.into(),
                min_value: None,
            },
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Set the minimum usable value (skills only, ignored for attributes)
    pub fn with_min_value(mut self, value: i32) -> Self {
        if let StatisticKind::Skill { min_value, .. } = &mut self.kind {
            *min_value = Some(value);
        }
        self
    }

    pub fn group(&self) -> StatisticGroup {
        match self.kind {
            StatisticKind::Attribute => StatisticGroup::Attribute,
            StatisticKind::Skill { .. } => StatisticGroup::Skill,
        }
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self.kind, StatisticKind::Attribute)
    }

    pub fn is_skill(&self) -> bool {
        matches!(self.kind, StatisticKind::Skill { .. })
    }

    /// The governing attribute, if this is a skill
    pub fn governing_attribute(&self) -> Option<&StatisticId> {
        match &self.kind {
            StatisticKind::Skill { attribute, .. } => Some(attribute),
            StatisticKind::Attribute => None,
        }
    }

    pub fn min_value(&self) -> Option<i32> {
        match self.kind {
            StatisticKind::Skill { min_value, .. } => min_value,
            StatisticKind::Attribute => None,
        }
    }

    /// Whether `name` matches this statistic's name or one of its aliases
    pub fn matches(&self, name: &str) -> bool {
        let name = name.trim();
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Numeric state a character holds for one statistic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticValue {
    pub value: i32,
    pub is_proficient: bool,
    /// Bonus magnitude granted by proficiency
    pub proficiency: i32,
}
