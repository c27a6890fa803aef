use crate::config::CatalogFileConfig;
use crate::types::{Statistic, StatisticGroup, StatisticId};
use crate::ConfigError;
use std::path::Path;

/// Read-only view of every statistic known to a rule context
pub trait StatisticCatalog {
    /// All statistics, attributes and skills alike
    fn all_statistics(&self) -> Vec<Statistic>;

    /// Look up a statistic by name or alias (case-insensitive)
    fn find(&self, name: &str) -> Option<Statistic> {
        self.all_statistics().into_iter().find(|s| s.matches(name))
    }

    fn get(&self, id: &StatisticId) -> Option<Statistic> {
        self.all_statistics().into_iter().find(|s| &s.id == id)
    }

    fn group(&self, group: StatisticGroup) -> Vec<Statistic> {
        self.all_statistics()
            .into_iter()
            .filter(|s| s.group() == group)
            .collect()
    }

    fn attributes(&self) -> Vec<Statistic> {
        self.group(StatisticGroup::Attribute)
    }

    fn skills(&self) -> Vec<Statistic> {
        self.group(StatisticGroup::Skill)
    }

    /// The attribute governing `skill`
    fn governing_attribute(&self, skill: &Statistic) -> Option<Statistic> {
        skill.governing_attribute().and_then(|id| self.get(id))
    }
}

impl<C: StatisticCatalog + ?Sized> StatisticCatalog for &C {
    fn all_statistics(&self) -> Vec<Statistic> {
        (**self).all_statistics()
    }
}

impl<C: StatisticCatalog + ?Sized> StatisticCatalog for std::sync::Arc<C> {
    fn all_statistics(&self) -> Vec<Statistic> {
        (**self).all_statistics()
    }
}

/// In-memory statistic catalog, loaded from TOML files or built in code
#[derive(Debug, Clone, Default)]
pub struct StatisticRegistry {
    statistics: Vec<Statistic>,
}

impl StatisticRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from statistics, validating skill references
    pub fn from_statistics(statistics: Vec<Statistic>) -> Result<Self, String> {
        let mut registry = Self::new();
        for stat in statistics {
            registry.register(stat)?;
        }
        registry.validate()?;
        Ok(registry)
    }

    /// Load a catalog file, or every `.toml` file under a directory
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut configs = Vec::new();
        if path.is_dir() {
            collect_dir(path, &mut configs)?;
        } else {
            configs.push((read_file(path)?, path.to_path_buf()));
        }

        let mut registry = Self::new();
        for (config, file) in &configs {
            registry
                .register_attributes(config)
                .map_err(|message| ConfigError::Validation {
                    message,
                    path: file.clone(),
                })?;
        }
        // Skills are registered after every attribute so files may reference each other
        for (config, file) in &configs {
            registry
                .register_skills(config)
                .map_err(|message| ConfigError::Validation {
                    message,
                    path: file.clone(),
                })?;
        }
        registry.validate().map_err(|message| ConfigError::Validation {
            message,
            path: path.to_path_buf(),
        })?;
        Ok(registry)
    }

    /// Parse a single catalog from a TOML string
    pub fn parse(toml: &str) -> Result<Self, String> {
        let config: CatalogFileConfig = toml::from_str(toml).map_err(|e| e.to_string())?;
        let mut registry = Self::new();
        registry.register_attributes(&config)?;
        registry.register_skills(&config)?;
        registry.validate()?;
        Ok(registry)
    }

    /// Register a statistic, rejecting duplicate names or aliases
    pub fn register(&mut self, stat: Statistic) -> Result<(), String> {
        let names = std::iter::once(&stat.name).chain(stat.aliases.iter());
        for name in names {
            if let Some(existing) = self.lookup(name) {
                return Err(format!(
                    "'{}' of statistic '{}' clashes with '{}'",
                    name, stat.name, existing.name
                ));
            }
        }
        self.statistics.push(stat);
        Ok(())
    }

    fn lookup(&self, name: &str) -> Option<&Statistic> {
        self.statistics.iter().find(|s| s.matches(name))
    }

    fn register_attributes(&mut self, config: &CatalogFileConfig) -> Result<(), String> {
        for attr in &config.attributes {
            let stat = Statistic::attribute(&attr.name, &attr.description)
                .with_aliases(attr.aliases.iter().cloned());
            self.register(stat)?;
        }
        Ok(())
    }

    fn register_skills(&mut self, config: &CatalogFileConfig) -> Result<(), String> {
        for skill in &config.skills {
            let attribute = self
                .lookup(&skill.attribute)
                .filter(|s| s.is_attribute())
                .map(|s| s.id.clone())
                .ok_or_else(|| {
                    format!(
                        "skill '{}' references unknown attribute '{}'",
                        skill.name, skill.attribute
                    )
                })?;
            let mut stat = Statistic::skill(&skill.name, &skill.description, attribute)
                .with_aliases(skill.aliases.iter().cloned());
            if let Some(min) = skill.min_value {
                stat = stat.with_min_value(min);
            }
            self.register(stat)?;
        }
        Ok(())
    }

    /// Every skill must be governed by an attribute of this registry
    fn validate(&self) -> Result<(), String> {
        for stat in &self.statistics {
            if let Some(attribute) = stat.governing_attribute() {
                let governed_by_attribute = self
                    .statistics
                    .iter()
                    .any(|s| &s.id == attribute && s.is_attribute());
                if !governed_by_attribute {
                    return Err(format!(
                        "skill '{}' references unknown attribute '{}'",
                        stat.name, attribute
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.statistics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statistics.is_empty()
    }
}

impl StatisticCatalog for StatisticRegistry {
    fn all_statistics(&self) -> Vec<Statistic> {
        self.statistics.clone()
    }

    fn find(&self, name: &str) -> Option<Statistic> {
        self.lookup(name).cloned()
    }
}

fn read_file(path: &Path) -> Result<CatalogFileConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        error: e,
        path: Some(path.to_path_buf()),
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        error: e,
        path: path.to_path_buf(),
    })
}

fn collect_dir(
    dir: &Path,
    out: &mut Vec<(CatalogFileConfig, std::path::PathBuf)>,
) -> Result<(), ConfigError> {
    let mut paths = std::fs::read_dir(dir)
        .map_err(|e| ConfigError::Io {
            error: e,
            path: Some(dir.to_path_buf()),
        })?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ConfigError::Io {
            error: e,
            path: Some(dir.to_path_buf()),
        })?;
    // Deterministic catalog order regardless of filesystem
    paths.sort();

    for path in paths {
        if path.is_dir() {
            collect_dir(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            out.push((read_file(&path)?, path));
        }
    }
    Ok(())
}

/// Built-in catalog: seven attributes and the skills they govern
pub fn default_catalog() -> StatisticRegistry {
    let attributes = [
        ("Strength", "Raw physical power", "str"),
        ("Perception", "Awareness of surroundings", "per"),
        ("Endurance", "Stamina and physical toughness", "end"),
        ("Charisma", "Charm and force of personality", "cha"),
        ("Intelligence", "Knowledge and reasoning", "int"),
        ("Agility", "Coordination and nimbleness", "agi"),
        ("Luck", "Fortune and fate", "lck"),
    ];
    let skills = [
        ("Barter", "Charisma", "Trading and haggling"),
        ("Energy Weapons", "Perception", "Laser and plasma weaponry"),
        ("Explosives", "Perception", "Grenades, mines and demolition"),
        ("Guns", "Agility", "Conventional firearms"),
        ("Lockpick", "Perception", "Opening locks without keys"),
        ("Medicine", "Intelligence", "Healing and first aid"),
        ("Melee Weapons", "Strength", "Bladed and blunt weapons"),
        ("Repair", "Intelligence", "Fixing and maintaining equipment"),
        ("Science", "Intelligence", "Computers and scientific knowledge"),
        ("Sneak", "Agility", "Moving unseen"),
        ("Speech", "Charisma", "Persuasion and deception"),
        ("Survival", "Endurance", "Living off the land"),
        ("Unarmed", "Endurance", "Fighting with fists and feet"),
    ];

    let mut statistics: Vec<Statistic> = attributes
        .iter()
        .map(|(name, desc, alias)| Statistic::attribute(*name, *desc).with_aliases([*alias]))
        .collect();
    statistics.extend(
        skills
            .iter()
            .map(|(name, attr, desc)| Statistic::skill(*name, *desc, *attr)),
    );

    StatisticRegistry { statistics }
}
