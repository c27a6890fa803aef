use serde::Deserialize;

/// TOML configuration for a statistic catalog file
#[derive(Debug, Default, Deserialize)]
pub struct CatalogFileConfig {
    #[serde(default)]
    pub attributes: Vec<AttributeConfig>,
    #[serde(default)]
    pub skills: Vec<SkillConfig>,
}

#[derive(Debug, Deserialize)]
pub struct AttributeConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SkillConfig {
    pub name: String,
    /// Name or alias of the governing attribute
    pub attribute: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub min_value: Option<i32>,
}
