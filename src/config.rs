use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::events::{Author, AuthorRole};
use crate::locale::Locale;

const BOT_AVATAR: &str = "https://avataaars.io/?avatarStyle=Transparent&topType=WinterHat3&accessoriesType=Kurt&hatColor=Blue01&hairColor=Platinum&facialHairType=MoustacheMagnum&facialHairColor=Platinum&clotheType=ShirtVNeck&clotheColor=PastelOrange&eyeType=Hearts&eyebrowType=Angry&mouthType=Default&skinColor=Brown";
const USER_AVATAR: &str = "https://avataaars.io/?avatarStyle=Transparent&topType=LongHairStraight&accessoriesType=Blank&hairColor=SilverGray&facialHairType=Blank&clotheType=Overall&clotheColor=Gray01&eyeType=Cry&eyebrowType=RaisedExcitedNatural&mouthType=Disbelief&skinColor=Pale";

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Locale used for timestamps and day/date/time replies
    pub locale: Locale,

    /// Where tracing output goes while the TUI owns the terminal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// Page metadata and chrome text
    pub page: PageConfig,

    /// The bot's identity
    pub bot: AuthorConfig,

    /// The local user's identity
    pub user: AuthorConfig,
}

/// Page title and description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub title: String,
    pub description: String,
}

/// Display identity of one conversation participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorConfig {
    pub name: String,
    pub avatar: String,
}

impl AuthorConfig {
    pub fn to_author(&self, role: AuthorRole) -> Author {
        Author {
            avatar: self.avatar.clone(),
            name: self.name.clone(),
            role,
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig {
            title: "Chatbot".to_string(),
            description: "Beep Boop 🤖".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            locale: Locale::default(),
            log_file: None,
            page: PageConfig::default(),
            bot: AuthorConfig {
                name: "Frankenstein Bot".to_string(),
                avatar: BOT_AVATAR.to_string(),
            },
            user: AuthorConfig {
                name: "anggiedimasta".to_string(),
                avatar: USER_AVATAR.to_string(),
            },
        }
    }
}

impl Config {
    /// Directory holding the config and log files
    pub fn home_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".frankenbot"))
    }

    /// Default location of the config file
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join("config.toml"))
    }

    /// Load configuration, falling back to defaults when the file is absent
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };

        if !config_path.exists() {
            if path.is_some() {
                anyhow::bail!("Config file {} does not exist", config_path.display());
            }
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file {}", config_path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid config TOML")
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, self.to_toml_string()?)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Effective log file location
    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::home_dir()?.join("frankenbot.log")),
        }
    }
}
