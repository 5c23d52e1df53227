use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::naming::{DEFAULT_MAX_RETRIES, IndexMode, Resolver};
use crate::ops::default_auto_suffixes;

#[derive(Debug, Default, Deserialize)]
pub struct UserConfig {
    pub logging: Option<LoggingCfg>,
    pub naming: Option<NamingCfg>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoggingCfg {
    pub to_file: Option<bool>,
    pub dir: Option<String>,
    pub json: Option<bool>,
    pub compact: Option<bool>,
    pub pretty: Option<bool>,
    pub level: Option<String>,
}

/// Defaults applied to job options that leave a field unset.
#[derive(Debug, Default, Deserialize)]
pub struct NamingCfg {
    pub padding: Option<usize>,
    pub max_retries: Option<usize>,
    pub index_mode: Option<IndexMode>,
    pub capital: Option<bool>,
    /// Node type to suffix entries, merged over the built-in table.
    pub auto_suffixes: Option<BTreeMap<String, String>>,
}

/// Settings resolved from user config for a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub padding: usize,
    pub max_retries: usize,
    pub index_mode: IndexMode,
    pub capital: bool,
    /// Keys are lower-case node types.
    pub auto_suffixes: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            padding: 2,
            max_retries: DEFAULT_MAX_RETRIES,
            index_mode: IndexMode::Numeric,
            capital: false,
            auto_suffixes: default_auto_suffixes(),
        }
    }
}

impl Settings {
    pub fn from_user(cfg: Option<&UserConfig>) -> Self {
        let mut s = Settings::default();
        if let Some(n) = cfg.and_then(|c| c.naming.as_ref()) {
            if let Some(v) = n.padding {
                s.padding = v;
            }
            if let Some(v) = n.max_retries {
                s.max_retries = v;
            }
            if let Some(v) = n.index_mode {
                s.index_mode = v;
            }
            if let Some(v) = n.capital {
                s.capital = v;
            }
            for (ty, suffix) in n.auto_suffixes.iter().flatten() {
                s.auto_suffixes
                    .insert(ty.to_ascii_lowercase(), suffix.clone());
            }
        }
        s
    }

    pub fn resolver(&self) -> Resolver {
        Resolver::new(self.max_retries)
    }
}

pub fn load_user_config(home: &Path) -> anyhow::Result<Option<UserConfig>> {
    let path = home.join("config.toml");
    if !path.exists() {
        return Ok(None);
    }
    let s = std::fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    let cfg: UserConfig =
        toml::from_str(&s).with_context(|| format!("parsing {}", path.display()))?;
    Ok(Some(cfg))
}

pub fn expand_home(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Ok(home) = std::env::var("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

/// `<explicit>` if set, else `$HOME/.renamer`, else `./.renamer`.
pub fn renamer_home(explicit: &str) -> PathBuf {
    if !explicit.is_empty() {
        return expand_home(explicit);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".renamer");
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".renamer")
}
