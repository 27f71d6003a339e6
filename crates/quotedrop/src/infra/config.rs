//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".quotedrop/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub quote: Quote,
    #[serde(default)]
    pub code: Code,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default = "Defaults::default_style")]
    pub style: String,
    #[serde(default = "Defaults::default_target")]
    pub target: String,
}

impl Defaults {
    fn default_style() -> String {
        "quote".into()
    }

    fn default_target() -> String {
        "clipboard".into()
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            style: Self::default_style(),
            target: Self::default_target(),
        }
    }
}

/// Quoting format options; all optional so layers merge cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Quote {
    #[serde(default)]
    marker: Option<String>,
    #[serde(default)]
    attribution: Option<String>,
    #[serde(default)]
    attribution_template: Option<String>,
    #[serde(default)]
    timestamp: Option<bool>,
    #[serde(default)]
    line_ending: Option<String>,
}

impl Quote {
    fn default_marker() -> &'static str {
        "> "
    }

    fn default_attribution() -> &'static str {
        "below"
    }

    fn default_attribution_template() -> &'static str {
        "— {{ source }}"
    }

    fn default_line_ending() -> &'static str {
        "preserve"
    }

    pub fn marker(&self) -> String {
        self.marker
            .clone()
            .unwrap_or_else(|| Self::default_marker().to_owned())
    }

    pub fn attribution(&self) -> String {
        self.attribution
            .clone()
            .unwrap_or_else(|| Self::default_attribution().to_owned())
    }

    pub fn attribution_template(&self) -> String {
        self.attribution_template
            .clone()
            .unwrap_or_else(|| Self::default_attribution_template().to_owned())
    }

    pub fn timestamp(&self) -> bool {
        self.timestamp.unwrap_or(false)
    }

    pub fn line_ending(&self) -> String {
        self.line_ending
            .clone()
            .unwrap_or_else(|| Self::default_line_ending().to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Code {
    #[serde(default)]
    fence: Option<String>,
}

impl Code {
    pub fn fence(&self) -> String {
        self.fence.clone().unwrap_or_else(|| "```".to_owned())
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    style: Option<String>,
    target: Option<String>,
    marker: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            style: env::var("QUOTEDROP_STYLE").ok(),
            target: env::var("QUOTEDROP_TARGET").ok(),
            marker: env::var("QUOTEDROP_MARKER").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(style: &str, target: &str) -> Self {
        Self {
            style: Some(style.to_owned()),
            target: Some(target.to_owned()),
            marker: None,
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config,
    /// and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            defaults: merge_defaults(self.defaults, other.defaults),
            quote: merge_quote(self.quote, other.quote),
            code: merge_code(self.code, other.code),
        }
    }
}

fn merge_defaults(base: Defaults, overlay: Defaults) -> Defaults {
    Defaults {
        style: if overlay.style != Defaults::default_style() {
            overlay.style
        } else {
            base.style
        },
        target: if overlay.target != Defaults::default_target() {
            overlay.target
        } else {
            base.target
        },
    }
}

fn merge_quote(mut base: Quote, overlay: Quote) -> Quote {
    if let Some(value) = overlay.marker {
        base.marker = Some(value);
    }
    if let Some(value) = overlay.attribution {
        base.attribution = Some(value);
    }
    if let Some(value) = overlay.attribution_template {
        base.attribution_template = Some(value);
    }
    if let Some(value) = overlay.timestamp {
        base.timestamp = Some(value);
    }
    if let Some(value) = overlay.line_ending {
        base.line_ending = Some(value);
    }
    base
}

fn merge_code(mut base: Code, overlay: Code) -> Code {
    if let Some(value) = overlay.fence {
        base.fence = Some(value);
    }
    base
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("quotedrop/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(style) = env.style {
        config.defaults.style = style;
    }
    if let Some(target) = env.target {
        config.defaults.target = target;
    }
    if let Some(marker) = env.marker {
        config.quote.marker = Some(marker);
    }
    config
}
