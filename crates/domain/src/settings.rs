//! Endpoint settings domain model
//!
//! Each region of the remote API has its own endpoint and token. Exactly
//! one region is active at a time; switching never discards the other
//! region's values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Base URL used until the user configures one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5100";

/// Deployment variant of the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Region {
    /// Mainland deployment (default).
    #[default]
    #[serde(rename = "CN")]
    Cn,
    /// International deployment.
    International,
}

impl Region {
    /// Returns all regions.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Cn, Self::International]
    }

    /// Returns the persisted name of the region.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cn => "CN",
            Self::International => "International",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("cn") {
            Ok(Self::Cn)
        } else if trimmed.eq_ignore_ascii_case("international") {
            Ok(Self::International)
        } else {
            Err(DomainError::InvalidRegion(trimmed.to_string()))
        }
    }
}

/// Endpoint and token for one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvConfig {
    /// Base URL of the API, with or without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Access token sent as a bearer credential.
    #[serde(default)]
    pub token: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: String::new(),
        }
    }
}

impl EnvConfig {
    /// Creates a configuration.
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Returns true if a token has been configured.
    #[must_use]
    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }

    /// Joins the base URL and an absolute path, dropping one trailing slash from the base.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.strip_suffix('/').unwrap_or(&self.base_url);
        format!("{base}{path}")
    }
}

/// Per-region configuration as persisted under `jimeng_config`.
///
/// Regions missing from the persisted object load with defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConfigMap {
    /// Mainland configuration.
    #[serde(rename = "CN", default)]
    pub cn: EnvConfig,
    /// International configuration.
    #[serde(rename = "International", default)]
    pub international: EnvConfig,
}

impl ConfigMap {
    /// Returns the configuration of a region.
    #[must_use]
    pub const fn get(&self, region: Region) -> &EnvConfig {
        match region {
            Region::Cn => &self.cn,
            Region::International => &self.international,
        }
    }

    /// Returns the configuration of a region for modification.
    pub const fn get_mut(&mut self, region: Region) -> &mut EnvConfig {
        match region {
            Region::Cn => &mut self.cn,
            Region::International => &mut self.international,
        }
    }

    /// Builds a configuration from the legacy single-endpoint keys.
    ///
    /// Returns `None` when neither legacy value is set. Empty values count
    /// as unset and fall back to the defaults.
    #[must_use]
    pub fn from_legacy(region: Region, base_url: Option<&str>, token: Option<&str>) -> Option<Self> {
        let base_url = base_url.filter(|v| !v.is_empty());
        let token = token.filter(|v| !v.is_empty());
        if base_url.is_none() && token.is_none() {
            return None;
        }

        let mut config = Self::default();
        let target = config.get_mut(region);
        if let Some(base_url) = base_url {
            target.base_url = base_url.to_string();
        }
        if let Some(token) = token {
            target.token = token.to_string();
        }
        Some(config)
    }
}

/// Complete settings: the active region and every region's configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Settings {
    /// Currently selected region.
    pub region: Region,
    /// Configuration of every region.
    pub config: ConfigMap,
}

impl Settings {
    /// Creates settings from their parts.
    #[must_use]
    pub const fn new(region: Region, config: ConfigMap) -> Self {
        Self { region, config }
    }

    /// Returns the configuration of the active region.
    #[must_use]
    pub const fn active(&self) -> &EnvConfig {
        self.config.get(self.region)
    }

    /// Sets the base URL of the active region.
    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.config.get_mut(self.region).base_url = base_url.into();
    }

    /// Sets the token of the active region.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.config.get_mut(self.region).token = token.into();
    }

    /// Makes another region active.
    pub const fn switch_region(&mut self, region: Region) {
        self.region = region;
    }
}
