use crate::error::{Result, TaggerError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const LOCAL_CONFIG_FILE: &str = "./citagger.toml";
const USER_CONFIG_FILE: &str = ".citagger.toml";

/// Represents the complete configuration for ci-tagger.
///
/// Built once per run and passed explicitly to the resolver, the tag store
/// and the artifact publisher.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub release: ReleaseConfig,

    #[serde(default = "default_services")]
    pub services: BTreeMap<String, ServiceConfig>,
}

/// Settings shared by every service's release flow.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    /// Branch whose history backs the first-release heuristic
    #[serde(default = "default_branch")]
    pub default_branch: String,

    /// Remote release tags are pushed to
    #[serde(default = "default_remote")]
    pub remote: String,

    /// More commits than this on the default branch means a first release
    /// starts at 0.1.0 instead of 0.0.1
    #[serde(default = "default_commit_threshold")]
    pub first_release_commit_threshold: usize,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_commit_threshold() -> usize {
    10
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            default_branch: default_branch(),
            remote: default_remote(),
            first_release_commit_threshold: default_commit_threshold(),
        }
    }
}

/// Where and how one service's image is built and published.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServiceConfig {
    pub registry: String,

    pub image: String,

    /// Docker build context, relative to the repository root
    #[serde(default = "default_context")]
    pub context: String,

    #[serde(default)]
    pub dockerfile: Option<String>,

    /// Regexes a branch has to match for its artifact to be pushed
    #[serde(default = "default_build_triggers")]
    pub build_triggers: Vec<String>,
}

fn default_context() -> String {
    ".".to_string()
}

fn default_build_triggers() -> Vec<String> {
    vec![
        "^main$".to_string(),
        "^master$".to_string(),
        "^develop$".to_string(),
        "^development$".to_string(),
        "release/".to_string(),
        "^feature/".to_string(),
        "^patch/".to_string(),
        "^PR-".to_string(),
    ]
}

impl ServiceConfig {
    fn for_image(registry: &str, image: &str, context: &str) -> Self {
        ServiceConfig {
            registry: registry.to_string(),
            image: image.to_string(),
            context: context.to_string(),
            dockerfile: Some(format!("{}/Dockerfile", context)),
            build_triggers: default_build_triggers(),
        }
    }

    /// Full image reference for `tag`: `<registry>/<image>:<tag>`
    pub fn image_ref(&self, tag: &str) -> String {
        let registry = self.registry.trim_end_matches('/');
        if registry.is_empty() {
            format!("{}:{}", self.image, tag)
        } else {
            format!("{}/{}:{}", registry, self.image, tag)
        }
    }

    /// Compile the configured build triggers.
    pub fn build_triggers(&self) -> Result<BuildTriggers> {
        BuildTriggers::new(&self.build_triggers)
    }
}

fn default_services() -> BTreeMap<String, ServiceConfig> {
    let mut services = BTreeMap::new();
    services.insert(
        "backend".to_string(),
        ServiceConfig::for_image("docker.io/luxe", "backend", "backend"),
    );
    services.insert(
        "frontend".to_string(),
        ServiceConfig::for_image("docker.io/luxe", "frontend", "frontend"),
    );
    services.insert(
        "auth-service".to_string(),
        ServiceConfig::for_image("docker.io/luxe", "auth-service", "auth-service"),
    );
    services
}

impl Default for Config {
    fn default() -> Self {
        Config {
            release: ReleaseConfig::default(),
            services: default_services(),
        }
    }
}

impl Config {
    /// Look up a service, failing with the list of known names.
    pub fn service(&self, name: &str) -> Result<&ServiceConfig> {
        self.services.get(name).ok_or_else(|| {
            let known: Vec<&str> = self.services.keys().map(String::as_str).collect();
            TaggerError::config(format!(
                "Service '{}' is not configured (known: {})",
                name,
                known.join(", ")
            ))
        })
    }
}

/// Branch patterns that make a build publish its artifact.
#[derive(Debug, Clone)]
pub struct BuildTriggers {
    patterns: Vec<Regex>,
}

impl BuildTriggers {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| {
                    TaggerError::config(format!("Invalid build trigger '{}': {}", p, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(BuildTriggers { patterns })
    }

    /// Whether any trigger pattern matches `branch`
    pub fn matches(&self, branch: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(branch))
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `citagger.toml` in current directory
/// 3. `.citagger.toml` in the user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(LOCAL_CONFIG_FILE).exists() {
        fs::read_to_string(LOCAL_CONFIG_FILE)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(USER_CONFIG_FILE);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parse a TOML configuration document.
pub fn parse_config(contents: &str) -> Result<Config> {
    let config: Config =
        toml::from_str(contents).map_err(|e| TaggerError::config(e.to_string()))?;

    for (name, service) in &config.services {
        if service.image.trim().is_empty() {
            return Err(TaggerError::config(format!(
                "Service '{}' has an empty image name",
                name
            )));
        }
        service.build_triggers()?;
    }

    Ok(config)
}
