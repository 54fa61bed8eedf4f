//! Client settings
//!
//! Settings come from an optional YAML file, then environment variables
//! override individual fields:
//!
//! | Variable                | Field          |
//! |-------------------------|----------------|
//! | `DATAARTS_ENDPOINT`     | `endpoint`     |
//! | `DATAARTS_REGION`       | `region`       |
//! | `DATAARTS_PROJECT_ID`   | `project_id`   |
//! | `DATAARTS_AUTH_TOKEN`   | `auth_token`   |
//! | `DATAARTS_WORKSPACE_ID` | `workspace_id` |
//! | `DATAARTS_INSTANCE_ID`  | `instance_id`  |

use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::loader::HttpDefinition;
use crate::template::TemplateContext;
use crate::types::OptionStringExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Header carrying the IAM token
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Environment variable names
pub mod env {
    /// API endpoint
    pub const ENDPOINT: &str = "DATAARTS_ENDPOINT";
    /// Region, used to derive the endpoint
    pub const REGION: &str = "DATAARTS_REGION";
    /// Project ID
    pub const PROJECT_ID: &str = "DATAARTS_PROJECT_ID";
    /// IAM token
    pub const AUTH_TOKEN: &str = "DATAARTS_AUTH_TOKEN";
    /// Default workspace
    pub const WORKSPACE_ID: &str = "DATAARTS_WORKSPACE_ID";
    /// DataArts Studio instance
    pub const INSTANCE_ID: &str = "DATAARTS_INSTANCE_ID";
}

/// Connection settings for one DataArts Studio project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct Settings {
    /// API endpoint; derived from `region` when absent
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Region, e.g. `cn-north-4`
    #[serde(default)]
    pub region: Option<String>,
    /// Project ID
    #[serde(default)]
    pub project_id: Option<String>,
    /// IAM token sent as `X-Auth-Token`
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Default workspace ID
    #[serde(default)]
    pub workspace_id: Option<String>,
    /// DataArts Studio instance ID
    #[serde(default)]
    pub instance_id: Option<String>,
    /// Request timeout override in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Retry count override
    #[serde(default)]
    pub max_retries: Option<u32>,
    /// Rate limit override (requests per second, 0 disables)
    #[serde(default)]
    pub rate_limit_rps: Option<u32>,
    /// Extra template variables
    #[serde(default)]
    pub vars: BTreeMap<String, String>,
}

impl Settings {
    /// Parse settings from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read settings from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file '{}'", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Load settings from an optional file, then apply the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_env();
        Ok(settings)
    }

    /// Override fields from `DATAARTS_*` environment variables
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Override fields from a variable lookup; empty values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let targets = [
            (env::ENDPOINT, &mut self.endpoint),
            (env::REGION, &mut self.region),
            (env::PROJECT_ID, &mut self.project_id),
            (env::AUTH_TOKEN, &mut self.auth_token),
            (env::WORKSPACE_ID, &mut self.workspace_id),
            (env::INSTANCE_ID, &mut self.instance_id),
        ];
        for (key, field) in targets {
            if let Some(value) = lookup(key).none_if_empty() {
                *field = Some(value);
            }
        }
    }

    /// Resolve the API endpoint
    ///
    /// An explicit endpoint wins; otherwise it is derived from the region.
    pub fn resolved_endpoint(&self) -> Result<String> {
        if let Some(endpoint) = self.endpoint.as_deref().filter(|e| !e.is_empty()) {
            return Ok(endpoint.trim_end_matches('/').to_string());
        }
        match self.region.as_deref().filter(|r| !r.is_empty()) {
            Some(region) => Ok(format!("https://dataarts.{region}.myhuaweicloud.com")),
            None => Err(Error::missing_field("endpoint or region")),
        }
    }

    /// Check that the settings can address the API
    pub fn validate(&self) -> Result<()> {
        if self.project_id.as_deref().unwrap_or_default().is_empty() {
            return Err(Error::missing_field("project_id"));
        }

        let endpoint = self.resolved_endpoint()?;
        let url = Url::parse(&endpoint)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "Endpoint must use http or https: {endpoint}"
            )));
        }

        Ok(())
    }

    /// Build the HTTP client config
    ///
    /// `defaults` come from the catalog; settings overrides win.
    pub fn to_http_config(&self, defaults: &HttpDefinition) -> Result<HttpClientConfig> {
        self.validate()?;

        let timeout = self.timeout_secs.unwrap_or(defaults.timeout_secs);
        let max_retries = self.max_retries.unwrap_or(defaults.max_retries);

        let mut builder = HttpClientConfig::builder()
            .base_url(self.resolved_endpoint()?)
            .timeout(Duration::from_secs(timeout))
            .max_retries(max_retries);

        builder = match self.rate_limit_rps.or(defaults.rate_limit_rps) {
            Some(0) | None => builder.no_rate_limit(),
            Some(rps) => builder.rate_limit(RateLimiterConfig::per_second(rps)),
        };

        if let Some(token) = self.auth_token.as_deref().filter(|t| !t.is_empty()) {
            builder = builder.header(AUTH_TOKEN_HEADER, token);
        }

        Ok(builder.build())
    }

    /// Template variables provided by these settings
    pub fn template_context(&self) -> TemplateContext {
        let mut ctx = TemplateContext::new();
        ctx.extend(self.vars.clone());

        let named = [
            ("project_id", &self.project_id),
            ("region", &self.region),
            ("workspace_id", &self.workspace_id),
            ("instance_id", &self.instance_id),
        ];
        for (key, value) in named {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                ctx.set(key, value);
            }
        }
        ctx
    }
}
