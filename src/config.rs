/// Host every request goes to, metadata and textures alike.
pub const DEFAULT_HOST: &str = "www.shadertoy.com";

/// Environment variable consulted for the API key at runtime (and at build time as a fallback).
pub const API_KEY_ENV: &str = "SHADERTOY_API_KEY";

/// Substring a link must contain to be accepted as a Shadertoy shader page.
pub const CANONICAL_VIEW_URL: &str = "www.shadertoy.com/view/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImporterConfig {
    pub host: String,
    pub api_key: String,
    pub user_agent: String,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            api_key: String::new(),
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ImporterConfig {
    /// Defaults plus the API key from the environment.
    ///
    /// Runtime `SHADERTOY_API_KEY` wins over a key baked in at build time.
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| option_env!("SHADERTOY_API_KEY").map(str::to_string))
            .unwrap_or_default();
        Self {
            api_key,
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Request path for a shader's metadata + render-pass graph.
    pub fn shader_api_path(&self, shader_id: &str) -> String {
        format!("/api/v1/shaders/{shader_id}?key={}", self.api_key)
    }

    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.starts_with("https://") || host.starts_with("http://") {
            host.to_string()
        } else {
            format!("https://{host}")
        }
    }
}
