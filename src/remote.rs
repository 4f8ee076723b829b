//! Blocking HTTPS access to the Shadertoy host.
//!
//! Everything that needs the network goes through [`Fetch`], which keeps the
//! pipeline testable without a live server.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::config::ImporterConfig;

/// Raw result of a single GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
        }
    }

    /// Only HTTP 200 counts as data.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

pub trait Fetch {
    /// GET `path` (absolute path + optional query) against the configured host.
    /// `Err` means the request never produced a response.
    fn get(&self, path: &str) -> Result<FetchResponse>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn get(&self, path: &str) -> Result<FetchResponse> {
        (**self).get(path)
    }
}

/// Single-attempt HTTPS client bound to one host.
pub struct RemoteClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl RemoteClient {
    pub fn new(config: &ImporterConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(Duration::from_secs(30))
            // single attempt: large textures may take as long as they need
            .timeout(None::<Duration>)
            .build()
            .context("failed to build https client")?;
        Ok(Self {
            base_url: config.base_url(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

/// `path` without its query string, which may carry the api key.
fn display_path(path: &str) -> &str {
    path.split_once('?').map_or(path, |(p, _)| p)
}

impl Fetch for RemoteClient {
    fn get(&self, path: &str) -> Result<FetchResponse> {
        let shown = display_path(path);
        log::debug!("GET {}{shown}", self.base_url);
        // reqwest errors embed the full url; strip it so the query never leaks.
        let resp = self
            .http
            .get(self.url_for(path))
            .send()
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("GET {shown} failed"))?;
        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("failed to read body of {shown}"))?
            .to_vec();
        log::debug!("GET {shown} -> {status} ({} bytes)", body.len());
        Ok(FetchResponse { status, body })
    }
}
