use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::models::LeadsResponse;
use crate::view::LeadsDashboard;

/// Why a dashboard could not be loaded. Every variant means "not found" to the user.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("dashboard slug is empty")]
    EmptySlug,

    #[error("GET {url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("GET {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("GET {url} returned an unreadable body: {source}")]
    Decode { url: String, source: reqwest::Error },

    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

// --- Source trait ---

pub trait LeadSource {
    fn fetch_leads(&self, slug: &str) -> Result<LeadsResponse, FetchError>;
}

// --- HTTP source ---

#[derive(Debug)]
pub struct HttpLeadSource {
    api_url: String,
    client: reqwest::blocking::Client,
}

impl HttpLeadSource {
    pub fn new(api_url: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn leads_url(&self, slug: &str) -> String {
        format!("{}/api/leads/{}", self.api_url, slug)
    }
}

impl LeadSource for HttpLeadSource {
    fn fetch_leads(&self, slug: &str) -> Result<LeadsResponse, FetchError> {
        if slug.is_empty() {
            return Err(FetchError::EmptySlug);
        }
        let url = self.leads_url(slug);
        info!(%url, "fetching leads");

        let response = self
            .client
            .get(&url)
            .header("content-type", "application/json")
            .send()
            .map_err(|source| FetchError::Transport { url: url.clone(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }

        response
            .json::<LeadsResponse>()
            .map_err(|source| FetchError::Decode { url, source })
    }
}

// --- File source ---

/// Reads a saved `LeadsResponse` JSON document instead of calling the API.
#[derive(Debug, Clone)]
pub struct FileLeadSource {
    path: PathBuf,
}

impl FileLeadSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl LeadSource for FileLeadSource {
    fn fetch_leads(&self, slug: &str) -> Result<LeadsResponse, FetchError> {
        if slug.is_empty() {
            return Err(FetchError::EmptySlug);
        }
        info!(path = %self.path.display(), "loading leads from file");
        let content = std::fs::read_to_string(&self.path).map_err(|source| FetchError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| FetchError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

// --- Page outcome ---

pub enum DashboardPage {
    Ready(LeadsDashboard),
    NotFound { slug: String },
}

/// Fetch once and build the dashboard. Any failure becomes `NotFound`; there is no retry.
pub fn load_dashboard(source: &dyn LeadSource, slug: &str, company_name: &str) -> DashboardPage {
    match source.fetch_leads(slug) {
        Ok(data) => {
            info!(slug, leads = data.leads.len(), total = data.total_leads, "leads loaded");
            DashboardPage::Ready(LeadsDashboard::new(data, company_name))
        }
        Err(e) => {
            warn!(slug, error = %e, "could not load dashboard");
            DashboardPage::NotFound { slug: slug.to_string() }
        }
    }
}

/// Title-case a slug for display: `acme-corp` becomes `Acme Corp`.
pub fn display_name(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
