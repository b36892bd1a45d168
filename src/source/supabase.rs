//! REST client for the hosted survey database.
//!
//! The database exposes each table over a PostgREST endpoint at
//! `{url}/rest/v1/{table}`. Requests authenticate with the project's public
//! key, sent both as `apikey` and as a bearer token.

use crate::config::SourceConfig;
use crate::models::RawRow;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while querying the database.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no database URL configured")]
    MissingUrl,

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("cannot connect to the database at {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("database API error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode rows: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Client for one database project.
pub struct SupabaseClient {
    base_url: String,
    anon_key: String,
    timeout_seconds: u64,
    http_client: reqwest::Client,
}

impl SupabaseClient {
    /// Create a client from the source settings.
    pub fn new(config: &SourceConfig) -> Result<Self, SourceError> {
        let base_url = config
            .url
            .as_deref()
            .map(|u| u.trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .ok_or(SourceError::MissingUrl)?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(SourceError::Client)?;

        Ok(Self {
            base_url,
            anon_key: config.anon_key.clone().unwrap_or_default(),
            timeout_seconds: config.timeout_seconds,
            http_client,
        })
    }

    /// REST endpoint for a table.
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Fetch up to `limit` rows of `table`.
    pub async fn fetch_rows(&self, table: &str, limit: usize) -> Result<Vec<RawRow>, SourceError> {
        let url = self.table_url(table);
        info!("Querying {} (limit {})", url, limit);

        let limit = limit.to_string();
        let response = self
            .http_client
            .get(&url)
            .query(&[("select", "*"), ("limit", limit.as_str())])
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Timeout(self.timeout_seconds)
                } else if e.is_connect() {
                    SourceError::Connect(self.base_url.clone())
                } else {
                    SourceError::Request(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api { status, body });
        }

        let rows: Vec<RawRow> = response.json().await.map_err(SourceError::Decode)?;
        debug!("Received {} rows from {}", rows.len(), table);

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_config(url: Option<&str>) -> SourceConfig {
        SourceConfig {
            url: url.map(String::from),
            anon_key: Some("public-key".to_string()),
            ..SourceConfig::default()
        }
    }

    #[test]
    fn test_table_url() {
        let client = SupabaseClient::new(&source_config(Some("https://demo.supabase.co/"))).unwrap();
        assert_eq!(
            client.table_url("caracterizacion_desechos_daule"),
            "https://demo.supabase.co/rest/v1/caracterizacion_desechos_daule"
        );
    }

    #[test]
    fn test_missing_url() {
        assert!(matches!(
            SupabaseClient::new(&source_config(None)),
            Err(SourceError::MissingUrl)
        ));
        assert!(matches!(
            SupabaseClient::new(&source_config(Some(""))),
            Err(SourceError::MissingUrl)
        ));
    }

    #[test]
    fn test_fixture_rows_decode() {
        let rows: Vec<RawRow> =
            serde_json::from_str(include_str!("../../fixtures/rows.json")).unwrap();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].location(), Some("Centro de Daule"));
        assert_eq!(rows[1].value("plastico_pet_kg"), 2.5);
        assert_eq!(rows[2].value("papel_blanco_kg"), 0.0);
        assert_eq!(rows[3].location(), None);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SourceError::Timeout(30).to_string(),
            "request timed out after 30s"
        );
        assert_eq!(
            SourceError::Connect("https://demo.supabase.co".to_string()).to_string(),
            "cannot connect to the database at https://demo.supabase.co"
        );
    }
}
