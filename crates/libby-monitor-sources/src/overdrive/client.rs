use crate::error::SourceError;
use crate::overdrive::api;
use crate::traits::CatalogueSource;
use async_trait::async_trait;
use libby_monitor_config::CatalogueSettings;
use libby_monitor_models::CatalogueResponse;
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, trace};

/// Unauthenticated client for the OverDrive Thunder media search endpoint
#[derive(Clone)]
pub struct ThunderClient {
    client: Arc<Client>,
    api_base: String,
}

impl ThunderClient {
    pub fn new(settings: &CatalogueSettings) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(&settings.user_agent)
            .timeout(settings.timeout())
            .build()
            .map_err(|e| SourceError::Client(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            api_base: settings.api_base.clone(),
        })
    }
}

#[async_trait]
impl CatalogueSource for ThunderClient {
    fn source_name(&self) -> &str {
        "overdrive"
    }

    async fn search(&self, library: &str, query: &str) -> Result<CatalogueResponse, SourceError> {
        let url = api::media_url(&self.api_base, library, query);
        debug!(operation = "catalogue_search", library, query, "Searching catalogue");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Http {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.text().await?;
        trace!(bytes = body.len(), "Catalogue response received");
        let parsed = api::parse_media_response(&body)?;
        debug!(
            operation = "catalogue_search",
            library,
            total_items = parsed.total_items,
            returned = parsed.items.len(),
            "Catalogue search complete"
        );
        Ok(parsed)
    }
}
