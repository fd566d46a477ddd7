use async_trait::async_trait;
use libby_monitor_models::CatalogueResponse;
use crate::error::SourceError;

/// A searchable library catalogue
#[async_trait]
pub trait CatalogueSource: Send + Sync {
    // Source metadata
    fn source_name(&self) -> &str;

    /// Keyword search in the catalogue of `library`
    async fn search(&self, library: &str, query: &str) -> Result<CatalogueResponse, SourceError>;
}
