use libby_monitor_models::{CatalogueItem, CatalogueResponse};
use serde::Deserialize;
use crate::error::SourceError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThunderMediaResponse {
    total_items: Option<u64>,
    items: Option<Vec<ThunderMediaItem>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThunderMediaItem {
    title: Option<String>,
    first_creator_name: Option<String>,
    is_owned: Option<bool>,
    owned_copies: Option<u32>,
    is_available: Option<bool>,
    available_copies: Option<u32>,
}

impl From<ThunderMediaItem> for CatalogueItem {
    fn from(item: ThunderMediaItem) -> Self {
        CatalogueItem {
            title: item.title.unwrap_or_default(),
            first_creator_name: item.first_creator_name.unwrap_or_default(),
            is_owned: item.is_owned.unwrap_or(false),
            owned_copies: item.owned_copies.unwrap_or(0),
            is_available: item.is_available.unwrap_or(false),
            available_copies: item.available_copies.unwrap_or(0),
        }
    }
}

/// `{api_base}/{library}/media?query={query}` with both path and query percent-encoded
pub fn media_url(api_base: &str, library: &str, query: &str) -> String {
    format!(
        "{}/{}/media?query={}",
        api_base.trim_end_matches('/'),
        urlencoding::encode(library),
        urlencoding::encode(query)
    )
}

pub fn parse_media_response(body: &str) -> Result<CatalogueResponse, SourceError> {
    let response: ThunderMediaResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Decode(e.to_string()))?;

    Ok(CatalogueResponse {
        total_items: response.total_items.unwrap_or(0),
        items: response
            .items
            .unwrap_or_default()
            .into_iter()
            .map(CatalogueItem::from)
            .collect(),
    })
}
