use serde::{Deserialize, Serialize};

/// Entity kind a global search hit points at.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Shipment,
    Client,
}

/// One hit from cross-entity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub kind: SearchKind,
    /// Raw id string; the kind tells the consumer which id space it is in.
    pub id: String,
    /// Primary display line, e.g. a shipment id or client name.
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}
