//! Catalog response payload.

use serde::{Deserialize, Serialize};

/// Top-level catalog response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub success: bool,
    pub data: CatalogData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub providers: Vec<String>,
    #[serde(default)]
    pub models: Vec<ModelRecord>,
}

/// One model in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    /// Identifier such as `openai/gpt-4o-mini`.
    pub id: String,
    /// Display name.
    pub name: String,
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<Pricing>,
    #[serde(default, alias = "contextLength", skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<String>,
}

/// Price per million tokens, in USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    #[serde(default)]
    pub prompt: Option<f64>,
    #[serde(default)]
    pub completion: Option<f64>,
}

impl CatalogResponse {
    /// Look up a model by identifier.
    pub fn model(&self, id: &str) -> Option<&ModelRecord> {
        self.data.models.iter().find(|m| m.id == id)
    }

    pub fn first_model_id(&self) -> Option<&str> {
        self.data.models.first().map(|m| m.id.as_str())
    }
}
