use serde::Serialize;

/// Body posted to the image backend.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub size: String,
    pub n: u32,
}
