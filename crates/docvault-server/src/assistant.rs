//! Gemini `generateContent` client for document questions and receipt
//! extraction.
//!
//! Documents are sent inline as base64 parts ahead of the text prompt.
//! Extraction additionally asks for JSON constrained by a fixed response
//! schema and parses it into an [`ExtractedOrder`].

use serde::Deserialize;
use serde_json::{json, Value};

use docvault_core::{DocumentRecord, ExtractedOrder};

use crate::error::ApiError;

const SYSTEM_INSTRUCTION: &str = "You are an expert financial assistant. Your knowledge base consists of the documents provided by the user. Analyze and extract data from these documents to answer questions. If the answer isn't in the documents, say so. Respond clearly and accurately based only on the provided documents.";

const EXTRACTION_PROMPT: &str = "Extract the order details from this receipt: order number, order date, customer name, total amount, and every line item with its name, quantity and unit price. Leave out any field that is not present on the receipt.";

/// Connection settings for the model API.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub api_key: String,
    pub model: String,
    /// Base URL without trailing `/models/...`, e.g. `https://host/v1beta`.
    pub base_url: String,
}

/// Stateless client; one request per call, no retries.
#[derive(Debug, Clone)]
pub struct Assistant {
    client: reqwest::Client,
    config: AssistantConfig,
}

impl Assistant {
    pub fn new(config: AssistantConfig) -> Self {
        Assistant {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Answers a free-form question over the given documents.
    pub async fn answer(
        &self,
        question: &str,
        documents: &[DocumentRecord],
    ) -> Result<String, ApiError> {
        let mut parts: Vec<Value> = documents.iter().map(inline_part).collect();
        parts.push(json!({
            "text": format!(
                "Based on the provided documents (invoices, receipts, etc.), answer the following question. Synthesize information across documents if necessary. Question: \"{}\"",
                question
            )
        }));

        let body = json!({
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "contents": [{ "role": "user", "parts": parts }],
        });
        self.generate(&body).await
    }

    /// Extracts structured order data from one receipt.
    pub async fn extract_order(&self, document: &DocumentRecord) -> Result<ExtractedOrder, ApiError> {
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [inline_part(document), { "text": EXTRACTION_PROMPT }],
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": order_schema(),
            },
        });
        let text = self.generate(&body).await?;
        parse_extraction(&text)
    }

    async fn generate(&self, body: &Value) -> Result<String, ApiError> {
        let endpoint = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        tracing::debug!(model = %self.config.model, "calling generateContent");

        let response = self
            .client
            .post(endpoint)
            .header("x-goog-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| ApiError::Upstream(format!("model request failed: {}", err)))?;

        let status = response.status();
        let body_text = response
            .text()
            .await
            .map_err(|err| ApiError::Upstream(format!("model response read failed: {}", err)))?;

        if !status.is_success() {
            return Err(ApiError::Upstream(format!(
                "model request failed ({}): {}",
                status, body_text
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body_text)
            .map_err(|err| ApiError::Upstream(format!("model response parse failed: {}", err)))?;

        let text: String = parsed
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect()
            })
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(ApiError::Upstream(
                "model response contained no text".to_string(),
            ));
        }
        Ok(text.to_string())
    }
}

fn inline_part(document: &DocumentRecord) -> Value {
    json!({
        "inlineData": {
            "mimeType": document.mime_type.as_str(),
            "data": document.content,
        }
    })
}

fn order_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "orderNumber": { "type": "STRING" },
            "date": { "type": "STRING" },
            "customer": { "type": "STRING" },
            "total": { "type": "NUMBER" },
            "items": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "quantity": { "type": "NUMBER" },
                        "price": { "type": "NUMBER" }
                    },
                    "required": ["name", "quantity", "price"]
                }
            }
        }
    })
}

/// Parses the model's JSON answer, tolerating a Markdown code fence.
fn parse_extraction(text: &str) -> Result<ExtractedOrder, ApiError> {
    let trimmed = text.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed);

    serde_json::from_str(unfenced.trim())
        .map_err(|err| ApiError::Upstream(format!("extraction was not valid order JSON: {}", err)))
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}
