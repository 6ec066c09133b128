// src/services/hunter.rs

use std::time::Duration;

use serde::Deserialize;

use crate::common::error::AppError;

// Quantidade máxima de contatos pedidos por busca
const SEARCH_LIMIT: &str = "5";

/// Cliente da API de descoberta de e-mails (Hunter `domain-search`).
#[derive(Clone)]
pub struct HunterClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DomainSearchResponse {
    #[serde(default)]
    pub data: DomainSearchData,
}

#[derive(Debug, Default, Deserialize)]
pub struct DomainSearchData {
    pub organization: Option<String>,
    pub emails: Option<Vec<HunterContact>>,
}

/// Um contato devolvido pela busca. Tudo é opcional no provedor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HunterContact {
    pub value: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub seniority: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HunterErrorBody {
    #[serde(default)]
    errors: Vec<HunterError>,
}

#[derive(Debug, Deserialize)]
struct HunterError {
    id: Option<String>,
    details: Option<String>,
}

impl HunterClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::ExternalApi(format!("Failed to create Hunter client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Busca até 5 contatos pessoais da empresa.
    ///
    /// Em caso de erro HTTP devolve a primeira mensagem reportada pelo
    /// provedor; sem corpo legível, a mensagem do próprio erro.
    pub async fn domain_search(&self, company: &str) -> Result<DomainSearchData, AppError> {
        let url = format!("{}/v2/domain-search", self.base_url);
        tracing::info!("Buscando contatos da empresa '{}' no Hunter", company);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("company", company),
                ("limit", SEARCH_LIMIT),
                ("type", "personal"),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await
            // A URL leva a api_key na query; não pode aparecer na mensagem
            .map_err(|e| AppError::ExternalApi(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Hunter respondeu {}: {}", status, body);

            let message = provider_error_message(&body).unwrap_or_else(|| {
                format!("Request failed with status code {}", status.as_u16())
            });
            return Err(AppError::ExternalApi(message));
        }

        let parsed: DomainSearchResponse = response
            .json()
            .await
            .map_err(|e| {
                AppError::ExternalApi(format!("Failed to parse Hunter response: {}", e.without_url()))
            })?;

        Ok(parsed.data)
    }
}

// Primeiro erro do corpo `{ "errors": [{ "id", "code", "details" }] }`
fn provider_error_message(body: &str) -> Option<String> {
    let parsed: HunterErrorBody = serde_json::from_str(body).ok()?;
    let first = parsed.errors.into_iter().next()?;
    first.details.or(first.id)
}
