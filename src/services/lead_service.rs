// src/services/lead_service.rs

use std::sync::Arc;

use futures::future::join_all;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::LeadStore,
    models::lead::{
        is_valid_phone, CompanySearchResult, CreateLeadPayload, Lead, LeadSource, LeadStatus,
        UpdateLeadPayload,
    },
    services::hunter::{HunterClient, HunterContact},
};

/// Resultado de uma tentativa individual de gravação na busca por empresa.
#[derive(Debug)]
pub enum InsertOutcome {
    Created(Lead),
    Failed { email: String, reason: String },
}

#[derive(Clone)]
pub struct LeadService {
    store: Arc<dyn LeadStore>,
    hunter: HunterClient,
}

impl LeadService {
    pub fn new(store: Arc<dyn LeadStore>, hunter: HunterClient) -> Self {
        Self { store, hunter }
    }

    // =========================================================================
    //  CRUD
    // =========================================================================

    pub async fn create(&self, payload: CreateLeadPayload) -> Result<Lead, AppError> {
        let new_lead = payload.into_new_lead()?;
        let lead = self.store.insert(&new_lead).await?;

        tracing::info!(lead_id = %lead.id, "Lead criado");
        Ok(lead)
    }

    pub async fn list_all(&self) -> Result<Vec<Lead>, AppError> {
        self.store.find_all().await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Lead, AppError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(AppError::lead_not_found)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateLeadPayload) -> Result<Lead, AppError> {
        let changes = payload.into_changes()?;

        self.store
            .update(id, &changes)
            .await?
            .ok_or_else(AppError::lead_not_found)
    }

    pub async fn delete_by_id(&self, id: Uuid) -> Result<(), AppError> {
        if !self.store.delete(id).await? {
            return Err(AppError::lead_not_found());
        }

        tracing::info!(lead_id = %id, "Lead removido");
        Ok(())
    }

    // =========================================================================
    //  BUSCA POR EMPRESA (API externa)
    // =========================================================================

    /// Busca contatos da empresa no Hunter e grava cada um como lead.
    ///
    /// As gravações são independentes: uma falha (ex.: e-mail duplicado) é
    /// logada e fica de fora do resultado, sem derrubar a requisição.
    pub async fn search_company(&self, company: Option<&str>) -> Result<CompanySearchResult, AppError> {
        let company = company
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::BadRequest("Please provide a company name".to_string()))?;

        let data = self.hunter.domain_search(company).await?;

        let contacts = data.emails.unwrap_or_default();
        if contacts.is_empty() {
            return Err(AppError::NotFound("No leads found for this company".to_string()));
        }

        let organization = data.organization.filter(|o| !o.trim().is_empty());
        let company_name = organization.as_deref().unwrap_or(company);

        let attempts = contacts
            .into_iter()
            .map(|contact| self.insert_contact(lead_from_contact(contact, company_name)));
        let outcomes = join_all(attempts).await;

        let mut leads = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                InsertOutcome::Created(lead) => leads.push(lead),
                InsertOutcome::Failed { email, reason } => {
                    tracing::warn!("Falha ao criar lead para {}: {}", email, reason);
                }
            }
        }

        tracing::info!(company, created = leads.len(), "Busca por empresa concluída");
        Ok(CompanySearchResult {
            created: leads.len(),
            leads,
        })
    }

    async fn insert_contact(&self, payload: CreateLeadPayload) -> InsertOutcome {
        let email = payload.email.clone().unwrap_or_default();

        let result = match payload.into_new_lead() {
            Ok(new_lead) => self.store.insert(&new_lead).await,
            Err(errors) => Err(AppError::from(errors)),
        };

        match result {
            Ok(lead) => InsertOutcome::Created(lead),
            Err(err) => InsertOutcome::Failed {
                email,
                reason: err.to_string(),
            },
        }
    }
}

fn or_unknown(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Monta o payload de um lead a partir de um contato do Hunter.
pub fn lead_from_contact(contact: HunterContact, company: &str) -> CreateLeadPayload {
    let notes = format!(
        "Position: {}\nDepartment: {}\nSeniority: {}",
        or_unknown(contact.position),
        or_unknown(contact.department),
        or_unknown(contact.seniority),
    );

    // Telefone fora do padrão aceito é descartado, o contato continua válido
    let phone = contact
        .phone_number
        .map(|p| p.trim().to_string())
        .filter(|p| is_valid_phone(p));

    CreateLeadPayload {
        first_name: Some(or_unknown(contact.first_name)),
        last_name: Some(or_unknown(contact.last_name)),
        email: contact.value,
        phone,
        company: Some(company.to_string()),
        source: Some(LeadSource::ExternalSearch),
        status: Some(LeadStatus::New),
        notes: Some(notes),
    }
}
