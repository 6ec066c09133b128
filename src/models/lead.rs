// src/models/lead.rs

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

// --- ENUMS ---

// Mapeia o CREATE TYPE lead_source do banco
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "lead_source", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum LeadSource {
    Website,
    Referral,
    Social,
    Email,
    Other,
    // Leads gerados pela busca de empresa (API externa)
    ExternalSearch,
}

// Mapeia o CREATE TYPE lead_status do banco
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "lead_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Lost,
    Won,
}

// --- LEAD (O Dado) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(example = "Maria")]
    pub first_name: String,
    #[schema(example = "Silva")]
    pub last_name: String,

    #[schema(example = "maria@acme.com")]
    pub email: String,
    #[schema(example = "+1 (555) 123-4567")]
    pub phone: Option<String>,
    #[schema(example = "Acme")]
    pub company: Option<String>,

    pub source: LeadSource,
    pub status: LeadStatus,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lead já normalizado e validado, pronto para ser gravado.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLead {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub source: LeadSource,
    pub status: LeadStatus,
    pub notes: Option<String>,
}

/// Alterações parciais de um lead. `None` = campo não enviado (mantém o valor atual).
///
/// Nos campos opcionais, `Some(None)` limpa o valor gravado.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub company: Option<Option<String>>,
    pub source: Option<LeadSource>,
    pub status: Option<LeadStatus>,
    pub notes: Option<Option<String>>,
}

// ---
// Regras de formato
// ---

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    // `\w` só ASCII, como no padrão original
    Regex::new(r"^(?-u:\w)+([\.-]?(?-u:\w)+)*@(?-u:\w)+([\.-]?(?-u:\w)+)*(\.(?-u:\w){2,3})+$")
        .expect("email regex is valid")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+]?[(]?[0-9]{3}[)]?[-\s.]?[0-9]{3}[-\s.]?[0-9]{4}$").expect("phone regex is valid")
});

fn validate_email_format(email: &str) -> Result<(), ValidationError> {
    if !EMAIL_RE.is_match(email) {
        let mut err = ValidationError::new("email");
        err.message = Some("Please add a valid email".into());
        return Err(err);
    }
    Ok(())
}

fn validate_phone_format(phone: &str) -> Result<(), ValidationError> {
    if !PHONE_RE.is_match(phone) {
        let mut err = ValidationError::new("phone");
        err.message = Some("Please add a valid phone number".into());
        return Err(err);
    }
    Ok(())
}

fn not_blank(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some(message.into());
        return Err(err);
    }
    Ok(())
}

fn validate_first_name_present(value: &str) -> Result<(), ValidationError> {
    not_blank(value, "First name is required")
}

fn validate_last_name_present(value: &str) -> Result<(), ValidationError> {
    not_blank(value, "Last name is required")
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

// Trim; string vazia vira "não informado"
fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn clean_email(value: Option<String>) -> Option<String> {
    clean(value).map(|v| v.to_lowercase())
}

// Distingue campo ausente (None) de `null` explícito (Some(None))
fn deserialize_nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

// ---
// Payloads
// ---

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadPayload {
    #[validate(
        required(message = "First name is required"),
        length(max = 50, message = "First name cannot be more than 50 characters")
    )]
    #[schema(example = "Maria")]
    pub first_name: Option<String>,

    #[validate(
        required(message = "Last name is required"),
        length(max = 50, message = "Last name cannot be more than 50 characters")
    )]
    #[schema(example = "Silva")]
    pub last_name: Option<String>,

    #[validate(
        required(message = "Email is required"),
        custom(function = "validate_email_format")
    )]
    #[schema(example = "maria@acme.com")]
    pub email: Option<String>,

    #[validate(custom(function = "validate_phone_format"))]
    #[schema(example = "555-123-4567")]
    pub phone: Option<String>,

    #[validate(length(max = 100, message = "Company name cannot be more than 100 characters"))]
    #[schema(example = "Acme")]
    pub company: Option<String>,

    #[validate(required(message = "Lead source is required"))]
    pub source: Option<LeadSource>,

    // Ausente => "new"
    pub status: Option<LeadStatus>,

    #[validate(length(max = 1000, message = "Notes cannot be more than 1000 characters"))]
    pub notes: Option<String>,
}

impl CreateLeadPayload {
    /// Aplica as regras de normalização do schema (trim, e-mail em minúsculas, status padrão).
    pub fn normalize(&mut self) {
        self.first_name = clean(self.first_name.take());
        self.last_name = clean(self.last_name.take());
        self.email = clean_email(self.email.take());
        self.phone = clean(self.phone.take());
        self.company = clean(self.company.take());
        self.notes = clean(self.notes.take());
        if self.status.is_none() {
            self.status = Some(LeadStatus::default());
        }
    }

    /// Normaliza, valida e converte no registro a ser gravado.
    pub fn into_new_lead(mut self) -> Result<NewLead, ValidationErrors> {
        self.normalize();
        self.validate()?;

        // Os campos obrigatórios já foram garantidos pelo validate()
        Ok(NewLead {
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone: self.phone,
            company: self.company,
            source: self.source.unwrap_or(LeadSource::Other),
            status: self.status.unwrap_or_default(),
            notes: self.notes,
        })
    }
}

/// Corpo do PUT. Campos ausentes ficam como estão; `null` (ou texto em branco)
/// em `phone`, `company` e `notes` apaga o valor.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeadPayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,

    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>)]
    pub company: Option<Option<String>>,

    pub source: Option<LeadSource>,
    pub status: Option<LeadStatus>,

    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

// Mesmas regras do schema, aplicadas só aos valores enviados
#[derive(Validate)]
struct UpdateRules {
    #[validate(
        custom(function = "validate_first_name_present"),
        length(max = 50, message = "First name cannot be more than 50 characters")
    )]
    first_name: Option<String>,

    #[validate(
        custom(function = "validate_last_name_present"),
        length(max = 50, message = "Last name cannot be more than 50 characters")
    )]
    last_name: Option<String>,

    #[validate(custom(function = "validate_email_format"))]
    email: Option<String>,

    #[validate(custom(function = "validate_phone_format"))]
    phone: Option<String>,

    #[validate(length(max = 100, message = "Company name cannot be more than 100 characters"))]
    company: Option<String>,

    #[validate(length(max = 1000, message = "Notes cannot be more than 1000 characters"))]
    notes: Option<String>,
}

impl UpdateLeadPayload {
    pub fn into_changes(self) -> Result<LeadChanges, ValidationErrors> {
        // Nomes em branco continuam Some("") para falhar na validação
        let trimmed = |v: Option<String>| v.map(|s| s.trim().to_string());
        // Texto em branco num campo opcional equivale a `null`
        let nullable = |v: Option<Option<String>>| v.map(clean);

        let changes = LeadChanges {
            first_name: trimmed(self.first_name),
            last_name: trimmed(self.last_name),
            email: clean_email(self.email),
            phone: nullable(self.phone),
            company: nullable(self.company),
            source: self.source,
            status: self.status,
            notes: nullable(self.notes),
        };

        UpdateRules {
            first_name: changes.first_name.clone(),
            last_name: changes.last_name.clone(),
            email: changes.email.clone(),
            phone: changes.phone.clone().flatten(),
            company: changes.company.clone().flatten(),
            notes: changes.notes.clone().flatten(),
        }
        .validate()?;

        Ok(changes)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchCompanyPayload {
    #[schema(example = "Stripe")]
    pub company: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanySearchResult {
    pub created: usize,
    pub leads: Vec<Lead>,
}
