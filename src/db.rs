// src/db.rs

pub mod lead_repo;
pub use lead_repo::PgLeadRepository;
pub mod memory;
pub use memory::InMemoryLeadStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::lead::{Lead, LeadChanges, NewLead},
};

/// Persistência de leads.
///
/// O handle é criado explicitamente no `main` (ou nos testes) e injetado no
/// `LeadService`; não existe cliente global. Implementações precisam garantir
/// a unicidade do e-mail e devolver `AppError::DuplicateEmail` quando violada.
#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn insert(&self, lead: &NewLead) -> Result<Lead, AppError>;

    /// Todos os leads, do mais antigo para o mais novo.
    async fn find_all(&self) -> Result<Vec<Lead>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Lead>, AppError>;

    /// `Ok(None)` quando o id não existe.
    async fn update(&self, id: Uuid, changes: &LeadChanges) -> Result<Option<Lead>, AppError>;

    /// `Ok(false)` quando o id não existe.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

pub(crate) fn duplicate_email(email: &str) -> AppError {
    AppError::DuplicateEmail(format!("Lead with email '{}' already exists", email))
}
