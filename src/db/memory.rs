// src/db/memory.rs

//! [`LeadStore`] em memória, para testes e execução local sem Postgres.
//!
//! Mantém a ordem de inserção e aplica a mesma regra de e-mail único do banco.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{duplicate_email, LeadStore},
    models::lead::{Lead, LeadChanges, NewLead},
};

#[derive(Default)]
pub struct InMemoryLeadStore {
    leads: RwLock<Vec<Lead>>,
}

impl InMemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeadStore for InMemoryLeadStore {
    async fn insert(&self, lead: &NewLead) -> Result<Lead, AppError> {
        let mut leads = self.leads.write().await;

        if leads.iter().any(|l| l.email == lead.email) {
            return Err(duplicate_email(&lead.email));
        }

        let now = Utc::now();
        let stored = Lead {
            id: Uuid::new_v4(),
            first_name: lead.first_name.clone(),
            last_name: lead.last_name.clone(),
            email: lead.email.clone(),
            phone: lead.phone.clone(),
            company: lead.company.clone(),
            source: lead.source,
            status: lead.status,
            notes: lead.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        leads.push(stored.clone());

        Ok(stored)
    }

    async fn find_all(&self) -> Result<Vec<Lead>, AppError> {
        Ok(self.leads.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Lead>, AppError> {
        Ok(self.leads.read().await.iter().find(|l| l.id == id).cloned())
    }

    async fn update(&self, id: Uuid, changes: &LeadChanges) -> Result<Option<Lead>, AppError> {
        let mut leads = self.leads.write().await;

        if let Some(email) = &changes.email {
            if leads.iter().any(|l| l.id != id && &l.email == email) {
                return Err(duplicate_email(email));
            }
        }

        let Some(lead) = leads.iter_mut().find(|l| l.id == id) else {
            return Ok(None);
        };

        if let Some(v) = &changes.first_name {
            lead.first_name = v.clone();
        }
        if let Some(v) = &changes.last_name {
            lead.last_name = v.clone();
        }
        if let Some(v) = &changes.email {
            lead.email = v.clone();
        }
        if let Some(v) = &changes.phone {
            lead.phone = v.clone();
        }
        if let Some(v) = &changes.company {
            lead.company = v.clone();
        }
        if let Some(v) = changes.source {
            lead.source = v;
        }
        if let Some(v) = changes.status {
            lead.status = v;
        }
        if let Some(v) = &changes.notes {
            lead.notes = v.clone();
        }
        lead.updated_at = Utc::now();

        Ok(Some(lead.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut leads = self.leads.write().await;
        let before = leads.len();
        leads.retain(|l| l.id != id);
        Ok(leads.len() < before)
    }
}
