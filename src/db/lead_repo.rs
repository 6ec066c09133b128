// src/db/lead_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{duplicate_email, LeadStore},
    models::lead::{Lead, LeadChanges, NewLead},
};

const LEAD_COLUMNS: &str = "id, first_name, last_name, email, phone, company, \
     source, status, notes, created_at, updated_at";

// O repositório de leads, responsável por todas as interações com a tabela 'leads'
#[derive(Clone)]
pub struct PgLeadRepository {
    pool: PgPool,
}

impl PgLeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Converte violações de constraint em erros de cliente (400)
fn map_write_error(e: sqlx::Error, email: Option<&str>) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return duplicate_email(email.unwrap_or("?"));
        }
        if db_err.is_check_violation() {
            return AppError::BadRequest(db_err.message().to_string());
        }
    }
    e.into()
}

#[async_trait]
impl LeadStore for PgLeadRepository {
    async fn insert(&self, lead: &NewLead) -> Result<Lead, AppError> {
        let sql = format!(
            r#"
            INSERT INTO leads (
                first_name, last_name, email, phone, company, source, status, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {LEAD_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Lead>(&sql)
            .bind(&lead.first_name)
            .bind(&lead.last_name)
            .bind(&lead.email)
            .bind(&lead.phone)
            .bind(&lead.company)
            .bind(lead.source)
            .bind(lead.status)
            .bind(&lead.notes)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, Some(&lead.email)))
    }

    async fn find_all(&self) -> Result<Vec<Lead>, AppError> {
        let sql = format!("SELECT {LEAD_COLUMNS} FROM leads ORDER BY created_at ASC, id ASC");

        let leads = sqlx::query_as::<_, Lead>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(leads)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Lead>, AppError> {
        let sql = format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = $1");

        let lead = sqlx::query_as::<_, Lead>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(lead)
    }

    async fn update(&self, id: Uuid, changes: &LeadChanges) -> Result<Option<Lead>, AppError> {
        // COALESCE: campo não enviado (NULL) mantém o valor atual.
        // Nos opcionais, a flag ($10..$12) diz se o campo veio no corpo; veio como NULL => apaga.
        let sql = format!(
            r#"
            UPDATE leads
            SET first_name = COALESCE($2, first_name),
                last_name  = COALESCE($3, last_name),
                email      = COALESCE($4, email),
                phone      = CASE WHEN $10 THEN $5 ELSE phone END,
                company    = CASE WHEN $11 THEN $6 ELSE company END,
                source     = COALESCE($7, source),
                status     = COALESCE($8, status),
                notes      = CASE WHEN $12 THEN $9 ELSE notes END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {LEAD_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Lead>(&sql)
            .bind(id)
            .bind(&changes.first_name)
            .bind(&changes.last_name)
            .bind(&changes.email)
            .bind(changes.phone.as_ref().and_then(|v| v.as_deref()))
            .bind(changes.company.as_ref().and_then(|v| v.as_deref()))
            .bind(changes.source)
            .bind(changes.status)
            .bind(changes.notes.as_ref().and_then(|v| v.as_deref()))
            .bind(changes.phone.is_some())
            .bind(changes.company.is_some())
            .bind(changes.notes.is_some())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, changes.email.as_deref()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
