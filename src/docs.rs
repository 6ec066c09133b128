// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Health ---
        handlers::health::health_check,

        // --- Leads ---
        handlers::leads::create_lead,
        handlers::leads::list_leads,
        handlers::leads::get_lead,
        handlers::leads::update_lead,
        handlers::leads::delete_lead,
        handlers::leads::search_company_leads,
    ),
    components(
        schemas(
            handlers::health::HealthResponse,

            // --- Leads ---
            models::lead::LeadSource,
            models::lead::LeadStatus,
            models::lead::Lead,
            models::lead::CompanySearchResult,

            // --- Payloads ---
            models::lead::CreateLeadPayload,
            models::lead::UpdateLeadPayload,
            models::lead::SearchCompanyPayload,
        )
    ),
    tags(
        (name = "Health", description = "Estado do servidor"),
        (name = "Leads", description = "Gestão de Leads e busca de contatos por empresa")
    )
)]
pub struct ApiDoc;
