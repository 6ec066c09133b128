// src/handlers/leads.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    common::{error::AppError, extract::AppJson, response::ApiResponse},
    config::AppState,
    models::lead::{
        CompanySearchResult, CreateLeadPayload, Lead, SearchCompanyPayload, UpdateLeadPayload,
    },
};

// Um id que não é UUID não pode existir no banco: tratamos como "não encontrado".
fn parse_lead_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::lead_not_found())
}

// POST /api/leads
#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "Leads",
    request_body = CreateLeadPayload,
    responses(
        (status = 201, description = "Lead criado", body = ApiResponse<Lead>),
        (status = 400, description = "Dados inválidos ou e-mail duplicado")
    )
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<CreateLeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    let lead = app_state.lead_service.create(payload).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(lead))))
}

// GET /api/leads
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "Leads",
    responses(
        (status = 200, description = "Todos os leads", body = ApiResponse<Vec<Lead>>)
    )
)]
pub async fn list_leads(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let leads = app_state.lead_service.list_all().await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(leads))))
}

// GET /api/leads/{id}
#[utoipa::path(
    get,
    path = "/api/leads/{id}",
    tag = "Leads",
    params(("id" = String, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Lead encontrado", body = ApiResponse<Lead>),
        (status = 404, description = "Lead não encontrado")
    )
)]
pub async fn get_lead(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_lead_id(&id)?;
    let lead = app_state.lead_service.get_by_id(id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(lead))))
}

// PUT /api/leads/{id}
#[utoipa::path(
    put,
    path = "/api/leads/{id}",
    tag = "Leads",
    params(("id" = String, Path, description = "ID do lead")),
    request_body = UpdateLeadPayload,
    responses(
        (status = 200, description = "Lead atualizado", body = ApiResponse<Lead>),
        (status = 400, description = "Dados inválidos ou e-mail duplicado"),
        (status = 404, description = "Lead não encontrado")
    )
)]
pub async fn update_lead(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateLeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_lead_id(&id)?;
    let lead = app_state.lead_service.update(id, payload).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(lead))))
}

// DELETE /api/leads/{id}
#[utoipa::path(
    delete,
    path = "/api/leads/{id}",
    tag = "Leads",
    params(("id" = String, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Lead removido (data = {})"),
        (status = 404, description = "Lead não encontrado")
    )
)]
pub async fn delete_lead(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_lead_id(&id)?;
    app_state.lead_service.delete_by_id(id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(json!({})))))
}

// POST /api/leads/search-company
#[utoipa::path(
    post,
    path = "/api/leads/search-company",
    tag = "Leads",
    request_body = SearchCompanyPayload,
    responses(
        (status = 201, description = "Leads criados a partir da busca", body = ApiResponse<CompanySearchResult>),
        (status = 400, description = "Empresa ausente ou erro da API externa"),
        (status = 404, description = "Nenhum contato encontrado")
    )
)]
pub async fn search_company_leads(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<SearchCompanyPayload>,
) -> Result<impl IntoResponse, AppError> {
    let result = app_state
        .lead_service
        .search_company(payload.company.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(result))))
}
