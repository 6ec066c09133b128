//! Backend REST de leads (contatos comerciais).
//!
//! - `models`: entidade `Lead`, enums e payloads com validação.
//! - `db`: trait `LeadStore` com implementações Postgres e em memória.
//! - `services`: regras de negócio e cliente da API externa (Hunter).
//! - `handlers`: rotas HTTP (axum).
//! - `common`: erros, envelope de resposta e extratores.

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod models;
pub mod services;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc};

/// Monta o router completo da aplicação.
pub fn build_router(app_state: AppState) -> Router {
    let lead_routes = Router::new()
        .route("/"
               ,post(handlers::leads::create_lead)
               .get(handlers::leads::list_leads)
        )
        .route("/search-company"
               ,post(handlers::leads::search_company_leads)
        )
        .route("/{id}"
               ,get(handlers::leads::get_lead)
               .put(handlers::leads::update_lead)
               .delete(handlers::leads::delete_lead)
        );

    Router::new()
        .route("/api/health", get(handlers::health::health_check))
        .nest("/api/leads", lead_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
