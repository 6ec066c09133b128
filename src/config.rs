// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{LeadStore, PgLeadRepository},
    services::{hunter::HunterClient, lead_service::LeadService},
};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HUNTER_BASE_URL: &str = "https://api.hunter.io";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub hunter_api_key: String,
    pub hunter_base_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Monta a configuração a partir de uma fonte de variáveis (env em produção, mapa nos testes).
    pub fn from_vars<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            None => DEFAULT_PORT,
        };

        let database_url = non_empty("DATABASE_URL")
            .context("DATABASE_URL environment variable required")?;
        if !database_url.starts_with("postgresql://") && !database_url.starts_with("postgres://") {
            anyhow::bail!("DATABASE_URL must start with postgresql:// or postgres://");
        }

        let hunter_api_key = non_empty("HUNTER_API")
            .context("HUNTER_API environment variable required")?;

        let hunter_base_url = non_empty("HUNTER_BASE_URL")
            .unwrap_or_else(|| DEFAULT_HUNTER_BASE_URL.to_string());
        if !hunter_base_url.starts_with("http://") && !hunter_base_url.starts_with("https://") {
            anyhow::bail!("HUNTER_BASE_URL must start with http:// or https://");
        }

        Ok(Self {
            port,
            database_url,
            hunter_api_key,
            hunter_base_url,
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub lead_service: LeadService,
}

impl AppState {
    pub fn new(store: Arc<dyn LeadStore>, hunter: HunterClient) -> Self {
        Self {
            lead_service: LeadService::new(store, hunter),
        }
    }

    /// Conecta ao Postgres, roda as migrações e monta o gráfico de dependências.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let db_pool = connect_pool(&config.database_url).await?;

        sqlx::migrate!()
            .run(&db_pool)
            .await
            .context("Falha ao rodar as migrações do banco de dados")?;
        tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

        let store: Arc<dyn LeadStore> = Arc::new(PgLeadRepository::new(db_pool));
        let hunter = HunterClient::new(config.hunter_base_url.clone(), config.hunter_api_key.clone())?;

        Ok(Self::new(store, hunter))
    }
}

async fn connect_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await
        .context("Falha ao conectar ao banco de dados")?;

    tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
    Ok(db_pool)
}
