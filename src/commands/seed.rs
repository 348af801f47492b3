//! Seed command - Demo catalog and bootstrap accounts.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::cli::args::{SeedArgs, SeedTarget};
use crate::config::{Config, DEFAULT_SERVICE_IMAGE};
use crate::domain::{NewService, Password, ServiceType, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, NewUser, Persistence, UnitOfWork};
use crate::services::{ServiceContainer, Services};

/// Demo catalog shipped with the binary
const BUNDLED_CATALOG: &str = include_str!("../../seeds/services.json");

/// Catalog entry as written in a seed file
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedService {
    name: String,
    description: String,
    price: Decimal,
    service_type: String,
    provider: String,
    duration: i32,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    rating: f64,
    #[serde(default)]
    review_count: i32,
    #[serde(default = "available_by_default")]
    available: bool,
}

fn available_by_default() -> bool {
    true
}

/// Parse a seed file. Entries with an unknown category are skipped.
fn parse_catalog(json: &str) -> AppResult<Vec<NewService>> {
    let entries: Vec<SeedService> = serde_json::from_str(json)
        .map_err(|e| AppError::bad_request(format!("Invalid seed file: {}", e)))?;

    let services = entries
        .into_iter()
        .filter_map(|entry| match entry.service_type.parse::<ServiceType>() {
            Ok(service_type) => Some(NewService {
                name: entry.name,
                description: entry.description,
                price: entry.price,
                service_type,
                provider: entry.provider,
                duration: entry.duration,
                image: entry
                    .image
                    .unwrap_or_else(|| DEFAULT_SERVICE_IMAGE.to_string()),
                rating: entry.rating,
                review_count: entry.review_count,
                available: entry.available,
            }),
            Err(_) => {
                tracing::warn!(
                    name = %entry.name,
                    service_type = %entry.service_type,
                    "Skipping entry with unknown category"
                );
                None
            }
        })
        .collect();

    Ok(services)
}

async fn read_catalog(file: Option<&Path>) -> AppResult<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::internal(format!("Failed to read {}: {}", path.display(), e))
        }),
        None => Ok(BUNDLED_CATALOG.to_string()),
    }
}

/// Execute the seed command
pub async fn execute(args: SeedArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;

    match args.target {
        SeedTarget::Services { file, keep } => {
            let services = parse_catalog(&read_catalog(file.as_deref()).await?)?;
            let container = Services::from_connection(db.get_connection(), config);

            let count = container.catalog().import(services, !keep).await?;
            tracing::info!(count, replaced = !keep, "Catalog seeded");
        }
        SeedTarget::User {
            email,
            password,
            name,
            admin,
        } => {
            let users = Persistence::new(db.get_connection()).users();
            if users.find_by_email(&email).await?.is_some() {
                tracing::info!(%email, "User already exists, nothing to do");
                return Ok(());
            }

            let role = if admin { UserRole::Admin } else { UserRole::User };
            let user = users
                .create(NewUser {
                    name,
                    email,
                    password_hash: Password::new(&password)?.into_string(),
                    role,
                })
                .await?;
            tracing::info!(user_id = %user.id, %role, "User seeded");
        }
    }

    Ok(())
}
