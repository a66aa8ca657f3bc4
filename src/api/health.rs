use poem_openapi::{OpenApi, Tags, payload::Json};
use sea_orm::DatabaseConnection;
use chrono::Utc;

use crate::types::dto::common::HealthResponse;

/// Health check API
pub struct HealthApi {
    db: DatabaseConnection,
}

impl HealthApi {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// API tags for health endpoints
#[derive(Tags)]
enum ApiTags {
    /// Health check endpoints
    Health,
}

#[OpenApi]
impl HealthApi {
    /// Health check endpoint
    ///
    /// Reports `degraded` when the main database does not answer a ping.
    #[oai(path = "/health", method = "get", tag = "ApiTags::Health")]
    async fn health(&self) -> Json<HealthResponse> {
        let status = match self.db.ping().await {
            Ok(()) => "healthy",
            Err(e) => {
                tracing::warn!("Database ping failed: {}", e);
                "degraded"
            }
        };
        Json(HealthResponse {
            status: status.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::setup_test_db;

    #[tokio::test]
    async fn test_health_reports_healthy_database() {
        let api = HealthApi::new(setup_test_db().await);
        assert_eq!(api.health().await.status, "healthy");
    }
}
