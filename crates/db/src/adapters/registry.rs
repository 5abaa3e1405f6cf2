use async_trait::async_trait;
use msp_core::types::ClientId;
use msp_monitor::{ClientRegistry, RegistryError};
use sqlx::PgPool;

use crate::repositories::ClientRepo;

/// Client registry over the `clients` table. Only active clients are
/// monitorable.
#[derive(Clone)]
pub struct PgClientRegistry {
    pool: PgPool,
}

impl PgClientRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientRegistry for PgClientRegistry {
    async fn exists(&self, client_id: &str) -> Result<bool, RegistryError> {
        ClientRepo::exists_active(&self.pool, client_id)
            .await
            .map_err(|e| RegistryError::Unavailable(e.to_string()))
    }

    async fn list_targets(&self) -> Result<Vec<ClientId>, RegistryError> {
        ClientRepo::list_active_ids(&self.pool)
            .await
            .map_err(|e| RegistryError::Unavailable(e.to_string()))
    }
}
