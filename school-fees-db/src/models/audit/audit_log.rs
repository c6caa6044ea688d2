use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::Identifiable;

/// # Documentation
/// - One audit log per write; every fee touched by the write references it.
/// - Created by the service on behalf of the caller before the entity is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AuditLogModel {
    pub id: Uuid,
    pub updated_at: DateTime<Utc>,
    pub updated_by_user_id: Uuid,
}

impl AuditLogModel {
    pub fn new(updated_by_user_id: Uuid, updated_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            updated_at,
            updated_by_user_id,
        }
    }
}

impl Identifiable for AuditLogModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}
