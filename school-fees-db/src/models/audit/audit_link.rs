use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::AuditEntityType;

/// # Documentation
/// - This struct is used to track all entities modified in a single transaction.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLinkModel {
    pub audit_log_id: Uuid,
    pub entity_id: Uuid,
    pub entity_type: AuditEntityType,
}
