use school_fees_api::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::identifiable::Identifiable;

/// Projection of a user as resolved by the identity service.
///
/// `children` is only populated for parents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: Uuid,
    pub role: Role,
    pub children: Vec<Uuid>,
}

impl UserRef {
    pub fn student(id: Uuid) -> Self {
        Self { id, role: Role::Student, children: Vec::new() }
    }

    pub fn parent_of(id: Uuid, children: Vec<Uuid>) -> Self {
        Self { id, role: Role::Parent, children }
    }

    pub fn is_parent_of(&self, student_id: Uuid) -> bool {
        self.role == Role::Parent && self.children.contains(&student_id)
    }
}

impl Identifiable for UserRef {
    fn get_id(&self) -> Uuid {
        self.id
    }
}
