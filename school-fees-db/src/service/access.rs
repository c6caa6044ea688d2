use std::sync::Arc;

use school_fees_api::{ApiError, ApiResult, Caller, Role};
use uuid::Uuid;

use crate::models::fee::FeeModel;
use crate::repository::identity_directory::IdentityDirectory;

/// Who may see or change which fees.
///
/// Admin, Teacher and ExamCell callers see every fee, students see their own
/// and parents see their children's. Only admins create, edit, delete or
/// aggregate fees.
#[derive(Clone)]
pub struct AccessPolicy {
    identities: Arc<dyn IdentityDirectory>,
}

impl AccessPolicy {
    pub fn new(identities: Arc<dyn IdentityDirectory>) -> Self {
        Self { identities }
    }

    pub fn require_admin(&self, caller: &Caller, action: &str) -> ApiResult<()> {
        if caller.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Unauthorized(format!("Not authorized to {action}")))
        }
    }

    /// Students the caller is limited to, or `None` when unrestricted
    pub async fn visible_students(&self, caller: &Caller) -> ApiResult<Option<Vec<Uuid>>> {
        match caller.role {
            Role::Student => Ok(Some(vec![caller.id])),
            Role::Parent => {
                let children = self
                    .identities
                    .find_user(caller.id)
                    .await?
                    .map(|user| user.children)
                    .unwrap_or_default();
                Ok(Some(children))
            }
            Role::Admin | Role::Teacher | Role::ExamCell => Ok(None),
        }
    }

    pub async fn authorize_student(
        &self,
        caller: &Caller,
        student_id: Uuid,
        action: &str,
    ) -> ApiResult<()> {
        match self.visible_students(caller).await? {
            Some(students) if !students.contains(&student_id) => {
                Err(ApiError::Unauthorized(format!("Not authorized to {action}")))
            }
            _ => Ok(()),
        }
    }

    pub async fn authorize_fee(&self, caller: &Caller, fee: &FeeModel, action: &str) -> ApiResult<()> {
        self.authorize_student(caller, fee.student_id, action).await
    }

    /// A fee may only be billed to an existing user with the student role.
    pub async fn require_student_identity(&self, student_id: Uuid) -> ApiResult<()> {
        match self.identities.find_user(student_id).await? {
            Some(user) if user.role == Role::Student => Ok(()),
            _ => Err(ApiError::ValidationError("Student not found".to_string())),
        }
    }
}
