use async_trait::async_trait;
use chrono::NaiveDate;
use heapless::String as HeaplessString;
use school_fees_api::{FeeCriteria, FeeStatus, FeeType, Semester};
use sqlx::Database;
use uuid::Uuid;

use crate::models::fee::{FeeModel, FeeStatistics};
use crate::repository::create_batch::CreateBatch;
use crate::repository::delete_batch::DeleteBatch;
use crate::repository::exist_by_ids::ExistByIds;
use crate::repository::load::Load;
use crate::repository::load_batch::LoadBatch;
use crate::repository::pagination::{Page, PageRequest};
use crate::repository::repository_error::RepositoryError;
use crate::repository::update_batch::UpdateBatch;

/// Conjunction of optional predicates over the fee table.
///
/// `student_ids` restricts the result to the given students; `Some(vec![])`
/// matches nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeeFilter {
    pub student_ids: Option<Vec<Uuid>>,
    pub status: Option<FeeStatus>,
    pub fee_type: Option<FeeType>,
    pub academic_year: Option<HeaplessString<80>>,
    pub semester: Option<Semester>,
}

impl FeeFilter {
    /// Combines the caller's visibility scope with the requested criteria.
    ///
    /// A requested student outside the scope yields an empty scope rather than
    /// widening it.
    pub fn scoped(criteria: FeeCriteria, visible_students: Option<Vec<Uuid>>) -> Self {
        let student_ids = match (visible_students, criteria.student_id) {
            (None, None) => None,
            (None, Some(requested)) => Some(vec![requested]),
            (Some(visible), None) => Some(visible),
            (Some(visible), Some(requested)) => Some(
                visible
                    .into_iter()
                    .filter(|id| *id == requested)
                    .collect(),
            ),
        };
        Self {
            student_ids,
            status: criteria.status,
            fee_type: criteria.fee_type,
            academic_year: criteria.academic_year,
            semester: criteria.semester,
        }
    }

    pub fn matches(&self, fee: &FeeModel) -> bool {
        self.student_ids
            .as_ref()
            .is_none_or(|ids| ids.contains(&fee.student_id))
            && self.status.is_none_or(|s| fee.status == s)
            && self.fee_type.is_none_or(|t| fee.fee_type == t)
            && self
                .academic_year
                .as_ref()
                .is_none_or(|y| fee.academic_year == *y)
            && self.semester.is_none_or(|s| fee.semester == s)
    }
}

/// Storage of fee obligations and their payment ledgers
#[async_trait]
pub trait FeeRepository<DB: Database>:
    Load<DB, FeeModel>
    + LoadBatch<DB, FeeModel>
    + CreateBatch<DB, FeeModel>
    + UpdateBatch<DB, FeeModel>
    + DeleteBatch<DB>
    + ExistByIds<DB>
{
    /// Fees matching the filter, ordered by due date ascending
    async fn find_by_filter(
        &self,
        filter: &FeeFilter,
        page: PageRequest,
    ) -> Result<Page<FeeModel>, RepositoryError>;

    /// All fees of one student, ordered by due date ascending
    async fn find_by_student(&self, student_id: Uuid) -> Result<Vec<FeeModel>, RepositoryError>;

    /// Fees matching `FeeLedger::is_overdue_candidate` for the given date,
    /// ordered by due date ascending
    async fn find_overdue(&self, today: NaiveDate) -> Result<Vec<FeeModel>, RepositoryError>;

    /// Per-status aggregate over the fees of an academic year and/or semester
    async fn statistics(
        &self,
        academic_year: Option<&str>,
        semester: Option<Semester>,
    ) -> Result<FeeStatistics, RepositoryError>;
}
