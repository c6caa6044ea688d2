//! In-memory stand-ins for the storage and identity collaborators.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use parking_lot::{Mutex, RwLock};
use rand::Rng;
use rust_decimal::Decimal;
use school_fees_api::{FeeStatus, FeeType, Semester};
use sqlx::Postgres;
use uuid::Uuid;

use crate::ledger::FeeLedger;
use crate::models::audit::AuditLogModel;
use crate::models::fee::{FeeModel, FeeStatistics};
use crate::models::identity::UserRef;
use crate::repository::{
    AuditLogRepository, CreateBatch, DeleteBatch, ExistByIds, FeeFilter, FeeRepository,
    IdentityDirectory, Load, LoadBatch, Page, PageRequest, RepositoryError, UpdateBatch,
};
use crate::service::{EventResult, FeeEventSink};

/// The date the service tests run on
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()
}

fn test_now() -> DateTime<Utc> {
    test_today().and_hms_opt(12, 0, 0).unwrap().and_utc()
}

/// A pending tuition fee due two months after [`test_today`]
pub fn create_test_fee(student_id: Uuid, amount: Decimal) -> FeeModel {
    FeeModel {
        id: Uuid::new_v4(),
        student_id,
        fee_type: FeeType::Tuition,
        amount,
        paid_amount: Decimal::ZERO,
        due_date: test_today() + Duration::days(60),
        status: FeeStatus::Pending,
        payment_method: None,
        transaction_id: None,
        payment_date: None,
        academic_year: "2026-2027".try_into().unwrap(),
        semester: Semester::Fall,
        description: None,
        created_by: Uuid::new_v4(),
        payment_history: Vec::new(),
        created_at: test_now(),
        updated_at: test_now(),
        antecedent_hash: 0,
        antecedent_audit_log_id: Uuid::nil(),
        hash: 0,
        audit_log_id: None,
    }
}

/// Random amount in `[0.01, max]` with two decimal places
pub fn random_amount(max: i64) -> Decimal {
    let cents = rand::thread_rng().gen_range(1..=max * 100);
    Decimal::new(cents, 2)
}

type Interleave = Box<dyn FnOnce(&mut FeeModel) + Send>;

/// Fee store with the same guard semantics as the Postgres repository.
///
/// An update is rejected with `Conflict` unless the stored hash still equals
/// the hash the item was read with.
#[derive(Default)]
pub struct InMemoryFeeRepository {
    fees: RwLock<HashMap<Uuid, FeeModel>>,
    interleave: Mutex<Option<Interleave>>,
}

impl InMemoryFeeRepository {
    pub fn len(&self) -> usize {
        self.fees.read().len()
    }

    /// Runs `write` against the stored fee on the next update, as if another
    /// writer committed between our read and our write.
    pub fn interleave_once<F>(&self, write: F)
    where
        F: FnOnce(&mut FeeModel) + Send + 'static,
    {
        *self.interleave.lock() = Some(Box::new(write));
    }

    fn sorted(mut fees: Vec<FeeModel>) -> Vec<FeeModel> {
        fees.sort_by(|a, b| a.due_date.cmp(&b.due_date).then(a.created_at.cmp(&b.created_at)));
        fees
    }

    fn select<P: Fn(&FeeModel) -> bool>(&self, predicate: P) -> Vec<FeeModel> {
        let fees = self.fees.read();
        Self::sorted(fees.values().filter(|f| predicate(f)).cloned().collect())
    }
}

#[async_trait]
impl Load<Postgres, FeeModel> for InMemoryFeeRepository {
    async fn load(&self, id: Uuid) -> Result<FeeModel, RepositoryError> {
        let found = self.fees.read().get(&id).cloned();
        found.ok_or(RepositoryError::NotFound(id))
    }
}

#[async_trait]
impl LoadBatch<Postgres, FeeModel> for InMemoryFeeRepository {
    async fn load_batch(&self, ids: &[Uuid]) -> Result<Vec<Option<FeeModel>>, RepositoryError> {
        let fees = self.fees.read();
        Ok(ids.iter().map(|id| fees.get(id).cloned()).collect())
    }
}

#[async_trait]
impl CreateBatch<Postgres, FeeModel> for InMemoryFeeRepository {
    async fn create_batch(
        &self,
        items: Vec<FeeModel>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<FeeModel>, RepositoryError> {
        let audit_log_id = audit_log_id
            .ok_or_else(|| RepositoryError::Other("audit_log_id is required".to_string()))?;
        let mut saved = Vec::with_capacity(items.len());
        for mut item in items {
            item.seal_for_create(audit_log_id).map_err(RepositoryError::Hashing)?;
            saved.push(item);
        }
        let mut fees = self.fees.write();
        for item in &saved {
            fees.insert(item.id, item.clone());
        }
        Ok(saved)
    }
}

#[async_trait]
impl UpdateBatch<Postgres, FeeModel> for InMemoryFeeRepository {
    async fn update_batch(
        &self,
        items: Vec<FeeModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<FeeModel>, RepositoryError> {
        let interleave = self.interleave.lock().take();
        let mut fees = self.fees.write();

        if let Some(write) = interleave {
            if let Some(stored) = items.first().and_then(|item| fees.get_mut(&item.id)) {
                write(stored);
                stored.seal_for_update(Uuid::new_v4()).map_err(RepositoryError::Hashing)?;
            }
        }

        let mut updated = Vec::with_capacity(items.len());
        for mut item in items {
            let stored = fees.get(&item.id).ok_or(RepositoryError::NotFound(item.id))?;
            if stored.hash != item.hash {
                return Err(RepositoryError::Conflict { id: item.id });
            }
            item.seal_for_update(audit_log_id).map_err(RepositoryError::Hashing)?;
            updated.push(item);
        }
        for item in &updated {
            fees.insert(item.id, item.clone());
        }
        Ok(updated)
    }
}

#[async_trait]
impl DeleteBatch<Postgres> for InMemoryFeeRepository {
    async fn delete_batch(
        &self,
        ids: &[Uuid],
        _audit_log_id: Option<Uuid>,
    ) -> Result<usize, RepositoryError> {
        let mut fees = self.fees.write();
        Ok(ids.iter().filter(|id| fees.remove(id).is_some()).count())
    }
}

#[async_trait]
impl ExistByIds<Postgres> for InMemoryFeeRepository {
    async fn exist_by_ids(&self, ids: &[Uuid]) -> Result<Vec<(Uuid, bool)>, RepositoryError> {
        let fees = self.fees.read();
        Ok(ids.iter().map(|id| (*id, fees.contains_key(id))).collect())
    }
}

#[async_trait]
impl FeeRepository<Postgres> for InMemoryFeeRepository {
    async fn find_by_filter(
        &self,
        filter: &FeeFilter,
        page: PageRequest,
    ) -> Result<Page<FeeModel>, RepositoryError> {
        Ok(Page::from_sorted(self.select(|f| filter.matches(f)), page))
    }

    async fn find_by_student(&self, student_id: Uuid) -> Result<Vec<FeeModel>, RepositoryError> {
        Ok(self.select(|f| f.student_id == student_id))
    }

    async fn find_overdue(&self, today: NaiveDate) -> Result<Vec<FeeModel>, RepositoryError> {
        Ok(self.select(|f| FeeLedger::is_overdue_candidate(f, today)))
    }

    async fn statistics(
        &self,
        academic_year: Option<&str>,
        semester: Option<Semester>,
    ) -> Result<FeeStatistics, RepositoryError> {
        let fees = self.select(|f| {
            academic_year.is_none_or(|y| f.academic_year.as_str() == y)
                && semester.is_none_or(|s| f.semester == s)
        });
        FeeStatistics::from_fees(&fees).ok_or_else(|| {
            RepositoryError::Other("Fee statistics exceed the decimal range".to_string())
        })
    }
}

#[derive(Default)]
pub struct InMemoryAuditLogRepository {
    logs: RwLock<HashMap<Uuid, AuditLogModel>>,
}

impl InMemoryAuditLogRepository {
    pub fn count(&self) -> usize {
        self.logs.read().len()
    }
}

#[async_trait]
impl LoadBatch<Postgres, AuditLogModel> for InMemoryAuditLogRepository {
    async fn load_batch(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<Option<AuditLogModel>>, RepositoryError> {
        let logs = self.logs.read();
        Ok(ids.iter().map(|id| logs.get(id).cloned()).collect())
    }
}

#[async_trait]
impl AuditLogRepository<Postgres> for InMemoryAuditLogRepository {
    async fn create(&self, audit_log: &AuditLogModel) -> Result<AuditLogModel, RepositoryError> {
        self.logs.write().insert(audit_log.id, audit_log.clone());
        Ok(audit_log.clone())
    }
}

#[derive(Default)]
pub struct InMemoryIdentityDirectory {
    users: HashMap<Uuid, UserRef>,
}

impl InMemoryIdentityDirectory {
    pub fn with_users(users: Vec<UserRef>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
        }
    }
}

#[async_trait]
impl IdentityDirectory for InMemoryIdentityDirectory {
    async fn find_user(&self, id: Uuid) -> Result<Option<UserRef>, RepositoryError> {
        Ok(self.users.get(&id).cloned())
    }
}

#[derive(Default)]
pub struct RecordingEventSink {
    created: Mutex<Vec<Uuid>>,
    payments: Mutex<Vec<(Uuid, Decimal)>>,
    deleted: Mutex<Vec<Uuid>>,
}

impl RecordingEventSink {
    pub fn created(&self) -> Vec<Uuid> {
        self.created.lock().clone()
    }

    pub fn payments(&self) -> Vec<(Uuid, Decimal)> {
        self.payments.lock().clone()
    }

    pub fn deleted(&self) -> Vec<Uuid> {
        self.deleted.lock().clone()
    }
}

#[async_trait]
impl FeeEventSink for RecordingEventSink {
    async fn fee_created(&self, fee: &FeeModel) -> EventResult {
        self.created.lock().push(fee.id);
        Ok(())
    }

    async fn payment_applied(&self, fee: &FeeModel, amount: Decimal) -> EventResult {
        self.payments.lock().push((fee.id, amount));
        Ok(())
    }

    async fn fee_deleted(&self, fee_id: Uuid) -> EventResult {
        self.deleted.lock().push(fee_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok, block_on};

    #[test]
    fn test_update_guard_rejects_stale_hash() {
        let repo = InMemoryFeeRepository::default();
        let fee = create_test_fee(Uuid::new_v4(), Decimal::from(100));

        let created = assert_ok!(block_on(repo.create_batch(vec![fee], Some(Uuid::new_v4()))));
        let read = created[0].clone();

        let mut first = read.clone();
        first.paid_amount = Decimal::from(10);
        assert_ok!(block_on(repo.update_batch(vec![first], Uuid::new_v4())));

        let mut stale = read;
        stale.paid_amount = Decimal::from(20);
        let err = assert_err!(block_on(repo.update_batch(vec![stale], Uuid::new_v4())));
        assert!(err.is_conflict());
    }

    #[test]
    fn test_random_amount_bounds() {
        for _ in 0..100 {
            let amount = random_amount(5);
            assert!(amount > Decimal::ZERO && amount <= Decimal::from(5));
        }
    }
}
