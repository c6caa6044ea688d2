use std::sync::Arc;

use rust_decimal::Decimal;
use school_fees_api::{
    ApiError, ApiResult, Caller, CreateFeeRequest, FeeQuery, PaymentInstruction, PaymentRequest,
    Semester, UpdateFeeRequest,
};
use sqlx::Database;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::access::AccessPolicy;
use super::events::{FeeEventSink, NoopEventSink};
use super::policy::FeePolicy;
use crate::clock::{Clock, SystemClock};
use crate::ledger::{FeeLedger, PaymentDetails};
use crate::models::audit::AuditLogModel;
use crate::models::fee::{
    FeeModel, FeeReceipt, FeeStatistics, StudentFeeSummary, StudentPaymentEntry,
};
use crate::repository::{
    AuditLogRepository, FeeFilter, FeeRepository, IdentityDirectory, Page, PageRequest,
};

/// Entry point for every fee operation.
///
/// Checks the caller's permissions, runs the ledger and persists the result
/// together with an audit log. Each write is guarded by the hash the fee was
/// read with; see [`FeeService::process_payment`] for the conflict handling.
pub struct FeeService<DB: Database> {
    fees: Arc<dyn FeeRepository<DB>>,
    audit_logs: Arc<dyn AuditLogRepository<DB>>,
    access: AccessPolicy,
    events: Arc<dyn FeeEventSink>,
    clock: Arc<dyn Clock>,
    policy: FeePolicy,
}

impl<DB: Database> FeeService<DB> {
    pub fn new(
        fees: Arc<dyn FeeRepository<DB>>,
        audit_logs: Arc<dyn AuditLogRepository<DB>>,
        identities: Arc<dyn IdentityDirectory>,
    ) -> Self {
        Self {
            fees,
            audit_logs,
            access: AccessPolicy::new(identities),
            events: Arc::new(NoopEventSink),
            clock: Arc::new(SystemClock),
            policy: FeePolicy::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn FeeEventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn with_policy(mut self, policy: FeePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn create_fee(&self, caller: &Caller, request: CreateFeeRequest) -> ApiResult<FeeModel> {
        self.access.require_admin(caller, "create fees")?;
        let new_fee = request.into_new_fee()?;
        self.access.require_student_identity(new_fee.student_id).await?;

        let now = self.clock.now();
        let fee = FeeLedger::create(new_fee, caller.id, now);
        let audit_log = self.audit_logs.create(&AuditLogModel::new(caller.id, now)).await?;
        let fee = Self::single(self.fees.create_batch(vec![fee], Some(audit_log.id)).await?)?;

        info!(
            fee_id = %fee.id,
            student_id = %fee.student_id,
            amount = %fee.amount,
            status = %fee.status,
            "fee created"
        );
        if let Err(e) = self.events.fee_created(&fee).await {
            warn!(fee_id = %fee.id, error = %e, "fee_created notification failed");
        }
        Ok(fee)
    }

    pub async fn get_fee(&self, caller: &Caller, fee_id: Uuid) -> ApiResult<FeeModel> {
        let fee = self.fees.load(fee_id).await?;
        self.access.authorize_fee(caller, &fee, "view this fee").await?;
        Ok(fee)
    }

    /// Fees matching the query within the caller's scope, by due date ascending
    pub async fn list_fees(
        &self,
        caller: &Caller,
        query: FeeQuery,
        page: PageRequest,
    ) -> ApiResult<Page<FeeModel>> {
        let criteria = query.into_criteria()?;
        let visible = self.access.visible_students(caller).await?;
        let filter = FeeFilter::scoped(criteria, visible);
        if filter.student_ids.as_ref().is_some_and(|ids| ids.is_empty()) {
            return Ok(Page::empty(page));
        }
        Ok(self.fees.find_by_filter(&filter, page).await?)
    }

    pub async fn fees_by_student(&self, caller: &Caller, student_id: Uuid) -> ApiResult<Vec<FeeModel>> {
        self.access
            .authorize_student(caller, student_id, "view these fees")
            .await?;
        Ok(self.fees.find_by_student(student_id).await?)
    }

    /// Administrative overwrite. Bypasses the ledger, but the status is still
    /// re-derived before the save.
    pub async fn update_fee(
        &self,
        caller: &Caller,
        fee_id: Uuid,
        request: UpdateFeeRequest,
    ) -> ApiResult<FeeModel> {
        self.access.require_admin(caller, "update fees")?;
        let update = request.into_fee_update()?;

        let mut fee = self.fees.load(fee_id).await?;
        if update.paid_amount.is_some() {
            warn!(fee_id = %fee_id, "paid amount overwritten outside the ledger");
        }
        fee.apply_update(update);
        let fee = self.save(caller, fee, &mut None).await?;

        info!(fee_id = %fee.id, status = %fee.status, "fee updated");
        Ok(fee)
    }

    pub async fn delete_fee(&self, caller: &Caller, fee_id: Uuid) -> ApiResult<()> {
        self.access.require_admin(caller, "delete fees")?;
        let exists = self
            .fees
            .exist_by_ids(&[fee_id])
            .await?
            .into_iter()
            .any(|(id, exists)| id == fee_id && exists);
        if !exists {
            return Err(ApiError::NotFound(format!("Fee {fee_id} not found")));
        }

        let audit_log = self
            .audit_logs
            .create(&AuditLogModel::new(caller.id, self.clock.now()))
            .await?;
        self.fees.delete_batch(&[fee_id], Some(audit_log.id)).await?;

        info!(fee_id = %fee_id, "fee deleted");
        if let Err(e) = self.events.fee_deleted(fee_id).await {
            warn!(fee_id = %fee_id, error = %e, "fee_deleted notification failed");
        }
        Ok(())
    }

    /// Past-due unpaid fees within the caller's scope
    pub async fn overdue_fees(&self, caller: &Caller) -> ApiResult<Vec<FeeModel>> {
        let visible = self.access.visible_students(caller).await?;
        let fees = self.fees.find_overdue(self.clock.today()).await?;
        Ok(match visible {
            Some(students) => fees
                .into_iter()
                .filter(|fee| students.contains(&fee.student_id))
                .collect(),
            None => fees,
        })
    }

    /// Applies a payment to a fee.
    ///
    /// Without an amount, or with exactly the outstanding balance, the fee is
    /// settled in full. A smaller amount is recorded as a partial payment and
    /// a larger one is rejected as an overpayment.
    ///
    /// When the stored fee changed between read and write, the fee is read
    /// again and the payment is attempted once more on the fresh state. Both
    /// attempts share one audit log.
    pub async fn process_payment(
        &self,
        caller: &Caller,
        fee_id: Uuid,
        request: PaymentRequest,
    ) -> ApiResult<FeeModel> {
        let instruction = request.into_instruction()?;
        let mut audit_log_id = None;
        match self
            .try_process_payment(caller, fee_id, &instruction, &mut audit_log_id)
            .await
        {
            Err(ApiError::ConcurrencyConflict(id)) if self.policy.retry_on_conflict => {
                warn!(fee_id = %id, "fee changed concurrently, retrying payment on fresh state");
                self.try_process_payment(caller, fee_id, &instruction, &mut audit_log_id)
                    .await
            }
            result => result,
        }
    }

    async fn try_process_payment(
        &self,
        caller: &Caller,
        fee_id: Uuid,
        instruction: &PaymentInstruction,
        audit_log_id: &mut Option<Uuid>,
    ) -> ApiResult<FeeModel> {
        let mut fee = self.fees.load(fee_id).await?;
        self.access.authorize_fee(caller, &fee, "pay this fee").await?;

        let details = PaymentDetails::from(instruction);
        if self.policy.dedupe_transaction_ids {
            FeeLedger::ensure_new_transaction(&fee, &details).map_err(|e| e.for_fee(fee_id))?;
        }

        let now = self.clock.now();
        let remaining = FeeLedger::remaining_balance(&fee);
        let recorded = match instruction.amount {
            Some(amount) if amount != remaining => {
                FeeLedger::apply_payment(&mut fee, amount, details, now)
                    .map_err(|e| e.for_fee(fee_id))?;
                amount
            }
            _ => FeeLedger::mark_fully_paid(&mut fee, details, now).map_err(|e| e.for_fee(fee_id))?,
        };

        let fee = self.save(caller, fee, audit_log_id).await?;
        info!(
            fee_id = %fee.id,
            amount = %recorded,
            paid_amount = %fee.paid_amount,
            status = %fee.status,
            "payment applied"
        );
        if let Err(e) = self.events.payment_applied(&fee, recorded).await {
            warn!(fee_id = %fee.id, error = %e, "payment_applied notification failed");
        }
        Ok(fee)
    }

    pub async fn statistics(
        &self,
        caller: &Caller,
        academic_year: Option<&str>,
        semester: Option<Semester>,
    ) -> ApiResult<FeeStatistics> {
        self.access.require_admin(caller, "view fee statistics")?;
        Ok(self.fees.statistics(academic_year, semester).await?)
    }

    pub async fn receipt(&self, caller: &Caller, fee_id: Uuid) -> ApiResult<FeeReceipt> {
        let fee = self.get_fee(caller, fee_id).await?;
        Ok(FeeReceipt::for_fee(fee, self.clock.now()))
    }

    pub async fn student_summary(
        &self,
        caller: &Caller,
        student_id: Uuid,
    ) -> ApiResult<StudentFeeSummary> {
        let fees = self.fees_by_student(caller, student_id).await?;
        StudentFeeSummary::from_fees(student_id, fees).ok_or_else(|| {
            ApiError::InternalError(format!("Outstanding balance of student {student_id} exceeds the decimal range"))
        })
    }

    /// Every ledger entry of the student's fees, newest first
    pub async fn student_payment_history(
        &self,
        caller: &Caller,
        student_id: Uuid,
    ) -> ApiResult<Vec<StudentPaymentEntry>> {
        let fees = self.fees_by_student(caller, student_id).await?;
        Ok(StudentPaymentEntry::collect(&fees))
    }

    /// Normalizes and writes an existing fee.
    ///
    /// The audit log in `audit_log_id` is reused when set, otherwise one is
    /// created and stored there, so a retried write links to the same log.
    async fn save(
        &self,
        caller: &Caller,
        mut fee: FeeModel,
        audit_log_id: &mut Option<Uuid>,
    ) -> ApiResult<FeeModel> {
        let now = self.clock.now();
        FeeLedger::normalize(&mut fee, now.date_naive());
        fee.updated_at = now;

        let log_id = match *audit_log_id {
            Some(id) => id,
            None => {
                let audit_log = self.audit_logs.create(&AuditLogModel::new(caller.id, now)).await?;
                *audit_log_id = Some(audit_log.id);
                audit_log.id
            }
        };
        debug!(fee_id = %fee.id, audit_log_id = %log_id, "writing fee");
        Self::single(self.fees.update_batch(vec![fee], log_id).await?)
    }

    fn single(mut fees: Vec<FeeModel>) -> ApiResult<FeeModel> {
        fees.pop()
            .ok_or_else(|| ApiError::InternalError("Repository returned no fee".to_string()))
    }
}
