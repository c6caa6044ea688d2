use chrono::Duration;
use rand::Rng;
use rust_decimal::Decimal;
use school_fees_api::{FeeStatus, FeeType, Semester};
use school_fees_db::models::fee::FeeModel;
use school_fees_db::{Clock, SystemClock};
use uuid::Uuid;

/// A pending tuition fee, due in a month, with database-precision timestamps
pub fn create_test_fee(student_id: Uuid, amount: Decimal) -> FeeModel {
    let now = SystemClock.now();
    FeeModel {
        id: Uuid::new_v4(),
        student_id,
        fee_type: FeeType::Tuition,
        amount,
        paid_amount: Decimal::ZERO,
        due_date: now.date_naive() + Duration::days(30),
        status: FeeStatus::Pending,
        payment_method: None,
        transaction_id: None,
        payment_date: None,
        academic_year: "2026-2027".try_into().unwrap(),
        semester: Semester::Fall,
        description: Some("Test fee".try_into().unwrap()),
        created_by: Uuid::new_v4(),
        payment_history: Vec::new(),
        created_at: now,
        updated_at: now,
        antecedent_hash: 0,
        antecedent_audit_log_id: Uuid::nil(),
        hash: 0,
        audit_log_id: None,
    }
}

/// Amount with two decimal places in `[1.00, max]`
pub fn random_test_amount(max: i64) -> Decimal {
    Decimal::new(rand::thread_rng().gen_range(100..=max * 100), 2)
}
