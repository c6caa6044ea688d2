use chrono::NaiveDate;
use heapless::String as HeaplessString;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::fee_enums::{FeeStatus, FeeType, PaymentMethod, Semester};
use crate::error::{ApiError, ApiResult};

const PAYMENT_METHOD_HINT: &str =
    "Valid payment method is required (cash, online, cheque, bank_transfer)";

/// Bytes a UTF-8 character can take. Text buffers hold `N` bytes, which is
/// `N / UTF8_MAX_CHAR_LEN` characters whatever the script.
const UTF8_MAX_CHAR_LEN: usize = 4;

fn bounded<const N: usize>(field: &str, value: &str) -> ApiResult<HeaplessString<N>> {
    let max_chars = N / UTF8_MAX_CHAR_LEN;
    let too_long =
        || ApiError::ValidationError(format!("{field} cannot exceed {max_chars} characters"));
    if value.chars().count() > max_chars {
        return Err(too_long());
    }
    HeaplessString::try_from(value).map_err(|_| too_long())
}

fn bounded_opt<const N: usize>(
    field: &str,
    value: Option<&str>,
) -> ApiResult<Option<HeaplessString<N>>> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| bounded(field, v.trim()))
        .transpose()
}

fn parse_student_id(value: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|_| ApiError::ValidationError("Valid student ID is required".to_string()))
}

fn parse_fee_type(value: &str) -> ApiResult<FeeType> {
    value.parse().map_err(|_| {
        ApiError::ValidationError(format!(
            "Invalid fee type '{value}' (tuition, library, lab, sports, transport, hostel, other)"
        ))
    })
}

fn parse_semester(value: &str) -> ApiResult<Semester> {
    value.parse().map_err(|_| {
        ApiError::ValidationError(format!("Invalid semester '{value}' (Fall, Spring, Summer)"))
    })
}

fn parse_status(value: &str) -> ApiResult<FeeStatus> {
    value.parse().map_err(|_| {
        ApiError::ValidationError(format!(
            "Invalid fee status '{value}' (pending, partial, paid, overdue)"
        ))
    })
}

fn non_negative(field: &str, value: Decimal) -> ApiResult<Decimal> {
    if value < Decimal::ZERO {
        return Err(ApiError::ValidationError(format!("{field} cannot be negative")));
    }
    Ok(value)
}

/// Body of a fee creation request as received from the HTTP layer
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeeRequest {
    #[validate(length(min = 1, max = 64))]
    pub student: String,
    #[validate(length(min = 1, max = 20))]
    pub fee_type: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    #[validate(length(min = 1, max = 20))]
    pub academic_year: String,
    pub semester: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Validated fee creation command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFee {
    pub student_id: Uuid,
    pub fee_type: FeeType,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub academic_year: HeaplessString<80>,
    pub semester: Semester,
    pub description: Option<HeaplessString<2000>>,
}

impl CreateFeeRequest {
    pub fn into_new_fee(self) -> ApiResult<NewFee> {
        self.validate()?;
        Ok(NewFee {
            student_id: parse_student_id(&self.student)?,
            fee_type: parse_fee_type(&self.fee_type)?,
            amount: non_negative("Amount", self.amount)?,
            due_date: self.due_date,
            academic_year: bounded("Academic year", self.academic_year.trim())?,
            semester: self
                .semester
                .as_deref()
                .map(parse_semester)
                .transpose()?
                .unwrap_or_default(),
            description: bounded_opt("Description", self.description.as_deref())?,
        })
    }
}

/// Administrative override of a fee record. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeeRequest {
    pub fee_type: Option<String>,
    pub amount: Option<Decimal>,
    pub paid_amount: Option<Decimal>,
    pub due_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 20))]
    pub academic_year: Option<String>,
    pub semester: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeeUpdate {
    pub fee_type: Option<FeeType>,
    pub amount: Option<Decimal>,
    pub paid_amount: Option<Decimal>,
    pub due_date: Option<NaiveDate>,
    pub academic_year: Option<HeaplessString<80>>,
    pub semester: Option<Semester>,
    pub description: Option<HeaplessString<2000>>,
}

impl UpdateFeeRequest {
    pub fn into_fee_update(self) -> ApiResult<FeeUpdate> {
        self.validate()?;
        Ok(FeeUpdate {
            fee_type: self.fee_type.as_deref().map(parse_fee_type).transpose()?,
            amount: self.amount.map(|a| non_negative("Amount", a)).transpose()?,
            paid_amount: self
                .paid_amount
                .map(|a| non_negative("Paid amount", a))
                .transpose()?,
            due_date: self.due_date,
            academic_year: bounded_opt("Academic year", self.academic_year.as_deref())?,
            semester: self.semester.as_deref().map(parse_semester).transpose()?,
            description: bounded_opt("Description", self.description.as_deref())?,
        })
    }
}

/// Body of a payment submission
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub amount: Option<Decimal>,
    pub payment_method: Option<String>,
    #[validate(length(max = 100))]
    pub transaction_id: Option<String>,
    #[validate(length(max = 50))]
    pub receipt_number: Option<String>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// A validated payment. `amount == None` settles the outstanding balance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentInstruction {
    pub amount: Option<Decimal>,
    pub method: PaymentMethod,
    pub transaction_id: Option<HeaplessString<400>>,
    pub receipt_number: Option<HeaplessString<200>>,
    pub notes: Option<HeaplessString<2000>>,
}

impl PaymentRequest {
    pub fn into_instruction(self) -> ApiResult<PaymentInstruction> {
        self.validate()?;
        let method = self
            .payment_method
            .as_deref()
            .and_then(|m| m.parse::<PaymentMethod>().ok())
            .ok_or_else(|| ApiError::ValidationError(PAYMENT_METHOD_HINT.to_string()))?;

        if let Some(amount) = self.amount {
            if amount <= Decimal::ZERO {
                return Err(ApiError::ValidationError(
                    "Payment amount must be greater than 0".to_string(),
                ));
            }
        }

        Ok(PaymentInstruction {
            amount: self.amount,
            method,
            transaction_id: bounded_opt("Transaction id", self.transaction_id.as_deref())?,
            receipt_number: bounded_opt("Receipt number", self.receipt_number.as_deref())?,
            notes: bounded_opt("Notes", self.notes.as_deref())?,
        })
    }
}

/// Query string of the fee listing endpoint
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FeeQuery {
    pub student_id: Option<String>,
    pub status: Option<String>,
    pub fee_type: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub academic_year: Option<String>,
    pub semester: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeeCriteria {
    pub student_id: Option<Uuid>,
    pub status: Option<FeeStatus>,
    pub fee_type: Option<FeeType>,
    pub academic_year: Option<HeaplessString<80>>,
    pub semester: Option<Semester>,
}

impl FeeQuery {
    pub fn into_criteria(self) -> ApiResult<FeeCriteria> {
        self.validate()?;
        Ok(FeeCriteria {
            student_id: self.student_id.as_deref().map(parse_student_id).transpose()?,
            status: self.status.as_deref().map(parse_status).transpose()?,
            fee_type: self.fee_type.as_deref().map(parse_fee_type).transpose()?,
            academic_year: bounded_opt("Academic year", self.academic_year.as_deref())?,
            semester: self.semester.as_deref().map(parse_semester).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateFeeRequest {
        CreateFeeRequest {
            student: Uuid::new_v4().to_string(),
            fee_type: "tuition".to_string(),
            amount: Decimal::from(1500),
            due_date: NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(),
            academic_year: "2026-2027".to_string(),
            semester: None,
            description: Some("Fall tuition".to_string()),
        }
    }

    #[test]
    fn test_create_request_defaults_semester() {
        let new_fee = create_request().into_new_fee().unwrap();
        assert_eq!(new_fee.semester, Semester::Fall);
        assert_eq!(new_fee.fee_type, FeeType::Tuition);
        assert_eq!(new_fee.academic_year.as_str(), "2026-2027");
    }

    #[test]
    fn test_create_request_rejects_malformed_student_id() {
        let mut request = create_request();
        request.student = "65a1f0c2e4b0a1b2c3d4e5f6".to_string();
        assert_eq!(
            request.into_new_fee(),
            Err(ApiError::ValidationError("Valid student ID is required".to_string()))
        );
    }

    #[test]
    fn test_create_request_rejects_negative_amount() {
        let mut request = create_request();
        request.amount = Decimal::from(-1);
        assert!(matches!(request.into_new_fee(), Err(ApiError::ValidationError(_))));
    }

    #[test]
    fn test_create_request_rejects_unknown_fee_type() {
        let mut request = create_request();
        request.fee_type = "parking".to_string();
        assert!(matches!(request.into_new_fee(), Err(ApiError::ValidationError(_))));
    }

    #[test]
    fn test_create_request_rejects_long_description() {
        let mut request = create_request();
        request.description = Some("x".repeat(501));
        assert!(matches!(request.into_new_fee(), Err(ApiError::ValidationError(_))));
    }

    #[test]
    fn test_text_limits_count_characters_not_bytes() {
        let mut request = create_request();
        request.description = Some("क".repeat(500));
        let new_fee = request.clone().into_new_fee().unwrap();
        assert_eq!(new_fee.description.unwrap().chars().count(), 500);

        request.description = Some("क".repeat(501));
        assert!(matches!(request.into_new_fee(), Err(ApiError::ValidationError(_))));

        let update = UpdateFeeRequest {
            description: Some("ह".repeat(300)),
            ..Default::default()
        };
        assert_eq!(
            update.into_fee_update().unwrap().description.map(|d| d.len()),
            Some(900)
        );

        let payment = PaymentRequest {
            payment_method: Some("cash".to_string()),
            receipt_number: Some("€".repeat(50)),
            notes: Some("ü".repeat(500)),
            ..Default::default()
        };
        let instruction = payment.into_instruction().unwrap();
        assert_eq!(instruction.receipt_number.unwrap().chars().count(), 50);
        assert_eq!(instruction.notes.unwrap().chars().count(), 500);
    }

    #[test]
    fn test_payment_request_requires_known_method() {
        let request = PaymentRequest {
            amount: Some(Decimal::from(10)),
            payment_method: Some("card".to_string()),
            ..Default::default()
        };
        assert_eq!(
            request.into_instruction(),
            Err(ApiError::ValidationError(PAYMENT_METHOD_HINT.to_string()))
        );

        let missing = PaymentRequest {
            amount: Some(Decimal::from(10)),
            ..Default::default()
        };
        assert!(missing.into_instruction().is_err());
    }

    #[test]
    fn test_payment_request_rejects_non_positive_amount() {
        for amount in [Decimal::ZERO, Decimal::from(-5)] {
            let request = PaymentRequest {
                amount: Some(amount),
                payment_method: Some("cash".to_string()),
                ..Default::default()
            };
            assert!(matches!(
                request.into_instruction(),
                Err(ApiError::ValidationError(_))
            ));
        }
    }

    #[test]
    fn test_payment_request_drops_blank_optionals() {
        let request = PaymentRequest {
            amount: None,
            payment_method: Some("bank_transfer".to_string()),
            transaction_id: Some("  ".to_string()),
            receipt_number: Some("R-001".to_string()),
            notes: None,
        };
        let instruction = request.into_instruction().unwrap();
        assert_eq!(instruction.method, PaymentMethod::BankTransfer);
        assert!(instruction.transaction_id.is_none());
        assert_eq!(instruction.receipt_number.unwrap().as_str(), "R-001");
    }

    #[test]
    fn test_payment_request_deserializes_camel_case() {
        let request: PaymentRequest = serde_json::from_str(
            r#"{"amount":"50","paymentMethod":"online","transactionId":"TX-1"}"#,
        )
        .unwrap();
        let instruction = request.into_instruction().unwrap();
        assert_eq!(instruction.amount, Some(Decimal::from(50)));
        assert_eq!(instruction.transaction_id.unwrap().as_str(), "TX-1");
    }

    #[test]
    fn test_fee_query_parses_filters() {
        let query = FeeQuery {
            status: Some("overdue".to_string()),
            semester: Some("Spring".to_string()),
            ..Default::default()
        };
        let criteria = query.into_criteria().unwrap();
        assert_eq!(criteria.status, Some(FeeStatus::Overdue));
        assert_eq!(criteria.semester, Some(Semester::Spring));
        assert!(criteria.student_id.is_none());

        let bad = FeeQuery {
            status: Some("late".to_string()),
            ..Default::default()
        };
        assert!(bad.into_criteria().is_err());
    }
}
