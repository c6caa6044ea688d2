use heapless::String as HeaplessString;
use school_fees_api::{PaymentInstruction, PaymentMethod};

/// Everything a ledger entry records besides its amount and date
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentDetails {
    pub method: PaymentMethod,
    pub transaction_id: Option<HeaplessString<400>>,
    pub receipt_number: Option<HeaplessString<200>>,
    pub notes: Option<HeaplessString<2000>>,
}

impl PaymentDetails {
    pub fn new(method: PaymentMethod) -> Self {
        Self {
            method,
            transaction_id: None,
            receipt_number: None,
            notes: None,
        }
    }

    pub fn with_transaction_id(mut self, transaction_id: HeaplessString<400>) -> Self {
        self.transaction_id = Some(transaction_id);
        self
    }

    pub fn with_receipt_number(mut self, receipt_number: HeaplessString<200>) -> Self {
        self.receipt_number = Some(receipt_number);
        self
    }
}

impl From<&PaymentInstruction> for PaymentDetails {
    fn from(instruction: &PaymentInstruction) -> Self {
        Self {
            method: instruction.method,
            transaction_id: instruction.transaction_id.clone(),
            receipt_number: instruction.receipt_number.clone(),
            notes: instruction.notes.clone(),
        }
    }
}
