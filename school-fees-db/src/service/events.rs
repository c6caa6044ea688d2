use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::fee::FeeModel;

pub type EventResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Notified after a change has been persisted.
///
/// A failing sink is logged and never fails the operation that triggered it.
#[async_trait]
pub trait FeeEventSink: Send + Sync {
    async fn fee_created(&self, _fee: &FeeModel) -> EventResult {
        Ok(())
    }

    async fn payment_applied(&self, _fee: &FeeModel, _amount: Decimal) -> EventResult {
        Ok(())
    }

    async fn fee_deleted(&self, _fee_id: Uuid) -> EventResult {
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

#[async_trait]
impl FeeEventSink for NoopEventSink {}
