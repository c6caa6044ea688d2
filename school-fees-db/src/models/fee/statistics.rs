use rust_decimal::Decimal;
use school_fees_api::FeeStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::fee::FeeModel;

/// Count and amounts of the fees sharing one status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBreakdown {
    pub count: i64,
    pub total_amount: Decimal,
    pub total_paid: Decimal,
}

impl StatusBreakdown {
    fn accumulate(&mut self, other: &StatusBreakdown) -> Option<()> {
        self.count = self.count.checked_add(other.count)?;
        self.total_amount = self.total_amount.checked_add(other.total_amount)?;
        self.total_paid = self.total_paid.checked_add(other.total_paid)?;
        Some(())
    }
}

/// Read-only aggregate over a filtered population of fees.
///
/// `total_pending` is `total_amount - total_paid` without clamping, so an
/// administrative overwrite of `paid_amount` shows up here as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeStatistics {
    pub total_fees: i64,
    pub total_amount: Decimal,
    pub total_paid: Decimal,
    pub total_pending: Decimal,
    pub by_status: BTreeMap<FeeStatus, StatusBreakdown>,
}

impl FeeStatistics {
    /// Builds the aggregate from per-status groups, as produced by a `GROUP BY status` query.
    ///
    /// Returns `None` when a total leaves the `Decimal` (or `i64`) range.
    pub fn from_groups<I>(groups: I) -> Option<Self>
    where
        I: IntoIterator<Item = (FeeStatus, StatusBreakdown)>,
    {
        let mut stats = FeeStatistics::default();
        for (status, group) in groups {
            let entry = stats.by_status.entry(status).or_default();
            entry.accumulate(&group)?;
            stats.total_fees = stats.total_fees.checked_add(group.count)?;
            stats.total_amount = stats.total_amount.checked_add(group.total_amount)?;
            stats.total_paid = stats.total_paid.checked_add(group.total_paid)?;
        }
        stats.total_pending = stats.total_amount.checked_sub(stats.total_paid)?;
        Some(stats)
    }

    pub fn from_fees<'a, I>(fees: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a FeeModel>,
    {
        Self::from_groups(fees.into_iter().map(|fee| {
            (
                fee.status,
                StatusBreakdown {
                    count: 1,
                    total_amount: fee.amount,
                    total_paid: fee.paid_amount,
                },
            )
        }))
    }
}
