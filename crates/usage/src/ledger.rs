//! Per-organization monthly compute budget.
//!
//! A per-execution counter (tracked on the execution record itself, see
//! `flux-workflow::ExecutionUsage`) plus a per-organization
//! monthly budget enforced by the executor before dispatching each node.
//! This ledger owns only the organization side: how much of the month's
//! budget is already committed from prior, finished executions, and whether
//! a given execution — given what it has already spent this run — still has
//! room for one more node.

use dashmap::DashMap;
use flux_core::OrganizationId;

use crate::error::UsageError;

/// `None` means unlimited: the organization has no monthly cap configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrgBudget(pub Option<i64>);

impl OrgBudget {
    #[must_use]
    pub fn unlimited() -> Self {
        Self(None)
    }

    #[must_use]
    pub fn limited(monthly_limit: i64) -> Self {
        Self(Some(monthly_limit.max(0)))
    }
}

/// Tracks each organization's monthly budget and how much of it prior,
/// terminated executions have already committed.
#[derive(Default)]
pub struct UsageLedger {
    limits: DashMap<OrganizationId, OrgBudget>,
    committed: DashMap<OrganizationId, i64>,
}

impl UsageLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_budget(&self, org_id: OrganizationId, budget: OrgBudget) {
        self.limits.insert(org_id, budget);
    }

    #[must_use]
    pub fn budget(&self, org_id: OrganizationId) -> OrgBudget {
        self.limits.get(&org_id).map_or(OrgBudget::unlimited(), |b| *b)
    }

    #[must_use]
    pub fn committed(&self, org_id: OrganizationId) -> i64 {
        self.committed.get(&org_id).map_or(0, |v| *v)
    }

    /// Whether dispatching one more node, which would bring this
    /// execution's own running total to `execution_usage_so_far + cost`,
    /// still fits under the organization's remaining monthly budget.
    ///
    /// `orgBudget − execution.usage ≥ descriptor.computeCost`, per §4.6,
    /// where `orgBudget` here is what remains after every *other*,
    /// already-committed execution this month.
    #[must_use]
    pub fn has_capacity(&self, org_id: OrganizationId, execution_usage_so_far: i64, cost: i64) -> bool {
        match self.budget(org_id).0 {
            None => true,
            Some(limit) => limit - self.committed(org_id) - execution_usage_so_far >= cost,
        }
    }

    /// Commits `amount` against the organization's monthly budget. Called
    /// once, when an execution terminates, with its final usage total —
    /// not incrementally per node, so concurrently running executions
    /// against the same org see a stable `committed()` until each of them
    /// finishes.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::NegativeAmount`] if `amount` is negative.
    pub fn commit(&self, org_id: OrganizationId, amount: i64) -> Result<(), UsageError> {
        if amount < 0 {
            return Err(UsageError::NegativeAmount(amount));
        }
        *self.committed.entry(org_id).or_insert(0) += amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_org_always_has_capacity() {
        let ledger = UsageLedger::new();
        let org = OrganizationId::v4();
        assert!(ledger.has_capacity(org, 1_000_000, 50));
    }

    #[test]
    fn limited_org_rejects_once_execution_usage_would_exceed_budget() {
        let ledger = UsageLedger::new();
        let org = OrganizationId::v4();
        ledger.set_budget(org, OrgBudget::limited(25));

        // S6: ten nodes costing 10 each, budget 25. Nodes 1 and 2 fit
        // (usage 0 -> 10, 10 -> 20); node 3 does not (20 + 10 > 25).
        assert!(ledger.has_capacity(org, 0, 10));
        assert!(ledger.has_capacity(org, 10, 10));
        assert!(!ledger.has_capacity(org, 20, 10));
    }

    #[test]
    fn commit_reduces_capacity_for_future_executions() {
        let ledger = UsageLedger::new();
        let org = OrganizationId::v4();
        ledger.set_budget(org, OrgBudget::limited(100));

        ledger.commit(org, 60).unwrap();
        assert_eq!(ledger.committed(org), 60);
        assert!(ledger.has_capacity(org, 0, 40));
        assert!(!ledger.has_capacity(org, 0, 41));
    }

    #[test]
    fn commit_accumulates_across_multiple_executions() {
        let ledger = UsageLedger::new();
        let org = OrganizationId::v4();
        ledger.commit(org, 10).unwrap();
        ledger.commit(org, 15).unwrap();
        assert_eq!(ledger.committed(org), 25);
    }

    #[test]
    fn negative_commit_is_rejected() {
        let ledger = UsageLedger::new();
        let err = ledger.commit(OrganizationId::v4(), -5).unwrap_err();
        assert_eq!(err, UsageError::NegativeAmount(-5));
    }

    #[test]
    fn unconfigured_org_defaults_to_unlimited() {
        let ledger = UsageLedger::new();
        assert_eq!(ledger.budget(OrganizationId::v4()), OrgBudget::unlimited());
    }
}
