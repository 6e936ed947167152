//! Inventory Model: the in-memory mutable ledger used during a
//! single engine run.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::models::Allocation;

/// Order in which `consume` drains pools for a given request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolPreference {
    /// Finished-good shippable pass: approved stock only.
    ApprovedOnly,
    /// Component pass: approved, then QC-pending, then open PO.
    ApprovedThenQcThenPo,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PoolRemaining {
    pub approved: Decimal,
    pub qc_pending: Decimal,
    pub open_po: Decimal,
}

impl PoolRemaining {
    pub fn total(&self) -> Decimal {
        self.approved + self.qc_pending + self.open_po
    }
}

/// What `consume` actually took from each pool.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConsumeResult {
    pub approved_used: Decimal,
    pub qc_used: Decimal,
    pub po_used: Decimal,
}

impl ConsumeResult {
    pub fn total(&self) -> Decimal {
        self.approved_used + self.qc_used + self.po_used
    }
}

/// The mutable per-part ledger for one engine run.
pub struct LiveInventory {
    pools: HashMap<String, PoolRemaining>,
    allocations: HashMap<String, Vec<Allocation>>,
}

impl LiveInventory {
    /// Builds the ledger from the three initial pool snapshots. Parts that
    /// appear in none of the three are simply absent (treated as all-zero
    /// by `remaining`).
    pub fn new(
        approved: HashMap<String, Decimal>,
        qc_pending: HashMap<String, Decimal>,
        open_po: HashMap<String, Decimal>,
    ) -> Self {
        let mut pools: HashMap<String, PoolRemaining> = HashMap::new();
        for (part, qty) in approved {
            pools.entry(part).or_default().approved = qty;
        }
        for (part, qty) in qc_pending {
            pools.entry(part).or_default().qc_pending = qty;
        }
        for (part, qty) in open_po {
            pools.entry(part).or_default().open_po = qty;
        }

        Self {
            pools,
            allocations: HashMap::new(),
        }
    }

    /// Current remaining triplet for a part. Unknown parts read as zero.
    pub fn remaining(&self, part: &str) -> PoolRemaining {
        self.pools.get(part).copied().unwrap_or_default()
    }

    /// Non-consuming probe: `approved + qc_pending` for a part, used by
    /// the Pending QC check.
    pub fn approved_plus_qc(&self, part: &str) -> Decimal {
        let r = self.remaining(part);
        r.approved + r.qc_pending
    }

    /// Deducts `qty` from a part's pools in `preference` order, never
    /// taking more than what's available. Returns the actual breakdown;
    /// the sum of the breakdown equals `min(qty, total_remaining)`.
    pub fn consume(&mut self, part: &str, qty: Decimal, preference: PoolPreference) -> ConsumeResult {
        let mut remaining_need = qty.max(Decimal::ZERO);
        let mut result = ConsumeResult::default();

        let pool = self.pools.entry(part.to_string()).or_default();

        let take = |bucket: &mut Decimal, need: &mut Decimal| -> Decimal {
            let taken = (*bucket).min(*need);
            *bucket -= taken;
            *need -= taken;
            taken
        };

        result.approved_used = take(&mut pool.approved, &mut remaining_need);

        if preference == PoolPreference::ApprovedThenQcThenPo {
            result.qc_used = take(&mut pool.qc_pending, &mut remaining_need);
            result.po_used = take(&mut pool.open_po, &mut remaining_need);
        }

        result
    }

    /// Appends to the per-part allocation log. Does not affect quantities
    /// — separating `consume` from `record_allocation` lets the two-pass
    /// algorithm probe without dirtying state.
    pub fn record_allocation(&mut self, part: &str, so_number: &str, qty: Decimal) {
        if qty <= Decimal::ZERO {
            return;
        }
        self.allocations
            .entry(part.to_string())
            .or_default()
            .push(Allocation {
                so_number: so_number.to_string(),
                qty,
            });
    }

    /// Allocation log for a part, in recording order — the source of the
    /// dashboard's hover tooltips.
    pub fn allocations_for(&self, part: &str) -> Vec<Allocation> {
        self.allocations.get(part).cloned().unwrap_or_default()
    }
}
