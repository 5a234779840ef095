//! Canonicalisation shared by every adapter: book ordering, zero-balance
//! filtering and order remainders.

use crate::traits::{Balance, Depth, Order, Unit};

impl Depth {
    /// Builds a book from raw levels in whatever order the venue sent them.
    pub fn from_levels(asks: Vec<Unit>, bids: Vec<Unit>) -> Self {
        let mut depth = Self { asks, bids };
        depth.normalize();
        depth
    }

    /// Sorts both sides into canonical order: asks by descending price with
    /// the best ask last, bids by descending price with the best bid first.
    pub fn normalize(&mut self) {
        self.asks.sort_by(|x, y| y.price.total_cmp(&x.price));
        self.bids.sort_by(|x, y| y.price.total_cmp(&x.price));
    }

    pub fn best_ask(&self) -> Option<&Unit> {
        self.asks.last()
    }

    pub fn best_bid(&self) -> Option<&Unit> {
        self.bids.first()
    }

    pub fn is_empty(&self) -> bool {
        self.asks.is_empty() && self.bids.is_empty()
    }
}

/// Keeps entries whose amount differs from the venue's literal zero string.
///
/// Vendors format zero with a fixed precision (`"0.00000000"`, `"0"`, ...),
/// and the comparison is against that exact text.
pub fn non_zero_balances<I>(entries: I, zero: &str) -> Vec<Balance>
where
    I: IntoIterator<Item = Balance>,
{
    entries.into_iter().filter(|b| b.balance != zero).collect()
}

impl Order {
    /// Recomputes `remain` from `amount` and `executed`.
    pub fn recompute_remain(&mut self) {
        self.remain = self.amount - self.executed;
    }
}
