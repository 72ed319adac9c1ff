use crate::error::LedgerError;
use crate::types::Lot;
use rust_decimal::Decimal;
use std::collections::VecDeque;

// Open purchase lots for a single stock, FIFO tracking with VecDeque
// - front is the oldest lot, the next one a sale consumes
// - lots are evicted the moment they reach zero, so a queued lot
//   always has quantity > 0
#[derive(Clone, Debug, Default)]
pub struct LotQueue {
    /// lots in purchase order
    lots: VecDeque<Lot>,
    /// running sum of lot quantities, kept in step with `lots`
    open_quantity: i64,
}

/// Result of consuming lots for one sale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fill {
    /// shares actually matched against open lots
    pub matched: i64,
    /// sum of matched * (sale price - lot price), `None` if it overflowed
    pub profit: Option<Decimal>,
}

impl LotQueue {
    /// Creates an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a lot behind every older lot, keeps FIFO intact.
    /// Lots without shares are dropped to preserve the non-zero invariant.
    /// Fails, queueing nothing, when the open total would exceed `i64::MAX`.
    pub fn push(&mut self, lot: Lot) -> Result<(), LedgerError> {
        if lot.quantity <= 0 {
            return Ok(());
        }
        self.open_quantity = self
            .open_quantity
            .checked_add(lot.quantity)
            .ok_or_else(|| LedgerError::Overflow {
                stock_id: lot.stock_id.clone(),
            })?;
        self.lots.push_back(lot);
        Ok(())
    }

    /// Returns the oldest open lot without removing it
    pub fn front(&self) -> Option<&Lot> {
        self.lots.front()
    }

    /// Total shares still open across all lots
    pub fn open_quantity(&self) -> i64 {
        self.open_quantity
    }

    /// Number of open lots
    pub fn len(&self) -> usize {
        self.lots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }

    /// Iterates lots oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Lot> {
        self.lots.iter()
    }

    /// Sells up to `quantity` shares at `sale_price`, oldest lot first.
    ///
    /// A lot smaller than or equal to what is left to sell is consumed whole
    /// and removed; a bigger lot is reduced in place. Stops early when the
    /// queue runs dry; `Fill::matched` tells the caller how far it got.
    /// Lots are consumed even when the profit overflows.
    pub fn consume(&mut self, quantity: i64, sale_price: Decimal) -> Fill {
        let mut remaining = quantity;
        let mut profit = Some(Decimal::ZERO);

        while remaining > 0 {
            let Some(oldest) = self.lots.front_mut() else {
                break; // No lots left
            };

            let take = oldest.quantity.min(remaining);
            profit = profit.and_then(|total| {
                sale_price
                    .checked_sub(oldest.price)
                    .and_then(|spread| spread.checked_mul(Decimal::from(take)))
                    .and_then(|gain| total.checked_add(gain))
            });
            oldest.quantity -= take;
            remaining -= take;

            // Evict drained lot so the next sale starts on a live one
            if oldest.quantity == 0 {
                self.lots.pop_front();
            }
        }

        let matched = quantity.max(0) - remaining.max(0);
        self.open_quantity -= matched;
        Fill { matched, profit }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn lot(quantity: i64, price: Decimal) -> Lot {
        Lot {
            stock_id: "NVDA".into(),
            quantity,
            price,
        }
    }

    #[test]
    fn test_new_empty() {
        let q = LotQueue::new();
        assert!(q.is_empty());
        assert_eq!(q.open_quantity(), 0);
        assert!(q.front().is_none());
    }

    #[test]
    fn test_push_keep_fifo() {
        let mut q = LotQueue::new();

        // Same stock, different prices (FIFO testing)
        q.push(lot(10, dec!(101))).unwrap();
        q.push(lot(20, dec!(99))).unwrap();
        q.push(lot(30, dec!(100))).unwrap();

        let prices: Vec<Decimal> = q.iter().map(|l| l.price).collect();
        assert_eq!(
            prices,
            vec![dec!(101), dec!(99), dec!(100)],
            "purchase order must be preserved regardless of price"
        );
        assert_eq!(q.open_quantity(), 60);
    }

    #[test]
    fn push_ignores_empty_lot() {
        let mut q = LotQueue::new();
        q.push(lot(0, dec!(5))).unwrap();
        assert!(q.is_empty());
        assert_eq!(q.open_quantity(), 0);
    }

    #[test]
    fn consume_partial_lot_keeps_remainder_in_front() {
        let mut q = LotQueue::new();
        q.push(lot(10, dec!(1))).unwrap();
        q.push(lot(10, dec!(2))).unwrap();

        let fill = q.consume(4, dec!(3));
        assert_eq!(fill.matched, 4);
        assert_eq!(fill.profit, Some(dec!(8)));

        let front = q.front().expect("lot exists");
        assert_eq!(front.quantity, 6);
        assert_eq!(front.price, dec!(1));
        assert_eq!(q.len(), 2);
        assert_eq!(q.open_quantity(), 16);
    }

    #[test]
    fn consume_spans_lots_oldest_first() {
        let mut q = LotQueue::new();
        q.push(lot(10, dec!(1))).unwrap();
        q.push(lot(10, dec!(2))).unwrap();

        // 10 * (3 - 1) + 5 * (3 - 2)
        let fill = q.consume(15, dec!(3));
        assert_eq!(fill.matched, 15);
        assert_eq!(fill.profit, Some(dec!(25)));

        assert_eq!(q.len(), 1);
        let left = q.front().expect("second lot remains");
        assert_eq!(left.quantity, 5);
        assert_eq!(left.price, dec!(2));
    }

    #[test]
    fn consume_exact_lot_leaves_no_zero_lot() {
        let mut q = LotQueue::new();
        q.push(lot(10, dec!(1))).unwrap();
        q.push(lot(7, dec!(4))).unwrap();

        let fill = q.consume(10, dec!(3));
        assert_eq!(fill.profit, Some(dec!(20)));

        // Drained lot is gone, next sale starts on the 7 @ 4 lot
        assert_eq!(q.len(), 1);
        assert_eq!(q.front().map(|l| l.quantity), Some(7));
        assert!(q.iter().all(|l| l.quantity > 0));
    }

    #[test]
    fn consume_past_end_reports_matched() {
        let mut q = LotQueue::new();
        q.push(lot(5, dec!(1))).unwrap();

        let fill = q.consume(8, dec!(2));
        assert_eq!(fill.matched, 5);
        assert_eq!(fill.profit, Some(dec!(5)));
        assert!(q.is_empty());
        assert_eq!(q.open_quantity(), 0);
    }

    #[test]
    fn consume_at_a_loss() {
        let mut q = LotQueue::new();
        q.push(lot(3, dec!(10.50))).unwrap();

        let fill = q.consume(2, dec!(9.25));
        assert_eq!(fill.profit, Some(dec!(-2.50)));
    }

    #[test]
    fn consume_empty_queue() {
        let mut q = LotQueue::new();
        let fill = q.consume(3, dec!(1));
        assert_eq!(fill.matched, 0);
        assert_eq!(fill.profit, Some(Decimal::ZERO));
    }

    #[test]
    fn push_past_i64_max_is_refused() {
        let mut q = LotQueue::new();
        q.push(lot(i64::MAX, dec!(1))).unwrap();

        let err = q.push(lot(1, dec!(1))).unwrap_err();
        assert!(matches!(err, LedgerError::Overflow { ref stock_id } if stock_id == "NVDA"));
        assert_eq!(q.len(), 1);
        assert_eq!(q.open_quantity(), i64::MAX);
    }

    #[test]
    fn profit_overflow_still_consumes() {
        let mut q = LotQueue::new();
        q.push(lot(9_000_000_000_000_000_000, Decimal::ZERO)).unwrap();

        let fill = q.consume(9_000_000_000_000_000_000, Decimal::from(100_000_000_000i64));
        assert_eq!(fill.matched, 9_000_000_000_000_000_000);
        assert_eq!(fill.profit, None);
        assert!(q.is_empty());
    }
}
