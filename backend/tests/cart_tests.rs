//! Cart workflow tests
//!
//! Covers the cart lifecycle rules: line merging per product, quantity
//! stepping, the one-open-cart-per-staff rule, and the
//! pending -> ordered -> received status progression.

use proptest::prelude::*;

use shared::models::CartStatus;
use shared::validation::validate_quantity;

// ============================================================================
// Cart Simulation Helpers
// ============================================================================

/// A cart modelled as (product, quantity) lines, one line per product
#[derive(Debug, Clone, Default)]
struct Cart {
    lines: Vec<(u32, i32)>,
}

impl Cart {
    /// Add a quantity of a product, merging into an existing line
    fn add(&mut self, product: u32, quantity: i32) -> Result<(), &'static str> {
        validate_quantity(quantity)?;
        if let Some(line) = self.lines.iter_mut().find(|(p, _)| *p == product) {
            line.1 += quantity;
        } else {
            self.lines.push((product, quantity));
        }
        Ok(())
    }

    /// Increase a line by one
    fn increase(&mut self, product: u32) -> Option<i32> {
        let line = self.lines.iter_mut().find(|(p, _)| *p == product)?;
        line.1 += 1;
        Some(line.1)
    }

    /// Decrease a line by one, removing it rather than leaving zero
    fn decrease(&mut self, product: u32) -> Option<i32> {
        let idx = self.lines.iter().position(|(p, _)| *p == product)?;
        if self.lines[idx].1 <= 1 {
            self.lines.remove(idx);
            None
        } else {
            self.lines[idx].1 -= 1;
            Some(self.lines[idx].1)
        }
    }

    fn quantity_of(&self, product: u32) -> Option<i32> {
        self.lines
            .iter()
            .find(|(p, _)| *p == product)
            .map(|(_, q)| *q)
    }
}

/// Open carts keyed by staff member: adds find or create the one pending
/// cart, submit closes it
#[derive(Debug, Default)]
struct OpenCarts {
    open: std::collections::HashMap<u32, Cart>,
    submitted: Vec<(u32, Cart)>,
}

impl OpenCarts {
    fn add(&mut self, staff: u32, product: u32, quantity: i32) -> Result<(), &'static str> {
        self.open.entry(staff).or_default().add(product, quantity)
    }

    fn submit(&mut self, staff: u32) -> bool {
        match self.open.remove(&staff) {
            Some(cart) => {
                self.submitted.push((staff, cart));
                true
            }
            None => false,
        }
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: adding the same product repeatedly never creates
    /// duplicate lines, and the line carries the summed quantity
    #[test]
    fn prop_lines_merge_per_product(
        adds in prop::collection::vec((0u32..5, 1i32..50), 1..30)
    ) {
        let mut cart = Cart::default();
        for (product, quantity) in &adds {
            cart.add(*product, *quantity).unwrap();
        }

        // One line per distinct product
        let mut products: Vec<u32> = cart.lines.iter().map(|(p, _)| *p).collect();
        products.sort_unstable();
        let before = products.len();
        products.dedup();
        prop_assert_eq!(before, products.len());

        // Each line equals the sum of its adds
        for product in products {
            let expected: i32 = adds
                .iter()
                .filter(|(p, _)| *p == product)
                .map(|(_, q)| q)
                .sum();
            prop_assert_eq!(cart.quantity_of(product), Some(expected));
        }
    }

    /// Property: non-positive quantities are always rejected
    #[test]
    fn prop_non_positive_add_rejected(quantity in -100i32..=0) {
        let mut cart = Cart::default();
        prop_assert!(cart.add(1, quantity).is_err());
        prop_assert!(cart.lines.is_empty());
    }

    /// Property: n increases raise the line quantity by exactly n
    #[test]
    fn prop_increase_steps_by_one(initial in 1i32..100, steps in 1usize..20) {
        let mut cart = Cart::default();
        cart.add(7, initial).unwrap();
        for _ in 0..steps {
            cart.increase(7);
        }
        prop_assert_eq!(cart.quantity_of(7), Some(initial + steps as i32));
    }

    /// Property: decreasing a line down from its quantity removes it,
    /// never leaving a zero-quantity line behind
    #[test]
    fn prop_decrease_to_zero_removes_line(initial in 1i32..20) {
        let mut cart = Cart::default();
        cart.add(3, initial).unwrap();

        for expected in (0..initial).rev() {
            let remaining = cart.decrease(3);
            if expected == 0 {
                prop_assert_eq!(remaining, None);
            } else {
                prop_assert_eq!(remaining, Some(expected));
            }
        }

        prop_assert!(cart.quantity_of(3).is_none());
        prop_assert!(cart.lines.iter().all(|(_, q)| *q >= 1));
    }
}

// ============================================================================
// Unit Tests: Status Progression
// ============================================================================

#[cfg(test)]
mod status_tests {
    use super::*;

    #[test]
    fn test_only_forward_transitions_allowed() {
        assert!(CartStatus::Pending.can_transition(CartStatus::Ordered));
        assert!(CartStatus::Ordered.can_transition(CartStatus::Received));
    }

    #[test]
    fn test_skipping_and_backward_transitions_rejected() {
        assert!(!CartStatus::Pending.can_transition(CartStatus::Received));
        assert!(!CartStatus::Ordered.can_transition(CartStatus::Pending));
        assert!(!CartStatus::Received.can_transition(CartStatus::Ordered));
        assert!(!CartStatus::Received.can_transition(CartStatus::Pending));
    }

    #[test]
    fn test_self_transitions_rejected() {
        for status in [CartStatus::Pending, CartStatus::Ordered, CartStatus::Received] {
            assert!(!status.can_transition(status));
        }
    }

    #[test]
    fn test_received_is_terminal() {
        assert!(CartStatus::Received.is_terminal());
        assert!(!CartStatus::Pending.is_terminal());
        assert!(!CartStatus::Ordered.is_terminal());
    }

    #[test]
    fn test_status_wire_strings() {
        assert_eq!(CartStatus::Pending.as_str(), "pending");
        assert_eq!(CartStatus::Ordered.as_str(), "ordered");
        assert_eq!(CartStatus::Received.as_str(), "received");

        assert_eq!("ordered".parse::<CartStatus>().unwrap(), CartStatus::Ordered);
        assert!("submitted".parse::<CartStatus>().is_err());
    }
}

// ============================================================================
// Unit Tests: Cart Behavior
// ============================================================================

#[cfg(test)]
mod cart_behavior_tests {
    use super::*;

    #[test]
    fn test_add_merges_duplicate_product() {
        let mut cart = Cart::default();
        cart.add(1, 2).unwrap();
        cart.add(1, 3).unwrap();

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.quantity_of(1), Some(5));
    }

    #[test]
    fn test_add_keeps_distinct_products_separate() {
        let mut cart = Cart::default();
        cart.add(1, 2).unwrap();
        cart.add(2, 4).unwrap();

        assert_eq!(cart.lines.len(), 2);
        assert_eq!(cart.quantity_of(1), Some(2));
        assert_eq!(cart.quantity_of(2), Some(4));
    }

    #[test]
    fn test_decrease_at_one_removes_line() {
        let mut cart = Cart::default();
        cart.add(9, 1).unwrap();

        assert_eq!(cart.decrease(9), None);
        assert!(cart.lines.is_empty());
    }

    #[test]
    fn test_decrease_missing_line_is_none() {
        let mut cart = Cart::default();
        assert_eq!(cart.decrease(42), None);
    }

    #[test]
    fn test_zero_and_negative_adds_rejected() {
        let mut cart = Cart::default();
        assert!(cart.add(1, 0).is_err());
        assert!(cart.add(1, -5).is_err());
    }
}

// ============================================================================
// Unit Tests: Open Cart Rule
// ============================================================================

#[cfg(test)]
mod open_cart_tests {
    use super::*;

    #[test]
    fn test_adds_accumulate_into_single_open_cart() {
        let mut desk = OpenCarts::default();
        desk.add(1, 10, 2).unwrap();
        desk.add(1, 11, 1).unwrap();
        desk.add(1, 10, 3).unwrap();

        assert_eq!(desk.open.len(), 1);
        let cart = &desk.open[&1];
        assert_eq!(cart.lines.len(), 2);
        assert_eq!(cart.quantity_of(10), Some(5));
    }

    #[test]
    fn test_staff_members_get_separate_carts() {
        let mut desk = OpenCarts::default();
        desk.add(1, 10, 2).unwrap();
        desk.add(2, 10, 4).unwrap();

        assert_eq!(desk.open.len(), 2);
        assert_eq!(desk.open[&1].quantity_of(10), Some(2));
        assert_eq!(desk.open[&2].quantity_of(10), Some(4));
    }

    #[test]
    fn test_submit_closes_the_open_cart() {
        let mut desk = OpenCarts::default();
        desk.add(1, 10, 2).unwrap();

        assert!(desk.submit(1));
        assert!(desk.open.is_empty());
        assert_eq!(desk.submitted.len(), 1);

        // Nothing pending, so a second submit is a no-op
        assert!(!desk.submit(1));

        // The next add opens a fresh cart rather than reviving the old one
        desk.add(1, 12, 1).unwrap();
        assert_eq!(desk.open[&1].lines, vec![(12, 1)]);
        assert_eq!(desk.submitted.len(), 1);
    }
}
