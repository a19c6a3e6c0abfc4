//! Order fulfillment tests
//!
//! Covers the all-or-nothing stock check, stock decrements on receive,
//! and the receive-once rule.

use proptest::prelude::*;

use shared::models::CartStatus;

// ============================================================================
// Fulfillment Simulation Helpers
// ============================================================================

/// One order line against current stock
#[derive(Debug, Clone)]
struct Line {
    product: u32,
    requested: i32,
    available: i32,
}

fn line(product: u32, requested: i32, available: i32) -> Line {
    Line {
        product,
        requested,
        available,
    }
}

/// All-or-nothing receive: either every line is covered and stock is
/// decremented, or the first short line fails the whole order untouched
fn simulate_receive(lines: &[Line]) -> Result<Vec<(u32, i32)>, (u32, i32, i32)> {
    for l in lines {
        if l.requested > l.available {
            return Err((l.product, l.requested, l.available));
        }
    }
    Ok(lines
        .iter()
        .map(|l| (l.product, l.available - l.requested))
        .collect())
}

// ============================================================================
// Property Test Strategies
// ============================================================================

fn line_strategy() -> impl Strategy<Value = Line> {
    (0u32..1000, 1i32..50, 0i32..100).prop_map(|(product, requested, available)| Line {
        product,
        requested,
        available,
    })
}

/// Lines where every request is covered by stock
fn covered_lines_strategy() -> impl Strategy<Value = Vec<Line>> {
    prop::collection::vec(
        (0u32..1000, 1i32..50, 0i32..50).prop_map(|(product, requested, extra)| Line {
            product,
            requested,
            available: requested + extra,
        }),
        0..10,
    )
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: receive succeeds exactly when every line is covered
    #[test]
    fn prop_receive_succeeds_iff_all_covered(
        lines in prop::collection::vec(line_strategy(), 0..10)
    ) {
        let all_covered = lines.iter().all(|l| l.requested <= l.available);
        prop_assert_eq!(simulate_receive(&lines).is_ok(), all_covered);
    }

    /// Property: a successful receive never drives stock negative, and
    /// decrements each product by exactly the requested quantity
    #[test]
    fn prop_receive_decrements_exactly(lines in covered_lines_strategy()) {
        let result = simulate_receive(&lines).unwrap();
        prop_assert_eq!(result.len(), lines.len());

        for (l, (product, remaining)) in lines.iter().zip(result.iter()) {
            prop_assert_eq!(l.product, *product);
            prop_assert_eq!(*remaining, l.available - l.requested);
            prop_assert!(*remaining >= 0);
        }
    }

    /// Property: the failure names the first short line in order, even
    /// when later lines are also short
    #[test]
    fn prop_failure_names_first_short_line(
        mut lines in prop::collection::vec(line_strategy(), 1..10),
        short_from in 0usize..10
    ) {
        let short_from = short_from % lines.len();
        // Make every line from short_from onward short on stock
        for l in lines.iter_mut().skip(short_from) {
            l.available = l.requested - 1;
        }
        // And every earlier line covered
        for l in lines.iter_mut().take(short_from) {
            l.available = l.requested;
        }

        let expected = &lines[short_from];
        match simulate_receive(&lines) {
            Err((product, requested, available)) => {
                prop_assert_eq!(product, expected.product);
                prop_assert_eq!(requested, expected.requested);
                prop_assert_eq!(available, expected.available);
            }
            Ok(_) => prop_assert!(false, "receive should have failed"),
        }
    }

    /// Property: exact depletion is allowed and leaves zero stock
    #[test]
    fn prop_exact_depletion_leaves_zero(requested in 1i32..100) {
        let lines = vec![line(1, requested, requested)];
        let result = simulate_receive(&lines).unwrap();
        prop_assert_eq!(result[0].1, 0);
    }
}

// ============================================================================
// Unit Tests: Receive Scenarios
// ============================================================================

#[cfg(test)]
mod receive_tests {
    use super::*;

    #[test]
    fn test_single_short_line_fails_whole_order() {
        let lines = vec![line(1, 5, 10), line(2, 3, 2), line(3, 1, 100)];
        let err = simulate_receive(&lines).unwrap_err();
        assert_eq!(err, (2, 3, 2));
    }

    #[test]
    fn test_empty_order_receives_cleanly() {
        assert_eq!(simulate_receive(&[]).unwrap(), Vec::new());
    }

    #[test]
    fn test_zero_stock_rejects_any_request() {
        let lines = vec![line(1, 1, 0)];
        assert!(simulate_receive(&lines).is_err());
    }

    #[test]
    fn test_successful_receive_covers_all_lines() {
        let lines = vec![line(1, 5, 10), line(2, 2, 2)];
        let result = simulate_receive(&lines).unwrap();
        assert_eq!(result, vec![(1, 5), (2, 0)]);
    }

    #[test]
    fn test_overlapping_orders_drain_shared_stock_in_turn() {
        // Row locks serialize two receives touching the same product, so the
        // second one sees the stock left behind by the first.
        let first = simulate_receive(&[line(1, 4, 10)]).unwrap();
        assert_eq!(first, vec![(1, 6)]);

        let second = simulate_receive(&[line(1, 5, first[0].1)]).unwrap();
        assert_eq!(second, vec![(1, 1)]);

        assert!(simulate_receive(&[line(1, 2, second[0].1)]).is_err());
    }
}

// ============================================================================
// Unit Tests: Receive-Once Rule
// ============================================================================

#[cfg(test)]
mod receive_once_tests {
    use super::*;

    #[test]
    fn test_only_submitted_orders_can_be_received() {
        assert!(CartStatus::Ordered.can_transition(CartStatus::Received));
        assert!(!CartStatus::Pending.can_transition(CartStatus::Received));
    }

    #[test]
    fn test_second_receive_is_rejected() {
        let status = CartStatus::Ordered;
        assert!(status.can_transition(CartStatus::Received));

        let status = CartStatus::Received;
        assert!(!status.can_transition(CartStatus::Received));
    }
}
