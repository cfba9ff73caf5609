//! Gate for live countdowns.

use crate::core::snapshot::{OrderPhase, OrderSnapshot};

/// True when the order is in the preparing phase and carries both a non-zero
/// preparation estimate and a start timestamp.
///
/// Pollers use this to decide whether a countdown should be ticking at all.
/// Status comparison ignores case.
pub fn is_order_preparing(snapshot: Option<&OrderSnapshot>) -> bool {
    let Some(snapshot) = snapshot else {
        return false;
    };
    let has_estimate = snapshot
        .preparation_time
        .is_some_and(|minutes| minutes != 0.0 && !minutes.is_nan());
    let has_start = snapshot
        .preparing_at
        .as_ref()
        .is_some_and(|started| started.is_set());
    snapshot.phase() == Some(OrderPhase::Preparing) && has_estimate && has_start
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::snapshot::Timestamp;

    fn preparing() -> OrderSnapshot {
        OrderSnapshot {
            status: Some("preparing".to_string()),
            preparation_time: Some(15.0),
            preparing_at: Some(Timestamp::Text("2024-05-01T12:00:00Z".to_string())),
            ready_at: None,
        }
    }

    #[test]
    fn complete_preparing_snapshot_is_preparing() {
        assert!(is_order_preparing(Some(&preparing())));
    }

    #[test]
    fn status_casing_is_ignored() {
        let mut order = preparing();
        order.status = Some("PREPARING".to_string());
        assert!(is_order_preparing(Some(&order)));
    }

    #[test]
    fn any_missing_piece_is_not_preparing() {
        let mut no_status = preparing();
        no_status.status = None;
        let mut no_estimate = preparing();
        no_estimate.preparation_time = None;
        let mut zero_estimate = preparing();
        zero_estimate.preparation_time = Some(0.0);
        let mut no_start = preparing();
        no_start.preparing_at = None;
        let mut empty_start = preparing();
        empty_start.preparing_at = Some(Timestamp::Text(String::new()));

        assert!(!is_order_preparing(None));
        for order in [no_status, no_estimate, zero_estimate, no_start, empty_start] {
            assert!(!is_order_preparing(Some(&order)));
        }
    }

    #[test]
    fn other_phases_are_not_preparing() {
        for status in ["pending", "confirmed", "ready", "completed", "cancelled", "cooking"] {
            let mut order = preparing();
            order.status = Some(status.to_string());
            assert!(!is_order_preparing(Some(&order)), "status {status}");
        }
    }
}
