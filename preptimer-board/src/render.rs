//! Prints broadcast countdown ticks to stdout.

use tokio::sync::broadcast;
use tracing::{debug, warn};

use preptimer::status::{StatusRow, render_row};

use crate::registry::TimerTick;

/// Text or JSON line for one tick.
pub fn render_tick(tick: &TimerTick, json: bool) -> Option<String> {
    if json {
        return serde_json::to_string(tick).ok();
    }
    let row = StatusRow {
        id: tick.order_id.clone(),
        preparing: true,
        display: tick.display.clone(),
        state: tick.state.clone(),
    };
    Some(render_row(&row))
}

/// Consume ticks until the channel closes.
pub async fn run_renderer(mut ticks: broadcast::Receiver<TimerTick>, json: bool) {
    loop {
        match ticks.recv().await {
            Ok(tick) => {
                if let Some(line) = render_tick(&tick, json) {
                    println!("{}", line);
                }
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(skipped = n, "renderer lagged, some ticks dropped");
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!("tick channel closed");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use preptimer::core::countdown::calculate_timer_state;
    use preptimer::core::format::format_timer;
    use preptimer::test_support::{base_instant, preparing_snapshot, seconds_ago};

    fn tick() -> TimerTick {
        let state = calculate_timer_state(
            Some(&preparing_snapshot(15.0, seconds_ago(1000))),
            base_instant(),
        );
        TimerTick {
            order_id: "A-7".to_string(),
            display: format_timer(&state),
            state,
        }
    }

    #[test]
    fn text_line_matches_status_rendering() {
        let line = render_tick(&tick(), false).expect("line");
        assert_eq!(line, "A-7 overtime +01:40 progress=100.0%");
    }

    #[test]
    fn json_line_is_camel_case() {
        let line = render_tick(&tick(), true).expect("line");
        let value: serde_json::Value = serde_json::from_str(&line).expect("json");
        assert_eq!(value["orderId"], "A-7");
        assert_eq!(value["state"]["isOvertime"], true);
        assert_eq!(value["state"]["remainingSeconds"], 100);
    }
}
