//! Element waiter: cooperative polling for DOM readiness.

use chromiumoxide::Page;
use std::time::{Duration, Instant};
use tracing::warn;

/// Poll for a node matching `selector`. Returns true once the node exists,
/// false when `timeout` elapses first. Never errors; a timeout only logs
/// the failed selector.
pub async fn wait_for_selector(
    page: &Page,
    selector: &str,
    timeout: Duration,
    interval: Duration,
) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if page.find_element(selector).await.is_ok() {
            return true;
        }
        if Instant::now() >= deadline {
            warn!(
                selector,
                timeout_ms = timeout.as_millis() as u64,
                "timed out waiting for selector"
            );
            return false;
        }
        tokio::time::sleep(interval).await;
    }
}

/// Poll a page-context boolean expression. Returns true once the
/// expression evaluates to true, false when `timeout` elapses first.
/// Evaluation errors count as "not ready".
pub async fn wait_until(
    page: &Page,
    expression: &str,
    timeout: Duration,
    interval: Duration,
) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        let ready = match page.evaluate(expression).await {
            Ok(result) => result.into_value::<bool>().unwrap_or(false),
            Err(_) => false,
        };
        if ready {
            return true;
        }
        if Instant::now() >= deadline {
            warn!(
                timeout_ms = timeout.as_millis() as u64,
                "timed out waiting for readiness predicate"
            );
            return false;
        }
        tokio::time::sleep(interval).await;
    }
}
