//! Sequential delivery to many targets.

use std::fmt::Display;
use std::future::Future;

use tracing::debug;

/// Per-target tally of a fan-out.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FanoutReport {
    pub success: usize,
    pub failed: usize,
}

impl FanoutReport {
    pub fn attempted(&self) -> usize {
        self.success + self.failed
    }
}

/// Run `send` for every target, one after another.
///
/// A failing target is counted and skipped; the loop always finishes.
pub async fn fanout<T, F, Fut, E>(targets: impl IntoIterator<Item = T>, mut send: F) -> FanoutReport
where
    T: Display + Copy,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    let mut report = FanoutReport::default();

    for target in targets {
        match send(target).await {
            Ok(()) => report.success += 1,
            Err(e) => {
                debug!("Delivery to {} failed: {}", target, e);
                report.failed += 1;
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    #[tokio::test]
    async fn test_failures_are_counted_not_fatal() {
        let attempted = Arc::new(Mutex::new(Vec::new()));
        let failing = [2_i64, 4];

        let report = fanout([1_i64, 2, 3, 4, 5], |chat| {
            let attempted = attempted.clone();
            async move {
                attempted.lock().push(chat);
                if failing.contains(&chat) {
                    Err(format!("chat {} unreachable", chat))
                } else {
                    Ok(())
                }
            }
        })
        .await;

        assert_eq!(report, FanoutReport { success: 3, failed: 2 });
        assert_eq!(report.attempted(), 5);
        assert_eq!(*attempted.lock(), vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_empty_target_set() {
        let report = fanout(Vec::<u64>::new(), |_| async { Ok::<(), String>(()) }).await;
        assert_eq!(report.attempted(), 0);
    }
}
