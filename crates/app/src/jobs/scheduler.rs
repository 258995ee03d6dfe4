use std::future::Future;
use std::time::Duration;

use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::warn;

use crate::jobs::JobError;

const ERROR_BACKOFF: Duration = Duration::from_secs(30);

pub async fn run_interval<F, Fut>(
    name: &'static str,
    interval_duration: Duration,
    mut job: F,
) -> Result<(), JobError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), JobError>>,
{
    let mut ticker = interval(interval_duration);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        if let Err(err) = job().await {
            warn!(error = %err, job = name, "job execution failed");
            sleep(ERROR_BACKOFF).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use super::run_interval;

    #[tokio::test(start_paused = true)]
    async fn first_tick_runs_immediately_then_on_interval() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let task = tokio::spawn(run_interval("test", Duration::from_secs(60), move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 2);
        task.abort();
    }
}
