use crate::error::{AppError, Result};
use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_histogram_vec, register_int_counter_vec, Histogram,
    HistogramVec, IntCounterVec,
};
use std::future::Future;

lazy_static! {
    /// Post operations segmented by operation and outcome (ok, rejected, error).
    pub static ref POST_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "post_operations_total",
        "Post operations segmented by operation and outcome",
        &["operation", "outcome"]
    )
    .expect("failed to register post_operations_total");

    /// Duration of post operations, store and identity lookups included.
    pub static ref POST_OPERATION_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "post_operation_duration_seconds",
        "Post operation duration segmented by operation",
        &["operation"]
    )
    .expect("failed to register post_operation_duration_seconds");

    /// Number of posts returned per feed request.
    pub static ref FEED_POSTS_RETURNED: Histogram = register_histogram!(
        "feed_posts_returned",
        "Number of posts returned per feed request",
        vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0]
    )
    .expect("failed to register feed_posts_returned");
}

fn outcome(err: &AppError) -> &'static str {
    if err.is_unexpected() {
        "error"
    } else {
        "rejected"
    }
}

/// Time `operation` and count its outcome.
pub async fn observe<T, F>(operation: &'static str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let timer = POST_OPERATION_DURATION_SECONDS
        .with_label_values(&[operation])
        .start_timer();
    let result = fut.await;
    timer.observe_duration();

    let label = match &result {
        Ok(_) => "ok",
        Err(err) => outcome(err),
    };
    POST_OPERATIONS_TOTAL
        .with_label_values(&[operation, label])
        .inc();

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counts_outcomes_per_operation() {
        let before_ok = POST_OPERATIONS_TOTAL
            .with_label_values(&["metrics_test", "ok"])
            .get();
        let before_rejected = POST_OPERATIONS_TOTAL
            .with_label_values(&["metrics_test", "rejected"])
            .get();

        let _ = observe("metrics_test", async { Ok::<_, AppError>(()) }).await;
        let _ = observe("metrics_test", async {
            Err::<(), _>(AppError::post_not_found())
        })
        .await;

        assert_eq!(
            POST_OPERATIONS_TOTAL
                .with_label_values(&["metrics_test", "ok"])
                .get(),
            before_ok + 1
        );
        assert_eq!(
            POST_OPERATIONS_TOTAL
                .with_label_values(&["metrics_test", "rejected"])
                .get(),
            before_rejected + 1
        );
    }
}
