//! Per-request context
//!
//! The request identifier lives in a tokio task-local slot so concurrent
//! requests never observe each other's value.

use std::future::Future;

tokio::task_local! {
    static REQUEST_ID: String;
}

/// Request identifier of the current task, `None` outside a request scope
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(Clone::clone).ok()
}

/// Run `future` with `request_id` as the current request identifier
pub async fn scope_request_id<F>(request_id: String, future: F) -> F::Output
where
    F: Future,
{
    REQUEST_ID.scope(request_id, future).await
}
