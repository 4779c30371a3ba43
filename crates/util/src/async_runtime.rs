//! Async runtime helpers for blocking callers.
//!
//! The HTTP stack is async; the fetcher API is not. This module is the single
//! place where a future is driven to completion on behalf of synchronous code,
//! reusing the current Tokio runtime when one is available.

use std::future::Future;
use std::{panic, thread};

use thiserror::Error;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::task;

/// Raised when a runtime for a blocking call cannot be built.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("could not start an async runtime: {0}")]
    Build(#[from] std::io::Error),
}

/// Execute an async future from synchronous code.
///
/// # Arguments
/// - `future`: The future to run to completion.
///
/// # Returns
/// Returns the future's output or an error if a runtime cannot be built.
///
/// # Notes
/// - Reuses the current multi-thread runtime via `block_in_place`.
/// - Inside a current-thread runtime, which cannot be blocked in place, the
///   future runs on a scoped helper thread with its own runtime.
/// - Falls back to a fresh single-threaded runtime for call sites outside Tokio.
pub fn block_on_future<F>(future: F) -> Result<F::Output, RuntimeError>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let Ok(handle) = Handle::try_current() else {
        return run_on_fresh_runtime(future);
    };

    if handle.runtime_flavor() == RuntimeFlavor::CurrentThread {
        return thread::scope(|scope| {
            scope
                .spawn(|| run_on_fresh_runtime(future))
                .join()
                .unwrap_or_else(|payload| panic::resume_unwind(payload))
        });
    }
    Ok(task::block_in_place(|| handle.block_on(future)))
}

fn run_on_fresh_runtime<F: Future>(future: F) -> Result<F::Output, RuntimeError> {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    Ok(runtime.block_on(future))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_futures_outside_a_runtime() {
        let value = block_on_future(async { 40 + 2 }).expect("runtime available");
        assert_eq!(value, 42);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn reuses_multi_thread_runtime() {
        let value = block_on_future(async { "inside" }).expect("runtime available");
        assert_eq!(value, "inside");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn runs_inside_current_thread_runtime() {
        let value = block_on_future(async {
            tokio::task::yield_now().await;
            7
        })
        .expect("helper thread runtime");
        assert_eq!(value, 7);
    }
}
