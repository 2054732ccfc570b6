//! Async runtime utilities for rulekit.
//!
//! Rule evaluation is single-threaded and cooperative: subtree evaluations
//! are interleaved on one thread, never run in parallel. These helpers build
//! the matching current-thread runtime for synchronous callers such as the CLI.

use std::future::Future;

use common_error::{ExpressionError, ExpressionResult};
use tokio::runtime::{Builder, Runtime};

/// Create a current-thread Tokio runtime.
pub fn get_runtime() -> ExpressionResult<Runtime> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| ExpressionError::execution(format!("Failed to create runtime: {e}")))
}

/// Block on a future using a fresh current-thread runtime.
pub fn block_on<F: Future>(future: F) -> ExpressionResult<F::Output> {
    let runtime = get_runtime()?;
    Ok(runtime.block_on(future))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_on_returns_output() {
        let value = block_on(async { 40 + 2 }).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_block_on_drives_timers() {
        let value = block_on(async {
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
            "done"
        })
        .unwrap();
        assert_eq!(value, "done");
    }
}
