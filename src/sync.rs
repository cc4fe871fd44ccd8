//! Blocking bridge over the async pipeline.
//!
//! Each operation runs on a fresh named worker thread that owns a
//! current-thread Tokio runtime. The calling thread only joins the worker, so
//! a blocking caller never waits on a runtime it is itself driving, whether or
//! not it is already inside one.

use crate::{Error, Result};
use futures_util::future::join_all;
use std::future::Future;
use std::thread;

const WORKER_NAME: &str = "restline-blocking";

/// Runs an async operation to completion and blocks until it finishes.
///
/// The operation's own error is returned unchanged, so callers can match on
/// their exact error type. A panic inside the operation is resumed on the
/// calling thread. Operations without a value simply return `Ok(())`.
///
/// # Errors
///
/// Returns the operation's error, or `E::from(io::Error)` when the worker
/// thread or its runtime could not be started.
///
/// # Examples
///
/// ```
/// use restline::sync::run_blocking;
///
/// let answer = run_blocking(|| async { Ok::<_, std::io::Error>(40 + 2) }).unwrap();
/// assert_eq!(answer, 42);
/// ```
pub fn run_blocking<F, Fut, T, E>(operation: F) -> std::result::Result<T, E>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = std::result::Result<T, E>>,
    T: Send + 'static,
    E: From<std::io::Error> + Send + 'static,
{
    let worker = thread::Builder::new()
        .name(WORKER_NAME.to_string())
        .spawn(move || -> std::result::Result<T, E> {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(operation())
        })?;

    match worker.join() {
        Ok(result) => result,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

/// Runs several operations concurrently on one worker and blocks until all
/// of them finish.
///
/// Results keep the order of `operations`. A single failure is returned as
/// is; several failures are returned together as [`Error::Composite`].
///
/// # Examples
///
/// ```
/// use restline::sync::run_blocking_all;
/// use restline::Error;
///
/// let ops: Vec<_> = (1..=3)
///     .map(|n| move || async move { Ok::<_, Error>(n * 10) })
///     .collect();
/// assert_eq!(run_blocking_all(ops).unwrap(), vec![10, 20, 30]);
/// ```
pub fn run_blocking_all<F, Fut, T>(operations: Vec<F>) -> Result<Vec<T>>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T>>,
    T: Send + 'static,
{
    let results = run_blocking(move || async move {
        let results = join_all(operations.into_iter().map(|operation| operation())).await;
        Ok::<_, Error>(results)
    })?;

    let mut values = Vec::with_capacity(results.len());
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(value) => values.push(value),
            Err(e) => errors.push(e),
        }
    }

    match errors.len() {
        0 => Ok(values),
        1 => Err(errors.remove(0)),
        _ => Err(Error::Composite(errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Debug, PartialEq)]
    enum InventoryError {
        OutOfStock(u32),
        Io(String),
    }

    impl From<std::io::Error> for InventoryError {
        fn from(e: std::io::Error) -> Self {
            InventoryError::Io(e.to_string())
        }
    }

    #[test]
    fn test_returns_value() {
        let value = run_blocking(|| async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok::<_, Error>("done".to_string())
        })
        .unwrap();
        assert_eq!(value, "done");
    }

    #[test]
    fn test_side_effect_only_operation() {
        let flag = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let seen = flag.clone();
        run_blocking(move || async move {
            seen.store(true, std::sync::atomic::Ordering::SeqCst);
            Ok::<(), Error>(())
        })
        .unwrap();
        assert!(flag.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[test]
    fn test_reraises_original_error_type() {
        let err = run_blocking(|| async { Err::<(), _>(InventoryError::OutOfStock(7)) })
            .unwrap_err();
        assert_eq!(err, InventoryError::OutOfStock(7));
    }

    #[test]
    fn test_runs_on_named_worker() {
        let name = run_blocking(|| async {
            Ok::<_, Error>(thread::current().name().map(str::to_string))
        })
        .unwrap();
        assert_eq!(name.as_deref(), Some(WORKER_NAME));
    }

    #[test]
    fn test_panic_is_resumed_on_caller() {
        let outcome = std::panic::catch_unwind(|| {
            run_blocking(|| async {
                if true {
                    panic!("observer exploded");
                }
                Ok::<(), Error>(())
            })
        });
        assert!(outcome.is_err());
    }

    #[tokio::test]
    async fn test_blocking_from_inside_runtime_does_not_deadlock() {
        let value = run_blocking(|| async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok::<_, Error>(3)
        })
        .unwrap();
        assert_eq!(value, 3);
    }

    #[test]
    fn test_single_failure_is_unwrapped() {
        let ops: Vec<_> = [true, false]
            .into_iter()
            .map(|fail| {
                move || async move {
                    if fail {
                        Err(Error::Timeout)
                    } else {
                        Ok(1)
                    }
                }
            })
            .collect();
        assert!(matches!(run_blocking_all(ops), Err(Error::Timeout)));
    }

    #[test]
    fn test_several_failures_are_composite() {
        let ops: Vec<_> = [true, true, false]
            .into_iter()
            .map(|fail| {
                move || async move {
                    if fail {
                        Err(Error::Cancelled)
                    } else {
                        Ok(())
                    }
                }
            })
            .collect();
        match run_blocking_all(ops) {
            Err(Error::Composite(errors)) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.iter().all(|e| matches!(e, Error::Cancelled)));
            }
            other => panic!("Expected Composite, got {:?}", other),
        }
    }
}
