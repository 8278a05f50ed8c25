//! Bounded fan-out of fetch tasks
//!
//! This module handles:
//! - Global concurrency limiting via a semaphore
//! - Collecting task results as they complete
//!
//! Tasks are spawned eagerly but only start their work once they hold a
//! permit, so at most `concurrency_limit` of them make progress at a time.

use crate::{GrinderError, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{AcquireError, Semaphore};
use tokio::task::JoinSet;

/// Runs futures with at most `concurrency_limit` in flight
///
/// Results are handed back in completion order through
/// [`Scheduler::next_completed`]. Dropping the scheduler aborts any task
/// that has not finished.
pub struct Scheduler<T> {
    /// Global semaphore for limiting concurrent fetches
    semaphore: Arc<Semaphore>,

    /// Spawned tasks, finished or not
    tasks: JoinSet<std::result::Result<T, AcquireError>>,

    concurrency_limit: usize,
}

impl<T: Send + 'static> Scheduler<T> {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `concurrency_limit` - Maximum number of tasks doing work at once (at least 1)
    pub fn new(concurrency_limit: usize) -> Self {
        let concurrency_limit = concurrency_limit.max(1);

        Self {
            semaphore: Arc::new(Semaphore::new(concurrency_limit)),
            tasks: JoinSet::new(),
            concurrency_limit,
        }
    }

    /// Spawns a task that runs `work` once it holds a permit
    pub fn spawn<F>(&mut self, work: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        let semaphore = Arc::clone(&self.semaphore);
        self.tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            Ok::<T, AcquireError>(work.await)
        });
    }

    /// Waits for the next task to finish
    ///
    /// # Returns
    ///
    /// * `None` - Every spawned task has been collected
    /// * `Some(Ok(T))` - Output of the task that finished
    /// * `Some(Err(GrinderError::Scheduler))` - The task panicked, was
    ///   cancelled, or could not acquire a permit
    pub async fn next_completed(&mut self) -> Option<Result<T>> {
        let joined = self.tasks.join_next().await?;

        Some(match joined {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(_)) => Err(GrinderError::Scheduler(
                "concurrency semaphore closed".to_string(),
            )),
            Err(e) => Err(GrinderError::Scheduler(format!("fetch task failed: {}", e))),
        })
    }

    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit
    }
}
