// ABOUTME: Background work queue abstraction used by the worker fetch strategies
// ABOUTME: Default implementation runs jobs on tokio's blocking thread pool

use tokio::runtime::Handle;

pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Somewhere to run blocking jobs off the caller's thread.
pub trait WorkQueue: Send + Sync {
    fn dispatch(&self, job: Job);
}

/// Runs each job on the runtime's blocking pool.
#[derive(Debug, Clone)]
pub struct BlockingPool {
    runtime: Handle,
}

impl BlockingPool {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }
}

impl WorkQueue for BlockingPool {
    fn dispatch(&self, job: Job) {
        // Detached: jobs report through their own completion.
        drop(self.runtime.spawn_blocking(job));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_blocking_pool_runs_job_off_caller_thread() {
        let pool = BlockingPool::new(Handle::current());
        let caller = std::thread::current().id();
        let (tx, rx) = mpsc::channel();

        pool.dispatch(Box::new(move || {
            let _ = tx.send(std::thread::current().id());
        }));

        let worker = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
            .await
            .unwrap()
            .unwrap();
        assert_ne!(worker, caller);
    }
}
