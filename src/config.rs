use std::time::Duration;

/// Capacity of the request and response queues between callers and the worker.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub channel_capacity: usize,
    /// How long a caller waits for its response. `None` waits forever.
    pub request_timeout: Option<Duration>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            request_timeout: None,
        }
    }
}

impl WorkerConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}
