pub mod fetch;
pub mod orchestrator;
pub mod paginator;
pub mod processing;
pub mod queue;
pub mod validator;

pub use fetch::FetchProcessor;
pub use orchestrator::SyncOrchestrator;
pub use paginator::{OrderPaginator, PAGE_SIZE};
pub use processing::{LoggingOrderProcessor, OrderProcessor};
pub use queue::{sync_queue, SyncQueue, SyncWorkers, TaskDispatcher, WorkerStats};
pub use validator::ConfigurationValidator;
