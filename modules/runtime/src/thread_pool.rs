mod pool_shared;
mod task_error;
mod task_handle;
#[allow(clippy::module_inception)]
mod thread_pool;
mod thread_pool_config;
mod thread_pool_error;
mod worker_role;

pub use task_error::TaskError;
pub use task_handle::TaskHandle;
pub use thread_pool::ThreadPool;
pub use thread_pool_config::ThreadPoolConfig;
pub use thread_pool_error::ThreadPoolError;
