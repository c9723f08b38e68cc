mod callback_entries;
mod callback_id;
mod callback_manager;
mod callback_manager_config;
mod callback_node;
mod name_callback_manager;

pub use callback_id::CallbackId;
pub use callback_manager::CallbackManager;
pub use callback_manager_config::CallbackManagerConfig;
pub use name_callback_manager::NameCallbackManager;

/// Callable stored in a registry.
pub type Callback<A> = Box<dyn Fn(&A) + Send + Sync + 'static>;
