mod absolute_target;
mod absolute_timer;
mod absolute_timer_task;
mod rearm_policy;
mod relative_timer;
mod relative_timer_task;
mod steady_clock;
mod task_index;
mod timer_clock;
mod timer_config;
mod timer_engine;
mod timer_error;
mod timer_task;
mod timer_task_id;
mod wall_clock;

pub use absolute_target::AbsoluteTarget;
pub use absolute_timer::AbsoluteTimer;
pub use relative_timer::RelativeTimer;
pub use timer_config::TimerConfig;
pub use timer_error::TimerError;
pub use timer_task_id::TimerTaskId;
