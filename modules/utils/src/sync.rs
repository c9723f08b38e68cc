mod count_down_latch;
mod event;

pub use count_down_latch::CountDownLatch;
pub use event::Event;
