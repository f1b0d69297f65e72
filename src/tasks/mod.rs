//! 任务模块
//!
//! 任务体与硬件无关，按 embedded-hal 特征泛型化，
//! 具体的 `#[embassy_executor::task]` 包装在固件入口中:
//! - `led_toggle`: LED 循环 (线程模式执行器)
//! - `button`: 按钮边沿监视 (高优先级执行器)
//! - `tick`: 周期信号源 (高优先级执行器，需要 `time` feature)
//! - `priority`: 任务优先级与控制接口

pub mod button;
pub mod led_toggle;
pub mod priority;
#[cfg(feature = "time")]
pub mod tick;

pub use button::run_button_monitor;
pub use led_toggle::LedToggle;
pub use priority::{PriorityControl, TaskPriority};
#[cfg(feature = "time")]
pub use tick::run_tick_producer;
