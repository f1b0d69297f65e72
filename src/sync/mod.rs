//! 同步原语模块
//!
//! 提供跨执行上下文的同步原语，基于 embassy-sync 封装:
//! - `CountingSemaphore`: 计数信号量 (定时器 -> LED 任务)
//! - `TaskGate`: 可挂起的任务调度门 (按钮 -> LED 任务)
//! - `CriticalBlockingMutex`: 临界区阻塞互斥锁 (共享 GPIO 输出)

pub mod gate;
pub mod primitives;
pub mod semaphore;

pub use gate::TaskGate;
pub use primitives::{CriticalBlockingMutex, TaskWaker};
pub use semaphore::CountingSemaphore;
