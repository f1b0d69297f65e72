//! 任务调度门
//!
//! 用优先级值模拟 RTOS 的 `Task_setPri`: 优先级低于零的任务不会被调度。
//! Embassy 执行器没有运行时可调的任务优先级，因此被控任务在每次运行前
//! 通过 `wait_schedulable` 检查门状态，被禁用时挂起且保留全部状态。

use core::future::poll_fn;
use core::task::Poll;

use portable_atomic::{AtomicI8, Ordering};

use super::primitives::TaskWaker;
use crate::tasks::priority::{PriorityControl, TaskPriority};

/// 单任务调度门
///
/// 由中断上下文修改优先级，由被控任务等待
pub struct TaskGate {
    priority: AtomicI8,
    waker: TaskWaker,
}

impl TaskGate {
    /// 创建调度门，`initial` 为初始优先级
    pub const fn new(initial: TaskPriority) -> Self {
        Self {
            priority: AtomicI8::new(initial.raw()),
            waker: TaskWaker::new(),
        }
    }

    /// 当前优先级是否允许调度
    #[inline]
    pub fn is_schedulable(&self) -> bool {
        self.priority().is_schedulable()
    }

    /// 等待直到任务可被调度
    ///
    /// 门已打开时立即返回
    pub async fn wait_schedulable(&self) {
        poll_fn(|cx| {
            if self.is_schedulable() {
                return Poll::Ready(());
            }
            self.waker.register(cx.waker());
            if self.is_schedulable() {
                Poll::Ready(())
            } else {
                Poll::Pending
            }
        })
        .await
    }
}

impl PriorityControl for TaskGate {
    fn set_priority(&self, priority: TaskPriority) {
        self.priority.store(priority.raw(), Ordering::Release);
        if priority.is_schedulable() {
            self.waker.wake();
        }
    }

    fn priority(&self) -> TaskPriority {
        TaskPriority::new(self.priority.load(Ordering::Acquire))
    }
}

impl Default for TaskGate {
    fn default() -> Self {
        Self::new(TaskPriority::NORMAL)
    }
}
