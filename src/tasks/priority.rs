//! 任务优先级控制
//!
//! 按钮监视器通过 `PriorityControl` 抑制或恢复 LED 任务，
//! 不直接持有任务句柄。

use crate::config;

/// 任务优先级
///
/// 与 RTOS 相同的有符号等级: 负值表示任务不参与调度，
/// 零及以上均可调度。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "log-defmt", derive(defmt::Format))]
pub struct TaskPriority(i8);

impl TaskPriority {
    /// 禁用等级，永远不会被调度
    pub const DISABLED: Self = Self(config::LED_TASK_DISABLED_PRIORITY);

    /// 正常运行等级
    pub const NORMAL: Self = Self(config::LED_TASK_NORMAL_PRIORITY);

    pub const fn new(raw: i8) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> i8 {
        self.0
    }

    #[inline]
    pub const fn is_schedulable(self) -> bool {
        self.0 >= 0
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// 注入给按钮监视器的优先级控制能力
///
/// 实现必须可在中断上下文调用且不阻塞
pub trait PriorityControl {
    /// 设置被控任务的优先级
    fn set_priority(&self, priority: TaskPriority);

    /// 读取被控任务的当前优先级
    fn priority(&self) -> TaskPriority;

    /// 挂起: 降到不可调度等级
    fn set_suspended(&self) {
        self.set_priority(TaskPriority::DISABLED);
    }

    /// 恢复: 回到正常运行等级
    fn set_normal(&self) {
        self.set_priority(TaskPriority::NORMAL);
    }
}

impl<T: PriorityControl + ?Sized> PriorityControl for &T {
    fn set_priority(&self, priority: TaskPriority) {
        (**self).set_priority(priority)
    }

    fn priority(&self) -> TaskPriority {
        (**self).priority()
    }
}
