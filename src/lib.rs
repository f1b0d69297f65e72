//! blinkrtos - ESP32-S3 LED 轮转演示库
//!
//! 本库提供以下核心功能:
//! - 四相 LED 循环状态机 (计数信号量驱动)
//! - 按钮覆盖: 按下时挂起 LED 任务并点亮全部 LED
//! - 跨执行上下文的同步原语 (基于 embassy-sync)
//! - 条件编译日志系统
//!
//! 任务体按 embedded-hal 特征泛型化，可在主机上测试；
//! 硬件装配见固件入口 `main.rs`。

#![cfg_attr(not(test), no_std)]

pub mod button;
pub mod led;
pub mod sync;
pub mod tasks;
pub mod util;

// ===== 重导出常用类型 =====
pub use button::{ButtonAction, ButtonLevel, ButtonMonitor};
pub use led::{Lamp, LampBank, LampError, LampPattern, LedState, LedStateMachine, SharedLampBank};
pub use sync::{CountingSemaphore, TaskGate};
pub use tasks::{LedToggle, PriorityControl, TaskPriority};

// ===== 版本信息 =====
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// 系统配置常量 (编译期)
pub mod config {
    /// 定时信号周期 (ms)
    pub const TICK_PERIOD_MS: u64 = 500;

    /// LED A 引脚
    pub const LED_A_GPIO: u8 = 9;

    /// LED B 引脚
    pub const LED_B_GPIO: u8 = 11;

    /// LED C 引脚
    /// N16R8 的 GPIO33~37 被 Octal PSRAM 占用
    pub const LED_C_GPIO: u8 = 38;

    /// 第四路输出 (循环末相位)
    pub const LED_D_GPIO: u8 = 41;

    /// 按钮输入引脚 (硬件消抖，双边沿触发)
    pub const BUTTON_GPIO: u8 = 17;

    /// 高电平表示按下
    pub const BUTTON_ACTIVE_HIGH: bool = true;

    /// LED 任务正常优先级
    pub const LED_TASK_NORMAL_PRIORITY: i8 = 1;

    /// LED 任务禁用优先级 (不参与调度)
    pub const LED_TASK_DISABLED_PRIORITY: i8 = -1;

    /// 信号源执行器的中断等级 (定时器与按钮任务)
    pub const SIGNAL_EXECUTOR_PRIORITY: u8 = 3;

    /// 每隔多少次转换输出一次 debug 日志
    pub const TRANSITION_LOG_INTERVAL: u32 = 16;
}
