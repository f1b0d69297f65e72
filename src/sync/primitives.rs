//! 同步原语封装
//!
//! 基于 embassy-sync 提供的同步原语，统一使用 CriticalSectionRawMutex
//! 以确保在线程模式与中断执行器之间共享时的正确性

use embassy_sync::{
    blocking_mutex::{raw::CriticalSectionRawMutex, Mutex},
    waitqueue::AtomicWaker,
};

// ===== 类型别名: 简化使用 =====

/// 临界区阻塞互斥锁 - 用于中断上下文与任务上下文共享的短操作
///
/// 持锁期间禁用中断，闭包内不能 await
///
/// # Example
/// ```ignore
/// static SHARED: CriticalBlockingMutex<RefCell<u32>> =
///     CriticalBlockingMutex::new(RefCell::new(0));
///
/// SHARED.lock(|cell| *cell.borrow_mut() += 1);
/// ```
pub type CriticalBlockingMutex<T> = Mutex<CriticalSectionRawMutex, T>;

/// 单等待者唤醒器 - 中断上下文唤醒一个异步任务
///
/// embassy-sync 的 `AtomicWaker` 内部已使用临界区
pub type TaskWaker = AtomicWaker;

// ===== 便捷构造函数 =====

/// 创建新的阻塞互斥锁
#[inline]
pub const fn new_blocking_mutex<T>(value: T) -> CriticalBlockingMutex<T> {
    Mutex::new(value)
}
