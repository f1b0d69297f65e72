//! 计数信号量
//!
//! 单等待者计数信号量，对应 RTOS 的 `Semaphore_post` / `Semaphore_pend`:
//! - `post`: 计数加一并唤醒等待者，可在中断上下文调用，永不阻塞
//! - `pend`: 计数为零时异步等待，否则减一立即返回
//!
//! 多次 post 会全部累计，每次 pend 只消费一个，不会丢失信号

use core::future::poll_fn;
use core::task::Poll;

use portable_atomic::{AtomicU32, Ordering};

use super::primitives::TaskWaker;

/// 计数信号量
///
/// 只允许一个任务调用 `pend`，第二个等待者会覆盖第一个的 waker
///
/// # Example
/// ```ignore
/// static TICK: CountingSemaphore = CountingSemaphore::new(0);
///
/// // 定时器上下文
/// TICK.post();
///
/// // 任务上下文
/// TICK.pend().await;
/// ```
pub struct CountingSemaphore {
    count: AtomicU32,
    waker: TaskWaker,
}

impl CountingSemaphore {
    /// 创建信号量，`initial` 为初始计数
    pub const fn new(initial: u32) -> Self {
        Self {
            count: AtomicU32::new(initial),
            waker: TaskWaker::new(),
        }
    }

    /// 发布一次信号
    ///
    /// 计数在 `u32::MAX` 处饱和
    #[inline]
    pub fn post(&self) {
        let _ = self
            .count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| Some(n.saturating_add(1)));
        self.waker.wake();
    }

    /// 非阻塞获取: 计数大于零时减一并返回 `true`
    #[inline]
    pub fn try_pend(&self) -> bool {
        self.count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }

    /// 等待一次信号 (无超时)
    pub async fn pend(&self) {
        poll_fn(|cx| {
            if self.try_pend() {
                return Poll::Ready(());
            }
            self.waker.register(cx.waker());
            // 注册后再检查一次，避免错过注册前到达的 post
            if self.try_pend() {
                Poll::Ready(())
            } else {
                Poll::Pending
            }
        })
        .await
    }

    /// 当前未消费的信号数
    #[inline]
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Acquire)
    }
}

impl Default for CountingSemaphore {
    fn default() -> Self {
        Self::new(0)
    }
}
