//! 周期信号源
//!
//! 按固定周期向计数信号量发布信号，相当于定时器中断里的
//! `Semaphore_post`。只发布，不等待消费者。

use embassy_time::{Duration, Ticker};

use crate::sync::CountingSemaphore;
use crate::util::log::*;

/// 信号源主循环，永不返回
///
/// 使用 `Ticker` 保证周期不随处理时间漂移
pub async fn run_tick_producer(tick: &CountingSemaphore, period: Duration) -> ! {
    log_info!("Tick producer started ({}ms period)", period.as_millis());

    let mut ticker = Ticker::every(period);
    loop {
        ticker.next().await;
        tick.post();
    }
}
