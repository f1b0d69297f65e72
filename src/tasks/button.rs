//! 按钮边沿任务
//!
//! 等待输入引脚的任一边沿 (上升或下降)，随后采样电平并交给
//! `ButtonMonitor`。运行在高优先级执行器上，除等待边沿外不阻塞。

use embedded_hal::digital::{Error as _, InputPin, OutputPin};
use embedded_hal_async::digital::Wait;

use crate::button::{ButtonAction, ButtonLevel, ButtonMonitor};
use crate::config;
use crate::tasks::priority::PriorityControl;
use crate::util::log::*;

/// 处理一次边沿: 采样电平并执行监视器动作
///
/// 读取失败时返回 `None`，不改变任何状态
pub fn handle_edge<I, O, P>(input: &mut I, monitor: &ButtonMonitor<'_, O, P>) -> Option<ButtonAction>
where
    I: InputPin,
    O: OutputPin,
    P: PriorityControl,
{
    let is_high = match input.is_high() {
        Ok(level) => level,
        Err(e) => {
            log_warn!("Button read failed: {:?}", e.kind());
            return None;
        }
    };

    let level = ButtonLevel::from_pin(is_high, config::BUTTON_ACTIVE_HIGH);
    match monitor.on_edge(level) {
        Ok(action) => {
            match action {
                ButtonAction::Suppressed => log_info!("Button pressed: LED task suspended"),
                ButtonAction::Resumed => log_info!("Button released: LED task resumed"),
            }
            Some(action)
        }
        Err(e) => {
            log_error!("Button override failed: {}", e);
            Some(ButtonAction::Suppressed)
        }
    }
}

/// 按钮监视主循环，永不返回
pub async fn run_button_monitor<I, O, P>(mut input: I, monitor: ButtonMonitor<'_, O, P>) -> !
where
    I: InputPin + Wait,
    O: OutputPin,
    P: PriorityControl,
{
    log_info!("Button monitor started (both edges)");

    loop {
        if let Err(e) = input.wait_for_any_edge().await {
            log_warn!("Button edge wait failed: {:?}", e.kind());
            continue;
        }
        handle_edge(&mut input, &monitor);
    }
}
