//! 按钮监视器
//!
//! 按下: 挂起 LED 任务并点亮 A/B/C 三盏 LED。
//! 松开: 恢复 LED 任务的正常优先级，不触碰输出；
//! 下一次信号从按下前的相位继续。

use embedded_hal::digital::OutputPin;

use crate::led::{LampError, SharedLampBank};
use crate::tasks::priority::PriorityControl;

/// 按钮电平
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "log-defmt", derive(defmt::Format))]
pub enum ButtonLevel {
    Released,
    Pressed,
}

impl ButtonLevel {
    /// 由引脚电平换算，`active_high` 为真时高电平表示按下
    #[inline]
    pub const fn from_pin(is_high: bool, active_high: bool) -> Self {
        if is_high == active_high {
            Self::Pressed
        } else {
            Self::Released
        }
    }

    #[inline]
    pub const fn is_pressed(self) -> bool {
        matches!(self, Self::Pressed)
    }
}

/// 一次边沿处理所采取的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "log-defmt", derive(defmt::Format))]
pub enum ButtonAction {
    /// LED 任务已挂起，三盏 LED 已点亮
    Suppressed,
    /// LED 任务已恢复
    Resumed,
}

/// 按钮监视器
///
/// 可在中断上下文中运行: 所有操作都不阻塞
pub struct ButtonMonitor<'a, O, P> {
    lamps: &'a SharedLampBank<O>,
    control: P,
}

impl<'a, O: OutputPin, P: PriorityControl> ButtonMonitor<'a, O, P> {
    pub fn new(lamps: &'a SharedLampBank<O>, control: P) -> Self {
        Self { lamps, control }
    }

    /// 处理一次边沿后的电平采样
    ///
    /// 按下时先挂起任务再点灯，点灯失败时任务仍保持挂起。
    /// 只有按下会写输出，因此错误总是对应 `Suppressed`
    pub fn on_edge(&self, level: ButtonLevel) -> Result<ButtonAction, LampError> {
        match level {
            ButtonLevel::Pressed => {
                self.control.set_suspended();
                self.lamps.light_all_leds()?;
                Ok(ButtonAction::Suppressed)
            }
            ButtonLevel::Released => {
                self.control.set_normal();
                Ok(ButtonAction::Resumed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::led::lamps::mock::bank;
    use crate::led::{Lamp, LampPattern, LedState};
    use crate::sync::TaskGate;
    use crate::tasks::priority::TaskPriority;

    #[test]
    fn test_level_from_pin() {
        assert_eq!(ButtonLevel::from_pin(true, true), ButtonLevel::Pressed);
        assert_eq!(ButtonLevel::from_pin(false, true), ButtonLevel::Released);
        assert_eq!(ButtonLevel::from_pin(false, false), ButtonLevel::Pressed);
        assert_eq!(ButtonLevel::from_pin(true, false), ButtonLevel::Released);
    }

    #[test]
    fn test_press_suspends_and_lights_leds() {
        let lamps = SharedLampBank::new(bank());
        let gate = TaskGate::default();
        let monitor = ButtonMonitor::new(&lamps, &gate);

        lamps.apply(&LedState::S2.transition()).unwrap();
        let action = monitor.on_edge(ButtonLevel::Pressed);

        assert_eq!(action, Ok(ButtonAction::Suppressed));
        assert!(!gate.is_schedulable());
        assert_eq!(lamps.pattern(), LampPattern::ALL_LEDS);
    }

    #[test]
    fn test_release_restores_priority_without_touching_outputs() {
        let lamps = SharedLampBank::new(bank());
        let gate = TaskGate::default();
        let monitor = ButtonMonitor::new(&lamps, &gate);

        monitor.on_edge(ButtonLevel::Pressed).unwrap();
        let action = monitor.on_edge(ButtonLevel::Released);

        assert_eq!(action, Ok(ButtonAction::Resumed));
        assert_eq!(gate.priority(), TaskPriority::NORMAL);
        assert_eq!(lamps.pattern(), LampPattern::ALL_LEDS);
    }

    #[test]
    fn test_repeated_release_is_idempotent() {
        let lamps = SharedLampBank::new(bank());
        let gate = TaskGate::default();
        let monitor = ButtonMonitor::new(&lamps, &gate);

        lamps.apply(&LedState::S0.transition()).unwrap();
        for _ in 0..3 {
            monitor.on_edge(ButtonLevel::Released).unwrap();
            assert_eq!(gate.priority(), TaskPriority::NORMAL);
            assert_eq!(lamps.pattern(), LampPattern::only(Lamp::A));
        }
    }

    #[test]
    fn test_press_keeps_task_suspended_when_leds_fail() {
        use crate::led::lamps::mock::FlakyPin;
        use crate::led::{LampBank, LampError};
        use embedded_hal::digital::ErrorKind;

        let lamps = SharedLampBank::new(LampBank::new(
            FlakyPin::default(),
            FlakyPin::default(),
            FlakyPin { high: false, broken: true },
            FlakyPin::default(),
        ));
        let gate = TaskGate::default();
        let monitor = ButtonMonitor::new(&lamps, &gate);

        let result = monitor.on_edge(ButtonLevel::Pressed);
        assert_eq!(result, Err(LampError { lamp: Lamp::C, kind: ErrorKind::Other }));
        assert!(!gate.is_schedulable());
    }
}
