//! LED 循环任务
//!
//! 系统中唯一会阻塞的上下文: 无限期等待计数信号量，
//! 每收到一次信号推进一步状态机并写两路输出。

use embedded_hal::digital::OutputPin;

use crate::config;
use crate::led::{LedState, LedStateMachine, SharedLampBank};
use crate::sync::{CountingSemaphore, TaskGate};
use crate::util::log::*;

/// LED 循环任务体
///
/// 独占持有状态机；灯组、信号量与调度门由外部静态分配后借入
pub struct LedToggle<'a, O> {
    machine: LedStateMachine,
    lamps: &'a SharedLampBank<O>,
    tick: &'a CountingSemaphore,
    gate: &'a TaskGate,
}

impl<'a, O: OutputPin> LedToggle<'a, O> {
    pub fn new(
        lamps: &'a SharedLampBank<O>,
        tick: &'a CountingSemaphore,
        gate: &'a TaskGate,
    ) -> Self {
        Self::with_machine(LedStateMachine::new(), lamps, tick, gate)
    }

    pub fn with_machine(
        machine: LedStateMachine,
        lamps: &'a SharedLampBank<O>,
        tick: &'a CountingSemaphore,
        gate: &'a TaskGate,
    ) -> Self {
        Self {
            machine,
            lamps,
            tick,
            gate,
        }
    }

    pub fn machine(&self) -> &LedStateMachine {
        &self.machine
    }

    /// 执行一轮: 等待调度门 → 等待信号 → 转换
    ///
    /// 挂起期间不取信号，信号量计数保持不变；future 在任何等待点
    /// 被丢弃都不会丢失信号。返回转换后的相位
    pub async fn step(&mut self) -> LedState {
        let from = self.machine.state();

        loop {
            if !self.gate.is_schedulable() {
                log_debug!("LED task suspended, holding state {}", from.index());
                self.gate.wait_schedulable().await;
            }

            self.tick.pend().await;

            // 调度门在临界区内复查: 按下与转换互斥，按下后不会再熄灭任何一盏
            let gate = self.gate;
            let machine = &mut self.machine;
            let applied = self.lamps.with(|bank| {
                if !gate.is_schedulable() {
                    return None;
                }
                let transition = machine.advance();
                Some(bank.apply(&transition))
            });

            match applied {
                Some(Ok(())) => break,
                Some(Err(e)) => {
                    log_error!("LED transition {} failed: {}", from.index(), e);
                    break;
                }
                // 取到信号后才被挂起: 归还信号，恢复后再处理
                None => self.tick.post(),
            }
        }

        let to = self.machine.state();
        log_trace!("LED state {} -> {}", from.index(), to.index());

        let count = self.machine.transitions();
        if count % config::TRANSITION_LOG_INTERVAL == 0 {
            log_debug!("LED task: {} transitions, {} pending", count, self.tick.count());
        }

        to
    }

    /// 任务主循环，永不返回
    pub async fn run(&mut self) -> ! {
        log_info!("LED toggle task started at state {}", self.machine.state().index());

        loop {
            self.step().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::{ButtonLevel, ButtonMonitor};
    use crate::led::lamps::mock::bank;
    use crate::led::{Lamp, LampPattern};
    use crate::tasks::priority::PriorityControl;
    use embassy_futures::block_on;
    use embassy_futures::select::{select, Either};
    use embassy_futures::yield_now;

    async fn idle(polls: usize) {
        for _ in 0..polls {
            yield_now().await;
        }
    }

    #[test]
    fn test_step_waits_for_signal() {
        let lamps = SharedLampBank::new(bank());
        let tick = CountingSemaphore::new(0);
        let gate = TaskGate::default();
        let mut task = LedToggle::new(&lamps, &tick, &gate);

        let result = block_on(select(task.step(), idle(8)));
        assert!(matches!(result, Either::Second(())));
        assert_eq!(task.machine().state(), LedState::S0);
        assert_eq!(lamps.pattern(), LampPattern::NONE);
    }

    #[test]
    fn test_signal_sequence_drives_table() {
        let lamps = SharedLampBank::new(bank());
        let tick = CountingSemaphore::new(0);
        let gate = TaskGate::default();
        let mut task = LedToggle::new(&lamps, &tick, &gate);

        let expected = [
            (LedState::S1, LampPattern::only(Lamp::A)),
            (LedState::S2, LampPattern::only(Lamp::B)),
            (LedState::S3, LampPattern::only(Lamp::C)),
            (LedState::S0, LampPattern::only(Lamp::D)),
            (LedState::S1, LampPattern::only(Lamp::A)),
        ];
        for (state, pattern) in expected {
            tick.post();
            assert_eq!(block_on(task.step()), state);
            assert_eq!(lamps.pattern(), pattern);
        }
    }

    #[test]
    fn test_state_zero_signal() {
        let lamps = SharedLampBank::new(bank());
        let tick = CountingSemaphore::new(1);
        let gate = TaskGate::default();
        let mut task = LedToggle::new(&lamps, &tick, &gate);

        assert_eq!(block_on(task.step()), LedState::S1);
        assert!(lamps.pattern().is_lit(Lamp::A));
        assert!(!lamps.pattern().is_lit(Lamp::D));
    }

    #[test]
    fn test_state_three_signal_wraps_to_zero() {
        let lamps = SharedLampBank::new(bank());
        lamps.apply(&LedState::S2.transition()).unwrap();
        let tick = CountingSemaphore::new(1);
        let gate = TaskGate::default();
        let mut task =
            LedToggle::with_machine(LedStateMachine::starting_at(LedState::S3), &lamps, &tick, &gate);

        assert_eq!(block_on(task.step()), LedState::S0);
        assert!(!lamps.pattern().is_lit(Lamp::C));
        assert!(!lamps.pattern().is_lit(Lamp::A));
        assert!(lamps.pattern().is_lit(Lamp::D));
    }

    #[test]
    fn test_queued_signals_are_all_honored() {
        let lamps = SharedLampBank::new(bank());
        let tick = CountingSemaphore::new(0);
        let gate = TaskGate::default();
        let mut task = LedToggle::new(&lamps, &tick, &gate);

        for _ in 0..7 {
            tick.post();
        }
        for n in 1..=7 {
            assert_eq!(block_on(task.step()), LedState::after(n));
        }
        assert_eq!(tick.count(), 0);
        assert_eq!(task.machine().transitions(), 7);
    }

    #[test]
    fn test_suspended_task_does_not_transition() {
        let lamps = SharedLampBank::new(bank());
        let tick = CountingSemaphore::new(0);
        let gate = TaskGate::default();
        let mut task = LedToggle::new(&lamps, &tick, &gate);

        gate.set_suspended();
        tick.post();

        let result = block_on(select(task.step(), idle(8)));
        assert!(matches!(result, Either::Second(())));
        assert_eq!(task.machine().state(), LedState::S0);
        assert_eq!(lamps.pattern(), LampPattern::NONE);
    }

    #[test]
    fn test_dropped_step_while_suspended_keeps_signal() {
        let lamps = SharedLampBank::new(bank());
        let tick = CountingSemaphore::new(0);
        let gate = TaskGate::default();
        let mut task = LedToggle::new(&lamps, &tick, &gate);

        gate.set_suspended();
        tick.post();

        let result = block_on(select(task.step(), idle(4)));
        assert!(matches!(result, Either::Second(())));
        assert_eq!(tick.count(), 1);

        gate.set_normal();
        assert_eq!(block_on(task.step()), LedState::S1);
        assert_eq!(tick.count(), 0);
    }

    #[test]
    fn test_press_after_wakeup_does_not_override_leds() {
        let lamps = SharedLampBank::new(bank());
        let tick = CountingSemaphore::new(0);
        let gate = TaskGate::default();
        let monitor = ButtonMonitor::new(&lamps, &gate);
        let mut task = LedToggle::new(&lamps, &tick, &gate);

        // 任务已在等待信号，此时信号与按下几乎同时到达
        let result = block_on(select(task.step(), async {
            idle(2).await;
            tick.post();
            monitor.on_edge(ButtonLevel::Pressed).unwrap();
            idle(8).await;
        }));
        assert!(matches!(result, Either::Second(())));
        assert_eq!(task.machine().state(), LedState::S0);
        assert_eq!(lamps.pattern(), LampPattern::ALL_LEDS);
        assert_eq!(tick.count(), 1);

        monitor.on_edge(ButtonLevel::Released).unwrap();
        assert_eq!(block_on(task.step()), LedState::S1);
        assert_eq!(task.machine().transitions(), 1);
    }

    #[test]
    fn test_press_and_release_resume_from_held_state() {
        let lamps = SharedLampBank::new(bank());
        let tick = CountingSemaphore::new(0);
        let gate = TaskGate::default();
        let monitor = ButtonMonitor::new(&lamps, &gate);
        let mut task = LedToggle::new(&lamps, &tick, &gate);

        // 推进到相位 2
        tick.post();
        tick.post();
        block_on(task.step());
        block_on(task.step());
        assert_eq!(task.machine().state(), LedState::S2);

        // 按下: 三盏全亮，任务不再调度
        monitor.on_edge(ButtonLevel::Pressed).unwrap();
        assert_eq!(lamps.pattern(), LampPattern::ALL_LEDS);
        assert!(!gate.is_schedulable());

        // 按住期间没有转换
        let result = block_on(select(task.step(), idle(8)));
        assert!(matches!(result, Either::Second(())));
        assert_eq!(task.machine().state(), LedState::S2);

        // 松开: 下一次信号执行 2 -> 3
        monitor.on_edge(ButtonLevel::Released).unwrap();
        tick.post();
        assert_eq!(block_on(task.step()), LedState::S3);
        assert!(!lamps.pattern().is_lit(Lamp::B));
        assert!(lamps.pattern().is_lit(Lamp::C));
    }

    #[test]
    fn test_signal_during_press_is_honored_after_release() {
        let lamps = SharedLampBank::new(bank());
        let tick = CountingSemaphore::new(0);
        let gate = TaskGate::default();
        let monitor = ButtonMonitor::new(&lamps, &gate);
        let mut task = LedToggle::new(&lamps, &tick, &gate);

        monitor.on_edge(ButtonLevel::Pressed).unwrap();
        tick.post();

        let result = block_on(select(task.step(), async {
            idle(4).await;
            monitor.on_edge(ButtonLevel::Released).unwrap();
            loop {
                yield_now().await;
            }
        }));
        assert!(matches!(result, Either::First(LedState::S1)));
        assert_eq!(task.machine().transitions(), 1);
    }
}
