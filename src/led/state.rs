//! LED 状态机
//!
//! 四相循环 0 → 1 → 2 → 3 → 0。每收到一次信号，应用当前相位的
//! 转换行 (熄灭上一盏、点亮本盏)，然后前进到下一相位。

use super::lamps::Lamp;

/// LED 循环相位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "log-defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LedState {
    #[default]
    S0 = 0,
    S1 = 1,
    S2 = 2,
    S3 = 3,
}

impl LedState {
    /// 从状态 0 出发经过 `n` 次转换后的相位
    pub const fn after(n: u32) -> Self {
        match n % 4 {
            0 => Self::S0,
            1 => Self::S1,
            2 => Self::S2,
            _ => Self::S3,
        }
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// 循环中的下一相位
    #[inline]
    pub const fn next(self) -> Self {
        TRANSITIONS[self as usize].next
    }

    /// 本相位对应的转换行
    #[inline]
    pub const fn transition(self) -> Transition {
        TRANSITIONS[self as usize]
    }
}

/// 一次转换要写入的两路输出
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "log-defmt", derive(defmt::Format))]
pub struct Transition {
    /// 熄灭的输出 (上一相位点亮的那一路)
    pub clear: Lamp,
    /// 点亮的输出
    pub set: Lamp,
    /// 下一相位
    pub next: LedState,
}

/// 转换表，按相位索引
///
/// 第 3 相熄灭 C 并点亮 D，A 在下一次信号 (第 0 相) 时才重新点亮
pub const TRANSITIONS: [Transition; 4] = [
    Transition { clear: Lamp::D, set: Lamp::A, next: LedState::S1 },
    Transition { clear: Lamp::A, set: Lamp::B, next: LedState::S2 },
    Transition { clear: Lamp::B, set: Lamp::C, next: LedState::S3 },
    Transition { clear: Lamp::C, set: Lamp::D, next: LedState::S0 },
];

/// LED 状态机
///
/// 由 LED 任务独占持有，按钮监视器不读也不写
#[derive(Debug, Default)]
pub struct LedStateMachine {
    state: LedState,
    transitions: u32,
}

impl LedStateMachine {
    /// 从相位 0 开始
    pub const fn new() -> Self {
        Self::starting_at(LedState::S0)
    }

    /// 从指定相位开始
    pub const fn starting_at(state: LedState) -> Self {
        Self {
            state,
            transitions: 0,
        }
    }

    /// 当前相位
    #[inline]
    pub fn state(&self) -> LedState {
        self.state
    }

    /// 已完成的转换次数 (回绕)
    #[inline]
    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    /// 取出当前相位的转换行并前进一步
    pub fn advance(&mut self) -> Transition {
        let transition = self.state.transition();
        self.state = transition.next;
        self.transitions = self.transitions.wrapping_add(1);
        transition
    }
}
