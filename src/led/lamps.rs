//! 灯组输出
//!
//! 四路数字输出: A/B/C 三盏 LED 与第四路 D (循环末相位)。
//! LED 任务与按钮监视器都会写这些输出，`SharedLampBank` 用临界区互斥锁
//! 保证每次写入的原子性。

use core::cell::RefCell;
use core::fmt;

use embedded_hal::digital::{Error as _, ErrorKind, OutputPin};

use super::state::Transition;
use crate::sync::primitives::{new_blocking_mutex, CriticalBlockingMutex};

/// 输出通道
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "log-defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Lamp {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
}

impl Lamp {
    /// 按钮覆盖时点亮的三盏 LED
    pub const LEDS: [Lamp; 3] = [Self::A, Self::B, Self::C];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    const fn mask(self) -> u8 {
        1 << (self as u8)
    }
}

/// 输出点亮位图 (bit n 对应 `Lamp` 索引 n)
#[derive(Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "log-defmt", derive(defmt::Format))]
pub struct LampPattern(u8);

impl LampPattern {
    /// 全灭
    pub const NONE: Self = Self(0);

    /// A/B/C 全亮 (按钮覆盖)
    pub const ALL_LEDS: Self = Self(0b0111);

    /// 只点亮一路
    pub const fn only(lamp: Lamp) -> Self {
        Self(lamp.mask())
    }

    /// 返回修改一路后的位图
    pub const fn with(self, lamp: Lamp, on: bool) -> Self {
        if on {
            Self(self.0 | lamp.mask())
        } else {
            Self(self.0 & !lamp.mask())
        }
    }

    #[inline]
    pub const fn is_lit(self, lamp: Lamp) -> bool {
        self.0 & lamp.mask() != 0
    }
}

impl fmt::Debug for LampPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LampPattern({:04b})", self.0)
    }
}

/// 输出写入失败
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "log-defmt", derive(defmt::Format))]
pub struct LampError {
    /// 失败的通道
    pub lamp: Lamp,
    /// 引脚驱动报告的错误类别
    pub kind: ErrorKind,
}

impl fmt::Display for LampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lamp {:?} write failed: {:?}", self.lamp, self.kind)
    }
}

/// 四路输出引脚
///
/// 记录最后一次成功写入的电平，供日志和测试读取
pub struct LampBank<O> {
    pins: [O; 4],
    pattern: LampPattern,
}

impl<O: OutputPin> LampBank<O> {
    /// 按 A/B/C/D 顺序接管四个输出引脚
    ///
    /// 不改变引脚当前电平，调用方需以低电平初始化引脚
    pub fn new(a: O, b: O, c: O, d: O) -> Self {
        Self {
            pins: [a, b, c, d],
            pattern: LampPattern::NONE,
        }
    }

    /// 写一路输出
    pub fn set(&mut self, lamp: Lamp, on: bool) -> Result<(), LampError> {
        let pin = &mut self.pins[lamp.index()];
        let result = if on { pin.set_high() } else { pin.set_low() };
        result.map_err(|e| LampError {
            lamp,
            kind: e.kind(),
        })?;
        self.pattern = self.pattern.with(lamp, on);
        Ok(())
    }

    /// 应用一次转换: 先熄灭再点亮
    ///
    /// 两路都会尝试写入，返回第一个错误
    pub fn apply(&mut self, transition: &Transition) -> Result<(), LampError> {
        let cleared = self.set(transition.clear, false);
        let set = self.set(transition.set, true);
        cleared.and(set)
    }

    /// 点亮 A/B/C 三盏 LED，D 保持不变
    pub fn light_all_leds(&mut self) -> Result<(), LampError> {
        let mut first_err = None;
        for lamp in Lamp::LEDS {
            if let Err(e) = self.set(lamp, true) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// 最后一次成功写入后的位图
    #[inline]
    pub fn pattern(&self) -> LampPattern {
        self.pattern
    }

    #[cfg(test)]
    pub(crate) fn into_pins(self) -> [O; 4] {
        self.pins
    }
}

/// 跨上下文共享的灯组
///
/// 每次操作都在临界区内完成，中断执行器中的按钮监视器
/// 可以安全地与线程模式的 LED 任务交替写入
pub struct SharedLampBank<O> {
    inner: CriticalBlockingMutex<RefCell<LampBank<O>>>,
}

impl<O: OutputPin> SharedLampBank<O> {
    pub const fn new(bank: LampBank<O>) -> Self {
        Self {
            inner: new_blocking_mutex(RefCell::new(bank)),
        }
    }

    /// 在临界区内访问灯组
    pub fn with<R>(&self, f: impl FnOnce(&mut LampBank<O>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    pub fn apply(&self, transition: &Transition) -> Result<(), LampError> {
        self.with(|bank| bank.apply(transition))
    }

    pub fn light_all_leds(&self) -> Result<(), LampError> {
        self.with(|bank| bank.light_all_leds())
    }

    pub fn pattern(&self) -> LampPattern {
        self.with(|bank| bank.pattern())
    }
}
