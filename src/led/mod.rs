//! LED 模块
//!
//! - `state`: 四相循环状态机与转换表
//! - `lamps`: 四路输出与跨上下文共享封装

pub mod lamps;
pub mod state;

pub use lamps::{Lamp, LampBank, LampError, LampPattern, SharedLampBank};
pub use state::{LedState, LedStateMachine, Transition, TRANSITIONS};
