//! 执行机构 trait 定义
//!
//! 每个 trait 对应机器人上一个独立的执行子系统。约定：
//!
//! - 返回 `bool` 的方法是"移动到目标"类操作：每个控制周期调用一次，
//!   返回 `true` 表示已到达/完成，调用方在到达前必须每周期重复调用
//!   （底层电机需要持续供给指令，否则触发电机安全保护）。
//! - `speed` 参数为 0.0..=1.0 的比例值；方向由各方法语义或
//!   [`Direction`] 参数决定。
//! - 定时类移动（`*_timed`）依赖实现内部的计时器，发起新一轮定时移动
//!   之前调用方必须先调用对应的 `reset_timer()`。

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

/// 移动方向
///
/// 自动脚本以数值形式携带方向参数，借助 `num_enum` 在边界处转换。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoPrimitive, TryFromPrimitive,
)]
#[repr(u8)]
pub enum Direction {
    Left = 0,
    Right = 1,
    Forward = 2,
    Backward = 3,
    Up = 4,
    Down = 5,
}

/// 底盘控制
pub trait DriveControl {
    /// 相对航向修正：向当前航向叠加 `adjustment_deg` 度
    fn adjust_heading(&mut self, adjustment_deg: f64, speed: f64) -> bool;

    /// 按距离直行（米）
    fn drive_distance(&mut self, distance_m: f64, speed: f64) -> bool;

    /// 按时间直行
    fn drive_timed(&mut self, seconds: f64, direction: Direction, speed: f64) -> bool;

    /// 转到绝对航向（度）
    fn turn_heading(&mut self, heading_deg: f64, speed: f64) -> bool;

    /// 按时间原地转向
    fn turn_timed(&mut self, seconds: f64, direction: Direction, speed: f64) -> bool;

    /// 手动/持续驱动（linear 前进分量, turn 转向分量）
    ///
    /// `(0.0, 0.0)` 即保持中立，每周期仍需调用以喂狗。
    fn drive_manual(&mut self, linear: f64, turn: f64);

    /// 当前航向（度）
    fn heading(&self) -> f64;

    /// 清零航向/里程传感器基准
    fn reset_sensors(&mut self);

    /// 重置定时移动用的内部计时器
    fn reset_timer(&mut self);
}

/// 射盘机构控制（俯仰 + 飞轮）
pub trait ShooterControl {
    /// 俯仰移动到编码器计数位置
    fn set_pitch_position(&mut self, encoder_count: i32, speed: f64) -> bool;

    /// 俯仰移动到标定角度（度）
    fn set_pitch_angle(&mut self, angle_deg: f64, speed: f64) -> bool;

    /// 俯仰按时间移动
    fn set_pitch_timed(&mut self, seconds: f64, direction: Direction, speed: f64) -> bool;

    /// 手动俯仰（0.0 即保持中立）
    fn move_pitch(&mut self, directional_speed: f64);

    /// 飞轮按功率百分比旋转（0 即停转）
    fn shoot(&mut self, power_percent: i32);

    /// 重置定时移动用的内部计时器
    fn reset_timer(&mut self);
}

/// 送盘气缸控制
pub trait FeederControl {
    /// 伸出（`true`）或收回（`false`）送盘活塞
    fn set_extended(&mut self, extended: bool);
}

/// 爬升绞盘控制
pub trait WinchControl {
    /// 绞盘移动到编码器计数位置
    fn set_positioned(&mut self, encoder_count: i32, speed: f64) -> bool;

    /// 绞盘按时间移动
    fn set_timed(&mut self, seconds: f64, direction: Direction, speed: f64) -> bool;

    /// 手动移动绞盘（0.0 即保持中立）
    fn move_winch(&mut self, directional_speed: f64);

    /// 重置定时移动用的内部计时器
    fn reset_timer(&mut self);
}

#[cfg(test)]
mod tests {
    use super::Direction;

    #[test]
    fn test_direction_roundtrip() {
        for d in [
            Direction::Left,
            Direction::Right,
            Direction::Forward,
            Direction::Backward,
            Direction::Up,
            Direction::Down,
        ] {
            let raw: u8 = d.into();
            assert_eq!(Direction::try_from(raw).unwrap(), d);
        }
    }

    #[test]
    fn test_direction_rejects_unknown() {
        assert!(Direction::try_from(6u8).is_err());
        assert!(Direction::try_from(255u8).is_err());
    }
}
