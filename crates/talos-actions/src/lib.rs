//! 逐步动作状态机
//!
//! 机器人的每个自主行为（瞄准、射击、连发、上盘高度、爬升准备、
//! 爬升、找目标）都是一台可恢复的状态机：一次 `tick` 调用对应一个
//! 控制周期，绝不阻塞。
//!
//! # 步进约定
//!
//! - **瞬时步**（启动计时器、下发一次固定指令）：执行副作用后在同一次
//!   调用内直接推进到下一状态，不消耗周期。实现上是 `loop { match }`，
//!   瞬时转移 `continue`，轮询转移 `return`。
//! - **轮询步**（等待时间流逝或协作者到位）：恰好消耗一个周期，返回
//!   [`Progress::Running`]，下个周期从同一状态恢复。
//! - 对已完成实例再 `tick` 是幂等 no-op；新建实例总是从第一步开始。
//!
//! # 互斥
//!
//! 同一时刻只允许一个自主行为占有执行机构，[`ActivitySet`] 负责在
//! 启动新行为前强制结束所有冲突的兄弟行为。

pub mod activity;
pub mod actuators;
pub mod aim;
pub mod climb;
pub mod find_target;
pub mod params;
pub mod pitch;
pub mod shoot;
pub mod step;

pub use activity::{Activity, ActivitySet};
pub use actuators::{Actuators, neutralize};
pub use aim::AimController;
pub use climb::{Climb, ClimbConfig};
pub use find_target::{CycleTarget, FindTarget};
pub use params::ActionParams;
pub use pitch::{ClimbingPrep, FeederHeight, PitchPresets};
pub use shoot::{RapidFire, Shoot, ShotTiming};
pub use step::Progress;
