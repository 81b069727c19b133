//! 射击与连发
//!
//! 两台状态机共用一只秒表（二者互斥，绝不同时活动）：
//!
//! - [`Shoot`]: 给定功率，飞轮起转 → 等转速 → 送盘 → 等出盘 → 收。
//! - [`RapidFire`]: 全功率，同样的起转门限，然后连续送三张盘
//!   （伸出 → 等收回延时 → 收回 → 等转速恢复），最后停飞轮。
//!
//! 活动期间每个周期都向飞轮重复下发功率指令，避免电机安全保护。

use serde::{Deserialize, Serialize};
use talos_hal::{FeederControl, ShooterControl, Stopwatch};
use tracing::trace;

use crate::step::Progress;

/// 连发固定送盘数
const RAPID_FIRE_DISCS: u8 = 3;

/// 连发固定功率（百分比）
const RAPID_FIRE_POWER: i32 = 100;

/// 射击时序标定
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotTiming {
    /// 飞轮起转到额定转速的时间（秒）
    pub spinup_secs: f64,
    /// 送盘后等盘离开飞轮的时间（秒）
    pub spindown_secs: f64,
    /// 连发时送盘活塞保持伸出的时间（秒）
    pub retract_secs: f64,
}

impl Default for ShotTiming {
    fn default() -> Self {
        Self {
            spinup_secs: 1.5,
            spindown_secs: 0.5,
            retract_secs: 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShootState {
    Arm,
    SpinUp,
    Feed,
    SpinDown,
    Finished,
}

/// 单发射击
#[derive(Debug, Clone)]
pub struct Shoot {
    state: ShootState,
    power: i32,
}

impl Shoot {
    pub fn new(power_percent: i32) -> Self {
        Self {
            state: ShootState::Arm,
            power: power_percent,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state == ShootState::Finished
    }

    pub fn abort(&mut self) {
        self.state = ShootState::Finished;
    }

    pub fn tick(
        &mut self,
        shooter: &mut dyn ShooterControl,
        feeder: &mut dyn FeederControl,
        timer: &mut dyn Stopwatch,
        timing: &ShotTiming,
    ) -> Progress {
        if self.state == ShootState::Finished {
            return Progress::Finished;
        }

        // 活动期间持续供给飞轮指令
        shooter.shoot(self.power);

        loop {
            match self.state {
                ShootState::Arm => {
                    timer.stop();
                    timer.reset();
                    timer.start();
                    self.state = ShootState::SpinUp;
                },
                ShootState::SpinUp => {
                    if timer.elapsed_seconds() >= timing.spinup_secs {
                        timer.stop();
                        trace!("Shoot: spun up, feeding disc");
                        self.state = ShootState::Feed;
                    } else {
                        return Progress::Running;
                    }
                },
                ShootState::Feed => {
                    feeder.set_extended(true);
                    timer.reset();
                    timer.start();
                    self.state = ShootState::SpinDown;
                },
                ShootState::SpinDown => {
                    if timer.elapsed_seconds() >= timing.spindown_secs {
                        timer.stop();
                        timer.reset();
                        feeder.set_extended(false);
                        shooter.shoot(0);
                        self.state = ShootState::Finished;
                        return Progress::Finished;
                    }
                    return Progress::Running;
                },
                ShootState::Finished => return Progress::Finished,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RapidFireState {
    Arm,
    SpinUp,
    Feed,
    HoldOpen,
    SpinDown,
    Finished,
}

/// 三连发
#[derive(Debug, Clone)]
pub struct RapidFire {
    state: RapidFireState,
    discs_fired: u8,
}

impl RapidFire {
    pub fn new() -> Self {
        Self {
            state: RapidFireState::Arm,
            discs_fired: 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state == RapidFireState::Finished
    }

    pub fn abort(&mut self) {
        self.state = RapidFireState::Finished;
    }

    pub fn tick(
        &mut self,
        shooter: &mut dyn ShooterControl,
        feeder: &mut dyn FeederControl,
        timer: &mut dyn Stopwatch,
        timing: &ShotTiming,
    ) -> Progress {
        if self.state == RapidFireState::Finished {
            return Progress::Finished;
        }

        shooter.shoot(RAPID_FIRE_POWER);

        loop {
            match self.state {
                RapidFireState::Arm => {
                    timer.stop();
                    timer.reset();
                    timer.start();
                    self.state = RapidFireState::SpinUp;
                },
                RapidFireState::SpinUp => {
                    if timer.elapsed_seconds() >= timing.spinup_secs {
                        self.state = RapidFireState::Feed;
                    } else {
                        return Progress::Running;
                    }
                },
                RapidFireState::Feed => {
                    feeder.set_extended(true);
                    timer.reset();
                    timer.start();
                    self.state = RapidFireState::HoldOpen;
                },
                RapidFireState::HoldOpen => {
                    if timer.elapsed_seconds() >= timing.retract_secs {
                        feeder.set_extended(false);
                        timer.reset();
                        timer.start();
                        self.state = RapidFireState::SpinDown;
                    } else {
                        return Progress::Running;
                    }
                },
                RapidFireState::SpinDown => {
                    if timer.elapsed_seconds() >= timing.spindown_secs {
                        self.discs_fired += 1;
                        if self.discs_fired >= RAPID_FIRE_DISCS {
                            timer.stop();
                            timer.reset();
                            shooter.shoot(0);
                            self.state = RapidFireState::Finished;
                            return Progress::Finished;
                        }
                        trace!("RapidFire: disc {} away", self.discs_fired);
                        self.state = RapidFireState::Feed;
                    } else {
                        return Progress::Running;
                    }
                },
                RapidFireState::Finished => return Progress::Finished,
            }
        }
    }
}

impl Default for RapidFire {
    fn default() -> Self {
        Self::new()
    }
}
