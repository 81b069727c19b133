//! 爬升
//!
//! 三步：俯仰先开到"抢跑"位给挂钩让位；到位后俯仰继续压向最终爬升
//! 位、绞盘同时定时收紧，两者各自完成后才推进；最后一步瞬时刹停
//! 底盘。整个动作期间底盘持续被命令小幅后退缓行，把机器压在斜面上。

use serde::{Deserialize, Serialize};
use talos_hal::{Direction, DriveControl, ShooterControl, WinchControl};
use tracing::trace;

use crate::aim::FULL_SPEED;
use crate::step::Progress;

/// 爬升标定
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimbConfig {
    /// 抢跑俯仰角（度）
    pub headstart_angle_deg: f64,
    /// 最终爬升俯仰角（度）
    pub final_angle_deg: f64,
    /// 绞盘收紧时长（秒）
    pub winch_secs: f64,
    /// 绞盘收紧方向
    ///
    /// 本赛季的绞盘电机接线是反的，"收紧"对应哪个方向由此字段标定，
    /// 算法本身不做任何取反。
    pub winch_direction: Direction,
    /// 绞盘速度
    pub winch_speed: f64,
    /// 爬升期间底盘缓行速度（负值为后退）
    pub creep_speed: f64,
}

impl Default for ClimbConfig {
    fn default() -> Self {
        Self {
            headstart_angle_deg: 35.0,
            final_angle_deg: 10.0,
            winch_secs: 4.0,
            winch_direction: Direction::Up,
            winch_speed: 1.0,
            creep_speed: -0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClimbState {
    Headstart,
    HoistAndPitch,
    Halt,
    Finished,
}

/// 爬升动作
#[derive(Debug, Clone)]
pub struct Climb {
    state: ClimbState,
    pitch_done: bool,
    winch_done: bool,
}

impl Climb {
    pub fn new() -> Self {
        Self {
            state: ClimbState::Headstart,
            pitch_done: false,
            winch_done: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state == ClimbState::Finished
    }

    pub fn abort(&mut self) {
        self.state = ClimbState::Finished;
    }

    pub fn tick(
        &mut self,
        drive: &mut dyn DriveControl,
        shooter: &mut dyn ShooterControl,
        winch: &mut dyn WinchControl,
        config: &ClimbConfig,
    ) -> Progress {
        if self.state == ClimbState::Finished {
            return Progress::Finished;
        }

        // 整个爬升期间底盘持续缓行
        drive.drive_manual(config.creep_speed, 0.0);

        loop {
            match self.state {
                ClimbState::Headstart => {
                    if shooter.set_pitch_angle(config.headstart_angle_deg, FULL_SPEED) {
                        trace!("Climb: headstart pitch reached, hoisting");
                        self.pitch_done = false;
                        self.winch_done = false;
                        winch.reset_timer();
                        self.state = ClimbState::HoistAndPitch;
                    } else {
                        return Progress::Running;
                    }
                },
                ClimbState::HoistAndPitch => {
                    // 俯仰与绞盘各自独立轮询，先到先置位
                    if !self.pitch_done
                        && shooter.set_pitch_angle(config.final_angle_deg, FULL_SPEED)
                    {
                        self.pitch_done = true;
                    }
                    if !self.winch_done
                        && winch.set_timed(
                            config.winch_secs,
                            config.winch_direction,
                            config.winch_speed,
                        )
                    {
                        self.winch_done = true;
                    }
                    if self.pitch_done && self.winch_done {
                        self.state = ClimbState::Halt;
                    } else {
                        return Progress::Running;
                    }
                },
                ClimbState::Halt => {
                    drive.drive_manual(0.0, 0.0);
                    self.state = ClimbState::Finished;
                    return Progress::Finished;
                },
                ClimbState::Finished => return Progress::Finished,
            }
        }
    }
}

impl Default for Climb {
    fn default() -> Self {
        Self::new()
    }
}
