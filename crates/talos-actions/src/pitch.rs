//! 固定俯仰预设动作
//!
//! 两个单步轮询动作：把俯仰机构开到标定角度，到位即完成。
//! 上盘高度用于在补给站接盘，爬升准备把俯仰压到最低给挂钩让位。

use serde::{Deserialize, Serialize};
use talos_hal::ShooterControl;

use crate::aim::FULL_SPEED;
use crate::step::Progress;

/// 俯仰预设角标定
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchPresets {
    /// 补给站接盘角度（度）
    pub feeder_angle_deg: f64,
    /// 爬升让位角度（度）
    pub climbing_angle_deg: f64,
}

impl Default for PitchPresets {
    fn default() -> Self {
        Self {
            feeder_angle_deg: 50.0,
            climbing_angle_deg: 20.0,
        }
    }
}

/// 俯仰到补给站接盘角度
#[derive(Debug, Clone, Default)]
pub struct FeederHeight {
    finished: bool,
}

impl FeederHeight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn abort(&mut self) {
        self.finished = true;
    }

    pub fn tick(&mut self, shooter: &mut dyn ShooterControl, presets: &PitchPresets) -> Progress {
        if self.finished {
            return Progress::Finished;
        }
        if shooter.set_pitch_angle(presets.feeder_angle_deg, FULL_SPEED) {
            self.finished = true;
            Progress::Finished
        } else {
            Progress::Running
        }
    }
}

/// 俯仰到爬升让位角度
#[derive(Debug, Clone, Default)]
pub struct ClimbingPrep {
    finished: bool,
}

impl ClimbingPrep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn abort(&mut self) {
        self.finished = true;
    }

    pub fn tick(&mut self, shooter: &mut dyn ShooterControl, presets: &PitchPresets) -> Progress {
        if self.finished {
            return Progress::Finished;
        }
        if shooter.set_pitch_angle(presets.climbing_angle_deg, FULL_SPEED) {
            self.finished = true;
            Progress::Finished
        } else {
            Progress::Running
        }
    }
}
