//! 找目标与目标轮换
//!
//! [`FindTarget`] 把一次完整的"找 + 瞄"串起来：从目标存储拷出快照、
//! 清零航向基准、按期望高度选择候选，再把每个周期委托给内嵌的
//! [`AimController`] 直到瞄准完成。前两步是瞬时的，同一周期内直落到
//! 瞄准阶段。
//!
//! [`CycleTarget`] 在既有快照里循环切换候选并重新瞄准（操作员手动
//! 换目标用），不重新拷快照。

use talos_vision::{CameraGeometry, HeightCalibration, TargetCursor, TargetHeight, TargetStore};

use talos_hal::{DriveControl, ShooterControl};
use tracing::trace;

use crate::aim::AimController;
use crate::step::Progress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FindState {
    Snapshot,
    Select,
    Aim,
    Finished,
}

/// 找到指定高度的目标并瞄准
#[derive(Debug, Clone)]
pub struct FindTarget {
    state: FindState,
    height: TargetHeight,
    aim: AimController,
}

impl FindTarget {
    pub fn new(height: TargetHeight) -> Self {
        Self {
            state: FindState::Snapshot,
            height,
            aim: AimController::new(None),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state == FindState::Finished
    }

    pub fn abort(&mut self) {
        self.aim.abort();
        self.state = FindState::Finished;
    }

    #[allow(clippy::too_many_arguments)]
    pub fn tick(
        &mut self,
        store: &TargetStore,
        cursor: &mut TargetCursor,
        drive: &mut dyn DriveControl,
        shooter: &mut dyn ShooterControl,
        geometry: &CameraGeometry,
        calibration: &HeightCalibration,
    ) -> Progress {
        loop {
            match self.state {
                FindState::Snapshot => {
                    cursor.refresh(store);
                    // 快照时刻的航向是后续相对修正的基准
                    drive.reset_sensors();
                    self.state = FindState::Select;
                },
                FindState::Select => {
                    cursor.select(self.height, calibration);
                    trace!(
                        "FindTarget: selected {:?} out of {} candidates",
                        self.height,
                        cursor.len()
                    );
                    self.aim = AimController::new(cursor.selected().cloned());
                    self.state = FindState::Aim;
                },
                FindState::Aim => {
                    return match self.aim.tick(drive, shooter, geometry, calibration) {
                        Progress::Finished => {
                            self.state = FindState::Finished;
                            Progress::Finished
                        },
                        Progress::Running => Progress::Running,
                    };
                },
                FindState::Finished => return Progress::Finished,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CycleState {
    Advance,
    Aim,
    Finished,
}

/// 切换到快照中的下一个候选并重新瞄准
#[derive(Debug, Clone)]
pub struct CycleTarget {
    state: CycleState,
    aim: AimController,
}

impl CycleTarget {
    pub fn new() -> Self {
        Self {
            state: CycleState::Advance,
            aim: AimController::new(None),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state == CycleState::Finished
    }

    pub fn abort(&mut self) {
        self.aim.abort();
        self.state = CycleState::Finished;
    }

    pub fn tick(
        &mut self,
        cursor: &mut TargetCursor,
        drive: &mut dyn DriveControl,
        shooter: &mut dyn ShooterControl,
        geometry: &CameraGeometry,
        calibration: &HeightCalibration,
    ) -> Progress {
        loop {
            match self.state {
                CycleState::Advance => {
                    cursor.next_target();
                    self.aim = AimController::new(cursor.selected().cloned());
                    self.state = CycleState::Aim;
                },
                CycleState::Aim => {
                    return match self.aim.tick(drive, shooter, geometry, calibration) {
                        Progress::Finished => {
                            self.state = CycleState::Finished;
                            Progress::Finished
                        },
                        Progress::Running => Progress::Running,
                    };
                },
                CycleState::Finished => return Progress::Finished,
            }
        }
    }
}

impl Default for CycleTarget {
    fn default() -> Self {
        Self::new()
    }
}
