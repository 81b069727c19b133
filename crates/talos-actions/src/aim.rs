//! 瞄准控制
//!
//! 四步状态机：算水平角 → 修航向 → 算垂直角 → 调俯仰。两个计算步是
//! 瞬时的，紧跟的转向/俯仰步逐周期轮询协作者直到到位。没有选中目标
//! 时立即完成（无事可做不是错误）。

use talos_vision::{CameraGeometry, HeightCalibration, TargetCandidate};

use talos_hal::{DriveControl, ShooterControl};
use tracing::trace;

use crate::step::Progress;

/// 瞄准/自动移动统一使用全速
pub(crate) const FULL_SPEED: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AimState {
    ComputeHeading,
    SteerHeading,
    ComputePitch,
    SteerPitch,
    Finished,
}

/// 对单个已选候选的瞄准动作
#[derive(Debug, Clone)]
pub struct AimController {
    state: AimState,
    target: Option<TargetCandidate>,
    /// 当前阶段算出的角度（先水平后垂直，度）
    angle_deg: f64,
}

impl AimController {
    /// `target` 为 `None` 时动作在第一次 `tick` 立即完成
    pub fn new(target: Option<TargetCandidate>) -> Self {
        Self {
            state: AimState::ComputeHeading,
            target,
            angle_deg: 0.0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state == AimState::Finished
    }

    /// 强制结束（被兄弟行为抢占时）
    pub fn abort(&mut self) {
        self.state = AimState::Finished;
    }

    pub fn tick(
        &mut self,
        drive: &mut dyn DriveControl,
        shooter: &mut dyn ShooterControl,
        geometry: &CameraGeometry,
        calibration: &HeightCalibration,
    ) -> Progress {
        let Some(target) = self.target.clone() else {
            self.state = AimState::Finished;
            return Progress::Finished;
        };

        loop {
            match self.state {
                AimState::ComputeHeading => {
                    self.angle_deg = geometry.horizontal_angle_to(&target);
                    trace!("Aim: heading correction {:.2} deg", self.angle_deg);
                    self.state = AimState::SteerHeading;
                },
                AimState::SteerHeading => {
                    if drive.adjust_heading(self.angle_deg, FULL_SPEED) {
                        self.state = AimState::ComputePitch;
                    }
                    return Progress::Running;
                },
                AimState::ComputePitch => {
                    self.angle_deg = geometry.vertical_angle_to(&target, calibration);
                    trace!("Aim: pitch target {:.2} deg", self.angle_deg);
                    self.state = AimState::SteerPitch;
                },
                AimState::SteerPitch => {
                    if shooter.set_pitch_angle(self.angle_deg, FULL_SPEED) {
                        self.state = AimState::Finished;
                        return Progress::Finished;
                    }
                    return Progress::Running;
                },
                AimState::Finished => return Progress::Finished,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talos_hal::mock::{MockDrive, MockShooter, particle_at};

    fn high_target() -> Option<TargetCandidate> {
        // 62x20 比例 3.1 → High，质心偏右
        Some(TargetCandidate::from(&particle_at(
            200,
            80,
            62,
            20,
            62.0 * 20.0,
        )))
    }

    #[test]
    fn test_no_target_finishes_immediately() {
        let mut aim = AimController::new(None);
        let mut drive = MockDrive::default();
        let mut shooter = MockShooter::default();
        let progress = aim.tick(
            &mut drive,
            &mut shooter,
            &CameraGeometry::default(),
            &HeightCalibration::default(),
        );
        assert!(progress.is_finished());
        assert_eq!(drive.total_calls() + shooter.total_calls(), 0);
    }

    #[test]
    fn test_full_aim_sequence() {
        let geometry = CameraGeometry::default();
        let calibration = HeightCalibration::default();
        let mut aim = AimController::new(high_target());
        let mut drive = MockDrive::arriving_after(2);
        let mut shooter = MockShooter::arriving_after(1);

        // 航向阶段：2 周期未到位 + 1 周期到位
        for _ in 0..3 {
            assert!(aim.tick(&mut drive, &mut shooter, &geometry, &calibration).is_running());
        }
        assert_eq!(drive.adjust_heading_calls, 3);
        assert_eq!(shooter.set_pitch_angle_calls, 0);
        // 水平角为正（目标在画面右侧），全速
        let (angle, speed) = drive.last_adjust_heading.unwrap();
        assert!(angle > 0.0);
        assert_eq!(speed, FULL_SPEED);

        // 俯仰阶段：到位周期结束整个动作
        assert!(aim.tick(&mut drive, &mut shooter, &geometry, &calibration).is_running());
        assert!(aim.tick(&mut drive, &mut shooter, &geometry, &calibration).is_finished());
        assert_eq!(shooter.set_pitch_angle_calls, 2);
        assert!(aim.is_finished());

        // 完成后幂等，不再触碰协作者
        let calls = drive.total_calls() + shooter.total_calls();
        assert!(aim.tick(&mut drive, &mut shooter, &geometry, &calibration).is_finished());
        assert_eq!(drive.total_calls() + shooter.total_calls(), calls);
    }

    #[test]
    fn test_never_arriving_heading_keeps_polling() {
        let geometry = CameraGeometry::default();
        let calibration = HeightCalibration::default();
        let mut aim = AimController::new(high_target());
        let mut drive = MockDrive::arriving_after(u32::MAX);
        let mut shooter = MockShooter::default();

        for _ in 0..200 {
            assert!(aim.tick(&mut drive, &mut shooter, &geometry, &calibration).is_running());
        }
        // 始终停在航向阶段，俯仰从未被触碰
        assert_eq!(drive.adjust_heading_calls, 200);
        assert_eq!(shooter.set_pitch_angle_calls, 0);
        assert!(!aim.is_finished());
    }
}
