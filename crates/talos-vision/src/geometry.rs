//! 相机瞄准几何
//!
//! 由候选目标在图像中的位置和尺寸推算机器人需要的航向修正角与
//! 俯仰角。三个 offset 参数吸收整机装配误差，赛前标定写入配置。

use serde::{Deserialize, Serialize};

use crate::candidate::TargetCandidate;
use crate::classify::HeightCalibration;

/// 相机几何标定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraGeometry {
    /// 相机水平视场角（度）
    pub view_angle_deg: f64,
    /// 水平瞄准角修正（度）
    pub horizontal_offset_deg: f64,
    /// 垂直瞄准角修正（度）
    pub vertical_offset_deg: f64,
    /// 距离估计修正（英尺）
    pub distance_offset_ft: f64,
}

impl Default for CameraGeometry {
    fn default() -> Self {
        Self {
            view_angle_deg: 43.5,
            horizontal_offset_deg: 0.0,
            vertical_offset_deg: 0.0,
            distance_offset_ft: 0.0,
        }
    }
}

impl CameraGeometry {
    /// 目标偏离视轴的水平角（度）
    ///
    /// 目标在画面中心时为 0（加修正前）；目标偏右为正，直接作为
    /// 底盘相对航向修正量使用。
    pub fn horizontal_angle_to(&self, target: &TargetCandidate) -> f64 {
        let image_width = target.image_width as f64;
        if image_width == 0.0 {
            return self.horizontal_offset_deg;
        }
        let off_center = image_width / 2.0 - target.center_x as f64;
        -(self.view_angle_deg * off_center) / image_width + self.horizontal_offset_deg
    }

    /// 到目标的估计距离（英尺）
    ///
    /// 由目标反光条的观测像素宽度反推：已知反光条真实宽度折算进
    /// 视场角模型，观测越窄距离越远。
    pub fn distance_to(&self, target: &TargetCandidate) -> f64 {
        if target.bound_width == 0 {
            return 0.0;
        }
        let rectangle_width = 2.0 * target.image_width as f64 / target.bound_width as f64;
        (rectangle_width / 2.0) / (self.view_angle_deg.to_radians() / 2.0).tan()
    }

    /// 机器人到目标的垂直仰角（度）
    ///
    /// 用分类得到的射孔真实高度除以估计距离取反正切。
    pub fn vertical_angle_to(
        &self,
        target: &TargetCandidate,
        calibration: &HeightCalibration,
    ) -> f64 {
        let distance = self.distance_to(target) + self.distance_offset_ft;
        let height = calibration.height_ft(calibration.classify_candidate(target));
        (height / distance).atan().to_degrees() + self.vertical_offset_deg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::TargetCandidate;
    use talos_hal::mock::particle_at;

    fn candidate_at(center_x: i32, width: u32, height: u32) -> TargetCandidate {
        TargetCandidate::from(&particle_at(
            center_x,
            100,
            width,
            height,
            width as f64 * height as f64,
        ))
    }

    #[test]
    fn test_horizontal_angle_centered_target_is_offset_only() {
        let geometry = CameraGeometry {
            horizontal_offset_deg: 1.25,
            ..CameraGeometry::default()
        };
        // 320 宽的帧，质心在 160 即正中
        let c = candidate_at(160, 62, 20);
        assert!((geometry.horizontal_angle_to(&c) - 1.25).abs() < 1e-9);
    }

    #[test]
    fn test_horizontal_angle_sign_follows_target_side() {
        let geometry = CameraGeometry::default();
        let left = candidate_at(40, 62, 20);
        let right = candidate_at(280, 62, 20);
        assert!(geometry.horizontal_angle_to(&left) < 0.0);
        assert!(geometry.horizontal_angle_to(&right) > 0.0);
        // 视角对称
        assert!(
            (geometry.horizontal_angle_to(&left) + geometry.horizontal_angle_to(&right)).abs()
                < 1e-9
        );
    }

    #[test]
    fn test_distance_shrinks_with_wider_observation() {
        let geometry = CameraGeometry::default();
        let near = candidate_at(160, 124, 40);
        let far = candidate_at(160, 62, 20);
        assert!(geometry.distance_to(&near) < geometry.distance_to(&far));
        // 观测宽度减半，距离翻倍
        assert!(
            (geometry.distance_to(&far) / geometry.distance_to(&near) - 2.0).abs() < 1e-9
        );
    }

    #[test]
    fn test_vertical_angle_uses_classified_height() {
        let geometry = CameraGeometry::default();
        let calib = HeightCalibration::default();
        // 62x20 比例 3.1 → High 档
        let c = candidate_at(160, 62, 20);
        let angle = geometry.vertical_angle_to(&c, &calib);
        assert!(angle > 0.0 && angle < 90.0);

        // 62x10 比例 6.2 不匹配任何档位，Unknown 高度为 0，仰角只剩修正量
        let unknown = candidate_at(160, 62, 10);
        assert_eq!(geometry.vertical_angle_to(&unknown, &calib), 0.0);
    }
}
