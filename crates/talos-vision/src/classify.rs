//! 目标高度分类
//!
//! 赛场上的三档射孔的反光条外接矩形宽高比各不相同，分类因此是
//! 宽高比对三个标定参考值的容差匹配，纯函数、无副作用。匹配按
//! High → Medium → Low 的优先级取第一个命中；都不命中归为 Unknown。
//!
//! 注意：容差比较是全局唯一的匹配方式，分类结果再查表得到射孔的
//! 真实离地高度，不存在对派生高度值做浮点精确相等的第二条路径。

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

use crate::candidate::TargetCandidate;

/// 目标高度档位
///
/// 自动脚本以数值形式携带该参数（`findtarget 0` 即瞄准高孔）。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    IntoPrimitive,
    TryFromPrimitive,
)]
#[repr(u8)]
pub enum TargetHeight {
    High = 0,
    Medium = 1,
    Low = 2,
    Unknown = 3,
}

/// 高度分类标定
///
/// 参考比例与真实离地高度来自赛场实测，默认值对应三档射孔的
/// 公称尺寸。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightCalibration {
    /// 高孔反光条宽高比
    pub ratio_high: f64,
    /// 中孔反光条宽高比
    pub ratio_medium: f64,
    /// 低孔反光条宽高比
    pub ratio_low: f64,
    /// 比例匹配容差
    pub ratio_tolerance: f64,
    /// 高孔中心离地高度（英尺）
    pub height_high_ft: f64,
    /// 中孔中心离地高度（英尺）
    pub height_medium_ft: f64,
    /// 低孔中心离地高度（英尺）
    pub height_low_ft: f64,
}

impl Default for HeightCalibration {
    fn default() -> Self {
        Self {
            ratio_high: 62.0 / 20.0,
            ratio_medium: 62.0 / 29.0,
            ratio_low: 37.0 / 32.0,
            ratio_tolerance: 0.4,
            height_high_ft: 9.177083,
            height_medium_ft: 8.2604167,
            height_low_ft: 2.583,
        }
    }
}

impl HeightCalibration {
    /// 按宽高比分类
    pub fn classify(&self, ratio: f64) -> TargetHeight {
        if (ratio - self.ratio_high).abs() < self.ratio_tolerance {
            TargetHeight::High
        } else if (ratio - self.ratio_medium).abs() < self.ratio_tolerance {
            TargetHeight::Medium
        } else if (ratio - self.ratio_low).abs() < self.ratio_tolerance {
            TargetHeight::Low
        } else {
            TargetHeight::Unknown
        }
    }

    /// 分类一个候选目标
    pub fn classify_candidate(&self, candidate: &TargetCandidate) -> TargetHeight {
        self.classify(candidate.rectangle_ratio())
    }

    /// 档位对应的真实离地高度（英尺），Unknown 为 0.0
    pub fn height_ft(&self, height: TargetHeight) -> f64 {
        match height {
            TargetHeight::High => self.height_high_ft,
            TargetHeight::Medium => self.height_medium_ft,
            TargetHeight::Low => self.height_low_ft,
            TargetHeight::Unknown => 0.0,
        }
    }
}
