//! 候选目标与目标报告
//!
//! [`TargetCandidate`] 是流水线从一帧中提取出的单个连通区域的统计量；
//! [`TargetReport`] 是一帧的全部幸存候选，构造时整体排序，发布后不再
//! 修改，只会被下一份报告整体替换。

use talos_hal::RawParticle;

/// 单个候选目标
///
/// 坐标系原点在图像左上角，y 轴向下，因此 `center_y` 越小目标位置越高。
/// 矩形比例与评分是派生量，不落在字段里。
#[derive(Debug, Clone, PartialEq)]
pub struct TargetCandidate {
    /// 外接矩形宽度（像素）
    pub bound_width: u32,
    /// 外接矩形高度（像素）
    pub bound_height: u32,
    /// 质心横坐标（像素）
    pub center_x: i32,
    /// 质心纵坐标（像素）
    pub center_y: i32,
    /// 质心横坐标（归一化）
    pub center_x_normalized: f64,
    /// 质心纵坐标（归一化）
    pub center_y_normalized: f64,
    /// 填充后粒子面积（像素²）
    pub particle_area: f64,
    /// 源图像宽度（像素）
    pub image_width: u32,
    /// 源图像高度（像素）
    pub image_height: u32,
}

impl TargetCandidate {
    /// 外接矩形宽高比
    ///
    /// 高度为 0 的退化矩形返回 0.0（会被比例下限筛掉）。
    pub fn rectangle_ratio(&self) -> f64 {
        if self.bound_height == 0 {
            return 0.0;
        }
        self.bound_width as f64 / self.bound_height as f64
    }

    /// 外接矩形评分：填充面积占矩形面积的百分比
    ///
    /// 真目标接近实心矩形，评分接近 100；杂散噪点评分低。
    pub fn rectangle_score(&self) -> f64 {
        let rect_area = self.bound_width as f64 * self.bound_height as f64;
        if rect_area == 0.0 {
            return 0.0;
        }
        self.particle_area / rect_area * 100.0
    }
}

impl From<&RawParticle> for TargetCandidate {
    fn from(p: &RawParticle) -> Self {
        Self {
            bound_width: p.bound_width,
            bound_height: p.bound_height,
            center_x: p.center_x,
            center_y: p.center_y,
            center_x_normalized: p.center_x_normalized,
            center_y_normalized: p.center_y_normalized,
            particle_area: p.particle_area,
            image_width: p.image_width,
            image_height: p.image_height,
        }
    }
}

/// 一帧的目标报告
///
/// 不变量：候选按质心纵坐标升序（画面中越高的目标排越前）。
/// 构造即排序，之后只读。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetReport {
    candidates: Vec<TargetCandidate>,
}

impl TargetReport {
    /// 由候选列表构造报告，输入顺序任意
    pub fn new(mut candidates: Vec<TargetCandidate>) -> Self {
        candidates.sort_by_key(|c| c.center_y);
        Self { candidates }
    }

    /// 空报告
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn candidates(&self) -> &[TargetCandidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
