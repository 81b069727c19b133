//! 帧源抽象
//!
//! 相机与图像滤波原语由部署端提供（真机上通常是厂商视觉库），核心逻辑
//! 只通过 [`FrameSource`] 驱动固定的滤波流水线。帧类型对上层不透明
//! （关联类型），流水线唯一能"看进去"的数据是
//! [`extract_particles`](FrameSource::extract_particles) 返回的粒子报告。

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::HalError;

/// 阈值滤波使用的色彩模型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ColorModel {
    Hsv,
    Hsl,
    #[default]
    Rgb,
}

/// 色彩阈值配置：三个独立通道各有上下界
///
/// 通道含义由 [`ColorModel`] 决定（RGB 的 R/G/B 或 HSV 的 H/S/V 等）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub color_model: ColorModel,
    pub plane_1_low: u8,
    pub plane_1_high: u8,
    pub plane_2_low: u8,
    pub plane_2_high: u8,
    pub plane_3_low: u8,
    pub plane_3_high: u8,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            color_model: ColorModel::Rgb,
            plane_1_low: 0,
            plane_1_high: 50,
            plane_2_low: 50,
            plane_2_high: 255,
            plane_3_low: 0,
            plane_3_high: 50,
        }
    }
}

/// 帧源提取出的原始粒子报告
///
/// 一个粒子即滤波后二值图中的一个连通区域。坐标系原点在图像左上角，
/// y 轴向下（因此 `center_y` 越小目标越高）。
#[derive(Debug, Clone, PartialEq)]
pub struct RawParticle {
    /// 外接矩形宽度（像素）
    pub bound_width: u32,
    /// 外接矩形高度（像素）
    pub bound_height: u32,
    /// 质心横坐标（像素）
    pub center_x: i32,
    /// 质心纵坐标（像素）
    pub center_y: i32,
    /// 质心横坐标（归一化到 -1.0..=1.0）
    pub center_x_normalized: f64,
    /// 质心纵坐标（归一化到 -1.0..=1.0）
    pub center_y_normalized: f64,
    /// 填充后粒子面积（像素²）
    pub particle_area: f64,
    /// 源图像宽度（像素）
    pub image_width: u32,
    /// 源图像高度（像素）
    pub image_height: u32,
}

/// 帧源：取帧 + 固定滤波原语
///
/// 所有方法接收 `&mut self`：帧源被采集任务独占，实现可以自由维护
/// 内部缓冲或统计。任何失败返回 `Err`，采集任务按"本周期无结果"处理。
pub trait FrameSource {
    /// 不透明的帧句柄
    type Frame;

    /// 自上次取帧后是否有新帧可取
    fn has_fresh_frame(&mut self) -> bool;

    /// 取一帧
    fn capture(&mut self) -> Result<Self::Frame, HalError>;

    /// 色彩阈值滤波，输出二值掩膜帧
    fn threshold_filter(
        &mut self,
        frame: &Self::Frame,
        threshold: &ThresholdConfig,
    ) -> Result<Self::Frame, HalError>;

    /// 去除小连通域（降噪），`erosions` 为腐蚀迭代次数
    fn remove_small_objects(
        &mut self,
        frame: &Self::Frame,
        erosions: u32,
    ) -> Result<Self::Frame, HalError>;

    /// 对每个连通域做凸包填充，消除内部孔洞
    fn fill_holes(&mut self, frame: &Self::Frame) -> Result<Self::Frame, HalError>;

    /// 提取粒子报告，按质心纵坐标升序
    fn extract_particles(&mut self, frame: &Self::Frame) -> Result<Vec<RawParticle>, HalError>;

    /// 把一帧落盘到诊断存储（赛场排障用）
    fn store_snapshot(&mut self, frame: &Self::Frame, path: &Path) -> Result<(), HalError>;
}
