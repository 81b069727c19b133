//! 动作层标定参数
//!
//! 把所有动作用到的标定聚合成一个可从 TOML 加载的结构，部署端在
//! 上电时读入，缺省字段落回编译期默认值（`serde(default)`）。

use serde::{Deserialize, Serialize};
use talos_vision::{CameraGeometry, HeightCalibration};

use crate::climb::ClimbConfig;
use crate::pitch::PitchPresets;
use crate::shoot::ShotTiming;

/// 动作层标定参数总表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionParams {
    pub shot_timing: ShotTiming,
    pub pitch_presets: PitchPresets,
    pub climb: ClimbConfig,
    pub geometry: CameraGeometry,
    pub calibration: HeightCalibration,
}

impl ActionParams {
    /// 从 TOML 文本加载，缺省段用默认值补齐
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
