//! 滤波流水线与后台采集任务
//!
//! 流水线对一帧执行固定的六步：色彩阈值 → 小目标降噪 → 凸包填充 →
//! 粒子提取 → 比例/评分筛选 → 排序发布。任何一步失败都短路为
//! "本周期无结果"，存储保持上一次成功的内容不变。
//!
//! [`Acquisition`] 把流水线装进一个自由运行的后台线程：没有新帧就
//! 小睡重试，处理到的每个结果整体替换 [`TargetStore`]。单帧引发的
//! panic 在任务边界被捕获并记录，采集线程绝不因一帧坏数据退出。

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, trace, warn};

use talos_hal::{FrameSource, ThresholdConfig};

use crate::candidate::{TargetCandidate, TargetReport};
use crate::store::TargetStore;

/// 流水线配置
///
/// 比例/评分界限的默认值来自赛场标定：真目标的反光条宽高比落在
/// 1.0..=3.2，凸包填充后接近实心，评分应不低于 80。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// 色彩阈值（帧源滤波原语的参数）
    pub threshold: ThresholdConfig,
    /// 降噪腐蚀迭代次数
    pub denoise_erosions: u32,
    /// 接受的矩形比例下限
    pub ratio_min: f64,
    /// 接受的矩形比例上限
    pub ratio_max: f64,
    /// 接受的矩形评分下限
    pub score_min: f64,
    /// 首帧诊断存储路径
    pub snapshot_path: PathBuf,
    /// 无新帧时的空转小睡（微秒）
    pub idle_pause_us: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            threshold: ThresholdConfig::default(),
            denoise_erosions: 2,
            ratio_min: 1.0,
            ratio_max: 3.2,
            score_min: 80.0,
            snapshot_path: PathBuf::from("first_frame.bmp"),
            idle_pause_us: 2_000,
        }
    }
}

/// 对一帧运行滤波流水线
///
/// 返回 `None` 表示某个阶段失败、本周期无结果（存储应保持不变）；
/// `Some` 可能是空报告（成功处理但没有幸存候选，存储被替换为空）。
pub fn process_frame<S: FrameSource>(
    source: &mut S,
    frame: &S::Frame,
    config: &PipelineConfig,
) -> Option<TargetReport> {
    let masked = match source.threshold_filter(frame, &config.threshold) {
        Ok(f) => f,
        Err(e) => {
            warn!("Threshold stage failed: {}", e);
            return None;
        },
    };

    let denoised = match source.remove_small_objects(&masked, config.denoise_erosions) {
        Ok(f) => f,
        Err(e) => {
            warn!("Denoise stage failed: {}", e);
            return None;
        },
    };

    let filled = match source.fill_holes(&denoised) {
        Ok(f) => f,
        Err(e) => {
            warn!("Fill stage failed: {}", e);
            return None;
        },
    };

    let particles = match source.extract_particles(&filled) {
        Ok(p) => p,
        Err(e) => {
            warn!("Particle extraction failed: {}", e);
            return None;
        },
    };

    // 比例/评分筛选，幸存者构造报告时按质心纵坐标重新排序
    let survivors: Vec<TargetCandidate> = particles
        .iter()
        .map(TargetCandidate::from)
        .filter(|c| {
            let ratio = c.rectangle_ratio();
            ratio >= config.ratio_min
                && ratio <= config.ratio_max
                && c.rectangle_score() >= config.score_min
        })
        .collect();

    trace!(
        "Pipeline kept {}/{} particles",
        survivors.len(),
        particles.len()
    );
    Some(TargetReport::new(survivors))
}

/// 处理一帧：取帧、首帧落盘、跑流水线
fn acquire_once<S: FrameSource>(
    source: &mut S,
    config: &PipelineConfig,
    snapshot_stored: &mut bool,
) -> Option<TargetReport> {
    let frame = match source.capture() {
        Ok(f) => f,
        Err(e) => {
            warn!("Frame capture failed: {}", e);
            return None;
        },
    };

    // 进程生命周期内只落盘第一帧，赛后排障用；失败也不再重试
    if !*snapshot_stored {
        if let Err(e) = source.store_snapshot(&frame, &config.snapshot_path) {
            warn!("Failed to store diagnostic frame: {}", e);
        }
        *snapshot_stored = true;
    }

    process_frame(source, &frame, config)
}

/// 采集线程主循环
fn acquisition_loop<S: FrameSource>(
    mut source: S,
    config: PipelineConfig,
    store: Arc<TargetStore>,
    running: Arc<AtomicBool>,
) {
    let idle = Duration::from_micros(config.idle_pause_us);
    let mut snapshot_stored = false;

    trace!("Acquisition task started");

    // Acquire: 看到 false 时必须能看到停止方之前的全部写入
    while running.load(Ordering::Acquire) {
        if !source.has_fresh_frame() {
            spin_sleep::sleep(idle);
            continue;
        }

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            acquire_once(&mut source, &config, &mut snapshot_stored)
        }));

        match outcome {
            Ok(Some(report)) => {
                store.publish(report);
            },
            // 本周期无结果，存储保持不变
            Ok(None) => {},
            Err(_) => {
                error!("Acquisition task panicked while processing a frame, continuing");
            },
        }
    }

    trace!("Acquisition task exited");
}

/// 后台采集任务句柄
///
/// `spawn` 启动线程，`stop` 翻转运行标志并 join。停止只是停止发布：
/// 存储里已有的内容保持可读，直到被覆盖或显式清空；重新 `spawn` 后
/// 从下一次成功取帧恢复发布。
pub struct Acquisition {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Acquisition {
    /// 启动采集线程
    pub fn spawn<S>(
        source: S,
        config: PipelineConfig,
        store: Arc<TargetStore>,
    ) -> std::io::Result<Self>
    where
        S: FrameSource + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let handle = thread::Builder::new()
            .name("acquisition".to_string())
            .spawn(move || acquisition_loop(source, config, store, flag))?;

        Ok(Self {
            running,
            handle: Some(handle),
        })
    }

    /// 停止线程并等待退出
    pub fn stop(&mut self) {
        // Release: 停止前的写入对看到 false 的采集线程可见
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            error!("Acquisition thread terminated abnormally");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some() && self.running.load(Ordering::Acquire)
    }
}

impl Drop for Acquisition {
    fn drop(&mut self) {
        self.stop();
    }
}
