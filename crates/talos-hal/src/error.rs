//! 硬件层错误类型定义

use thiserror::Error;

/// 硬件层错误类型
///
/// 采集管线把这些错误当作"本周期无结果"处理（记录日志后继续循环），
/// 不会向上冒泡终止任何任务。
#[derive(Error, Debug)]
pub enum HalError {
    /// 取帧失败（相机未就绪、网络抖动等）
    #[error("Frame capture failed: {0}")]
    Capture(String),

    /// 图像滤波操作失败
    #[error("Image operation `{op}` failed: {reason}")]
    ImageOp {
        op: &'static str,
        reason: String,
    },

    /// 诊断帧落盘失败
    #[error("Snapshot store failed: {0}")]
    Snapshot(#[from] std::io::Error),

    /// 设备不存在或未初始化
    #[error("Device not present: {0}")]
    NotPresent(&'static str),
}
