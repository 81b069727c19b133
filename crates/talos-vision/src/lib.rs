//! 目标获取子系统
//!
//! 持续运行的图像处理流水线，把相机帧变成候选目标列表并发布给实时
//! 控制循环，两侧互不阻塞：
//!
//! - **数据模型** (`candidate`): 候选目标与整体发布的目标报告
//! - **分类** (`classify`): 矩形比例 → 目标高度档位的纯函数分类
//! - **几何** (`geometry`): 水平/垂直瞄准角与距离估计
//! - **存储** (`store`): 单槽位 latest-wins 共享单元（ArcSwap）
//! - **流水线** (`pipeline`): 阈值 → 降噪 → 填充 → 提取 → 筛选 → 发布，
//!   以及承载它的后台采集任务
//! - **选择** (`selector`): 按期望高度从快照中挑选候选
//!
//! # 并发模型
//!
//! 采集任务在独立线程自由运行，每次成功处理整体替换存储槽位；控制
//! 循环按周期拷出快照。没有队列、没有背压：未被消费的中间报告被
//! 直接覆盖，读者把每次读取当作可能过期的最新快照，而不是数据流。

pub mod candidate;
pub mod classify;
pub mod geometry;
pub mod pipeline;
pub mod selector;
pub mod store;

pub use candidate::{TargetCandidate, TargetReport};
pub use classify::{HeightCalibration, TargetHeight};
pub use geometry::CameraGeometry;
pub use pipeline::{Acquisition, PipelineConfig, process_frame};
pub use selector::TargetCursor;
pub use store::TargetStore;

// 阈值配置定义在硬件层（帧源滤波原语的参数），这里转出方便使用
pub use talos_hal::{ColorModel, ThresholdConfig};
