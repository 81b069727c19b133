//! 硬件抽象层
//!
//! 本 crate 定义 Talos 机器人核心逻辑与底层执行机构之间的 trait 边界：
//!
//! - **执行机构** (`control`): 底盘、射盘俯仰/飞轮、送盘气缸、爬升绞盘
//! - **相机** (`camera`): 帧源与图像滤波操作的抽象（帧类型对上层不透明）
//! - **秒表** (`stopwatch`): 单调计时器抽象，支持测试用的手动时钟
//! - **消息** (`message`): 操作员屏幕消息通道
//!
//! 核心逻辑只依赖这些 trait，真实硬件（电机控制器、编码器、陀螺仪、
//! 相机驱动）在部署端实现。所有"移动到目标"类方法每个控制周期调用一次，
//! 返回 `true` 表示已到达。
//!
//! # 使用场景
//!
//! 上层 crate（vision / actions / autoscript）以 `&mut dyn Trait` 消费
//! 这些接口；测试通过 `mock` feature 提供的插桩实现驱动。

pub mod camera;
pub mod control;
pub mod error;
pub mod message;
pub mod stopwatch;

#[cfg(feature = "mock")]
pub mod mock;

pub use camera::{ColorModel, FrameSource, RawParticle, ThresholdConfig};
pub use control::{Direction, DriveControl, FeederControl, ShooterControl, WinchControl};
pub use error::HalError;
pub use message::{ChannelMessageSink, MessageSink, NullMessageSink, OperatorMessage};
pub use stopwatch::{ManualClock, ManualStopwatch, Stopwatch, SystemStopwatch};
