//! Talos 自主核心 - 门面 crate
//!
//! 把四个子 crate 的公共接口汇聚成一个入口，部署端（控制循环驱动、
//! 操作员界面、硬件实现）只需依赖这一个 crate：
//!
//! - **硬件抽象** (`hal`): 执行机构/相机/秒表/消息 trait 边界
//! - **目标获取** (`vision`): 滤波流水线、目标存储、选择与几何
//! - **逐步动作** (`actions`): 瞄准/射击/爬升等状态机与互斥监督
//! - **自动脚本** (`autoscript`): 脚本语言与逐周期解释器
//!
//! # 快速开始
//!
//! ```rust,ignore
//! use talos_robot::prelude::*;
//!
//! talos_robot::init_logging();
//!
//! let store = Arc::new(TargetStore::new());
//! let acquisition = Acquisition::spawn(camera, PipelineConfig::default(), store.clone())?;
//! let mut interpreter = Interpreter::new();
//! interpreter.load(Program::load(catalog.selected().unwrap())?);
//! // 控制循环：每个周期调用一次 interpreter.tick(...)
//! ```

pub use talos_actions as actions;
pub use talos_autoscript as autoscript;
pub use talos_hal as hal;
pub use talos_vision as vision;

/// 常用类型一站式导入
pub mod prelude {
    pub use talos_actions::{
        ActionParams, ActivitySet, Actuators, Progress, neutralize,
    };
    pub use talos_autoscript::{Interpreter, Program, ScriptCatalog, TickContext};
    pub use talos_hal::{
        Direction, DriveControl, FeederControl, FrameSource, MessageSink, ShooterControl,
        Stopwatch, SystemStopwatch, WinchControl,
    };
    pub use talos_vision::{
        Acquisition, PipelineConfig, TargetCursor, TargetHeight, TargetReport, TargetStore,
    };
}

/// 初始化日志
///
/// `RUST_LOG` 环境变量控制过滤；默认把本仓各 crate 放到 info。
/// 重复调用是安全的 no-op（嵌入测试或多次启动时）。
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("talos_vision=info".parse().expect("static directive"))
        .add_directive("talos_actions=info".parse().expect("static directive"))
        .add_directive("talos_autoscript=info".parse().expect("static directive"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
