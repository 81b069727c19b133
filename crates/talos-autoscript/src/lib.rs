//! 自动脚本
//!
//! 驱动全自主阶段的微型命令语言：纯文本脚本，每行一条命令名加最多
//! 五个数值参数。[`Program`] 负责解析与游标推进，[`ScriptCatalog`]
//! 负责枚举/轮选脚本文件，[`Interpreter`] 每个控制周期执行恰好一条
//! 命令：简单命令逐周期轮询协作者，复杂命令委托给动作层的逐步
//! 状态机。
//!
//! # 容错
//!
//! 脚本层没有致命错误：解析不了的行被跳过，缺参数的命令立即完成且
//! 不触碰任何协作者，不认识的命令名当作 no-op 跳过，没有脚本则整个
//! 自主阶段立即报告完成，由控制循环把执行机构保持中立。

pub mod interpreter;
pub mod script;

pub use interpreter::{Interpreter, TickContext};
pub use script::{Command, MAX_PARAMS, Program, ScriptCatalog, ScriptError};
