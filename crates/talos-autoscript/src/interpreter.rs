//! 命令解释器
//!
//! 每个控制周期执行恰好一条命令：
//!
//! 1. 当前命令是终止哨兵或根本没有程序 → 整体完成（调用方负责把
//!    执行机构保持中立）。
//! 2. 否则按命令名分派。必要参数有任何一个未设置的命令立即完成且
//!    不调用任何协作者；简单几何命令逐周期调用对应协作者直到到达；
//!    复杂命令（shoot/rapidfire/findtarget）首次进入时装配对应的
//!    逐步动作，之后每周期委托给它。
//! 3. 命令完成才清进行中标志、推进游标取下一条（或末尾的 end 哨兵）。
//! 4. 不认识的命令名立即完成、无副作用。

use talos_actions::{ActionParams, FindTarget, Progress, RapidFire, Shoot};
use talos_hal::{
    Direction, DriveControl, FeederControl, ShooterControl, Stopwatch, WinchControl,
};
use talos_vision::{TargetCursor, TargetHeight, TargetStore};
use tracing::{debug, trace};

use crate::script::{Command, Program};

/// 一个控制周期内解释器可用的全部协作者
pub struct TickContext<'a> {
    pub drive: &'a mut dyn DriveControl,
    pub shooter: &'a mut dyn ShooterControl,
    pub feeder: &'a mut dyn FeederControl,
    pub winch: &'a mut dyn WinchControl,
    /// wait 命令用的秒表
    pub wait_timer: &'a mut dyn Stopwatch,
    /// shoot/rapidfire 共用的秒表
    pub shot_timer: &'a mut dyn Stopwatch,
    pub store: &'a TargetStore,
    pub cursor: &'a mut TargetCursor,
    pub params: &'a ActionParams,
}

/// 复杂命令委托的逐步动作
enum ScriptAction {
    Shoot(Shoot),
    RapidFire(RapidFire),
    FindTarget(FindTarget),
}

/// 自动脚本解释器
pub struct Interpreter {
    program: Option<Program>,
    current: Command,
    in_progress: bool,
    action: Option<ScriptAction>,
}

impl Interpreter {
    /// 未加载任何程序的解释器（tick 立即报告完成）
    pub fn new() -> Self {
        Self {
            program: None,
            current: Command::end(),
            in_progress: false,
            action: None,
        }
    }

    /// 装载程序并取出第一条命令
    pub fn load(&mut self, mut program: Program) {
        self.current = program.next();
        self.program = Some(program);
        self.in_progress = false;
        self.action = None;
    }

    /// 当前待执行/执行中的命令
    pub fn current_command(&self) -> &Command {
        &self.current
    }

    /// 程序是否已整体完成
    pub fn is_finished(&self) -> bool {
        self.program.is_none() || self.current.is_terminal()
    }

    /// 执行一个控制周期
    ///
    /// 返回 [`Progress::Finished`] 表示整个程序已结束；完成最后一条
    /// 命令的那个周期仍返回 `Running`，下个周期才读到 end 哨兵。
    pub fn tick(&mut self, ctx: &mut TickContext<'_>) -> Progress {
        if self.program.is_none() || self.current.is_terminal() {
            return Progress::Finished;
        }

        if self.execute_current(ctx) {
            trace!("Autoscript command `{}` complete", self.current.name);
            self.in_progress = false;
            self.action = None;
            if let Some(program) = &mut self.program {
                self.current = program.next();
            }
        }
        Progress::Running
    }

    /// 执行当前命令，返回是否完成
    fn execute_current(&mut self, ctx: &mut TickContext<'_>) -> bool {
        let cmd = self.current.clone();
        match cmd.name.as_str() {
            // 通用
            "wait" => {
                let Some(seconds) = cmd.param(0) else {
                    return true;
                };
                if !self.in_progress {
                    ctx.wait_timer.stop();
                    ctx.wait_timer.reset();
                    ctx.wait_timer.start();
                    self.in_progress = true;
                }
                if ctx.wait_timer.elapsed_seconds() >= seconds {
                    ctx.wait_timer.stop();
                    true
                } else {
                    false
                }
            },

            // 底盘
            "adjustheading" => match (cmd.param(0), cmd.param(1)) {
                (Some(degrees), Some(speed)) => ctx.drive.adjust_heading(degrees, speed),
                _ => true,
            },
            "drivedistance" => match (cmd.param(0), cmd.param(1)) {
                (Some(meters), Some(speed)) => ctx.drive.drive_distance(meters, speed),
                _ => true,
            },
            "drivetime" => {
                match (cmd.param(0), cmd.param(1).and_then(direction_from), cmd.param(2)) {
                    (Some(seconds), Some(direction), Some(speed)) => {
                        if !self.in_progress {
                            ctx.drive.reset_timer();
                            self.in_progress = true;
                        }
                        ctx.drive.drive_timed(seconds, direction, speed)
                    },
                    _ => true,
                }
            },
            "turnheading" => match (cmd.param(0), cmd.param(1)) {
                (Some(degrees), Some(speed)) => ctx.drive.turn_heading(degrees, speed),
                _ => true,
            },
            "turntime" => {
                match (cmd.param(0), cmd.param(1).and_then(direction_from), cmd.param(2)) {
                    (Some(seconds), Some(direction), Some(speed)) => {
                        if !self.in_progress {
                            ctx.drive.reset_timer();
                            self.in_progress = true;
                        }
                        ctx.drive.turn_timed(seconds, direction, speed)
                    },
                    _ => true,
                }
            },

            // 射盘俯仰
            "pitchposition" => match (cmd.param(0), cmd.param(1)) {
                (Some(position), Some(speed)) => {
                    ctx.shooter.set_pitch_position(position as i32, speed)
                },
                _ => true,
            },
            "pitchtime" => {
                match (cmd.param(0), cmd.param(1).and_then(direction_from), cmd.param(2)) {
                    (Some(seconds), Some(direction), Some(speed)) => {
                        if !self.in_progress {
                            ctx.shooter.reset_timer();
                            self.in_progress = true;
                        }
                        ctx.shooter.set_pitch_timed(seconds, direction, speed)
                    },
                    _ => true,
                }
            },
            "pitchangle" => match (cmd.param(0), cmd.param(1)) {
                (Some(degrees), Some(speed)) => ctx.shooter.set_pitch_angle(degrees, speed),
                _ => true,
            },

            // 射击
            "shoot" => {
                let Some(power) = cmd.param(0) else {
                    return true;
                };
                if !self.in_progress {
                    self.action = Some(ScriptAction::Shoot(Shoot::new(power as i32)));
                    self.in_progress = true;
                }
                match &mut self.action {
                    Some(ScriptAction::Shoot(shoot)) => shoot
                        .tick(ctx.shooter, ctx.feeder, ctx.shot_timer, &ctx.params.shot_timing)
                        .is_finished(),
                    _ => true,
                }
            },
            "rapidfire" => {
                if !self.in_progress {
                    self.action = Some(ScriptAction::RapidFire(RapidFire::new()));
                    self.in_progress = true;
                }
                match &mut self.action {
                    Some(ScriptAction::RapidFire(rapid)) => rapid
                        .tick(ctx.shooter, ctx.feeder, ctx.shot_timer, &ctx.params.shot_timing)
                        .is_finished(),
                    _ => true,
                }
            },

            // 找目标
            "findtarget" => {
                let Some(height) = cmd.param(0).and_then(height_from) else {
                    return true;
                };
                if !self.in_progress {
                    self.action = Some(ScriptAction::FindTarget(FindTarget::new(height)));
                    self.in_progress = true;
                }
                match &mut self.action {
                    Some(ScriptAction::FindTarget(find)) => find
                        .tick(
                            ctx.store,
                            ctx.cursor,
                            ctx.drive,
                            ctx.shooter,
                            &ctx.params.geometry,
                            &ctx.params.calibration,
                        )
                        .is_finished(),
                    _ => true,
                }
            },

            // 爬升绞盘
            "climberposition" => match (cmd.param(0), cmd.param(1)) {
                (Some(position), Some(speed)) => {
                    ctx.winch.set_positioned(position as i32, speed)
                },
                _ => true,
            },
            "climbertime" => {
                match (cmd.param(0), cmd.param(1).and_then(direction_from), cmd.param(2)) {
                    (Some(seconds), Some(direction), Some(speed)) => {
                        if !self.in_progress {
                            ctx.winch.reset_timer();
                            self.in_progress = true;
                        }
                        ctx.winch.set_timed(seconds, direction, speed)
                    },
                    _ => true,
                }
            },

            // 不认识的命令名：跳过，不中断剩余程序
            other => {
                debug!("Unrecognized autoscript command `{}`, skipping", other);
                true
            },
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// 数值参数 → 方向枚举；出值域或非法值按未设置处理
fn direction_from(value: f64) -> Option<Direction> {
    if !(0.0..=255.0).contains(&value) {
        return None;
    }
    Direction::try_from(value as u8).ok()
}

/// 数值参数 → 目标高度枚举；非法值按未设置处理
fn height_from(value: f64) -> Option<TargetHeight> {
    if !(0.0..=255.0).contains(&value) {
        return None;
    }
    TargetHeight::try_from(value as u8).ok()
}
