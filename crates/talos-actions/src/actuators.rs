//! 执行机构集束
//!
//! 把控制循环持有的全部执行机构借用打包成一个参数传给动作层，
//! 各字段相互独立，动作可以同时可变借用其中几个。

use talos_hal::{DriveControl, FeederControl, MessageSink, ShooterControl, WinchControl};

/// 一个控制周期内可用的执行机构借用
pub struct Actuators<'a> {
    pub drive: &'a mut dyn DriveControl,
    pub shooter: &'a mut dyn ShooterControl,
    pub feeder: &'a mut dyn FeederControl,
    pub winch: &'a mut dyn WinchControl,
    pub messages: &'a mut dyn MessageSink,
}

/// 把所有执行机构置于中立
///
/// 自主程序结束或未选择脚本时，控制循环每个周期调用一次，持续喂给
/// 电机零指令（否则触发电机安全保护）。
pub fn neutralize(rig: &mut Actuators<'_>) {
    rig.drive.drive_manual(0.0, 0.0);
    rig.shooter.move_pitch(0.0);
    rig.shooter.shoot(0);
    rig.winch.move_winch(0.0);
    rig.feeder.set_extended(false);
}
