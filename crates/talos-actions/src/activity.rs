//! 自主行为互斥监督
//!
//! 把原本散落的一堆"某某动作正在进行"布尔标志收拢成一个枚举：任一
//! 时刻最多一个自主行为占有执行机构，非法组合（比如爬升和瞄准同时
//! 活动）在类型上就不可表示。启动任何行为都会先强制结束全部兄弟
//! 行为，再装配一个从第一步开始的全新实例。
//!
//! 射击与连发互斥，因此共用 [`ActivitySet`] 持有的同一只秒表。

use talos_hal::Stopwatch;
use talos_vision::{TargetCursor, TargetHeight, TargetStore};
use tracing::info;

use crate::actuators::Actuators;
use crate::climb::Climb;
use crate::find_target::{CycleTarget, FindTarget};
use crate::params::ActionParams;
use crate::pitch::{ClimbingPrep, FeederHeight};
use crate::shoot::{RapidFire, Shoot};
use crate::step::Progress;

/// 当前占有执行机构的自主行为
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Targeting,
    CycleTarget,
    FeederHeight,
    ClimbingPrep,
    Climbing,
    Shooting,
    RapidFiring,
}

/// 自主行为集合与互斥监督
pub struct ActivitySet {
    active: Option<Activity>,
    find_target: FindTarget,
    cycle_target: CycleTarget,
    feeder_height: FeederHeight,
    climbing_prep: ClimbingPrep,
    climb: Climb,
    shoot: Shoot,
    rapid_fire: RapidFire,
    cursor: TargetCursor,
    /// 射击/连发共用的秒表（二者互斥，绝不并发）
    shot_timer: Box<dyn Stopwatch>,
}

impl ActivitySet {
    pub fn new(shot_timer: Box<dyn Stopwatch>) -> Self {
        Self {
            active: None,
            find_target: FindTarget::new(TargetHeight::High),
            cycle_target: CycleTarget::new(),
            feeder_height: FeederHeight::new(),
            climbing_prep: ClimbingPrep::new(),
            climb: Climb::new(),
            shoot: Shoot::new(0),
            rapid_fire: RapidFire::new(),
            cursor: TargetCursor::new(),
            shot_timer,
        }
    }

    /// 当前活动的行为
    pub fn active(&self) -> Option<Activity> {
        self.active
    }

    /// 目标快照游标（操作员界面显示当前选择用）
    pub fn cursor(&self) -> &TargetCursor {
        &self.cursor
    }

    /// 强制结束所有行为
    pub fn stop_all(&mut self) {
        self.find_target.abort();
        self.cycle_target.abort();
        self.feeder_height.abort();
        self.climbing_prep.abort();
        self.climb.abort();
        self.shoot.abort();
        self.rapid_fire.abort();
        self.active = None;
    }

    pub fn start_targeting(&mut self, height: TargetHeight) {
        self.stop_all();
        self.find_target = FindTarget::new(height);
        self.active = Some(Activity::Targeting);
        info!("Activity started: targeting {:?}", height);
    }

    pub fn start_cycle_target(&mut self) {
        self.stop_all();
        self.cycle_target = CycleTarget::new();
        self.active = Some(Activity::CycleTarget);
        info!("Activity started: cycle target");
    }

    pub fn start_feeder_height(&mut self) {
        self.stop_all();
        self.feeder_height = FeederHeight::new();
        self.active = Some(Activity::FeederHeight);
        info!("Activity started: feeder height");
    }

    pub fn start_climbing_prep(&mut self) {
        self.stop_all();
        self.climbing_prep = ClimbingPrep::new();
        self.active = Some(Activity::ClimbingPrep);
        info!("Activity started: climbing prep");
    }

    pub fn start_climbing(&mut self) {
        self.stop_all();
        self.climb = Climb::new();
        self.active = Some(Activity::Climbing);
        info!("Activity started: climbing");
    }

    pub fn start_shooting(&mut self, power_percent: i32) {
        self.stop_all();
        self.shoot = Shoot::new(power_percent);
        self.active = Some(Activity::Shooting);
        info!("Activity started: shooting at {}%", power_percent);
    }

    pub fn start_rapid_fire(&mut self) {
        self.stop_all();
        self.rapid_fire = RapidFire::new();
        self.active = Some(Activity::RapidFiring);
        info!("Activity started: rapid fire");
    }

    /// 推进当前活动的行为一个控制周期
    ///
    /// 没有活动行为时是 no-op；行为完成时清除活动标记并向操作员
    /// 报一条 "Finished."。
    pub fn tick(
        &mut self,
        rig: &mut Actuators<'_>,
        store: &TargetStore,
        params: &ActionParams,
    ) {
        let Some(active) = self.active else {
            return;
        };

        let progress = match active {
            Activity::Targeting => self.find_target.tick(
                store,
                &mut self.cursor,
                rig.drive,
                rig.shooter,
                &params.geometry,
                &params.calibration,
            ),
            Activity::CycleTarget => self.cycle_target.tick(
                &mut self.cursor,
                rig.drive,
                rig.shooter,
                &params.geometry,
                &params.calibration,
            ),
            Activity::FeederHeight => self.feeder_height.tick(rig.shooter, &params.pitch_presets),
            Activity::ClimbingPrep => self.climbing_prep.tick(rig.shooter, &params.pitch_presets),
            Activity::Climbing => {
                self.climb.tick(rig.drive, rig.shooter, rig.winch, &params.climb)
            },
            Activity::Shooting => self.shoot.tick(
                rig.shooter,
                rig.feeder,
                self.shot_timer.as_mut(),
                &params.shot_timing,
            ),
            Activity::RapidFiring => self.rapid_fire.tick(
                rig.shooter,
                rig.feeder,
                self.shot_timer.as_mut(),
                &params.shot_timing,
            ),
        };

        if progress == Progress::Finished {
            info!("Activity finished: {:?}", active);
            self.active = None;
            rig.messages.show_message("Finished.", false);
        }
    }
}
