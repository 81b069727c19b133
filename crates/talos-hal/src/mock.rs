//! 插桩 mock 执行器
//!
//! `mock` feature 下提供的测试替身，供上层 crate 的单元/集成测试使用。
//! 每个 mock 记录全部调用（次数与最近参数），"移动到目标"类方法用
//! 可配置的轮询倒计时模拟逐周期逼近：倒数到 0 的那次调用返回已到达，
//! 之后倒计时自动重置，下一条指令重新从头逼近。

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::camera::{FrameSource, RawParticle, ThresholdConfig};
use crate::control::{Direction, DriveControl, FeederControl, ShooterControl, WinchControl};
use crate::error::HalError;
use crate::message::MessageSink;

/// 到达倒计时
///
/// `polls_until_arrival == 0` 表示每条指令第一次调用即到达。
#[derive(Debug, Clone, Default)]
struct ArrivalCountdown {
    polls_until_arrival: u32,
    remaining: u32,
}

impl ArrivalCountdown {
    fn new(polls_until_arrival: u32) -> Self {
        Self {
            polls_until_arrival,
            remaining: polls_until_arrival,
        }
    }

    fn poll(&mut self) -> bool {
        if self.remaining == 0 {
            self.remaining = self.polls_until_arrival;
            true
        } else {
            self.remaining -= 1;
            false
        }
    }
}

/// 底盘 mock
#[derive(Debug, Default)]
pub struct MockDrive {
    countdown: ArrivalCountdown,
    pub adjust_heading_calls: u32,
    pub drive_distance_calls: u32,
    pub drive_timed_calls: u32,
    pub turn_heading_calls: u32,
    pub turn_timed_calls: u32,
    pub manual_calls: u32,
    pub reset_sensors_calls: u32,
    pub reset_timer_calls: u32,
    pub last_adjust_heading: Option<(f64, f64)>,
    pub last_turn_heading: Option<(f64, f64)>,
    /// 每次 `drive_manual` 的 (linear, turn)
    pub manual_history: Vec<(f64, f64)>,
    pub heading_value: f64,
}

impl MockDrive {
    /// 每条指令轮询 `polls` 次后到达
    pub fn arriving_after(polls: u32) -> Self {
        Self {
            countdown: ArrivalCountdown::new(polls),
            ..Self::default()
        }
    }

    /// 所有方法的总调用次数（验证"零协作者调用"用）
    pub fn total_calls(&self) -> u32 {
        self.adjust_heading_calls
            + self.drive_distance_calls
            + self.drive_timed_calls
            + self.turn_heading_calls
            + self.turn_timed_calls
            + self.manual_calls
            + self.reset_sensors_calls
            + self.reset_timer_calls
    }
}

impl DriveControl for MockDrive {
    fn adjust_heading(&mut self, adjustment_deg: f64, speed: f64) -> bool {
        self.adjust_heading_calls += 1;
        self.last_adjust_heading = Some((adjustment_deg, speed));
        self.countdown.poll()
    }

    fn drive_distance(&mut self, _distance_m: f64, _speed: f64) -> bool {
        self.drive_distance_calls += 1;
        self.countdown.poll()
    }

    fn drive_timed(&mut self, _seconds: f64, _direction: Direction, _speed: f64) -> bool {
        self.drive_timed_calls += 1;
        self.countdown.poll()
    }

    fn turn_heading(&mut self, heading_deg: f64, speed: f64) -> bool {
        self.turn_heading_calls += 1;
        self.last_turn_heading = Some((heading_deg, speed));
        self.countdown.poll()
    }

    fn turn_timed(&mut self, _seconds: f64, _direction: Direction, _speed: f64) -> bool {
        self.turn_timed_calls += 1;
        self.countdown.poll()
    }

    fn drive_manual(&mut self, linear: f64, turn: f64) {
        self.manual_calls += 1;
        self.manual_history.push((linear, turn));
    }

    fn heading(&self) -> f64 {
        self.heading_value
    }

    fn reset_sensors(&mut self) {
        self.reset_sensors_calls += 1;
    }

    fn reset_timer(&mut self) {
        self.reset_timer_calls += 1;
    }
}

/// 射盘机构 mock
#[derive(Debug, Default)]
pub struct MockShooter {
    countdown: ArrivalCountdown,
    pub set_pitch_position_calls: u32,
    pub set_pitch_angle_calls: u32,
    pub set_pitch_timed_calls: u32,
    pub move_pitch_calls: u32,
    pub reset_timer_calls: u32,
    pub last_pitch_angle: Option<(f64, f64)>,
    /// 每次 `shoot` 的功率百分比
    pub shoot_powers: Vec<i32>,
}

impl MockShooter {
    pub fn arriving_after(polls: u32) -> Self {
        Self {
            countdown: ArrivalCountdown::new(polls),
            ..Self::default()
        }
    }

    pub fn total_calls(&self) -> u32 {
        self.set_pitch_position_calls
            + self.set_pitch_angle_calls
            + self.set_pitch_timed_calls
            + self.move_pitch_calls
            + self.reset_timer_calls
            + self.shoot_powers.len() as u32
    }
}

impl ShooterControl for MockShooter {
    fn set_pitch_position(&mut self, _encoder_count: i32, _speed: f64) -> bool {
        self.set_pitch_position_calls += 1;
        self.countdown.poll()
    }

    fn set_pitch_angle(&mut self, angle_deg: f64, speed: f64) -> bool {
        self.set_pitch_angle_calls += 1;
        self.last_pitch_angle = Some((angle_deg, speed));
        self.countdown.poll()
    }

    fn set_pitch_timed(&mut self, _seconds: f64, _direction: Direction, _speed: f64) -> bool {
        self.set_pitch_timed_calls += 1;
        self.countdown.poll()
    }

    fn move_pitch(&mut self, _directional_speed: f64) {
        self.move_pitch_calls += 1;
    }

    fn shoot(&mut self, power_percent: i32) {
        self.shoot_powers.push(power_percent);
    }

    fn reset_timer(&mut self) {
        self.reset_timer_calls += 1;
    }
}

/// 送盘气缸 mock
#[derive(Debug, Default)]
pub struct MockFeeder {
    pub extended: bool,
    /// 每次 `set_extended` 的目标状态
    pub transitions: Vec<bool>,
}

impl MockFeeder {
    pub fn total_calls(&self) -> u32 {
        self.transitions.len() as u32
    }
}

impl FeederControl for MockFeeder {
    fn set_extended(&mut self, extended: bool) {
        self.extended = extended;
        self.transitions.push(extended);
    }
}

/// 爬升绞盘 mock
#[derive(Debug, Default)]
pub struct MockWinch {
    countdown: ArrivalCountdown,
    pub set_positioned_calls: u32,
    pub set_timed_calls: u32,
    pub move_calls: u32,
    pub reset_timer_calls: u32,
    pub last_set_timed: Option<(f64, Direction, f64)>,
}

impl MockWinch {
    pub fn arriving_after(polls: u32) -> Self {
        Self {
            countdown: ArrivalCountdown::new(polls),
            ..Self::default()
        }
    }

    pub fn total_calls(&self) -> u32 {
        self.set_positioned_calls + self.set_timed_calls + self.move_calls + self.reset_timer_calls
    }
}

impl WinchControl for MockWinch {
    fn set_positioned(&mut self, _encoder_count: i32, _speed: f64) -> bool {
        self.set_positioned_calls += 1;
        self.countdown.poll()
    }

    fn set_timed(&mut self, seconds: f64, direction: Direction, speed: f64) -> bool {
        self.set_timed_calls += 1;
        self.last_set_timed = Some((seconds, direction, speed));
        self.countdown.poll()
    }

    fn move_winch(&mut self, _directional_speed: f64) {
        self.move_calls += 1;
    }

    fn reset_timer(&mut self) {
        self.reset_timer_calls += 1;
    }
}

/// 消息 mock：把所有消息收进一个 Vec
#[derive(Debug, Default)]
pub struct MockMessageSink {
    pub messages: Vec<(String, bool)>,
}

impl MessageSink for MockMessageSink {
    fn show_message(&mut self, text: &str, clear_first: bool) {
        self.messages.push((text.to_string(), clear_first));
    }
}

/// 可注入失败的流水线阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockStage {
    Capture,
    Threshold,
    RemoveSmall,
    Fill,
    Extract,
    Snapshot,
}

/// mock 帧：直接携带最终会被提取出来的粒子
#[derive(Debug, Clone)]
pub struct MockFrame {
    pub particles: Vec<RawParticle>,
}

/// 帧源 mock
///
/// 队列里的每个元素是一帧会提取出的粒子集合；滤波原语原样透传。
#[derive(Debug, Default)]
pub struct MockFrameSource {
    pub queued: VecDeque<Vec<RawParticle>>,
    pub fail_stage: Option<MockStage>,
    pub snapshots: Vec<PathBuf>,
}

impl MockFrameSource {
    pub fn with_frames(frames: Vec<Vec<RawParticle>>) -> Self {
        Self {
            queued: frames.into(),
            ..Self::default()
        }
    }

    fn stage_result(&self, stage: MockStage, op: &'static str) -> Result<(), HalError> {
        if self.fail_stage == Some(stage) {
            Err(HalError::ImageOp {
                op,
                reason: "injected failure".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl FrameSource for MockFrameSource {
    type Frame = MockFrame;

    fn has_fresh_frame(&mut self) -> bool {
        !self.queued.is_empty()
    }

    fn capture(&mut self) -> Result<MockFrame, HalError> {
        if self.fail_stage == Some(MockStage::Capture) {
            return Err(HalError::Capture("injected failure".to_string()));
        }
        match self.queued.pop_front() {
            Some(particles) => Ok(MockFrame { particles }),
            None => Err(HalError::Capture("no frame queued".to_string())),
        }
    }

    fn threshold_filter(
        &mut self,
        frame: &MockFrame,
        _threshold: &ThresholdConfig,
    ) -> Result<MockFrame, HalError> {
        self.stage_result(MockStage::Threshold, "threshold_filter")?;
        Ok(frame.clone())
    }

    fn remove_small_objects(
        &mut self,
        frame: &MockFrame,
        _erosions: u32,
    ) -> Result<MockFrame, HalError> {
        self.stage_result(MockStage::RemoveSmall, "remove_small_objects")?;
        Ok(frame.clone())
    }

    fn fill_holes(&mut self, frame: &MockFrame) -> Result<MockFrame, HalError> {
        self.stage_result(MockStage::Fill, "fill_holes")?;
        Ok(frame.clone())
    }

    fn extract_particles(&mut self, frame: &MockFrame) -> Result<Vec<RawParticle>, HalError> {
        self.stage_result(MockStage::Extract, "extract_particles")?;
        Ok(frame.particles.clone())
    }

    fn store_snapshot(&mut self, _frame: &MockFrame, path: &Path) -> Result<(), HalError> {
        if self.fail_stage == Some(MockStage::Snapshot) {
            return Err(HalError::Snapshot(std::io::Error::other(
                "injected failure",
            )));
        }
        self.snapshots.push(path.to_path_buf());
        Ok(())
    }
}

/// 构造一个居中的测试粒子（320x240 帧）
pub fn particle(center_y: i32, width: u32, height: u32, area: f64) -> RawParticle {
    particle_at(160, center_y, width, height, area)
}

/// 构造指定质心的测试粒子（320x240 帧）
pub fn particle_at(center_x: i32, center_y: i32, width: u32, height: u32, area: f64) -> RawParticle {
    RawParticle {
        bound_width: width,
        bound_height: height,
        center_x,
        center_y,
        center_x_normalized: (center_x as f64 - 160.0) / 160.0,
        center_y_normalized: (center_y as f64 - 120.0) / 120.0,
        particle_area: area,
        image_width: 320,
        image_height: 240,
    }
}
