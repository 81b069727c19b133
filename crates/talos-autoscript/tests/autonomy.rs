//! 自主阶段端到端场景测试
//!
//! 用插桩 mock 执行器和手动时钟驱动解释器，逐周期验证整个
//! 脚本 → 解释器 → 逐步动作 → 协作者链路的时序行为。

use talos_actions::{ActionParams, Actuators, Progress, neutralize};
use talos_autoscript::{Interpreter, Program, TickContext};
use talos_hal::mock::{
    MockDrive, MockFeeder, MockMessageSink, MockShooter, MockWinch, particle,
};
use talos_hal::{Direction, ManualClock, ManualStopwatch};
use talos_vision::{TargetCandidate, TargetCursor, TargetReport, TargetStore};

/// 一套完整的插桩环境
struct Harness {
    drive: MockDrive,
    shooter: MockShooter,
    feeder: MockFeeder,
    winch: MockWinch,
    wait_timer: ManualStopwatch,
    shot_timer: ManualStopwatch,
    store: TargetStore,
    cursor: TargetCursor,
    params: ActionParams,
    clock: ManualClock,
}

impl Harness {
    fn new() -> Self {
        let clock = ManualClock::new();
        Self {
            drive: MockDrive::default(),
            shooter: MockShooter::default(),
            feeder: MockFeeder::default(),
            winch: MockWinch::default(),
            wait_timer: clock.stopwatch(),
            shot_timer: clock.stopwatch(),
            store: TargetStore::new(),
            cursor: TargetCursor::new(),
            params: ActionParams::default(),
            clock,
        }
    }

    fn tick(&mut self, interpreter: &mut Interpreter) -> Progress {
        let mut ctx = TickContext {
            drive: &mut self.drive,
            shooter: &mut self.shooter,
            feeder: &mut self.feeder,
            winch: &mut self.winch,
            wait_timer: &mut self.wait_timer,
            shot_timer: &mut self.shot_timer,
            store: &self.store,
            cursor: &mut self.cursor,
            params: &self.params,
        };
        interpreter.tick(&mut ctx)
    }

    fn total_collaborator_calls(&self) -> u32 {
        self.drive.total_calls()
            + self.shooter.total_calls()
            + self.feeder.total_calls()
            + self.winch.total_calls()
    }
}

#[test]
fn empty_interpreter_reports_finished_immediately() {
    let mut harness = Harness::new();
    let mut interpreter = Interpreter::new();
    assert!(harness.tick(&mut interpreter).is_finished());
    assert!(interpreter.is_finished());
    assert_eq!(harness.total_collaborator_calls(), 0);
}

#[test]
fn n_trivial_commands_consume_exactly_n_ticks() {
    let mut harness = Harness::new();
    let mut interpreter = Interpreter::new();
    interpreter.load(Program::parse(
        "adjustheading 10 0.5\nadjustheading -10 0.5\nadjustheading 5 0.5\n",
    ));

    // mock 第一次调用即到达：每周期恰好推进一条命令
    for _ in 0..3 {
        assert!(harness.tick(&mut interpreter).is_running());
    }
    assert_eq!(harness.drive.adjust_heading_calls, 3);

    // 第 N+1 个周期起幂等地报告整体完成
    assert!(harness.tick(&mut interpreter).is_finished());
    assert!(harness.tick(&mut interpreter).is_finished());
    assert_eq!(harness.drive.adjust_heading_calls, 3);
}

#[test]
fn unset_required_params_complete_without_collaborator_calls() {
    let mut harness = Harness::new();
    let mut interpreter = Interpreter::new();
    // 三条都缺必要参数
    interpreter.load(Program::parse("adjustheading\ndrivetime 2.0 2\nshoot\n"));

    for _ in 0..3 {
        assert!(harness.tick(&mut interpreter).is_running());
    }
    assert!(harness.tick(&mut interpreter).is_finished());
    assert_eq!(harness.total_collaborator_calls(), 0);
}

#[test]
fn malformed_direction_completes_without_effect() {
    let mut harness = Harness::new();
    let mut interpreter = Interpreter::new();
    // 99 不是合法方向值
    interpreter.load(Program::parse("drivetime 2.0 99 0.5\n"));

    assert!(harness.tick(&mut interpreter).is_running());
    assert!(harness.tick(&mut interpreter).is_finished());
    assert_eq!(harness.drive.drive_timed_calls, 0);
    assert_eq!(harness.drive.reset_timer_calls, 0);
}

#[test]
fn unknown_command_is_skipped_not_fatal() {
    let mut harness = Harness::new();
    let mut interpreter = Interpreter::new();
    interpreter.load(Program::parse("frobnicate 1 2 3\nadjustheading 10 0.5\n"));

    assert!(harness.tick(&mut interpreter).is_running());
    assert_eq!(harness.total_collaborator_calls(), 0);

    // 后续命令照常执行
    assert!(harness.tick(&mut interpreter).is_running());
    assert_eq!(harness.drive.adjust_heading_calls, 1);
    assert!(harness.tick(&mut interpreter).is_finished());
}

#[test]
fn wait_then_turnheading_scenario() {
    let mut harness = Harness::new();
    harness.drive = MockDrive::arriving_after(2);
    let mut interpreter = Interpreter::new();
    interpreter.load(Program::parse("wait 2.0\nturnheading 90 0.5\nend\n"));

    // 周期 1：装上 wait 计时器，未到时
    assert!(harness.tick(&mut interpreter).is_running());
    assert_eq!(interpreter.current_command().name, "wait");

    // 时间未到 2.0s 前持续返回未完成
    harness.clock.advance(1.0);
    assert!(harness.tick(&mut interpreter).is_running());
    assert_eq!(interpreter.current_command().name, "wait");

    // 到时：wait 完成，游标推进
    harness.clock.advance(1.0);
    assert!(harness.tick(&mut interpreter).is_running());
    assert_eq!(interpreter.current_command().name, "turnheading");

    // 随后每周期驱动 turn_heading(90, 0.5) 直到到位
    assert!(harness.tick(&mut interpreter).is_running());
    assert!(harness.tick(&mut interpreter).is_running());
    assert!(harness.tick(&mut interpreter).is_running());
    assert_eq!(harness.drive.last_turn_heading, Some((90.0, 0.5)));
    assert_eq!(harness.drive.turn_heading_calls, 3);

    // 下一个周期读到 end 哨兵，整体完成；控制循环把执行机构归零
    assert!(harness.tick(&mut interpreter).is_finished());
    let mut messages = MockMessageSink::default();
    let mut rig = Actuators {
        drive: &mut harness.drive,
        shooter: &mut harness.shooter,
        feeder: &mut harness.feeder,
        winch: &mut harness.winch,
        messages: &mut messages,
    };
    neutralize(&mut rig);
    assert_eq!(*harness.drive.manual_history.last().unwrap(), (0.0, 0.0));
}

#[test]
fn shoot_command_runs_full_timing_sequence() {
    let mut harness = Harness::new();
    let mut interpreter = Interpreter::new();
    interpreter.load(Program::parse("shoot 50\n"));

    // t=0: 飞轮开始以 50% 供电，起转门限未到
    assert!(harness.tick(&mut interpreter).is_running());
    assert_eq!(harness.shooter.shoot_powers, vec![50]);
    assert!(harness.feeder.transitions.is_empty());

    // t=1.5: 起转完成，送盘
    harness.clock.advance(1.5);
    assert!(harness.tick(&mut interpreter).is_running());
    assert_eq!(harness.feeder.transitions, vec![true]);

    // t=2.0: 收回送盘、停飞轮，命令完成
    harness.clock.advance(0.5);
    assert!(harness.tick(&mut interpreter).is_running());
    assert_eq!(harness.feeder.transitions, vec![true, false]);
    assert_eq!(*harness.shooter.shoot_powers.last().unwrap(), 0);

    assert!(harness.tick(&mut interpreter).is_finished());
}

#[test]
fn rapidfire_command_feeds_three_discs() {
    let mut harness = Harness::new();
    let mut interpreter = Interpreter::new();
    interpreter.load(Program::parse("rapidfire\n"));

    let mut guard = 0;
    while harness.tick(&mut interpreter).is_running() {
        harness.clock.advance(0.25);
        guard += 1;
        assert!(guard < 100, "rapidfire never finished");
    }
    assert_eq!(
        harness.feeder.transitions,
        vec![true, false, true, false, true, false]
    );
    assert!(interpreter.is_finished());
}

#[test]
fn findtarget_selects_matching_height_regardless_of_order() {
    let mut harness = Harness::new();
    harness.store.set_enabled(true);
    // 第一个候选 Medium（62x29），第二个 High（62x20）
    harness.store.publish(TargetReport::new(vec![
        TargetCandidate::from(&particle(10, 62, 29, 62.0 * 29.0)),
        TargetCandidate::from(&particle(60, 62, 20, 62.0 * 20.0)),
    ]));

    let mut interpreter = Interpreter::new();
    // findtarget 0 = High
    interpreter.load(Program::parse("findtarget 0\n"));

    assert!(harness.tick(&mut interpreter).is_running());
    // 必须选中第二个候选（恰好分类为 High 的那个）
    assert_eq!(harness.cursor.selected().unwrap().center_y, 60);
    assert_eq!(harness.drive.reset_sensors_calls, 1);

    assert!(harness.tick(&mut interpreter).is_running());
    assert!(harness.tick(&mut interpreter).is_finished());
}

#[test]
fn climbertime_resets_winch_timer_once_then_polls() {
    let mut harness = Harness::new();
    harness.winch = MockWinch::arriving_after(2);
    let mut interpreter = Interpreter::new();
    // 方向 4 = Up
    interpreter.load(Program::parse("climbertime 3.0 4 1.0\n"));

    assert!(harness.tick(&mut interpreter).is_running());
    assert!(harness.tick(&mut interpreter).is_running());
    assert!(harness.tick(&mut interpreter).is_running());
    assert!(harness.tick(&mut interpreter).is_finished());

    // 计时器只在首次进入时重置，之后逐周期轮询
    assert_eq!(harness.winch.reset_timer_calls, 1);
    assert_eq!(harness.winch.set_timed_calls, 3);
    assert_eq!(
        harness.winch.last_set_timed,
        Some((3.0, Direction::Up, 1.0))
    );
}

#[test]
fn climberposition_polls_until_arrival() {
    let mut harness = Harness::new();
    harness.winch = MockWinch::arriving_after(1);
    let mut interpreter = Interpreter::new();
    interpreter.load(Program::parse("climberposition 500 0.8\n"));

    assert!(harness.tick(&mut interpreter).is_running());
    assert!(harness.tick(&mut interpreter).is_running());
    assert!(harness.tick(&mut interpreter).is_finished());
    assert_eq!(harness.winch.set_positioned_calls, 2);
}

#[test]
fn explicit_end_line_stops_before_later_commands() {
    let mut harness = Harness::new();
    let mut interpreter = Interpreter::new();
    interpreter.load(Program::parse("end\nadjustheading 10 0.5\n"));

    assert!(harness.tick(&mut interpreter).is_finished());
    assert_eq!(harness.drive.adjust_heading_calls, 0);
}
