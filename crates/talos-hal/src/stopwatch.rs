//! 秒表抽象
//!
//! 逐步动作状态机（射击、爬升、脚本 wait 等）全部通过 [`Stopwatch`]
//! 读取流逝时间，从不直接触碰 `Instant`。这样控制逻辑可以用
//! [`ManualStopwatch`] 在测试里以模拟时间逐周期推进，而真机使用
//! [`SystemStopwatch`]。

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// 可启停/清零的单调秒表
///
/// 语义与赛用计时器一致：
/// - `start` 在停止状态下开始计时，运行中调用是 no-op
/// - `stop` 冻结累计值
/// - `reset` 把累计值清零（不改变运行/停止状态）
/// - `elapsed_seconds` 读取累计秒数
pub trait Stopwatch: Send {
    fn start(&mut self);
    fn stop(&mut self);
    fn reset(&mut self);
    fn elapsed_seconds(&self) -> f64;
}

/// 基于 `Instant` 的真实秒表
#[derive(Debug, Default)]
pub struct SystemStopwatch {
    /// 本段计时的起点（`None` 表示停止中）
    started_at: Option<Instant>,
    /// 之前各段累计的秒数
    accumulated: f64,
}

impl SystemStopwatch {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stopwatch for SystemStopwatch {
    fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    fn stop(&mut self) {
        if let Some(base) = self.started_at.take() {
            self.accumulated += base.elapsed().as_secs_f64();
        }
    }

    fn reset(&mut self) {
        self.accumulated = 0.0;
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }

    fn elapsed_seconds(&self) -> f64 {
        match self.started_at {
            Some(base) => self.accumulated + base.elapsed().as_secs_f64(),
            None => self.accumulated,
        }
    }
}

/// 手动推进的共享时钟（微秒计）
///
/// 克隆后的句柄共享同一时间源：测试持有一份用 [`advance`](Self::advance)
/// 推进时间，被测代码通过挂在它上面的 [`ManualStopwatch`] 读取。
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_us: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// 推进模拟时间
    pub fn advance(&self, seconds: f64) {
        let us = (seconds * 1_000_000.0) as u64;
        self.now_us.fetch_add(us, Ordering::SeqCst);
    }

    fn now_seconds(&self) -> f64 {
        self.now_us.load(Ordering::SeqCst) as f64 / 1_000_000.0
    }

    /// 创建挂在本时钟上的秒表
    pub fn stopwatch(&self) -> ManualStopwatch {
        ManualStopwatch {
            clock: self.clone(),
            started_at: None,
            accumulated: 0.0,
        }
    }
}

/// 挂在 [`ManualClock`] 上的秒表
#[derive(Debug, Clone)]
pub struct ManualStopwatch {
    clock: ManualClock,
    started_at: Option<f64>,
    accumulated: f64,
}

impl Stopwatch for ManualStopwatch {
    fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(self.clock.now_seconds());
        }
    }

    fn stop(&mut self) {
        if let Some(base) = self.started_at.take() {
            self.accumulated += self.clock.now_seconds() - base;
        }
    }

    fn reset(&mut self) {
        self.accumulated = 0.0;
        if self.started_at.is_some() {
            self.started_at = Some(self.clock.now_seconds());
        }
    }

    fn elapsed_seconds(&self) -> f64 {
        match self.started_at {
            Some(base) => self.accumulated + (self.clock.now_seconds() - base),
            None => self.accumulated,
        }
    }
}
