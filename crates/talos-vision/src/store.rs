//! 目标存储
//!
//! 采集任务与控制循环之间唯一的共享可变状态：一个保存最新
//! [`TargetReport`] 的单槽位。写入是整体替换（`ArcSwap::store`），
//! 读取是廉价拷出（`load_full`），读者不可能观察到写了一半的列表。
//! 没有队列：消费慢于生产时，中间的报告被静默覆盖，latest-wins。
//!
//! 槽位随相机使能标志联动开关：关闭后发布被丢弃、快照读出为空，
//! 已有内容保留到被覆盖或显式清空。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwap;
use tracing::trace;

use crate::candidate::TargetReport;

/// 最新目标报告的共享单槽位
pub struct TargetStore {
    slot: ArcSwap<TargetReport>,
    enabled: AtomicBool,
}

impl TargetStore {
    /// 创建禁用状态的存储（与相机使能标志联动后再打开）
    pub fn new() -> Self {
        Self {
            slot: ArcSwap::from_pointee(TargetReport::empty()),
            enabled: AtomicBool::new(false),
        }
    }

    /// 开关存储
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// 整体替换槽位内容
    ///
    /// 禁用状态下丢弃并返回 `false`。
    pub fn publish(&self, report: TargetReport) -> bool {
        if !self.is_enabled() {
            trace!("Target store disabled, dropping report");
            return false;
        }
        self.slot.store(Arc::new(report));
        true
    }

    /// 拷出当前快照
    ///
    /// 永远是某一次完整发布的结果（或空报告）；禁用状态下读出为空。
    pub fn snapshot(&self) -> Arc<TargetReport> {
        if !self.is_enabled() {
            return Arc::new(TargetReport::empty());
        }
        self.slot.load_full()
    }

    /// 显式清空槽位
    pub fn clear(&self) {
        self.slot.store(Arc::new(TargetReport::empty()));
    }
}

impl Default for TargetStore {
    fn default() -> Self {
        Self::new()
    }
}
