//! 目标选择
//!
//! [`TargetCursor`] 持有目标存储的一份本地快照和当前选中位置。
//! 采集任务在后台持续覆盖存储，游标只在显式 `refresh` 时拷出一次，
//! 之后的选择/轮换全部基于这份快照进行，保证一轮瞄准期间目标列表
//! 稳定。

use tracing::trace;

use crate::candidate::TargetCandidate;
use crate::classify::{HeightCalibration, TargetHeight};
use crate::store::TargetStore;

/// 目标快照游标
#[derive(Debug, Clone, Default)]
pub struct TargetCursor {
    snapshot: Vec<TargetCandidate>,
    index: usize,
    selected: Option<TargetCandidate>,
}

impl TargetCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从存储拷出一份新快照，清除旧的选择
    pub fn refresh(&mut self, store: &TargetStore) {
        self.snapshot = store.snapshot().candidates().to_vec();
        self.index = 0;
        self.selected = None;
        trace!("Target cursor refreshed: {} candidates", self.snapshot.len());
    }

    /// 按期望高度选择候选
    ///
    /// 顺序扫描快照取第一个分类恰好匹配的候选；没有恰好匹配时，
    /// 期望 Low 则退回第一个（画面最高、离地最低判读），否则退回
    /// 最后一个。空快照是 no-op，保持未选中。
    pub fn select(
        &mut self,
        height: TargetHeight,
        calibration: &HeightCalibration,
    ) -> Option<&TargetCandidate> {
        if self.snapshot.is_empty() {
            return None;
        }

        for (i, candidate) in self.snapshot.iter().enumerate() {
            if calibration.classify_candidate(candidate) == height {
                self.index = i;
                self.selected = Some(candidate.clone());
                return self.selected.as_ref();
            }
        }

        let fallback = if height == TargetHeight::Low {
            0
        } else {
            self.snapshot.len() - 1
        };
        self.index = fallback;
        self.selected = Some(self.snapshot[fallback].clone());
        self.selected.as_ref()
    }

    /// 循环切换到快照中的下一个候选
    ///
    /// 候选少于两个时是 no-op。
    pub fn next_target(&mut self) -> Option<&TargetCandidate> {
        if self.snapshot.len() < 2 {
            return None;
        }
        self.index = (self.index + 1) % self.snapshot.len();
        self.selected = Some(self.snapshot[self.index].clone());
        self.selected.as_ref()
    }

    /// 当前选中的候选
    pub fn selected(&self) -> Option<&TargetCandidate> {
        self.selected.as_ref()
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::TargetReport;
    use talos_hal::mock::particle;

    // 62x20 → 3.1 → High, 62x29 → ~2.14 → Medium, 37x32 → ~1.16 → Low
    fn high(center_y: i32) -> TargetCandidate {
        TargetCandidate::from(&particle(center_y, 62, 20, 62.0 * 20.0))
    }
    fn medium(center_y: i32) -> TargetCandidate {
        TargetCandidate::from(&particle(center_y, 62, 29, 62.0 * 29.0))
    }
    fn low(center_y: i32) -> TargetCandidate {
        TargetCandidate::from(&particle(center_y, 37, 32, 37.0 * 32.0))
    }

    fn store_with(candidates: Vec<TargetCandidate>) -> TargetStore {
        let store = TargetStore::new();
        store.set_enabled(true);
        store.publish(TargetReport::new(candidates));
        store
    }

    #[test]
    fn test_select_exact_match_wins_regardless_of_position() {
        let store = store_with(vec![medium(10), high(50)]);
        let calib = HeightCalibration::default();
        let mut cursor = TargetCursor::new();
        cursor.refresh(&store);

        let chosen = cursor.select(TargetHeight::High, &calib).unwrap();
        assert_eq!(chosen.center_y, 50);
    }

    #[test]
    fn test_select_low_falls_back_to_first() {
        let store = store_with(vec![high(10), medium(50)]);
        let calib = HeightCalibration::default();
        let mut cursor = TargetCursor::new();
        cursor.refresh(&store);

        let chosen = cursor.select(TargetHeight::Low, &calib).unwrap();
        assert_eq!(chosen.center_y, 10);
    }

    #[test]
    fn test_select_other_falls_back_to_last() {
        let store = store_with(vec![medium(10), low(50)]);
        let calib = HeightCalibration::default();
        let mut cursor = TargetCursor::new();
        cursor.refresh(&store);

        let chosen = cursor.select(TargetHeight::High, &calib).unwrap();
        assert_eq!(chosen.center_y, 50);
    }

    #[test]
    fn test_select_on_empty_snapshot_is_noop() {
        let store = TargetStore::new();
        let calib = HeightCalibration::default();
        let mut cursor = TargetCursor::new();
        cursor.refresh(&store);

        assert!(cursor.select(TargetHeight::High, &calib).is_none());
        assert!(cursor.selected().is_none());
    }

    #[test]
    fn test_next_target_cycles_with_wraparound() {
        let store = store_with(vec![high(10), medium(50), low(90)]);
        let calib = HeightCalibration::default();
        let mut cursor = TargetCursor::new();
        cursor.refresh(&store);
        cursor.select(TargetHeight::High, &calib);
        assert_eq!(cursor.selected().unwrap().center_y, 10);

        assert_eq!(cursor.next_target().unwrap().center_y, 50);
        assert_eq!(cursor.next_target().unwrap().center_y, 90);
        // 过末尾回绕到 0
        assert_eq!(cursor.next_target().unwrap().center_y, 10);
    }

    #[test]
    fn test_next_target_noop_under_two_candidates() {
        let store = store_with(vec![high(10)]);
        let mut cursor = TargetCursor::new();
        cursor.refresh(&store);
        assert!(cursor.next_target().is_none());
    }

    #[test]
    fn test_refresh_is_a_stable_copy() {
        let store = store_with(vec![high(10)]);
        let mut cursor = TargetCursor::new();
        cursor.refresh(&store);

        // 后台覆盖存储不影响已拷出的快照
        store.publish(TargetReport::new(vec![medium(99), low(120)]));
        assert_eq!(cursor.len(), 1);
        cursor.refresh(&store);
        assert_eq!(cursor.len(), 2);
    }
}
