use std::sync::atomic::{AtomicUsize, Ordering};

/// 分發器內部計數器
///
/// 全部以 Relaxed 順序的原子操作更新：計數器之間沒有一致性保證，
/// 讀到的值在並發下只是近似，僅供診斷觀測使用，絕不可作為
/// 控制流程判斷的依據。
#[derive(Debug, Default)]
pub(crate) struct DispatchCounters {
    /// 目前註冊的監聽者總數
    total_listeners: AtomicUsize,
    /// 累計分發次數
    total_dispatches: AtomicUsize,
    /// 延遲佇列中待處理的事件數
    queued_events: AtomicUsize,
}

impl DispatchCounters {
    pub(crate) fn listener_added(&self) {
        self.total_listeners.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn listeners_removed(&self, count: usize) {
        self.total_listeners.fetch_sub(count, Ordering::Relaxed);
    }

    pub(crate) fn dispatch_completed(&self) {
        self.total_dispatches.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn event_queued(&self) {
        self.queued_events.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn event_dequeued(&self) {
        self.queued_events.fetch_sub(1, Ordering::Relaxed);
    }

    pub(crate) fn total_listeners(&self) -> usize {
        self.total_listeners.load(Ordering::Relaxed)
    }

    pub(crate) fn total_dispatches(&self) -> usize {
        self.total_dispatches.load(Ordering::Relaxed)
    }

    pub(crate) fn queued_events(&self) -> usize {
        self.queued_events.load(Ordering::Relaxed)
    }
}

/// 分發器統計信息快照
///
/// 各欄位為獨立讀取的近似值，彼此之間可能不一致。
#[derive(Debug, Clone)]
pub struct DispatcherStats {
    /// 目前註冊的監聽者總數
    pub total_listeners: usize,
    /// 累計分發次數
    pub total_dispatches: usize,
    /// 延遲佇列中待處理的事件數
    pub queued_events: usize,
    /// 有監聽者註冊的事件類型數
    pub event_types: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_track_additions_and_removals() {
        let counters = DispatchCounters::default();
        counters.listener_added();
        counters.listener_added();
        counters.listener_added();
        assert_eq!(counters.total_listeners(), 3);

        counters.listeners_removed(2);
        assert_eq!(counters.total_listeners(), 1);
    }

    #[test]
    fn test_queue_depth_round_trip() {
        let counters = DispatchCounters::default();
        counters.event_queued();
        counters.event_queued();
        counters.event_dequeued();
        assert_eq!(counters.queued_events(), 1);
        counters.event_dequeued();
        assert_eq!(counters.queued_events(), 0);
    }
}
