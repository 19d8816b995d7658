use std::any::Any;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::config::DispatcherConfig;
use crate::event::queue::{DeferredQueue, QueuedEvent};
use crate::event::registry::{ListenerRecord, ListenerRegistry};
use crate::event::stats::{DispatchCounters, DispatcherStats};
use crate::event::type_id::{event_type_id, EventTypeId};
use crate::event::types::{Event, EventPriority};

/// 取擁有者的識別令牌（Arc 資料指標），用於退訂比對
fn owner_token<L>(owner: &Arc<L>) -> usize {
    Arc::as_ptr(owner) as *const () as usize
}

/// 高性能線程安全事件分發器
///
/// 提供低開銷的進程內事件分發：
/// - 即時分發熱路徑無堆分配，只持共享讀鎖
/// - 編譯期類型安全（事件類型須實現 `Event` 標記特性）
/// - 線程安全的訂閱/退訂
/// - 即時與延遲（無鎖佇列）兩種分發模式
/// - 過期監聽者自動清理
///
/// 關鍵設計：
/// - 監聽者以弱引用觀測，擁有者銷毀後不會再被調用
/// - 分發中發現過期記錄時先釋放讀鎖、再以寫鎖清理（讀後升級模式）
/// - 統計計數器全部 Relaxed 原子操作，僅供觀測
///
/// 分發器不可複製；需要共享時以 `Arc<EventDispatcher>` 持有。
pub struct EventDispatcher {
    registry: ListenerRegistry,
    queue: DeferredQueue,
    counters: DispatchCounters,
}

impl EventDispatcher {
    /// 創建新的事件分發器
    pub fn new() -> Self {
        Self {
            registry: ListenerRegistry::new(),
            queue: DeferredQueue::new(),
            counters: DispatchCounters::default(),
        }
    }

    /// 依配置創建事件分發器
    ///
    /// # Arguments
    /// * `config` - 分發器調校配置（事件類型容量預估等）
    pub fn with_config(config: &DispatcherConfig) -> Self {
        Self {
            registry: ListenerRegistry::with_capacity(config.initial_event_type_capacity),
            queue: DeferredQueue::new(),
            counters: DispatchCounters::default(),
        }
    }

    /// 以一般優先級訂閱事件
    ///
    /// 等價於 `subscribe_with_priority(owner, handler, EventPriority::Normal)`。
    pub fn subscribe<E, L, F>(&self, owner: &Arc<L>, handler: F)
    where
        E: Event,
        L: Send + Sync + 'static,
        F: Fn(&L, &E) + Send + Sync + 'static,
    {
        self.subscribe_with_priority(owner, handler, EventPriority::Normal);
    }

    /// 以指定優先級訂閱事件
    ///
    /// 將監聽者的處理函數註冊到事件類型 `E` 上。註冊表對擁有者只保留
    /// 弱觀測：`owner` 被應用程式碼釋放後，該訂閱自動失效並在後續
    /// 分發或清理時移除，不會透過懸空引用調用。
    ///
    /// 同一優先級的監聽者依訂閱先後順序執行，高優先級先於低優先級。
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use eventcore::{Event, EventDispatcher, EventPriority};
    ///
    /// struct Ping;
    /// impl Event for Ping {}
    ///
    /// struct Sensor;
    /// impl Sensor {
    ///     fn on_ping(&self, _event: &Ping) {}
    /// }
    ///
    /// let dispatcher = EventDispatcher::new();
    /// let sensor = Arc::new(Sensor);
    /// dispatcher.subscribe_with_priority(&sensor, Sensor::on_ping, EventPriority::High);
    /// dispatcher.dispatch(&Ping);
    /// ```
    pub fn subscribe_with_priority<E, L, F>(&self, owner: &Arc<L>, handler: F, priority: EventPriority)
    where
        E: Event,
        L: Send + Sync + 'static,
        F: Fn(&L, &E) + Send + Sync + 'static,
    {
        // 適配閉包持有對擁有者的類型化弱引用；分發迴圈中已有存活守衛，
        // 此處的 upgrade 在調用期間必然成功
        let typed_weak = Arc::downgrade(owner);
        let callback = Box::new(move |event: &dyn Any| {
            // 識別碼碰撞使兩種事件路由到同一序列時，downcast 會失敗，
            // 監聽者被靜默略過而非錯誤調用
            let Some(event) = event.downcast_ref::<E>() else {
                return;
            };
            if let Some(owner) = typed_weak.upgrade() {
                handler(owner.as_ref(), event);
            }
        });

        let erased: Arc<dyn Any + Send + Sync> = owner.clone();
        let record =
            ListenerRecord::new(owner_token(owner), callback, Arc::downgrade(&erased), priority);

        self.registry.subscribe(event_type_id::<E>(), record);
        self.counters.listener_added();
    }

    /// 退訂擁有者在事件類型 `E` 上的所有訂閱
    ///
    /// 比對只看擁有者身份：同一擁有者對 `E` 的多筆訂閱會一併移除，
    /// 對其他事件類型的訂閱不受影響。回傳移除的筆數。
    pub fn unsubscribe<E, L>(&self, owner: &Arc<L>) -> usize
    where
        E: Event,
        L: Send + Sync + 'static,
    {
        let removed = self
            .registry
            .unsubscribe(event_type_id::<E>(), owner_token(owner));
        if removed > 0 {
            self.counters.listeners_removed(removed);
        }
        removed
    }

    /// 即時分發事件給所有存活的監聽者
    ///
    /// 熱路徑：持共享讀鎖依序調用監聽序列，迴圈內無堆分配。
    /// 擁有者已銷毀的記錄被標記略過，全程不會透過懸空引用調用；
    /// 若本次掃描發現過期記錄，釋放讀鎖後再以寫鎖清理該事件類型。
    ///
    /// 沒有任何監聽者的事件類型分發是靜默空操作，不是錯誤。
    /// 監聽者回調中的 panic 不被攔截，會同步傳播給呼叫者並中斷
    /// 本次分發中尚未執行的監聽者。
    pub fn dispatch<E: Event>(&self, event: &E) {
        self.dispatch_erased(event_type_id::<E>(), event);
    }

    /// 入列事件供延遲分發
    ///
    /// 無鎖、可由任意數量的生產者線程並發呼叫而不阻塞。
    /// 事件值被拷貝到堆上的類型擦除封裝中，待消費者呼叫
    /// [`drain`](Self::drain) 時重放。
    pub fn enqueue<E: Event>(&self, event: E) {
        self.queue.push(QueuedEvent::new(event));
        self.counters.event_queued();
    }

    /// 排空延遲佇列，將事件重放到即時分發路徑
    ///
    /// 設計上假定由單一邏輯消費者週期性呼叫（例如每幀一次）。
    /// 多個消費者並發排空時每筆事件仍至多投遞一次，但「單幀處理」
    /// 的界線不再明確——屬使用約束，不在此強制。
    ///
    /// # Arguments
    /// * `max_events` - 本次最多處理的事件數（0 表示不設上限）
    ///
    /// 回傳實際處理的事件數。單一生產者入列的事件維持先進先出；
    /// 不同生產者之間的相對順序不作保證。
    pub fn drain(&self, max_events: usize) -> usize {
        let mut processed = 0;
        while max_events == 0 || processed < max_events {
            let Some(queued) = self.queue.pop() else {
                break;
            };
            self.dispatch_erased(queued.type_id(), queued.payload());
            self.counters.event_dequeued();
            processed += 1;
        }
        if processed > 0 {
            trace!(processed, "延遲佇列排空完成");
        }
        processed
    }

    /// 清理所有事件類型中已過期的監聽者
    ///
    /// 週期性呼叫可避免死訂閱累積。無事可清時是安全的空操作；
    /// 連續兩次呼叫之間若無新的過期，第二次回傳 0。
    pub fn prune_expired(&self) -> usize {
        let removed = self.registry.prune_all();
        if removed > 0 {
            self.counters.listeners_removed(removed);
            debug!(removed, "已移除過期監聽者");
        }
        removed
    }

    /// 指定事件類型目前的監聽者數量
    pub fn listener_count<E: Event>(&self) -> usize {
        self.registry.listener_count(event_type_id::<E>())
    }

    /// 目前註冊的監聽者總數（近似值）
    pub fn total_listener_count(&self) -> usize {
        self.counters.total_listeners()
    }

    /// 累計分發次數（近似值）
    pub fn total_dispatch_count(&self) -> usize {
        self.counters.total_dispatches()
    }

    /// 延遲佇列中待處理的事件數（近似值）
    pub fn queued_event_count(&self) -> usize {
        self.counters.queued_events()
    }

    /// 有監聽者註冊的事件類型數量
    pub fn event_type_count(&self) -> usize {
        self.registry.event_type_count()
    }

    /// 取得統計信息快照；各欄位獨立讀取，彼此之間可能不一致
    pub fn stats(&self) -> DispatcherStats {
        DispatcherStats {
            total_listeners: self.counters.total_listeners(),
            total_dispatches: self.counters.total_dispatches(),
            queued_events: self.counters.queued_events(),
            event_types: self.registry.event_type_count(),
        }
    }

    /// 類型擦除的分發核心，即時分發與佇列重放共用
    fn dispatch_erased(&self, type_id: EventTypeId, event: &dyn Any) {
        let mut needs_cleanup = false;
        {
            let listeners = self.registry.read();
            let Some(sequence) = listeners.get(&type_id) else {
                // 無監聽者的分發是空操作
                return;
            };

            for record in sequence {
                if record.is_flagged() {
                    needs_cleanup = true;
                    continue;
                }
                // 鎖定弱引用確認擁有者仍存活；守衛維持到回調結束
                match record.upgrade_owner() {
                    Some(_owner_guard) => record.invoke(event),
                    None => {
                        record.flag_for_removal();
                        needs_cleanup = true;
                    }
                }
            }
        }

        self.counters.dispatch_completed();

        // 讀後升級：清理絕不在與其他分發共享的讀鎖內進行。
        // 釋放讀鎖到取得寫鎖之間註冊表可能已變動，prune_event
        // 會在寫鎖下重新檢查過期狀態
        if needs_cleanup {
            let removed = self.registry.prune_event(type_id);
            if removed > 0 {
                self.counters.listeners_removed(removed);
            }
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
