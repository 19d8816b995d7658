use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Weak;

use parking_lot::{RwLock, RwLockReadGuard};
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::event::type_id::EventTypeId;
use crate::event::types::EventPriority;

/// 類型擦除後的回調簽名
///
/// 訂閱時由具體事件類型與監聽者類型生成適配閉包，
/// 分發時以 `&dyn Any` 傳入事件值、由閉包內部還原具體類型。
pub(crate) type ErasedCallback = Box<dyn Fn(&dyn Any) + Send + Sync>;

/// 單筆訂閱記錄
///
/// 註冊表不擁有監聽者物件：透過弱引用觀測其存活狀態，
/// 監聽者本身由應用程式碼以 `Arc` 共享持有。移除標記使用原子布爾，
/// 使分發路徑能在只持讀鎖的情況下標記過期記錄（惰性刪除）。
pub(crate) struct ListenerRecord {
    /// 擁有者識別令牌（取自 Arc 資料指標，用於定向退訂）
    owner_token: usize,
    /// 類型擦除的調用閉包
    callback: ErasedCallback,
    /// 對擁有者的弱觀測（不延長其生命週期）
    owner: Weak<dyn Any + Send + Sync>,
    /// 訂閱優先級
    priority: EventPriority,
    /// 惰性刪除標記
    marked_for_removal: AtomicBool,
}

impl ListenerRecord {
    pub(crate) fn new(
        owner_token: usize,
        callback: ErasedCallback,
        owner: Weak<dyn Any + Send + Sync>,
        priority: EventPriority,
    ) -> Self {
        Self {
            owner_token,
            callback,
            owner,
            priority,
            marked_for_removal: AtomicBool::new(false),
        }
    }

    pub(crate) fn owner_token(&self) -> usize {
        self.owner_token
    }

    pub(crate) fn priority(&self) -> EventPriority {
        self.priority
    }

    pub(crate) fn is_flagged(&self) -> bool {
        self.marked_for_removal.load(Ordering::Relaxed)
    }

    /// 標記待刪除；在分發的讀鎖區段內呼叫，實際刪除延後到獨佔清理
    pub(crate) fn flag_for_removal(&self) {
        self.marked_for_removal.store(true, Ordering::Relaxed);
    }

    /// 嘗試鎖定擁有者；回傳的 Arc 守衛在回調執行期間維持其存活
    pub(crate) fn upgrade_owner(&self) -> Option<std::sync::Arc<dyn Any + Send + Sync>> {
        self.owner.upgrade()
    }

    /// 擁有者已銷毀或記錄已被標記，即視為過期
    pub(crate) fn is_expired(&self) -> bool {
        self.is_flagged() || self.owner.strong_count() == 0
    }

    pub(crate) fn invoke(&self, event: &dyn Any) {
        (self.callback)(event);
    }
}

/// 監聽者註冊表
///
/// 事件類型識別碼到有序監聽序列的映射，整體由單一讀寫鎖保護：
/// 分發走共享讀鎖，訂閱/退訂/清理走獨佔寫鎖（見 §併發模型）。
/// 不變式：映射中不存在空序列——序列刪到空時立即移除整個條目。
pub(crate) struct ListenerRegistry {
    listeners: RwLock<FxHashMap<EventTypeId, Vec<ListenerRecord>>>,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Self {
        Self {
            listeners: RwLock::new(FxHashMap::default()),
        }
    }

    /// 以預估的事件類型數量預先配置映射容量
    pub(crate) fn with_capacity(event_type_capacity: usize) -> Self {
        Self {
            listeners: RwLock::new(FxHashMap::with_capacity_and_hasher(
                event_type_capacity,
                Default::default(),
            )),
        }
    }

    /// 取得讀鎖守衛，供分發路徑做查找與迭代
    pub(crate) fn read(
        &self,
    ) -> RwLockReadGuard<'_, FxHashMap<EventTypeId, Vec<ListenerRecord>>> {
        self.listeners.read()
    }

    /// 插入一筆訂閱記錄
    ///
    /// 插入位置維持序列不變式：優先級嚴格非遞增，
    /// 同優先級之間保持註冊先後順序（FIFO）。
    pub(crate) fn subscribe(&self, type_id: EventTypeId, record: ListenerRecord) {
        let mut listeners = self.listeners.write();
        let sequence = listeners.entry(type_id).or_default();
        let position = sequence.partition_point(|l| l.priority() >= record.priority());
        trace!(
            type_id,
            priority = %record.priority(),
            position,
            "註冊監聽者"
        );
        sequence.insert(position, record);
    }

    /// 移除指定事件類型中，擁有者令牌相符的所有記錄
    ///
    /// 比對只看擁有者身份：同一擁有者對同一事件類型的多筆訂閱會一併移除。
    /// 回傳移除的筆數。
    pub(crate) fn unsubscribe(&self, type_id: EventTypeId, owner_token: usize) -> usize {
        let mut listeners = self.listeners.write();
        let Some(sequence) = listeners.get_mut(&type_id) else {
            return 0;
        };

        let before = sequence.len();
        sequence.retain(|l| l.owner_token() != owner_token);
        let removed = before - sequence.len();

        if sequence.is_empty() {
            listeners.remove(&type_id);
        }
        if removed > 0 {
            trace!(type_id, removed, "退訂監聽者");
        }
        removed
    }

    /// 清理單一事件類型的過期記錄
    ///
    /// 在獨佔鎖下重新檢查過期狀態：自分發釋放讀鎖到此處取得寫鎖之間，
    /// 註冊表可能已被其他線程改動，只刪除此刻仍然過期或被標記的記錄。
    pub(crate) fn prune_event(&self, type_id: EventTypeId) -> usize {
        let mut listeners = self.listeners.write();
        let Some(sequence) = listeners.get_mut(&type_id) else {
            return 0;
        };

        let before = sequence.len();
        sequence.retain(|l| !l.is_expired());
        let removed = before - sequence.len();

        if sequence.is_empty() {
            listeners.remove(&type_id);
        }
        removed
    }

    /// 清理所有事件類型的過期記錄，回傳移除總數
    pub(crate) fn prune_all(&self) -> usize {
        let mut listeners = self.listeners.write();
        let mut removed = 0;

        for sequence in listeners.values_mut() {
            let before = sequence.len();
            sequence.retain(|l| !l.is_expired());
            removed += before - sequence.len();
        }
        listeners.retain(|_, sequence| !sequence.is_empty());

        if removed > 0 {
            trace!(removed, "清理過期監聽者");
        }
        removed
    }

    /// 指定事件類型目前的監聽者數量
    pub(crate) fn listener_count(&self, type_id: EventTypeId) -> usize {
        self.listeners
            .read()
            .get(&type_id)
            .map_or(0, |sequence| sequence.len())
    }

    /// 有監聽者註冊的事件類型數量
    pub(crate) fn event_type_count(&self) -> usize {
        self.listeners.read().len()
    }
}
