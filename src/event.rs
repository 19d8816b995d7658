// 事件分發系統模組
//
// 本模組提供進程內的類型化事件發佈/訂閱機制：
// 監聽者以事件類型為單位註冊回調，事件可即時分發（同步、呼叫者線程）
// 或經由無鎖佇列延遲分發（跨線程生產、指定消費者統一排空）。

pub mod dispatcher;
pub mod queue;
pub mod registry;
pub mod stats;
pub mod type_id;
pub mod types;

// 重新導出核心類型
pub use dispatcher::EventDispatcher;
pub use stats::DispatcherStats;
pub use type_id::{event_type_id, EventTypeId};
pub use types::{Event, EventPriority};
