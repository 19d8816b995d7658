#![feature(const_type_name)]

// 模組定義
pub mod config;
pub mod event;
pub mod logging;

pub use event::{
    event_type_id, DispatcherStats, Event, EventDispatcher, EventPriority, EventTypeId,
};
