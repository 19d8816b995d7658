use std::any::Any;

use crossbeam::queue::SegQueue;

use crate::event::type_id::{event_type_id, EventTypeId};
use crate::event::types::Event;

/// 延遲分發的事件封裝
///
/// 事件值以堆上的類型擦除拷貝形式存放，連同其類型識別碼一起入列；
/// 排空時依識別碼路由回即時分發路徑，消費一次即銷毀。
pub(crate) struct QueuedEvent {
    type_id: EventTypeId,
    payload: Box<dyn Any + Send + Sync>,
}

impl QueuedEvent {
    pub(crate) fn new<E: Event>(event: E) -> Self {
        Self {
            type_id: event_type_id::<E>(),
            payload: Box::new(event),
        }
    }

    pub(crate) fn type_id(&self) -> EventTypeId {
        self.type_id
    }

    pub(crate) fn payload(&self) -> &dyn Any {
        self.payload.as_ref()
    }
}

/// 跨線程延遲事件佇列
///
/// 底層為無界無鎖 MPMC 佇列：任意數量的生產者線程可無阻塞入列。
/// 沒有背壓機制——消費者缺席或過慢時記憶體會無上限增長，
/// 屬於已接受的運維風險而非結構性保證。
pub(crate) struct DeferredQueue {
    queue: SegQueue<QueuedEvent>,
}

impl DeferredQueue {
    pub(crate) fn new() -> Self {
        Self {
            queue: SegQueue::new(),
        }
    }

    /// 入列一筆事件拷貝；無鎖，不阻塞於其他線程
    pub(crate) fn push(&self, event: QueuedEvent) {
        self.queue.push(event);
    }

    /// 取出一筆事件；佇列保證每筆事件恰好被一個消費者取走
    pub(crate) fn pop(&self) -> Option<QueuedEvent> {
        self.queue.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Ping(u32);
    impl Event for Ping {}

    #[test]
    fn test_queued_event_carries_type_id_and_payload() {
        let queued = QueuedEvent::new(Ping(7));
        assert_eq!(queued.type_id(), event_type_id::<Ping>());
        assert_eq!(queued.payload().downcast_ref::<Ping>(), Some(&Ping(7)));
    }

    #[test]
    fn test_queue_is_fifo_for_single_producer() {
        let queue = DeferredQueue::new();
        for i in 0..5 {
            queue.push(QueuedEvent::new(Ping(i)));
        }
        for i in 0..5 {
            let queued = queue.pop().expect("queue should hold five events");
            assert_eq!(queued.payload().downcast_ref::<Ping>(), Some(&Ping(i)));
        }
        assert!(queue.pop().is_none());
    }
}
