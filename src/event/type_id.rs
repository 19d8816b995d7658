use crate::event::types::Event;

/// 事件類型識別碼
///
/// 以 64 位無符號整數標識一種事件載荷類型，在單次進程運行內穩定不變，
/// 作為監聽者註冊表的鍵使用。
pub type EventTypeId = u64;

const FNV_OFFSET_BASIS_64: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME_64: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a 64 位雜湊（const 版本）
///
/// FNV-1a 速度快、實現簡單且分佈良好，關鍵在於可以在 const 上下文中
/// 運行，使事件類型識別碼能在編譯期算出、零運行時成本。
const fn fnv1a_hash(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS_64;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(FNV_PRIME_64);
        i += 1;
    }
    hash
}

/// 計算事件類型的識別碼
///
/// 對 `std::any::type_name` 回傳的完整類型路徑做 FNV-1a 雜湊，
/// 同一類型在同一進程內必然得到相同結果。不同類型雜湊到同一識別碼
/// 的機率極低，但一旦發生會使兩種事件的監聽者集合合併，且運行期
/// 無法偵測——這是已接受並記載的風險，不作為錯誤處理。
///
/// # Example
/// ```
/// use eventcore::{event_type_id, Event};
///
/// struct Ping;
/// impl Event for Ping {}
///
/// const PING_ID: u64 = event_type_id::<Ping>();
/// assert_eq!(PING_ID, event_type_id::<Ping>());
/// ```
pub const fn event_type_id<E: Event>() -> EventTypeId {
    fnv1a_hash(std::any::type_name::<E>().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ping;
    impl Event for Ping {}

    struct Pong;
    impl Event for Pong {}

    mod nested {
        pub struct Ping;
        impl crate::event::types::Event for Ping {}
    }

    #[test]
    fn test_type_id_is_stable() {
        let first = event_type_id::<Ping>();
        let second = event_type_id::<Ping>();
        assert_eq!(first, second);
    }

    #[test]
    fn test_type_id_distinguishes_types() {
        assert_ne!(event_type_id::<Ping>(), event_type_id::<Pong>());
    }

    #[test]
    fn test_type_id_distinguishes_same_name_in_different_modules() {
        // type_name 含完整模組路徑，同名類型不會混淆
        assert_ne!(event_type_id::<Ping>(), event_type_id::<nested::Ping>());
    }

    #[test]
    fn test_type_id_usable_in_const_context() {
        const ID: EventTypeId = event_type_id::<Ping>();
        assert_eq!(ID, event_type_id::<Ping>());
    }

    #[test]
    fn test_fnv1a_known_vector() {
        // FNV-1a 標準測試向量
        assert_eq!(fnv1a_hash(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a_hash(b"a"), 0xaf63_dc4c_8601_ec8c);
    }
}
