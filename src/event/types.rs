use std::any::Any;
use std::fmt;

/// 事件標記特性
///
/// 所有可被分發的事件載荷類型都必須顯式實現本特性。
/// 事件本身不攜帶行為，只作為純值在監聽者之間傳遞；
/// `Any` 約束供類型擦除後的回調還原具體類型使用。
///
/// # Example
/// ```
/// use eventcore::Event;
///
/// #[derive(Debug, Clone)]
/// struct PlayerDied {
///     player_id: u32,
///     damage: f32,
/// }
///
/// impl Event for PlayerDied {}
/// ```
pub trait Event: Any + Send + Sync + 'static {}

/// 事件優先級枚舉，控制同一事件類型內監聽者的執行順序
///
/// 數值越高越先執行：Critical 級監聽者最先收到事件，
/// 適用於系統狀態變更等關鍵處理；Low 級適用於 UI 更新等非關鍵通知。
/// 優先級只在單一事件類型的監聽序列內生效，不跨事件類型排序。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventPriority {
    /// 低優先級 - UI 更新、非關鍵通知
    Low = 0,
    /// 一般優先級 - 大多數事件的預設值
    #[default]
    Normal = 1,
    /// 高優先級 - 關鍵系統事件、狀態變更
    High = 2,
    /// 緊急優先級 - 錯誤處理、緊急事件
    Critical = 3,
}

impl EventPriority {
    /// 將優先級轉換為字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            EventPriority::Low => "LOW",
            EventPriority::Normal => "NORMAL",
            EventPriority::High => "HIGH",
            EventPriority::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for EventPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
