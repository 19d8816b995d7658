use serde::{Deserialize, Serialize};

use crate::config::validation::{ValidationError, ValidationUtils, Validator};

/// 應用程序配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub dispatcher: DispatcherConfig,
}

impl Validator for ApplicationConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證各個部分的配置
        self.log.validate()?;
        self.dispatcher.validate()?;

        Ok(())
    }
}

/// 日誌配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Validator for LogConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證日誌級別
        ValidationUtils::one_of(
            &self.level.to_lowercase(),
            &["trace", "debug", "info", "warn", "error"]
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<String>>(),
            "log.level",
        )?;

        // 驗證日誌格式
        ValidationUtils::one_of(
            &self.format.to_lowercase(),
            &["pretty", "json"]
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<String>>(),
            "log.format",
        )?;

        Ok(())
    }
}

/// 分發器調校配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// 事件類型數量的容量預估，用於註冊表映射的預先配置
    pub initial_event_type_capacity: usize,
    /// 排空迴圈單次處理的事件數上限（0 表示不設上限）
    pub drain_batch_size: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            initial_event_type_capacity: 16,
            drain_batch_size: 0,
        }
    }
}

impl Validator for DispatcherConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 容量預估上限防止配置失誤造成過度預先配置
        ValidationUtils::in_range(
            self.initial_event_type_capacity,
            0,
            65_536,
            "dispatcher.initial_event_type_capacity",
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ApplicationConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let config = LogConfig {
            level: "verbose".to_string(),
            format: "pretty".to_string(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_capacity_rejected() {
        let config = DispatcherConfig {
            initial_event_type_capacity: 1_000_000,
            drain_batch_size: 0,
        };
        assert!(config.validate().is_err());
    }
}
