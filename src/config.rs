use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;
use toml::Value;

pub type ConfigError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    // 全局指令前缀（支持多个，如 ["/", "#"]）
    #[serde(default = "default_prefix")]
    pub command_prefix: Vec<String>,

    // 日志级别: "info" / "debug"
    #[serde(default = "default_log_level")]
    pub log_level: String,

    // Bot 连接配置
    #[serde(default = "default_bots")]
    pub bots: Vec<BotConfig>,

    // 插件配置
    #[serde(flatten)]
    pub plugins: HashMap<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BotConfig {
    // 是否启用此 Bot
    #[serde(default = "default_true")]
    pub enabled: bool,

    // 协议类型 (目前仅 "onebot")
    #[serde(default = "default_protocol")]
    pub protocol: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl AppConfig {
    /// 读取配置文件；文件不存在时写入默认配置并返回
    pub async fn load_or_create(path: &str) -> Result<Self, ConfigError> {
        if !Path::new(path).exists() {
            let mut config = AppConfig::default();
            config.fill_plugin_defaults();
            config.save(path).await?;
            return Ok(config);
        }

        let content = fs::read_to_string(path).await?;
        let mut config: AppConfig = toml::from_str(&content)?;

        // 新增插件时补齐缺失的配置段
        if config.fill_plugin_defaults() {
            config.save(path).await?;
        }
        Ok(config)
    }

    pub async fn save(&self, path: &str) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(path, toml_string).await?;
        Ok(())
    }

    /// 为尚未出现在配置中的插件写入默认配置，返回是否有改动
    pub fn fill_plugin_defaults(&mut self) -> bool {
        let mut changed = false;
        for plugin in crate::plugins::get_plugins() {
            if !self.plugins.contains_key(plugin.name) {
                self.plugins
                    .insert(plugin.name.to_string(), (plugin.default_config)());
                changed = true;
            }
        }
        changed
    }
}

fn default_prefix() -> Vec<String> {
    vec!["/".to_string()]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_bots() -> Vec<BotConfig> {
    vec![BotConfig {
        enabled: true,
        protocol: "onebot".to_string(),
        url: Some("ws://127.0.0.1:3001".to_string()),
        access_token: Some(String::new()),
    }]
}

fn default_true() -> bool {
    true
}

fn default_protocol() -> String {
    "onebot".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            command_prefix: default_prefix(),
            log_level: default_log_level(),
            bots: default_bots(),
            plugins: HashMap::new(),
        }
    }
}

/// 辅助函数：构建默认配置 Value，并确保包含 enabled 字段
pub fn build_config<T: Serialize>(data: T) -> Value {
    let mut val = Value::try_from(data).unwrap_or(Value::Table(Default::default()));
    if let Value::Table(ref mut map) = val
        && !map.contains_key("enabled")
    {
        map.insert("enabled".to_string(), Value::Boolean(true));
    }
    val
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Plain {
        page_size: u32,
    }

    #[test]
    fn test_build_config_inserts_enabled() {
        let val = build_config(Plain { page_size: 5 });
        assert_eq!(val.get("enabled").and_then(|v| v.as_bool()), Some(true));
        assert_eq!(val.get("page_size").and_then(|v| v.as_integer()), Some(5));
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.command_prefix, vec!["/"]);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.bots.len(), 1);
        assert_eq!(config.bots[0].protocol, "onebot");
    }

    #[test]
    fn test_plugin_tables_are_flattened() {
        let src = r##"
            command_prefix = ["#"]

            [[bots]]
            url = "ws://10.0.0.2:3001"

            [info_image]
            enabled = false
        "##;
        let config: AppConfig = toml::from_str(src).unwrap();
        assert_eq!(config.command_prefix, vec!["#"]);
        assert!(config.bots[0].enabled);
        assert_eq!(config.bots[0].url.as_deref(), Some("ws://10.0.0.2:3001"));
        let plugin = config.plugins.get("info_image").unwrap();
        assert_eq!(plugin.get("enabled").and_then(|v| v.as_bool()), Some(false));
    }

    #[test]
    fn test_fill_plugin_defaults() {
        let mut config = AppConfig::default();
        assert!(config.fill_plugin_defaults());
        assert!(config.plugins.contains_key("info_image"));
        assert!(!config.fill_plugin_defaults());
    }
}
