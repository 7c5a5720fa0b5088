use crate::adapters::onebot::{LockedWriter, api};
use crate::event::{BotStatus, Context, EventType};
use crate::matcher::Matcher;
use futures_util::future::BoxFuture;
use serde::de::DeserializeOwned;
use simd_json::OwnedValue;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};
use toml::Value;

pub mod info_image;
pub mod logger;

pub type PluginError = Box<dyn std::error::Error + Send + Sync>;

pub type PluginHandler =
    fn(Context, LockedWriter) -> BoxFuture<'static, Result<Option<Context>, PluginError>>;

pub type PluginInitHandler = fn(Context) -> BoxFuture<'static, Result<(), PluginError>>;

pub struct Plugin {
    pub name: &'static str,
    pub handler: PluginHandler,
    pub on_init: Option<PluginInitHandler>,
    pub default_config: fn() -> Value,
}

static PLUGINS: OnceLock<Vec<Plugin>> = OnceLock::new();

/// 获取全局插件列表，按顺序构成流水线
pub fn get_plugins() -> &'static [Plugin] {
    PLUGINS.get_or_init(|| {
        vec![
            Plugin {
                name: "logger",
                handler: logger::handle,
                on_init: None,
                default_config: logger::default_config,
            },
            Plugin {
                name: info_image::PLUGIN_NAME,
                handler: info_image::handle,
                on_init: Some(info_image::init),
                default_config: info_image::default_config,
            },
        ]
    })
}

/// 配置中 enabled = true 的插件名
fn enabled_plugins(ctx: &Context) -> HashSet<String> {
    let Ok(guard) = ctx.config.read() else {
        return HashSet::new();
    };
    guard
        .plugins
        .iter()
        .filter(|(_, v)| v.get("enabled").and_then(|x| x.as_bool()).unwrap_or(false))
        .map(|(k, _)| k.clone())
        .collect()
}

/// 执行所有插件的初始化逻辑
pub async fn do_init(ctx: Context) -> Result<(), PluginError> {
    let plugins = get_plugins();
    let enabled = enabled_plugins(&ctx);

    info!(
        target: "System",
        "正在加载插件系统 (已启用 {}/{})",
        enabled.len(),
        plugins.len()
    );

    for plugin in plugins {
        if !enabled.contains(plugin.name) {
            continue;
        }

        let Some(init_fn) = plugin.on_init else {
            info!(target: "Plugin", "✅ [{}] 就绪", plugin.name);
            continue;
        };

        let init_ctx = Context {
            event: EventType::Init,
            config: ctx.config.clone(),
            matcher: Arc::new(Matcher::new()),
            config_path: ctx.config_path.clone(),
            bot: BotStatus {
                adapter: "system".to_string(),
                platform: "internal".to_string(),
                login_user: Default::default(),
            },
        };

        match init_fn(init_ctx).await {
            Ok(_) => info!(target: "Plugin", "✅ [{}] 就绪 (Init Success)", plugin.name),
            Err(e) => error!(target: "Plugin", "❌ [{}] 初始化失败: {}", plugin.name, e),
        }
    }
    Ok(())
}

/// 运行插件流水线
///
/// 事件依次经过已启用的插件，任一插件返回 None 即中止。BeforeSend 事件走完流水线后
/// 发往协议端并等待响应，返回响应中的 data 字段；其余事件返回 None。
pub async fn run(mut ctx: Context, writer: LockedWriter) -> Result<Option<OwnedValue>, PluginError> {
    let enabled = enabled_plugins(&ctx);

    for plugin in get_plugins() {
        if !enabled.contains(plugin.name) {
            continue;
        }

        match (plugin.handler)(ctx, writer.clone()).await? {
            Some(next_ctx) => ctx = next_ctx,
            None => return Ok(None),
        }
    }

    match &ctx.event {
        EventType::BeforeSend(packet) => {
            let data: OwnedValue =
                api::call_action(&ctx, writer, &packet.action, &packet.params).await?;
            Ok(Some(data))
        }
        EventType::Onebot(_) | EventType::Init => Ok(None),
    }
}

pub fn get_config<T>(ctx: &Context, plugin_name: &str) -> Option<T>
where
    T: DeserializeOwned,
{
    let guard = ctx.config.read().ok()?;
    guard
        .plugins
        .get(plugin_name)
        .and_then(|v| T::deserialize(v.clone()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_order() {
        let names: Vec<&str> = get_plugins().iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["logger", "info_image"]);
    }

    #[test]
    fn test_default_configs_are_enabled() {
        for plugin in get_plugins() {
            let val = (plugin.default_config)();
            assert_eq!(
                val.get("enabled").and_then(|v| v.as_bool()),
                Some(true),
                "{}",
                plugin.name
            );
        }
    }
}
