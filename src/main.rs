use ayjx_info::adapters::find_adapter;
use ayjx_info::config::AppConfig;
use ayjx_info::event::{BotStatus, Context, EventType};
use ayjx_info::log::{self, Level};
use ayjx_info::matcher::Matcher;
use ayjx_info::plugins;
use ayjx_info::{error, info, warn};
use std::sync::{Arc, RwLock};

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = AppConfig::load_or_create(CONFIG_PATH).await?;
    log::set_debug(matches!(Level::parse(&config.log_level), Level::Debug));

    let bots = config.bots.clone();
    let config = Arc::new(RwLock::new(config));

    plugins::do_init(Context {
        event: EventType::Init,
        config: config.clone(),
        matcher: Arc::new(Matcher::new()),
        config_path: CONFIG_PATH.to_string(),
        bot: BotStatus::default(),
    })
    .await?;

    let mut started = 0;
    for bot in bots.into_iter().filter(|b| b.enabled) {
        let Some(adapter) = find_adapter(&bot.protocol) else {
            warn!(target: "System", "未知协议 {}，已跳过", bot.protocol);
            continue;
        };
        tokio::spawn((adapter.handler)(bot, config.clone(), CONFIG_PATH.to_string()));
        started += 1;
    }

    if started == 0 {
        error!(target: "System", "没有可用的 Bot 连接，请检查 {}", CONFIG_PATH);
        return Ok(());
    }
    info!(target: "System", "已启动 {} 个 Bot 连接，按 Ctrl+C 退出", started);

    tokio::signal::ctrl_c().await?;
    info!(target: "System", "正在退出...");
    Ok(())
}
