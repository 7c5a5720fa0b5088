//! 用户信息与群信息图片插件
//!
//! 提供用户信息卡片、群管理列表、群精华与群公告的查询，结果可按配置以文本、
//! 截图或合并转发的形式发送。

use crate::adapters::onebot::LockedWriter;
use crate::command::{CommandMatch, OptionSpec, match_command, parse_args, split_args};
use crate::config::build_config;
use crate::event::Context;
use crate::log;
use crate::plugins::PluginError;
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use toml::Value;

pub mod admin_list;
pub mod convert;
pub mod essence;
pub mod format;
pub mod model;
pub mod notice;
pub mod paginate;
pub mod records;
pub mod render;
pub mod reply;
pub mod status;
pub mod style;
pub mod user_info;

use model::Dialect;
use reply::Session;
use style::{ImageStyleDetail, ImageType, default_style_details, style_list_text};

pub const PLUGIN_NAME: &str = "info_image";

// ================= Config =================

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub enabled: bool,
    /// 协议端实现，决定原始字段的解析方式
    pub dialect: Dialect,

    pub enable_user_info_command: bool,
    pub user_info_command_name: String,
    pub enable_admin_list_command: bool,
    pub admin_list_command_name: String,
    pub inspect_style_command_name: String,

    pub enable_group_essence_command: bool,
    pub group_essence_command_name: String,
    pub group_essence_detail_command_name: String,
    pub group_essence_page_size: i64,

    pub enable_group_notice_command: bool,
    pub group_notice_command_name: String,
    pub group_notice_detail_command_name: String,
    pub group_notice_page_size: i64,

    // 输出方式
    pub send_text: bool,
    pub enable_quote_with_text: bool,
    pub send_image: bool,
    pub enable_quote_with_image: bool,
    pub send_forward: bool,

    // 图片渲染
    pub image_style_details: Vec<ImageStyleDetail>,
    pub image_type: ImageType,
    /// 仅 jpeg 生效
    pub screenshot_quality: u8,
    pub hide_phone_number: bool,

    pub verbose_console_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            dialect: Dialect::Lagrange,
            enable_user_info_command: true,
            user_info_command_name: "用户信息".into(),
            enable_admin_list_command: false,
            admin_list_command_name: "群管理列表".into(),
            inspect_style_command_name: "查看图片样式".into(),
            enable_group_essence_command: true,
            group_essence_command_name: "群精华".into(),
            group_essence_detail_command_name: "群精华详情".into(),
            group_essence_page_size: 5,
            enable_group_notice_command: true,
            group_notice_command_name: "群公告".into(),
            group_notice_detail_command_name: "群公告详情".into(),
            group_notice_page_size: 10,
            send_text: false,
            enable_quote_with_text: false,
            send_image: true,
            enable_quote_with_image: false,
            send_forward: false,
            image_style_details: default_style_details(),
            image_type: ImageType::Png,
            screenshot_quality: 80,
            hide_phone_number: true,
            verbose_console_output: false,
        }
    }
}

pub fn default_config() -> Value {
    build_config(Config::default())
}

/// 解析插件配置段；配置段存在但无法解析时告警并回退到默认配置
pub fn parse_config(table: Option<&Value>) -> Config {
    let Some(table) = table else {
        return Config::default();
    };
    Config::deserialize(table.clone()).unwrap_or_else(|e| {
        warn!(
            target: "InfoImage",
            "配置段 [{}] 解析失败，已使用默认配置: {}",
            PLUGIN_NAME,
            e
        );
        Config::default()
    })
}

fn load_config(ctx: &Context) -> Config {
    match ctx.config.read() {
        Ok(guard) => parse_config(guard.plugins.get(PLUGIN_NAME)),
        Err(_) => Config::default(),
    }
}

// ================= Commands =================

const OPTIONS: &[OptionSpec] = &[
    ("index", &["-i", "--idx", "--index"]),
    ("page", &["-p", "--page"]),
    ("pagesize", &["-s", "--pagesize"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoCommand {
    UserInfo,
    AdminList,
    EssenceDetail,
    EssenceList,
    NoticeDetail,
    NoticeList,
    InspectStyle,
}

impl InfoCommand {
    /// 详情指令排在列表指令之前匹配
    pub const ALL: [InfoCommand; 7] = [
        InfoCommand::UserInfo,
        InfoCommand::AdminList,
        InfoCommand::EssenceDetail,
        InfoCommand::EssenceList,
        InfoCommand::NoticeDetail,
        InfoCommand::NoticeList,
        InfoCommand::InspectStyle,
    ];

    pub fn enabled(&self, config: &Config) -> bool {
        match self {
            InfoCommand::UserInfo => config.enable_user_info_command,
            InfoCommand::AdminList => config.enable_admin_list_command,
            InfoCommand::EssenceDetail | InfoCommand::EssenceList => {
                config.enable_group_essence_command
            }
            InfoCommand::NoticeDetail | InfoCommand::NoticeList => {
                config.enable_group_notice_command
            }
            InfoCommand::InspectStyle => true,
        }
    }

    pub fn name<'a>(&self, config: &'a Config) -> &'a str {
        match self {
            InfoCommand::UserInfo => &config.user_info_command_name,
            InfoCommand::AdminList => &config.admin_list_command_name,
            InfoCommand::EssenceDetail => &config.group_essence_detail_command_name,
            InfoCommand::EssenceList => &config.group_essence_command_name,
            InfoCommand::NoticeDetail => &config.group_notice_detail_command_name,
            InfoCommand::NoticeList => &config.group_notice_command_name,
            InfoCommand::InspectStyle => &config.inspect_style_command_name,
        }
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            InfoCommand::UserInfo => &["aui", "awa_user_info"],
            InfoCommand::AdminList => &["al", "awa_group_admin_list"],
            InfoCommand::EssenceDetail => &["aged"],
            InfoCommand::EssenceList => &["群精华列表", "age"],
            InfoCommand::NoticeDetail => &["agnd"],
            InfoCommand::NoticeList => &["群公告列表", "agn"],
            InfoCommand::InspectStyle => &["ais", "awa_inspect_style"],
        }
    }

    /// 失败时回复与日志使用的描述
    pub fn failure_label(&self) -> &'static str {
        match self {
            InfoCommand::UserInfo => "获取用户信息或渲染图片失败",
            InfoCommand::AdminList => "获取群管理员列表失败",
            InfoCommand::EssenceDetail => "获取群精华消息详情失败",
            InfoCommand::EssenceList => "获取群精华消息失败",
            InfoCommand::NoticeDetail => "获取群公告详情失败",
            InfoCommand::NoticeList => "获取群公告列表失败",
            InfoCommand::InspectStyle => "获取图片样式失败",
        }
    }
}

/// 依次尝试每个已启用指令的名称与别名
fn find_command(ctx: &Context, config: &Config) -> Option<(InfoCommand, CommandMatch)> {
    InfoCommand::ALL
        .iter()
        .filter(|c| c.enabled(config))
        .find_map(|&c| {
            let mut names = vec![c.name(config)];
            names.extend_from_slice(c.aliases());
            names
                .into_iter()
                .filter(|n| !n.is_empty())
                .find_map(|n| match_command(ctx, n))
                .map(|m| (c, m))
        })
}

async fn dispatch(
    s: &Session<'_>,
    command: InfoCommand,
    matched: &CommandMatch,
) -> Result<(), PluginError> {
    let args = parse_args(split_args(&matched.args), OPTIONS);
    match command {
        InfoCommand::UserInfo => user_info::run(s, &args, &matched.at_ids).await,
        InfoCommand::AdminList => admin_list::run(s, &args).await,
        InfoCommand::EssenceList => essence::run_list(s, &args).await,
        InfoCommand::EssenceDetail => essence::run_detail(s, &args).await,
        InfoCommand::NoticeList => notice::run_list(s, &args).await,
        InfoCommand::NoticeDetail => notice::run_detail(s, &args).await,
        InfoCommand::InspectStyle => s.say(style_list_text(&s.config.image_style_details)).await,
    }
}

// ================= Plugin Entry =================

pub fn init(ctx: Context) -> BoxFuture<'static, Result<(), PluginError>> {
    Box::pin(async move {
        let config = load_config(&ctx);
        if config.verbose_console_output {
            log::set_debug(true);
        }
        info!(
            target: "InfoImage",
            "方言: {}，图片样式 {} 项",
            config.dialect.name(),
            config.image_style_details.len()
        );
        Ok(())
    })
}

pub fn handle(
    ctx: Context,
    writer: LockedWriter,
) -> BoxFuture<'static, Result<Option<Context>, PluginError>> {
    Box::pin(async move {
        let config = load_config(&ctx);

        let Some((command, matched)) = find_command(&ctx, &config) else {
            return Ok(Some(ctx));
        };
        let Some(session) = Session::new(&ctx, writer, &config) else {
            return Ok(Some(ctx));
        };

        if let Err(e) = dispatch(&session, command, &matched).await {
            let label = command.failure_label();
            error!(target: "InfoImage", "{}: {}", label, e);
            if let Err(e) = session.say(format!("[error]{}: {}", label, e)).await {
                warn!(target: "InfoImage", "发送错误提示失败: {}", e);
            }
        }

        Ok(Some(ctx))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::info_image::style::ImageStyle;

    #[test]
    fn test_default_config_table() {
        let val = default_config();
        assert_eq!(val.get("enabled").and_then(|v| v.as_bool()), Some(true));
        assert_eq!(val.get("dialect").and_then(|v| v.as_str()), Some("lagrange"));
        assert_eq!(val.get("image_type").and_then(|v| v.as_str()), Some("png"));
        assert_eq!(
            val.get("group_essence_page_size").and_then(|v| v.as_integer()),
            Some(5)
        );
        let cfg: Config = val.try_into().unwrap();
        assert_eq!(cfg.image_style_details.len(), 6);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            dialect = "napcat"
            send_forward = true
            image_style_details = [{ style_key = "FLAT_MINIMAL", dark_mode = true }]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.dialect, Dialect::NapCat);
        assert!(cfg.send_forward);
        assert!(cfg.send_image);
        assert!(!cfg.enable_admin_list_command);
        assert_eq!(cfg.group_notice_page_size, 10);
        assert_eq!(cfg.image_style_details[0].style_key, ImageStyle::FlatMinimal);
    }

    #[test]
    fn test_parse_config_accepts_display_dialect() {
        let table: Value = toml::from_str(
            r#"
            dialect = "NapCat"
            send_forward = true
            group_essence_page_size = 20
            "#,
        )
        .unwrap();
        let cfg = parse_config(Some(&table));
        assert_eq!(cfg.dialect, Dialect::NapCat);
        assert!(cfg.send_forward);
        assert_eq!(cfg.group_essence_page_size, 20);
    }

    #[test]
    fn test_parse_config_falls_back_on_bad_table() {
        let table: Value = toml::from_str(r#"group_essence_page_size = "many""#).unwrap();
        let cfg = parse_config(Some(&table));
        assert_eq!(cfg.group_essence_page_size, 5);
        assert_eq!(parse_config(None).group_notice_page_size, 10);
    }

    #[test]
    fn test_command_table() {
        let cfg = Config::default();
        assert!(!InfoCommand::AdminList.enabled(&cfg));
        assert!(InfoCommand::InspectStyle.enabled(&cfg));
        assert_eq!(InfoCommand::EssenceList.name(&cfg), "群精华");
        assert!(InfoCommand::NoticeList.aliases().contains(&"agn"));

        // 详情指令须先于以其为前缀的列表指令匹配
        let pos = |c| InfoCommand::ALL.iter().position(|x| *x == c);
        assert!(pos(InfoCommand::EssenceDetail) < pos(InfoCommand::EssenceList));
        assert!(pos(InfoCommand::NoticeDetail) < pos(InfoCommand::NoticeList));
    }
}
