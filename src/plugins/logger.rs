use crate::adapters::onebot::LockedWriter;
use crate::command::seg_id;
use crate::config::build_config;
use crate::event::{Context, EventType, SendPacket};
use crate::plugins::{PluginError, get_config};
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use simd_json::OwnedValue;
use simd_json::base::{ValueAsArray, ValueAsScalar};
use simd_json::derived::{ValueObjectAccess, ValueObjectAccessAsScalar};
use toml::Value;

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct LoggerConfig {
    enabled: bool,
    /// 输出完整的事件与发送包
    debug: bool,
}

pub fn default_config() -> Value {
    build_config(LoggerConfig {
        enabled: true,
        debug: false,
    })
}

pub fn handle(
    ctx: Context,
    _writer: LockedWriter,
) -> BoxFuture<'static, Result<Option<Context>, PluginError>> {
    Box::pin(async move {
        let config: LoggerConfig = get_config(&ctx, "logger").unwrap_or_default();

        match &ctx.event {
            EventType::Onebot(ev) => {
                if config.debug {
                    debug!(target: "Logger", "ev: {:?}", ev);
                }

                if let Some(msg) = ctx.as_message() {
                    let content = summarize(ev.get("message"));
                    let sender = format!("{}({})", msg.sender_name(), msg.user_id());
                    match msg.group_id() {
                        Some(gid) => info!(
                            target: "Chat",
                            "接收 <- 群聊 [Group({})] [{}] {}",
                            gid, sender, content
                        ),
                        None => info!(target: "Chat", "接收 <- 私聊 [{}] {}", sender, content),
                    }
                } else if let Some(post_type) = ctx.post_type()
                    && post_type != "meta_event"
                {
                    debug!(target: "Event", "Type: {}", post_type);
                }
            }
            EventType::BeforeSend(packet) => {
                if config.debug {
                    debug!(target: "Logger", "packet: {:?}", packet);
                }
                log_outgoing(packet);
            }
            EventType::Init => {}
        }

        Ok(Some(ctx))
    })
}

fn log_outgoing(packet: &SendPacket) {
    if packet.action != "send_msg" {
        debug!(target: "Bot", "Action: {}", packet.action);
        return;
    }

    let content = summarize(packet.message());
    match (packet.group_id(), packet.user_id()) {
        (Some(gid), _) => info!(target: "Chat", "发送 -> 群聊 [Group({})] {}", gid, content),
        (None, Some(uid)) => info!(target: "Chat", "发送 -> 私聊 [User({})] {}", uid, content),
        (None, None) => info!(
            target: "Chat",
            "发送 -> 未知 [{}] {}",
            packet.message_type().unwrap_or("unknown"),
            content
        ),
    }
}

/// 将消息链压缩为单行可读文本，base64 图片只显示占位
fn summarize(msg: Option<&OwnedValue>) -> String {
    let Some(val) = msg else {
        return String::new();
    };
    if let Some(s) = val.as_str() {
        return s.to_string();
    }
    let Some(arr) = val.as_array() else {
        return "[复杂消息]".to_string();
    };

    let mut out = String::new();
    for seg in arr {
        let data = seg.get("data");
        match seg.get_str("type").unwrap_or("unknown") {
            "text" => out.push_str(data.and_then(|d| d.get_str("text")).unwrap_or("")),
            "at" => {
                let qq = data
                    .and_then(|d| seg_id(d, "qq"))
                    .unwrap_or_else(|| "Unknown".to_string());
                out.push_str(&format!("[@{}] ", qq));
            }
            "reply" => out.push_str("[回复] "),
            "image" => out.push_str("[图片] "),
            "face" => out.push_str("[表情] "),
            "node" => out.push_str("[转发节点] "),
            other => out.push_str(&format!("[{}] ", other)),
        }
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use simd_json::json;

    #[test]
    fn test_summarize_segments() {
        let msg = json!([
            {"type": "reply", "data": {"id": "12"}},
            {"type": "at", "data": {"qq": 10001}},
            {"type": "text", "data": {"text": "你好"}},
            {"type": "image", "data": {"file": "base64://AAAA"}}
        ]);
        assert_eq!(summarize(Some(&msg)), "[回复] [@10001] 你好[图片]");
    }

    #[test]
    fn test_summarize_plain_and_missing() {
        assert_eq!(summarize(Some(&json!("hi"))), "hi");
        assert_eq!(summarize(None), "");
        assert_eq!(summarize(Some(&json!({"a": 1}))), "[复杂消息]");
    }
}
