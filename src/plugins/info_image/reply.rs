use super::Config;
use super::convert::convert_context_info;
use super::format::ForwardNode;
use super::model::UnifiedContextInfo;
use super::render;
use super::style::{ImageStyleDetail, select_style};
use crate::adapters::onebot::api;
use crate::adapters::onebot::{LockedWriter, send_msg};
use crate::command::ParsedArgs;
use crate::event::Context;
use crate::message::Message;
use crate::plugins::PluginError;
use std::future::Future;

pub const GROUP_ONLY: &str = "[error]当前会话不在群聊中。";

/// `label = <pretty json>`，非 verbose 时为 None
pub fn dump_line<T: serde::Serialize>(verbose: bool, label: &str, value: &T) -> Option<String> {
    if !verbose {
        return None;
    }
    let json = serde_json::to_string_pretty(value).unwrap_or_default();
    Some(format!("{} = {}", label, json))
}

/// 一次指令调用的会话：触发消息的来源与本次使用的配置快照
pub struct Session<'a> {
    pub ctx: &'a Context,
    pub writer: LockedWriter,
    pub config: &'a Config,
    pub group_id: Option<i64>,
    pub user_id: i64,
    pub message_id: i64,
}

impl<'a> Session<'a> {
    /// 仅消息事件可以构成会话
    pub fn new(ctx: &'a Context, writer: LockedWriter, config: &'a Config) -> Option<Self> {
        let msg = ctx.as_message()?;
        Some(Self {
            ctx,
            writer,
            config,
            group_id: msg.group_id().filter(|&id| id != 0),
            user_id: msg.user_id(),
            message_id: msg.message_id(),
        })
    }

    pub async fn send(&self, message: Message) -> Result<Option<i64>, PluginError> {
        send_msg(
            self.ctx,
            self.writer.clone(),
            self.group_id,
            Some(self.user_id),
            message,
        )
        .await
    }

    /// 普通提示，不带引用
    pub async fn say(&self, text: impl Into<String>) -> Result<(), PluginError> {
        self.send(Message::new().text(text.into())).await?;
        Ok(())
    }

    /// 群聊指令的前置检查，私聊时回复错误并返回 None
    pub async fn require_group(&self) -> Result<Option<i64>, PluginError> {
        if self.group_id.is_none() {
            self.say(GROUP_ONLY).await?;
        }
        Ok(self.group_id)
    }

    /// 解析 `-i` 图片样式索引，非法时回复错误并返回 None
    pub async fn pick_style(
        &self,
        args: &ParsedArgs,
    ) -> Result<Option<ImageStyleDetail>, PluginError> {
        let index = match args.get_i64("index") {
            Ok(i) => i,
            Err(e) => {
                self.say(format!("[error]{}", e)).await?;
                return Ok(None);
            }
        };
        match select_style(
            &self.config.image_style_details,
            index,
            &self.config.inspect_style_command_name,
        ) {
            Ok(style) => Ok(Some(style)),
            Err(msg) => {
                self.say(msg).await?;
                Ok(None)
            }
        }
    }

    /// 读取群信息并补齐群号与群头像
    pub async fn group_context(&self, group_id: i64) -> Result<UnifiedContextInfo, PluginError> {
        let raw = api::get_group_info(self.ctx, self.writer.clone(), group_id).await?;
        self.dump("groupInfo", &raw);

        let mut info = convert_context_info(&raw);
        info.is_group = true;
        info.group_id = group_id;
        info.group_avatar_url = api::group_avatar_url(group_id);
        Ok(info)
    }

    /// verbose 模式下以 debug 级别输出原始或统一记录
    pub fn dump<T: serde::Serialize>(&self, label: &str, value: &T) {
        if let Some(line) = dump_line(self.config.verbose_console_output, label, value) {
            debug!(target: "InfoImage", "{}", line);
        }
    }

    // ================== 三种输出 ==================

    pub async fn send_text(&self, text: String) -> Result<(), PluginError> {
        let mut msg = Message::new();
        if self.config.enable_quote_with_text {
            msg = msg.reply(self.message_id);
        }
        self.send(msg.text(text)).await?;
        Ok(())
    }

    /// 先发送引用的等待提示，渲染并发送图片后撤回提示
    pub async fn send_image<F>(
        &self,
        wait_tip: &str,
        width: u32,
        html: F,
        caption: String,
    ) -> Result<(), PluginError>
    where
        F: Future<Output = String>,
    {
        let tip_id = self
            .send(Message::new().reply(self.message_id).text(wait_tip))
            .await?;

        let html = html.await;
        let shot = render::capture_card(
            &html,
            width,
            self.config.image_type,
            self.config.screenshot_quality,
        )
        .await;

        let sent = match shot {
            Ok(b64) => {
                let mut msg = Message::new();
                if self.config.enable_quote_with_image {
                    msg = msg.reply(self.message_id);
                }
                msg = msg.image(format!("base64://{}", b64));
                if !caption.is_empty() {
                    msg = msg.text(caption);
                }
                self.send(msg).await.map(|_| ())
            }
            Err(e) => Err(e.into()),
        };

        if let Some(id) = tip_id
            && let Err(e) = api::delete_msg(self.ctx, self.writer.clone(), id).await
        {
            warn!(target: "InfoImage", "撤回等待提示失败: {}", e);
        }
        sent
    }

    pub async fn send_forward(&self, nodes: Vec<ForwardNode>) -> Result<(), PluginError> {
        let self_id = self.ctx.bot.self_id();
        let mut messages = Message::new();
        for node in nodes {
            let uid = if node.user_id.is_empty() {
                self_id.to_string()
            } else {
                node.user_id
            };
            messages = messages.node_custom(uid, node.nickname, Message::new().text(node.content));
        }

        let (group_id, user_id) = match self.group_id {
            Some(gid) => (Some(gid), None),
            None => (None, Some(self.user_id)),
        };
        api::send_forward_msg(self.ctx, self.writer.clone(), group_id, user_id, messages).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simd_json::json;

    #[test]
    fn test_dump_line_only_when_verbose() {
        let raw = vec![json!({"msg_seq": 7, "sender_id": "10001"})];
        assert_eq!(dump_line(false, "groupEssenceMsgList", &raw), None);

        let line = dump_line(true, "groupEssenceMsgList", &raw).unwrap();
        assert!(line.starts_with("groupEssenceMsgList = ["));
        assert!(line.contains("\"msg_seq\": 7"));
        assert!(line.contains("\"sender_id\": \"10001\""));
    }
}
