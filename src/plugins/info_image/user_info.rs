use super::convert::{
    attach_status, convert_user_info, merge_member_and_stranger, private_context, with_avatar,
};
use super::format::{user_info_forward, user_info_text};
use super::model::Dialect;
use super::render::{self, UserInfoView};
use super::reply::Session;
use crate::adapters::onebot::api;
use crate::command::ParsedArgs;
use crate::plugins::PluginError;

/// 查询目标：参数中的 QQ 号或 @ 视为直接查询，只取陌生人信息；
/// 指令前的 @ 或发送者本人在群聊中会附带群成员信息
#[derive(Debug, PartialEq, Eq)]
pub struct Target {
    pub user_id: String,
    pub direct: bool,
}

pub fn resolve_target(args: &ParsedArgs, at_ids: &[String], sender: i64) -> Target {
    if let Some(qq) = args.first_at().or_else(|| args.first_text()) {
        return Target {
            user_id: qq.trim_start_matches('@').to_string(),
            direct: true,
        };
    }
    Target {
        user_id: at_ids
            .first()
            .cloned()
            .unwrap_or_else(|| sender.to_string()),
        direct: false,
    }
}

pub async fn run(s: &Session<'_>, args: &ParsedArgs, at_ids: &[String]) -> Result<(), PluginError> {
    let Some(style) = s.pick_style(args).await? else {
        return Ok(());
    };

    let target = resolve_target(args, at_ids, s.user_id);
    let Ok(target_id) = target.user_id.parse::<i64>() else {
        s.say(format!("[error]无效的QQ号：{}", target.user_id)).await?;
        return Ok(());
    };
    let avatar = api::avatar_url(target_id);

    let stranger = api::get_stranger_info(s.ctx, s.writer.clone(), target_id).await?;
    s.dump("strangerInfo", &stranger);

    let (mut raw, context) = match s.group_id.filter(|_| !target.direct) {
        Some(gid) => {
            let member =
                api::get_group_member_info(s.ctx, s.writer.clone(), gid, target_id).await?;
            s.dump("groupMemberInfo", &member);
            let context = s.group_context(gid).await?;
            (merge_member_and_stranger(&member, &stranger, &avatar), context)
        }
        None => (with_avatar(&stranger, &avatar), private_context()),
    };

    if s.config.dialect == Dialect::NapCat {
        match api::nc_get_user_status(s.ctx, s.writer.clone(), target_id).await {
            Ok(status) => raw = attach_status(raw, status),
            Err(e) => warn!(target: "InfoImage", "获取在线状态失败 ({}): {}", target_id, e),
        }
    }
    s.dump("userInfoArg", &raw);

    let user = convert_user_info(&raw, s.config.dialect);
    s.dump("unifiedUserInfo", &user);
    s.dump("unifiedContextInfo", &context);

    if s.config.send_text {
        s.send_text(user_info_text(&user, &context)).await?;
    }

    if s.config.send_image {
        let html = async {
            let group_avatar = if context.is_group {
                render::fetch_base64(&context.group_avatar_url).await
            } else {
                None
            };
            let avatar = render::fetch_base64(&user.avatar).await;
            let view = UserInfoView {
                user: &user,
                ctx: &context,
                avatar: avatar.as_deref(),
                group_avatar: group_avatar.as_deref(),
                hide_phone: s.config.hide_phone_number,
            };
            render::user_info_html(&view, style)
        };
        s.send_image(
            "🔄正在渲染用户信息图片，请稍候⏳...",
            render::view_width(true),
            html,
            String::new(),
        )
        .await?;
    }

    if s.config.send_forward {
        s.send_forward(user_info_forward(&user, &context)).await?;
    }
    Ok(())
}
