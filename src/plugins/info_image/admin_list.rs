use super::convert::{convert_admin_info, text};
use super::format::{admin_list_forward, admin_list_text};
use super::model::UnifiedAdminInfo;
use super::render;
use super::reply::Session;
use crate::adapters::onebot::api;
use crate::command::ParsedArgs;
use crate::plugins::PluginError;
use std::cmp::Ordering;

/// 群主在前，其余按展示名称 (群名片，空时为昵称) 降序；排序稳定
pub fn sort_admins(admins: &mut [UnifiedAdminInfo]) {
    admins.sort_by(|a, b| match (a.is_owner(), b.is_owner()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => b.display_name().cmp(a.display_name()),
    });
}

pub async fn run(s: &Session<'_>, args: &ParsedArgs) -> Result<(), PluginError> {
    let Some(gid) = s.require_group().await? else {
        return Ok(());
    };
    let Some(style) = s.pick_style(args).await? else {
        return Ok(());
    };

    let members = api::get_group_member_list(s.ctx, s.writer.clone(), gid).await?;
    let context = s.group_context(gid).await?;

    let raw_admins: Vec<_> = members
        .iter()
        .filter(|m| matches!(text(m, &["role"]).as_str(), "owner" | "admin"))
        .collect();
    s.dump("groupAdminMemberList", &raw_admins);

    if raw_admins.is_empty() {
        s.say("该群没有管理员。").await?;
        return Ok(());
    }

    let mut admins: Vec<UnifiedAdminInfo> = raw_admins
        .into_iter()
        .map(|m| {
            let mut admin = convert_admin_info(m, s.config.dialect);
            admin.avatar = api::avatar_url(admin.user_id);
            admin
        })
        .collect();
    sort_admins(&mut admins);

    if s.config.send_text {
        s.send_text(admin_list_text(&admins, &context)).await?;
    }

    if s.config.send_image {
        let html = async {
            let urls: Vec<String> = admins.iter().map(|a| a.avatar.clone()).collect();
            let avatars = render::fetch_all_base64(&urls).await;
            let group_avatar = render::fetch_base64(&context.group_avatar_url).await;
            render::admin_list_html(
                &admins,
                &avatars,
                &context,
                group_avatar.as_deref(),
                style,
            )
        };
        s.send_image(
            "🔄正在渲染群管理员列表图片，请稍候⏳...",
            render::view_width(false),
            html,
            String::new(),
        )
        .await?;
    }

    if s.config.send_forward {
        s.send_forward(admin_list_forward(&admins, &context)).await?;
    }
    Ok(())
}
