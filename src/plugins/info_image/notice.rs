use super::essence::page_params;
use super::format::{
    index_out_of_range_text, missing_index_text, notice_detail_caption, notice_detail_forward,
    notice_detail_text, notice_image_caption, notice_list_forward, notice_list_text,
};
use super::paginate::paginate;
use super::records::GroupNotice;
use super::render;
use super::reply::Session;
use crate::adapters::onebot::api;
use crate::command::ParsedArgs;
use crate::plugins::PluginError;

pub fn page_out_of_range_text(total_pages: usize, page: usize) -> String {
    format!(
        "[error]页码超出范围。\n总共{}页，当前请求第{}页。",
        total_pages, page
    )
}

async fn fetch(s: &Session<'_>, gid: i64) -> Result<Vec<GroupNotice>, PluginError> {
    let raw = api::get_group_notice(s.ctx, s.writer.clone(), gid).await?;
    s.dump("groupNoticeList", &raw);
    Ok(raw.iter().map(GroupNotice::from_value).collect())
}

pub async fn run_list(s: &Session<'_>, args: &ParsedArgs) -> Result<(), PluginError> {
    let Some(gid) = s.require_group().await? else {
        return Ok(());
    };
    let (page, size) = match page_params(args, s.config.group_notice_page_size) {
        Ok(p) => p,
        Err(e) => return s.say(format!("[error]{}", e)).await,
    };
    let Some(style) = s.pick_style(args).await? else {
        return Ok(());
    };

    let notices = fetch(s, gid).await?;
    if notices.is_empty() {
        return s.say("该群暂无公告。").await;
    }

    let result = paginate(&notices, page, size);
    if page > result.total_pages {
        return s
            .say(page_out_of_range_text(result.total_pages, page))
            .await;
    }

    let context = s.group_context(gid).await?;

    if s.config.send_text {
        s.send_text(notice_list_text(&result, &context)).await?;
    }

    if s.config.send_image {
        let html = async {
            let group_avatar = render::fetch_base64(&context.group_avatar_url).await;
            render::notice_list_html(&result, &context, group_avatar.as_deref(), style)
        };
        s.send_image(
            "🔄正在渲染群公告列表图片，请稍候⏳...",
            render::view_width(false),
            html,
            notice_image_caption(&result),
        )
        .await?;
    }

    if s.config.send_forward {
        s.send_forward(notice_list_forward(&result, &context)).await?;
    }
    Ok(())
}

pub async fn run_detail(s: &Session<'_>, args: &ParsedArgs) -> Result<(), PluginError> {
    let Some(gid) = s.require_group().await? else {
        return Ok(());
    };
    let cmd = s.config.group_notice_detail_command_name.as_str();
    let Some(index) = args.first_text().and_then(|t| t.parse::<i64>().ok()) else {
        return s.say(missing_index_text(cmd, "公告", 2)).await;
    };
    let Some(style) = s.pick_style(args).await? else {
        return Ok(());
    };

    let notices = fetch(s, gid).await?;
    if notices.is_empty() {
        return s.say("该群暂无公告。").await;
    }
    let total = notices.len();
    if index < 1 || index as usize > total {
        return s.say(index_out_of_range_text(index, total)).await;
    }
    let index = index as usize;
    let notice = &notices[index - 1];

    let context = s.group_context(gid).await?;

    if s.config.send_text {
        s.send_text(notice_detail_text(notice, index, total, &context, cmd))
            .await?;
    }

    if s.config.send_image {
        let html = async {
            let group_avatar = render::fetch_base64(&context.group_avatar_url).await;
            let sender_avatar = render::fetch_base64(&api::avatar_url(notice.sender_id)).await;
            render::notice_detail_html(
                notice,
                index,
                total,
                &context,
                group_avatar.as_deref(),
                sender_avatar.as_deref(),
                style,
            )
        };
        s.send_image(
            "🔄正在渲染群公告详情图片，请稍候⏳...",
            render::view_width(false),
            html,
            notice_detail_caption(index, total, cmd),
        )
        .await?;
    }

    if s.config.send_forward {
        s.send_forward(notice_detail_forward(notice, index, total, &context, cmd))
            .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_out_of_range_text() {
        assert_eq!(
            page_out_of_range_text(3, 7),
            "[error]页码超出范围。\n总共3页，当前请求第7页。"
        );
    }
}
