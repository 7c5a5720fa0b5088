use super::format::{
    essence_detail_caption, essence_detail_forward, essence_detail_text, essence_image_caption,
    essence_list_forward, essence_list_text, index_out_of_range_text, missing_index_text,
};
use super::paginate::paginate;
use super::records::EssenceMessage;
use super::render;
use super::reply::Session;
use crate::adapters::onebot::api;
use crate::command::ParsedArgs;
use crate::plugins::PluginError;

pub const MAX_PAGE_SIZE: i64 = 50;

/// 页码至少为 1，每页条数限制在 [1, 50]
pub fn page_params(
    args: &ParsedArgs,
    default_size: i64,
) -> Result<(usize, usize), String> {
    let page = args.get_i64("page")?.unwrap_or(1).max(1);
    let size = args
        .get_i64("pagesize")?
        .filter(|&s| s != 0)
        .unwrap_or(default_size)
        .clamp(1, MAX_PAGE_SIZE);
    Ok((page as usize, size as usize))
}

async fn fetch(s: &Session<'_>, gid: i64) -> Result<Vec<EssenceMessage>, PluginError> {
    let raw = api::get_essence_msg_list(s.ctx, s.writer.clone(), gid).await?;
    s.dump("groupEssenceMsgList", &raw);
    Ok(raw.iter().map(EssenceMessage::from_value).collect())
}

pub async fn run_list(s: &Session<'_>, args: &ParsedArgs) -> Result<(), PluginError> {
    let Some(gid) = s.require_group().await? else {
        return Ok(());
    };
    let (page, size) = match page_params(args, s.config.group_essence_page_size) {
        Ok(p) => p,
        Err(e) => return s.say(format!("[error]{}", e)).await,
    };
    let Some(style) = s.pick_style(args).await? else {
        return Ok(());
    };

    let records = fetch(s, gid).await?;
    if records.is_empty() {
        return s.say("该群暂无精华消息。").await;
    }

    let result = paginate(&records, page, size);
    if result.is_empty() {
        return s
            .say(format!("第{}页没有记录，共{}页", page, result.total_pages))
            .await;
    }

    let context = s.group_context(gid).await?;
    if s.config.verbose_console_output {
        debug!(
            target: "InfoImage",
            "群精华分页: 第{}/{}页，{}条",
            result.current_page,
            result.total_pages,
            result.records.len()
        );
    }

    let cmd = s.config.group_essence_command_name.as_str();
    if s.config.send_text {
        s.send_text(essence_list_text(&result, &context, cmd)).await?;
    }

    if s.config.send_image {
        let html = async {
            let group_avatar = render::fetch_base64(&context.group_avatar_url).await;
            render::essence_list_html(&result, &context, group_avatar.as_deref(), style)
        };
        s.send_image(
            "🔄正在渲染群精华列表图片，请稍候⏳...",
            render::view_width(false),
            html,
            essence_image_caption(&result, cmd),
        )
        .await?;
    }

    if s.config.send_forward {
        s.send_forward(essence_list_forward(&result, &context, cmd))
            .await?;
    }
    Ok(())
}

pub async fn run_detail(s: &Session<'_>, args: &ParsedArgs) -> Result<(), PluginError> {
    let Some(gid) = s.require_group().await? else {
        return Ok(());
    };
    let cmd = s.config.group_essence_detail_command_name.as_str();
    let Some(index) = args.first_text().and_then(|t| t.parse::<i64>().ok()) else {
        return s.say(missing_index_text(cmd, "精华消息", 5)).await;
    };
    let Some(style) = s.pick_style(args).await? else {
        return Ok(());
    };

    let records = fetch(s, gid).await?;
    if records.is_empty() {
        return s.say("该群暂无精华消息。").await;
    }
    let total = records.len();
    if index < 1 || index as usize > total {
        return s.say(index_out_of_range_text(index, total)).await;
    }
    let index = index as usize;
    let record = &records[index - 1];

    let context = s.group_context(gid).await?;
    if s.config.verbose_console_output {
        debug!(
            target: "InfoImage",
            "群精华详情: seq={} sender={} content={}",
            record.msg_seq,
            record.sender_id,
            record.content_text()
        );
    }

    if s.config.send_text {
        s.send_text(essence_detail_text(record, index, total, &context, cmd))
            .await?;
    }

    if s.config.send_image {
        let html = async {
            let group_avatar = render::fetch_base64(&context.group_avatar_url).await;
            let sender_avatar = render::fetch_base64(&api::avatar_url(record.sender_id)).await;
            render::essence_detail_html(
                record,
                index,
                total,
                &context,
                group_avatar.as_deref(),
                sender_avatar.as_deref(),
                style,
            )
        };
        s.send_image(
            "🔄正在渲染群精华详情图片，请稍候⏳...",
            render::view_width(false),
            html,
            essence_detail_caption(index, total, cmd),
        )
        .await?;
    }

    if s.config.send_forward {
        s.send_forward(essence_detail_forward(record, index, total, &context, cmd))
            .await?;
    }
    Ok(())
}
