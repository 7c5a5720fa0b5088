//! HTML 卡片生成与截图

use super::format::{fmt_ms, fmt_secs};
use super::model::{
    ExtendedProfile, UnifiedAdminInfo, UnifiedContextInfo, UnifiedUserInfo, role_label, sex_label,
};
use super::paginate::Paginated;
use super::records::{EssenceMessage, GroupNotice, truncate_chars};
use super::style::{ImageStyleDetail, ImageType};
use anyhow::{Result, anyhow};
use base64::{Engine as _, engine::general_purpose};
use cdp_html_shot::{Browser, CaptureOptions, ImageFormat, Viewport};
use std::time::Duration;
use tokio::time;

const UNKNOWN: &str = r#"<span class="unknown">未知</span>"#;
const HIDDEN: &str = r#"<span class="unknown">已隐藏</span>"#;

// ================== 取值与转义 ==================

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\n' => out.push_str("<br>"),
            _ => out.push(c),
        }
    }
    out
}

/// 转义后的值，空值或 "-" 显示为未知
fn value(s: &str) -> String {
    if s.is_empty() || s == "-" {
        UNKNOWN.to_string()
    } else {
        html_escape(s)
    }
}

fn time_value(ms: i64) -> String {
    value(&fmt_ms(ms))
}

/// 生肖编码 1-12
pub fn shengxiao(code: i64) -> &'static str {
    const TABLE: [&str; 12] = [
        "鼠", "牛", "虎", "兔", "龙", "蛇", "马", "羊", "猴", "鸡", "狗", "猪",
    ];
    lookup_from_one(&TABLE, code)
}

/// 星座编码 1-12，自水瓶座起
pub fn constellation(code: i64) -> &'static str {
    const TABLE: [&str; 12] = [
        "水瓶座", "双鱼座", "白羊座", "金牛座", "双子座", "巨蟹座", "狮子座", "处女座", "天秤座",
        "天蝎座", "射手座", "摩羯座",
    ];
    lookup_from_one(&TABLE, code)
}

fn lookup_from_one(table: &[&'static str], code: i64) -> &'static str {
    usize::try_from(code - 1)
        .ok()
        .and_then(|i| table.get(i).copied())
        .unwrap_or("")
}

/// 血型编码从 0 开始
pub fn blood_type(code: i64) -> String {
    const TABLE: [&str; 4] = ["O", "A", "B", "AB"];
    usize::try_from(code)
        .ok()
        .and_then(|i| TABLE.get(i))
        .map(|t| format!("{}型", t))
        .unwrap_or_default()
}

/// 国家-省-市-邮编，详细地址不同时追加在后
pub fn location_text(ext: &ExtendedProfile) -> String {
    let parts: Vec<&str> = [&ext.country, &ext.province, &ext.city, &ext.post_code]
        .into_iter()
        .map(String::as_str)
        .filter(|p| !p.is_empty() && *p != "0" && *p != "-")
        .collect();
    let mut loc = parts.join("-");
    if !ext.address.is_empty() && ext.address != loc {
        if loc.is_empty() {
            loc = ext.address.clone();
        } else {
            loc = format!("{} {}", loc, ext.address);
        }
    }
    loc
}

pub fn birthday_text(ext: &ExtendedProfile) -> String {
    if ext.birthday_year > 0 && ext.birthday_month > 0 && ext.birthday_day > 0 {
        format!(
            "{}年{}月{}日",
            ext.birthday_year, ext.birthday_month, ext.birthday_day
        )
    } else {
        String::new()
    }
}

pub fn phone_html(user: &UnifiedUserInfo, hide: bool) -> String {
    if hide {
        HIDDEN.to_string()
    } else {
        value(user.phone())
    }
}

// ================== 主题 ==================

struct Theme {
    font: &'static str,
    page_bg: &'static str,
    card_bg: &'static str,
    text: &'static str,
    muted: &'static str,
    accent: &'static str,
    border: &'static str,
}

fn theme(detail: ImageStyleDetail) -> Theme {
    use super::style::ImageStyle::*;
    let font = detail.style_key.font_family();
    match (detail.style_key, detail.dark_mode) {
        (SourceHanSerifSC, false) => Theme {
            font,
            page_bg: "#f0f2f5",
            card_bg: "rgba(255,255,255,0.92)",
            text: "#2c3e50",
            muted: "#8a94a6",
            accent: "#b8860b",
            border: "#e5e7eb",
        },
        (SourceHanSerifSC, true) => Theme {
            font,
            page_bg: "#1a1a1a",
            card_bg: "rgba(36,36,40,0.92)",
            text: "#e8e6e3",
            muted: "#9aa0a6",
            accent: "#d4a84b",
            border: "#3a3a40",
        },
        (LxgwWenKai, false) => Theme {
            font,
            page_bg: "#f7f1e3",
            card_bg: "rgba(255,252,245,0.94)",
            text: "#3d3a35",
            muted: "#948b7c",
            accent: "#c0392b",
            border: "#e6dcc8",
        },
        (LxgwWenKai, true) => Theme {
            font,
            page_bg: "#22201c",
            card_bg: "rgba(44,41,36,0.94)",
            text: "#ece4d4",
            muted: "#a39a89",
            accent: "#e07a5f",
            border: "#4a4439",
        },
        (FlatMinimal, false) => Theme {
            font,
            page_bg: "#ffffff",
            card_bg: "#f8fafc",
            text: "#111827",
            muted: "#6b7280",
            accent: "#2563eb",
            border: "#e5e7eb",
        },
        (FlatMinimal, true) => Theme {
            font,
            page_bg: "#0f172a",
            card_bg: "#1e293b",
            text: "#f1f5f9",
            muted: "#94a3b8",
            accent: "#38bdf8",
            border: "#334155",
        },
    }
}

fn page(detail: ImageStyleDetail, width: u32, background: Option<&str>, body: &str) -> String {
    let t = theme(detail);
    let bg = match background {
        Some(b64) => format!(
            "background: {} url(data:image/jpeg;base64,{}) center/cover no-repeat;",
            t.page_bg, b64
        ),
        None => format!("background: {};", t.page_bg),
    };
    format!(
        r#"<!DOCTYPE html><html><head><meta charset="utf-8"><style>
* {{ margin: 0; padding: 0; box-sizing: border-box; }}
body {{ width: {width}px; font-family: {font}; color: {text}; }}
.card {{ width: {width}px; padding: 32px; {bg} }}
.panel {{ background: {card_bg}; border: 1px solid {border}; border-radius: 16px; padding: 24px; margin-bottom: 20px; backdrop-filter: blur(8px); }}
.header {{ display: flex; align-items: center; gap: 20px; }}
.avatar {{ width: 96px; height: 96px; border-radius: 50%; object-fit: cover; border: 3px solid {accent}; }}
.group-avatar {{ width: 64px; height: 64px; border-radius: 12px; object-fit: cover; }}
.title {{ font-size: 28px; font-weight: 700; }}
.subtitle {{ font-size: 15px; color: {muted}; margin-top: 4px; }}
.grid {{ display: grid; grid-template-columns: 1fr 1fr; gap: 14px; margin-top: 18px; }}
.info-item {{ padding: 10px 14px; border-radius: 10px; border: 1px solid {border}; }}
.full-width {{ grid-column: 1 / -1; }}
.info-label {{ font-size: 13px; color: {muted}; }}
.info-value {{ font-size: 17px; margin-top: 4px; word-break: break-all; }}
.unknown {{ color: {muted}; font-style: italic; }}
.record {{ border-top: 1px dashed {border}; padding: 14px 0; }}
.record:first-of-type {{ border-top: none; }}
.record-head {{ display: flex; justify-content: space-between; font-size: 14px; color: {muted}; }}
.record-index {{ color: {accent}; font-weight: 700; }}
.record-body {{ font-size: 17px; margin-top: 8px; line-height: 1.6; word-break: break-all; }}
.badge {{ display: inline-block; padding: 2px 10px; border-radius: 999px; background: {accent}; color: #fff; font-size: 13px; }}
.notice-img {{ max-width: 100%; border-radius: 10px; margin-top: 10px; }}
.footer {{ text-align: center; font-size: 13px; color: {muted}; }}
</style></head><body><div class="card">{body}</div></body></html>"#,
        width = width,
        font = t.font,
        text = t.text,
        bg = bg,
        card_bg = t.card_bg,
        border = t.border,
        accent = t.accent,
        muted = t.muted,
        body = body,
    )
}

fn img_tag(class: &str, b64: Option<&str>) -> String {
    match b64 {
        Some(data) => format!(
            r#"<img class="{}" src="data:image/jpeg;base64,{}">"#,
            class, data
        ),
        None => String::new(),
    }
}

fn info_item(label: &str, value_html: &str, full: bool) -> String {
    format!(
        r#"<div class="info-item{}"><div class="info-label">{}</div><div class="info-value">{}</div></div>"#,
        if full { " full-width" } else { "" },
        label,
        value_html
    )
}

fn group_header(ctx: &UnifiedContextInfo, group_avatar: Option<&str>, extra: &str) -> String {
    let count = match (ctx.member_count, ctx.max_member_count) {
        (m, max) if m > 0 && max > 0 => format!(" · 群人数: {}/{}", m, max),
        (m, _) if m > 0 => format!(" · 群人数: {}", m),
        _ => String::new(),
    };
    format!(
        r#"<div class="panel header">{}<div><div class="title">{}</div><div class="subtitle">群号: {}{}</div><div class="subtitle">{}</div></div></div>"#,
        img_tag("group-avatar", group_avatar),
        html_escape(&ctx.group_name),
        ctx.group_id,
        count,
        extra
    )
}

fn footer(detail: ImageStyleDetail) -> String {
    format!(
        r#"<div class="footer">{} · {}</div>"#,
        detail.style_key.display_name(),
        super::format::now_text()
    )
}

// ================== 各视图 ==================

pub struct UserInfoView<'a> {
    pub user: &'a UnifiedUserInfo,
    pub ctx: &'a UnifiedContextInfo,
    pub avatar: Option<&'a str>,
    pub group_avatar: Option<&'a str>,
    pub hide_phone: bool,
}

pub fn user_info_html(view: &UserInfoView, detail: ImageStyleDetail) -> String {
    let user = view.user;
    let ext = user.extended.clone().unwrap_or_default();

    let sex = match sex_label(&user.sex) {
        "未知" => UNKNOWN.to_string(),
        s => s.to_string(),
    };
    let age = if user.age > 0 {
        user.age.to_string()
    } else {
        String::new()
    };
    let status = user
        .status
        .as_ref()
        .map(|s| s.label.clone())
        .unwrap_or_default();

    let mut items = vec![
        info_item("QQ昵称", &value(&user.nickname), false),
        info_item("性别", &sex, false),
        info_item("年龄", &value(&age), false),
        info_item("QQ等级", &value(&user.display_level()), false),
        info_item("QID", &value(&user.qid), false),
        info_item("注册时间", &time_value(user.register_time), false),
        info_item("个性签名", &value(&user.sign), true),
    ];

    if user.extended.is_some() {
        items.extend([
            info_item("邮箱", &value(user.email()), false),
            info_item("电话", &phone_html(user, view.hide_phone), false),
            info_item("地址信息", &value(&location_text(&ext)), true),
            info_item("生肖", &value(shengxiao(ext.shengxiao)), false),
            info_item("星座", &value(constellation(ext.constellation)), false),
            info_item("血型", &value(&blood_type(ext.blood_type)), false),
            info_item("生日", &value(&birthday_text(&ext)), false),
            info_item(
                "VIP信息",
                &format!(
                    "VIP: {} | 年费VIP: {} | VIP等级: {}",
                    if ext.is_vip { "是" } else { "否" },
                    if ext.is_years_vip { "是" } else { "否" },
                    ext.vip_level
                ),
                true,
            ),
        ]);
    }
    items.push(info_item("状态", &value(&status), true));

    let mut body = format!(
        r#"<div class="panel"><div class="header">{}<div><div class="title">{}</div><div class="subtitle">QQ: {}</div></div></div><div class="grid">{}</div></div>"#,
        img_tag("avatar", view.avatar),
        value(&user.nickname),
        html_escape(&user.user_id),
        items.concat()
    );

    if view.ctx.is_group {
        let group_level = if user.group_level.is_empty() {
            &user.level
        } else {
            &user.group_level
        };
        let role = match role_label(&user.role) {
            "未知" => UNKNOWN.to_string(),
            r => r.to_string(),
        };
        let group_items = [
            info_item("群名片", &value(&user.card), true),
            info_item("群等级", &value(group_level), false),
            info_item("群角色", &role, false),
            info_item("专属头衔", &value(&user.title), true),
            info_item("加群时间", &time_value(user.join_time), false),
            info_item("最后发言", &time_value(user.last_sent_time), false),
        ];
        body.push_str(&group_header(view.ctx, view.group_avatar, ""));
        body.push_str(&format!(
            r#"<div class="panel"><div class="grid">{}</div></div>"#,
            group_items.concat()
        ));
    }
    body.push_str(&footer(detail));

    page(detail, 999, view.avatar, &body)
}

pub fn admin_list_html(
    admins: &[UnifiedAdminInfo],
    avatars: &[Option<String>],
    ctx: &UnifiedContextInfo,
    group_avatar: Option<&str>,
    detail: ImageStyleDetail,
) -> String {
    let mut body = group_header(
        ctx,
        group_avatar,
        &format!("管理员数量: {}", admins.len()),
    );

    let mut rows = String::new();
    for (i, admin) in admins.iter().enumerate() {
        let avatar = avatars.get(i).and_then(|a| a.as_deref());
        let mut meta = vec![format!("QQ: {}", admin.user_id)];
        if !admin.level.is_empty() {
            meta.push(format!("等级: {}", html_escape(&admin.level)));
        }
        if !admin.title.is_empty() {
            meta.push(format!("头衔: {}", html_escape(&admin.title)));
        }
        if admin.join_time > 0 {
            meta.push(format!("入群: {}", fmt_ms(admin.join_time)));
        }
        if admin.last_sent_time > 0 {
            meta.push(format!("最后发言: {}", fmt_ms(admin.last_sent_time)));
        }
        rows.push_str(&format!(
            r#"<div class="record header">{}<div><div class="title"><span class="record-index">No.{}</span> {} <span class="badge">{}</span></div><div class="subtitle">{}</div></div></div>"#,
            img_tag("avatar", avatar),
            i + 1,
            value(admin.display_name()),
            role_label(&admin.role),
            meta.join(" · ")
        ));
    }
    body.push_str(&format!(r#"<div class="panel">{}</div>"#, rows));
    body.push_str(&footer(detail));

    page(detail, 800, None, &body)
}

pub fn essence_list_html(
    page_data: &Paginated<EssenceMessage>,
    ctx: &UnifiedContextInfo,
    group_avatar: Option<&str>,
    detail: ImageStyleDetail,
) -> String {
    let mut body = group_header(
        ctx,
        group_avatar,
        &format!(
            "群精华 · 第{}/{}页 (共{}条精华)",
            page_data.current_page, page_data.total_pages, page_data.total_count
        ),
    );

    let mut rows = String::new();
    for (i, r) in page_data.records.iter().enumerate() {
        rows.push_str(&format!(
            r#"<div class="record"><div class="record-head"><span><span class="record-index">No.{}</span> {} ({})</span><span>{}</span></div><div class="record-body">{}</div><div class="subtitle">设精华: {} ({})</div></div>"#,
            page_data.global_index(i),
            value(&r.sender_nick),
            r.sender_id,
            fmt_secs(r.operator_time),
            html_escape(&truncate_chars(&r.content_text(), 200)),
            value(&r.operator_nick),
            r.operator_id
        ));
    }
    body.push_str(&format!(r#"<div class="panel">{}</div>"#, rows));
    body.push_str(&footer(detail));

    page(detail, 800, None, &body)
}

pub fn essence_detail_html(
    r: &EssenceMessage,
    index: usize,
    total: usize,
    ctx: &UnifiedContextInfo,
    group_avatar: Option<&str>,
    sender_avatar: Option<&str>,
    detail: ImageStyleDetail,
) -> String {
    let mut body = group_header(
        ctx,
        group_avatar,
        &format!("群精华详情 · 第 {}/{} 条精华", index, total),
    );
    body.push_str(&format!(
        r#"<div class="panel"><div class="header">{}<div><div class="title">{}</div><div class="subtitle">QQ: {}</div></div></div><div class="record-body">{}</div></div>"#,
        img_tag("avatar", sender_avatar),
        value(&r.sender_nick),
        r.sender_id,
        html_escape(&r.content_text())
    ));
    body.push_str(&format!(
        r#"<div class="panel"><div class="grid">{}{}</div></div>"#,
        info_item("设精时间", &value(&fmt_secs(r.operator_time)), false),
        info_item(
            "操作者",
            &format!("{} ({})", value(&r.operator_nick), r.operator_id),
            false
        )
    ));
    body.push_str(&footer(detail));

    page(detail, 800, None, &body)
}

pub fn notice_list_html(
    page_data: &Paginated<GroupNotice>,
    ctx: &UnifiedContextInfo,
    group_avatar: Option<&str>,
    detail: ImageStyleDetail,
) -> String {
    let mut body = group_header(
        ctx,
        group_avatar,
        &format!(
            "群公告 · 第{}/{}页 (共{}条公告)",
            page_data.current_page, page_data.total_pages, page_data.total_count
        ),
    );

    let mut rows = String::new();
    for (i, n) in page_data.records.iter().enumerate() {
        let images = if n.images.is_empty() {
            String::new()
        } else {
            format!(r#"<div class="subtitle">🖼️ 包含{}张图片</div>"#, n.images.len())
        };
        rows.push_str(&format!(
            r#"<div class="record"><div class="record-head"><span><span class="record-index">{}.</span> 发布者: {}</span><span>{}</span></div><div class="record-body">{}</div>{}</div>"#,
            page_data.global_index(i),
            n.sender_id,
            fmt_secs(n.publish_time),
            html_escape(&truncate_chars(&n.decoded_text(), 150)),
            images
        ));
    }
    body.push_str(&format!(r#"<div class="panel">{}</div>"#, rows));
    body.push_str(&footer(detail));

    page(detail, 800, None, &body)
}

pub fn notice_detail_html(
    n: &GroupNotice,
    index: usize,
    total: usize,
    ctx: &UnifiedContextInfo,
    group_avatar: Option<&str>,
    sender_avatar: Option<&str>,
    detail: ImageStyleDetail,
) -> String {
    let mut body = group_header(
        ctx,
        group_avatar,
        &format!("群公告详情 · 第 {}/{} 条公告", index, total),
    );
    let images: String = n
        .images
        .iter()
        .map(|img| format!(r#"<img class="notice-img" src="{}">"#, html_escape(&img.url())))
        .collect();
    body.push_str(&format!(
        r#"<div class="panel"><div class="header">{}<div><div class="title">发布者 {}</div><div class="subtitle">{}</div></div></div><div class="record-body">{}</div>{}</div>"#,
        img_tag("avatar", sender_avatar),
        n.sender_id,
        fmt_secs(n.publish_time),
        html_escape(&n.decoded_text()),
        images
    ));
    body.push_str(&footer(detail));

    page(detail, 800, None, &body)
}

// ================== 网络与截图 ==================

/// 下载图片并转为 base64，失败时返回 None 以降级为无图
pub async fn fetch_base64(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(8))
        .build()
        .ok()?;

    match client.get(url).send().await {
        Ok(resp) if resp.status().is_success() => match resp.bytes().await {
            Ok(bytes) => Some(general_purpose::STANDARD.encode(&bytes)),
            Err(e) => {
                warn!(target: "InfoImage", "读取图片失败 {}: {}", url, e);
                None
            }
        },
        Ok(resp) => {
            warn!(target: "InfoImage", "下载图片失败 {}: HTTP {}", url, resp.status());
            None
        }
        Err(e) => {
            warn!(target: "InfoImage", "下载图片失败 {}: {}", url, e);
            None
        }
    }
}

/// 并发下载多张图片，结果与输入顺序一致
pub async fn fetch_all_base64(urls: &[String]) -> Vec<Option<String>> {
    futures_util::future::join_all(urls.iter().map(|u| fetch_base64(u))).await
}

/// 渲染 HTML 并截取 `.card` 元素，返回 base64 图片数据
pub async fn capture_card(
    html: &str,
    width: u32,
    image_type: ImageType,
    quality: u8,
) -> Result<String> {
    let browser = Browser::instance().await;
    let tab = browser.new_tab().await?;

    tab.set_viewport(&Viewport::new(width, 100)).await?;
    tab.set_content(html).await?;

    // 等待内嵌图片与字体解码
    time::sleep(Duration::from_millis(300)).await;

    let height_js = "document.body.scrollHeight";
    let body_height = tab.evaluate(height_js).await?.as_f64().unwrap_or(800.0) as u32;

    let viewport = Viewport::new(width, body_height.clamp(100, 8000));
    tab.set_viewport(&viewport).await?;
    time::sleep(Duration::from_millis(100)).await;

    let mut opts = CaptureOptions::new().with_viewport(viewport);
    opts = match image_type {
        ImageType::Png => opts.with_format(ImageFormat::Png),
        ImageType::Jpeg => opts
            .with_format(ImageFormat::Jpeg)
            .with_quality(quality.clamp(1, 100)),
    };

    let result = async {
        let element = tab.find_element(".card").await?;
        element.screenshot_with_options(opts).await
    }
    .await;

    let _ = tab.close().await;
    result.map_err(|e| anyhow!("截图失败: {}", e))
}

/// 视图宽度，用户信息卡片更宽
pub fn view_width(user_info: bool) -> u32 {
    if user_info { 999 } else { 800 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::info_image::style::{ImageStyle, default_style_details};

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<b>"a" & 'b'</b>"#),
            "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;"
        );
        assert_eq!(html_escape("a\nb"), "a<br>b");
    }

    #[test]
    fn test_profile_lookups() {
        assert_eq!(shengxiao(1), "鼠");
        assert_eq!(shengxiao(12), "猪");
        assert_eq!(shengxiao(0), "");
        assert_eq!(shengxiao(13), "");
        assert_eq!(constellation(1), "水瓶座");
        assert_eq!(constellation(12), "摩羯座");
        assert_eq!(blood_type(0), "O型");
        assert_eq!(blood_type(3), "AB型");
        assert_eq!(blood_type(-1), "");
        assert_eq!(blood_type(4), "");
    }

    #[test]
    fn test_location_and_birthday() {
        let ext = ExtendedProfile {
            country: "中国".into(),
            province: "浙江".into(),
            city: "杭州".into(),
            post_code: "0".into(),
            address: "西湖区".into(),
            birthday_year: 2000,
            birthday_month: 2,
            birthday_day: 29,
            ..Default::default()
        };
        assert_eq!(location_text(&ext), "中国-浙江-杭州 西湖区");
        assert_eq!(birthday_text(&ext), "2000年2月29日");

        let empty = ExtendedProfile::default();
        assert_eq!(location_text(&empty), "");
        assert_eq!(birthday_text(&empty), "");
    }

    #[test]
    fn test_phone_hidden_by_default() {
        let user = UnifiedUserInfo {
            extended: Some(ExtendedProfile {
                phone_num: "13800000000".into(),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(phone_html(&user, true).contains("已隐藏"));
        assert_eq!(phone_html(&user, false), "13800000000");
    }

    #[test]
    fn test_user_info_html_escapes_and_hides_group_panel() {
        let user = UnifiedUserInfo {
            user_id: "10001".into(),
            nickname: "<script>".into(),
            ..Default::default()
        };
        let ctx = crate::plugins::info_image::convert::private_context();
        let view = UserInfoView {
            user: &user,
            ctx: &ctx,
            avatar: None,
            group_avatar: None,
            hide_phone: true,
        };
        let html = user_info_html(&view, default_style_details()[0]);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("群名片"));
        assert!(html.contains(r#"class="card""#));
    }

    #[test]
    fn test_dark_theme_differs() {
        let light = ImageStyleDetail {
            style_key: ImageStyle::FlatMinimal,
            dark_mode: false,
        };
        let dark = ImageStyleDetail {
            dark_mode: true,
            ..light
        };
        assert_ne!(theme(light).page_bg, theme(dark).page_bg);
    }
}
