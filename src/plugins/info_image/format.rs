//! 文本与合并转发内容的构造，均为纯函数

use super::model::{UnifiedAdminInfo, UnifiedContextInfo, UnifiedUserInfo};
use super::paginate::Paginated;
use super::records::{EssenceMessage, GroupNotice, truncate_chars};
use chrono::{Local, TimeZone};

/// 合并转发中的一个节点
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardNode {
    /// 为空时由发送方填入 Bot 自身 QQ
    pub user_id: String,
    pub nickname: String,
    pub content: String,
}

impl ForwardNode {
    fn new(user_id: impl ToString, nickname: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            user_id: user_id.to_string(),
            nickname: nickname.into(),
            content: content.into(),
        }
    }

    fn anonymous(nickname: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new("", nickname, content)
    }
}

// ================== 时间 ==================

/// 毫秒时间戳 -> `YYYY/MM/DD HH:MM` (本地时区)，0 或非法值返回空串
pub fn fmt_ms(ms: i64) -> String {
    if ms <= 0 {
        return String::new();
    }
    Local
        .timestamp_millis_opt(ms)
        .single()
        .map(|t| t.format("%Y/%m/%d %H:%M").to_string())
        .unwrap_or_default()
}

pub fn fmt_secs(secs: i64) -> String {
    fmt_ms(secs.saturating_mul(1000))
}

pub fn now_text() -> String {
    Local::now().format("%Y/%m/%d %H:%M").to_string()
}

fn gender_text(sex: &str) -> &'static str {
    match sex {
        "male" => "男 (Male)",
        "female" => "女 (Female)",
        _ => "未知 (Unknown)",
    }
}

fn group_role_text(role: &str) -> &'static str {
    match role {
        "owner" => "群主 (Owner)",
        "admin" => "管理员 (Admin)",
        _ => "成员 (Member)",
    }
}

fn yes_no(b: bool) -> &'static str {
    if b { "是 (Yes)" } else { "否 (No)" }
}

// ================== 用户信息 ==================

pub fn user_info_text(user: &UnifiedUserInfo, ctx: &UnifiedContextInfo) -> String {
    let mut out = String::from("----- 用户信息 (UserInfo) -----\n");
    out.push_str(&format!("QQ号\t(UserID): \t\t {}\n", user.user_id));
    if !user.nickname.is_empty() {
        out.push_str(&format!("昵称\t\t(Nickname): \t {}\n", user.nickname));
    }
    if !user.card.is_empty() {
        out.push_str(&format!("群昵称\t(GroupCard): \t {}\n", user.card));
    }
    if !user.sex.is_empty() {
        out.push_str(&format!("性别\t\t(Gender): \t {}\n", gender_text(&user.sex)));
    }
    if user.age > 0 {
        out.push_str(&format!("年龄\t\t(Age): \t\t {}\n", user.age));
    }
    if !user.level.is_empty() {
        out.push_str(&format!("等级\t\t(Level): \t\t {}\n", user.level));
    }
    if !user.sign.is_empty() {
        out.push_str(&format!("个性签名\t(Signature): \t {}\n", user.sign));
    }
    if !user.role.is_empty() {
        out.push_str(&format!("群角色\t(GroupRole): \t {}\n", group_role_text(&user.role)));
    }
    if user.join_time > 0 {
        out.push_str(&format!("入群时间\t(JoinTime): \t {}\n", fmt_ms(user.join_time)));
    }
    if user.register_time > 0 {
        out.push_str(&format!("注册时间\t(RegTime): \t {}\n", fmt_ms(user.register_time)));
    }

    out.push_str("\n--- 会话信息 (ContextInfo) ---\n");
    out.push_str(&format!("是否群聊 \t (IsGroupChat): {}\n", yes_no(ctx.is_group)));
    if ctx.is_group && ctx.group_id != 0 {
        out.push_str(&format!("群号 \t (GroupID): \t {}\n", ctx.group_id));
    }
    out
}

pub fn user_info_forward(user: &UnifiedUserInfo, ctx: &UnifiedContextInfo) -> Vec<ForwardNode> {
    let uid = user.user_id.as_str();
    let name = if user.nickname.is_empty() {
        uid
    } else {
        user.nickname.as_str()
    };
    let mut nodes = vec![
        ForwardNode::anonymous("当前时间 (CurrentTime):", now_text()),
        ForwardNode::anonymous("信息类型 (InfoType):", "用户信息 (User Info)"),
    ];
    let mut push = |content: String| nodes.push(ForwardNode::new(uid, name, content));

    push(format!("QQ号 (UserID):\t{}", uid));
    if !user.nickname.is_empty() {
        push(format!("昵称 (Nickname):\t{}", user.nickname));
    }
    if !user.card.is_empty() {
        push(format!("群昵称 (GroupCard):\t{}", user.card));
    }
    if !user.sex.is_empty() {
        push(format!("性别 (Gender):\t\t{}", gender_text(&user.sex)));
    }
    push(format!("年龄 (Age):\t{}", user.age));
    if !user.level.is_empty() {
        push(format!("等级 (Level):\t{}", user.level));
    }
    if !user.sign.is_empty() {
        push(format!("个性签名 (Signature):\t{}", user.sign));
    }
    if !user.role.is_empty() {
        push(format!("群角色 (GroupRole):\t\t{}", group_role_text(&user.role)));
    }
    if user.join_time > 0 {
        push(format!("入群时间 (JoinTime):\t{}", fmt_ms(user.join_time)));
    }
    if user.register_time > 0 {
        push(format!("注册时间 (RegTime):\t{}", fmt_ms(user.register_time)));
    }

    nodes.push(ForwardNode::anonymous("信息类型 (Info Type):", "会话信息 (Context Info)"));
    nodes.push(ForwardNode::anonymous("是否群聊 (Is Group Chat):", yes_no(ctx.is_group)));
    if ctx.is_group && ctx.group_id != 0 {
        nodes.push(ForwardNode::anonymous("群号 (Group ID):", ctx.group_id.to_string()));
    }
    nodes
}

// ================== 群管理列表 ==================

fn admin_kind(admin: &UnifiedAdminInfo) -> (&'static str, &'static str) {
    if admin.is_owner() {
        ("群主", "Owner")
    } else {
        ("管理员", "Admin")
    }
}

pub fn admin_list_text(admins: &[UnifiedAdminInfo], ctx: &UnifiedContextInfo) -> String {
    let mut out = format!("当前时间 (Current Time): {}\n", now_text());
    out.push_str("===== 群管理员列表 (Group Admin List) =====\n");
    out.push_str(&format!("群名称 (Group Name): {}\n", ctx.group_name));
    out.push_str(&format!("群号 (Group ID): {}\n", ctx.group_id));
    out.push_str(&format!(
        "成员数 (Member Count): {}/{}\n",
        ctx.member_count, ctx.max_member_count
    ));
    out.push_str(&format!("管理员数量 (Admin Count): {}\n\n", admins.len()));

    for (i, admin) in admins.iter().enumerate() {
        let (zh, en) = admin_kind(admin);
        out.push_str(&format!("-----No. {}. {} ({})-----\n", i + 1, zh, en));
        out.push_str(&format!("   QQ号 (User ID): {}\n", admin.user_id));
        let nickname = if admin.nickname.is_empty() {
            "未知"
        } else {
            &admin.nickname
        };
        out.push_str(&format!("   昵称 (Nickname): {}\n", nickname));
        if !admin.card.is_empty() {
            out.push_str(&format!("   群名片 (Group Card): {}\n", admin.card));
        }
        if !admin.level.is_empty() {
            out.push_str(&format!("   等级 (Level): {}\n", admin.level));
        }
        if admin.join_time > 0 {
            out.push_str(&format!("   入群时间 (Join Time): {}\n", fmt_ms(admin.join_time)));
        }
        if !admin.title.is_empty() {
            out.push_str(&format!("   头衔 (Title): {}\n", admin.title));
        }
        out.push('\n');
    }
    out
}

pub fn admin_list_forward(admins: &[UnifiedAdminInfo], ctx: &UnifiedContextInfo) -> Vec<ForwardNode> {
    let header = [
        format!("当前时间: \t {}", now_text()),
        "=========群聊信息=========".to_string(),
        format!("群名称: \t {}", ctx.group_name),
        format!("群号: \t {}", ctx.group_id),
        format!("成员数: \t {}/{}", ctx.member_count, ctx.max_member_count),
        format!("管理员数量: \t {}", admins.len()),
    ]
    .join("\n");

    let mut nodes = vec![ForwardNode::anonymous("群聊基本信息", header)];
    for (i, admin) in admins.iter().enumerate() {
        let author = if !admin.card.is_empty() {
            admin.card.clone()
        } else if !admin.nickname.is_empty() {
            admin.nickname.clone()
        } else {
            format!("QQ: {}", admin.user_id)
        };

        let mut lines = vec![
            format!("---------No. {}---------", i + 1),
            format!("QQ号: \t {}", admin.user_id),
            format!("昵称: \t {}", admin.nickname),
            format!("角色: \t {}", admin_kind(admin).0),
        ];
        if !admin.card.is_empty() {
            lines.push(format!("群昵称: \t {}", admin.card));
        }
        if !admin.level.is_empty() {
            lines.push(format!("等级: \t {}", admin.level));
        }
        if !admin.title.is_empty() {
            lines.push(format!("群头衔: \t {}", admin.title));
        }
        if admin.join_time > 0 {
            lines.push(format!("加入本群时间: \t {}", fmt_ms(admin.join_time)));
        }
        if admin.last_sent_time > 0 {
            lines.push(format!("最后发言时间: \t {}", fmt_ms(admin.last_sent_time)));
        }

        nodes.push(ForwardNode::new(admin.user_id, author, lines.join("\n")));
    }
    nodes
}

// ================== 群精华 ==================

fn essence_usage_lines(cmd: &str) -> Vec<String> {
    vec![
        "📖 参数用法:".to_string(),
        "  -p, --page <页码>     指定页码(从1开始)".to_string(),
        "  -s, --pagesize <条数> 每页显示条数".to_string(),
        "📝 示例:".to_string(),
        format!("  {} -p 2        查看第2页", cmd),
        format!("  {} -s 10       每页显示10条", cmd),
        format!("  {} -p 3 -s 8   第3页,每页8条", cmd),
    ]
}

fn essence_record_block(page: &Paginated<EssenceMessage>, i: usize, r: &EssenceMessage) -> String {
    [
        format!("-----No. {}-----", page.global_index(i)),
        format!("发送者: {} ({})", r.sender_nick, r.sender_id),
        format!("设精华: {} ({})", r.operator_nick, r.operator_id),
        format!("时间: {}", fmt_secs(r.operator_time)),
        format!("内容: {}", r.content_text()),
    ]
    .join("\n")
}

fn essence_nav_lines(page: &Paginated<EssenceMessage>, cmd: &str) -> Vec<String> {
    let mut lines = Vec::new();
    if page.has_prev {
        lines.push(format!(
            "上一页: {} -p {} -s {}",
            cmd,
            page.current_page - 1,
            page.page_size
        ));
    }
    if page.has_next {
        lines.push(format!(
            "下一页: {} -p {} -s {}",
            cmd,
            page.current_page + 1,
            page.page_size
        ));
    }
    lines
}

pub fn essence_list_text(
    page: &Paginated<EssenceMessage>,
    ctx: &UnifiedContextInfo,
    cmd: &str,
) -> String {
    let mut out = String::from("===== 群精华消息列表 =====\n");
    out.push_str(&format!("群名称: {}\n", ctx.group_name));
    out.push_str(&format!("群号: {}\n", ctx.group_id));
    out.push_str(&format!(
        "第{}/{}页 (共{}条精华)\n\n",
        page.current_page, page.total_pages, page.total_count
    ));

    for (i, r) in page.records.iter().enumerate() {
        out.push_str(&essence_record_block(page, i, r));
        out.push_str("\n\n");
    }

    if page.total_pages > 1 {
        out.push_str("------------------\n");
        for line in essence_nav_lines(page, cmd) {
            out.push_str(&line);
            out.push('\n');
        }
    }

    out.push_str("\n==================\n");
    for line in essence_usage_lines(cmd) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn essence_list_forward(
    page: &Paginated<EssenceMessage>,
    ctx: &UnifiedContextInfo,
    cmd: &str,
) -> Vec<ForwardNode> {
    let mut nodes = vec![ForwardNode::anonymous(
        "群精华消息列表",
        format!(
            "群名称: {}\n群号: {}\n第{}/{}页 (共{}条精华)",
            ctx.group_name, ctx.group_id, page.current_page, page.total_pages, page.total_count
        ),
    )];

    for (i, r) in page.records.iter().enumerate() {
        nodes.push(ForwardNode::new(
            r.sender_id,
            r.sender_nick.clone(),
            essence_record_block(page, i, r),
        ));
    }

    if page.total_pages > 1 {
        let nav = essence_nav_lines(page, cmd);
        if !nav.is_empty() {
            nodes.push(ForwardNode::anonymous("分页导航", nav.join("\n")));
        }
    }

    nodes.push(ForwardNode::anonymous(
        "参数用法",
        essence_usage_lines(cmd).join("\n"),
    ));
    nodes
}

/// 图片下方的分页导航与用法提示
pub fn essence_image_caption(page: &Paginated<EssenceMessage>, cmd: &str) -> String {
    let mut out = String::new();
    if page.total_pages > 1 {
        out.push_str(&format!(
            "\n📄 第 {}/{} 页",
            page.current_page, page.total_pages
        ));
        if page.has_prev {
            out.push_str(&format!(" | ◀ {} -p {}", cmd, page.current_page - 1));
        }
        if page.has_next {
            out.push_str(&format!(" | ▶ {} -p {}", cmd, page.current_page + 1));
        }
    }
    out.push_str(&format!("\n📖 用法: {} -p <页码> -s <每页条数>", cmd));
    out
}

fn detail_usage(cmd: &str, example: usize, what: &str) -> [String; 2] {
    [
        format!("📖 用法: {} <序号>", cmd),
        format!("📝 示例: {} {}  查看第{}条{}详情", cmd, example, example, what),
    ]
}

pub fn essence_detail_text(
    r: &EssenceMessage,
    index: usize,
    total: usize,
    ctx: &UnifiedContextInfo,
    cmd: &str,
) -> String {
    let mut out = String::from("📌 群精华消息详情\n==================\n");
    out.push_str(&format!("📍 群聊: {} ({})\n", ctx.group_name, ctx.group_id));
    out.push_str(&format!("📊 第 {}/{} 条精华\n", index, total));
    out.push_str("------------------\n");
    out.push_str(&format!("👤 发送者: {}\n", r.sender_nick));
    out.push_str(&format!("🆔 QQ号: {}\n", r.sender_id));
    out.push_str("------------------\n");
    out.push_str(&format!("💬 消息内容:\n{}\n", r.content_text()));
    out.push_str("------------------\n");
    out.push_str(&format!("⏰ 设精时间: {}\n", fmt_secs(r.operator_time)));
    out.push_str(&format!("📌 操作者: {} ({})\n", r.operator_nick, r.operator_id));
    out.push_str("==================\n");
    for line in detail_usage(cmd, 5, "精华") {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn essence_detail_forward(
    r: &EssenceMessage,
    index: usize,
    total: usize,
    ctx: &UnifiedContextInfo,
    cmd: &str,
) -> Vec<ForwardNode> {
    vec![
        ForwardNode::anonymous("📌 群精华详情", format!("第 {}/{} 条精华消息", index, total)),
        ForwardNode::anonymous("📍 群聊信息", group_block(ctx)),
        ForwardNode::new(
            r.sender_id,
            r.sender_nick.clone(),
            format!("发送者: {}\nQQ: {}", r.sender_nick, r.sender_id),
        ),
        ForwardNode::new(
            r.sender_id,
            r.sender_nick.clone(),
            format!("💬 消息内容:\n{}", r.content_text()),
        ),
        ForwardNode::new(
            r.operator_id,
            r.operator_nick.clone(),
            format!(
                "📌 设精信息:\n操作者: {}\n时间: {}",
                r.operator_nick,
                fmt_secs(r.operator_time)
            ),
        ),
        ForwardNode::anonymous("使用帮助", detail_usage(cmd, 5, "精华").join("\n")),
    ]
}

pub fn essence_detail_caption(index: usize, total: usize, cmd: &str) -> String {
    format!("\n📌 第 {}/{} 条精华 | 📖 {} <序号>", index, total, cmd)
}

fn group_block(ctx: &UnifiedContextInfo) -> String {
    format!(
        "{}\n群号: {}\n成员: {}/{}",
        ctx.group_name, ctx.group_id, ctx.member_count, ctx.max_member_count
    )
}

// ================== 群公告 ==================

fn notice_page_hints(page: &Paginated<GroupNotice>) -> Vec<String> {
    let mut hints = Vec::new();
    if page.has_prev {
        hints.push(format!("-p {}", page.current_page - 1));
    }
    if page.has_next {
        hints.push(format!("-p {}", page.current_page + 1));
    }
    hints
}

fn notice_page_hint_lines(page: &Paginated<GroupNotice>) -> Vec<String> {
    let mut hints = Vec::new();
    if page.has_prev {
        hints.push(format!("上一页: -p {}", page.current_page - 1));
    }
    if page.has_next {
        hints.push(format!("下一页: -p {}", page.current_page + 1));
    }
    hints
}

pub fn notice_list_text(page: &Paginated<GroupNotice>, ctx: &UnifiedContextInfo) -> String {
    let mut out = String::from("📢 群公告列表\n==================\n");
    out.push_str(&format!("📍 群聊: {} ({})\n", ctx.group_name, ctx.group_id));
    out.push_str(&format!(
        "📊 第{}/{}页 (共{}条公告)\n",
        page.current_page, page.total_pages, page.total_count
    ));
    out.push_str("==================\n\n");

    for (i, n) in page.records.iter().enumerate() {
        out.push_str(&format!(
            "📌 {}. 发布者: {}\n",
            page.global_index(i),
            n.sender_id
        ));
        out.push_str(&format!("⏰ {}\n", fmt_secs(n.publish_time)));
        out.push_str(&format!("💬 {}\n", truncate_chars(&n.decoded_text(), 100)));
        if !n.images.is_empty() {
            out.push_str(&format!("🖼️ 包含{}张图片\n", n.images.len()));
        }
        out.push_str("------------------\n");
    }

    let hints = notice_page_hint_lines(page);
    if !hints.is_empty() {
        out.push_str(&format!("📖 {}\n", hints.join(" | ")));
    }
    out
}

pub fn notice_list_forward(
    page: &Paginated<GroupNotice>,
    ctx: &UnifiedContextInfo,
) -> Vec<ForwardNode> {
    let mut nodes = vec![ForwardNode::anonymous(
        "📢 群公告",
        format!(
            "{}\n第{}/{}页 (共{}条公告)",
            ctx.group_name, page.current_page, page.total_pages, page.total_count
        ),
    )];

    for (i, n) in page.records.iter().enumerate() {
        let mut content = format!(
            "📌 第{}条公告\n⏰ {}\n💬 {}",
            page.global_index(i),
            fmt_secs(n.publish_time),
            n.decoded_text()
        );
        if !n.images.is_empty() {
            content.push_str(&format!("\n🖼️ 包含{}张图片", n.images.len()));
        }
        nodes.push(ForwardNode::new(
            n.sender_id,
            format!("发布者 {}", n.sender_id),
            content,
        ));
    }

    let hints = notice_page_hint_lines(page);
    if !hints.is_empty() {
        nodes.push(ForwardNode::anonymous("📖 翻页提示", hints.join("\n")));
    }
    nodes
}

pub fn notice_image_caption(page: &Paginated<GroupNotice>) -> String {
    let mut out = format!(
        "\n📢 第{}/{}页 | 共{}条公告",
        page.current_page, page.total_pages, page.total_count
    );
    let hints = notice_page_hints(page);
    if !hints.is_empty() {
        out.push_str(&format!(" | 翻页: {}", hints.join(" / ")));
    }
    out
}

pub fn notice_detail_text(
    n: &GroupNotice,
    index: usize,
    total: usize,
    ctx: &UnifiedContextInfo,
    cmd: &str,
) -> String {
    let mut out = String::from("📢 群公告详情\n==================\n");
    out.push_str(&format!("📍 群聊: {} ({})\n", ctx.group_name, ctx.group_id));
    out.push_str(&format!("📊 第 {}/{} 条公告\n", index, total));
    out.push_str("------------------\n");
    out.push_str(&format!("👤 发布者QQ: {}\n", n.sender_id));
    out.push_str(&format!("⏰ 发布时间: {}\n", fmt_secs(n.publish_time)));
    out.push_str("------------------\n");
    out.push_str(&format!("💬 公告内容:\n{}\n", n.decoded_text()));
    if !n.images.is_empty() {
        out.push_str("------------------\n");
        out.push_str(&format!("🖼️ 包含 {} 张图片\n", n.images.len()));
    }
    out.push_str("==================\n");
    for line in detail_usage(cmd, 2, "公告") {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn notice_detail_forward(
    n: &GroupNotice,
    index: usize,
    total: usize,
    ctx: &UnifiedContextInfo,
    cmd: &str,
) -> Vec<ForwardNode> {
    let publisher = format!("发布者 {}", n.sender_id);
    let mut nodes = vec![
        ForwardNode::anonymous("📢 群公告详情", format!("第 {}/{} 条公告", index, total)),
        ForwardNode::anonymous("📍 群聊信息", group_block(ctx)),
        ForwardNode::new(
            n.sender_id,
            publisher.clone(),
            format!(
                "发布者QQ: {}\n发布时间: {}",
                n.sender_id,
                fmt_secs(n.publish_time)
            ),
        ),
        ForwardNode::new(
            n.sender_id,
            publisher,
            format!("💬 公告内容:\n{}", n.decoded_text()),
        ),
    ];
    if !n.images.is_empty() {
        nodes.push(ForwardNode::anonymous(
            "🖼️ 图片信息",
            format!("包含 {} 张图片", n.images.len()),
        ));
    }
    nodes.push(ForwardNode::anonymous(
        "使用帮助",
        detail_usage(cmd, 2, "公告").join("\n"),
    ));
    nodes
}

pub fn notice_detail_caption(index: usize, total: usize, cmd: &str) -> String {
    format!("\n📢 第 {}/{} 条公告 | 📖 {} <序号>", index, total, cmd)
}

/// 详情指令缺少序号时的提示
pub fn missing_index_text(cmd: &str, what: &str, example: usize) -> String {
    format!(
        "[error]请输入要查看的{}序号。\n用法: {} <序号>\n示例: {} {}",
        what, cmd, cmd, example
    )
}

pub fn index_out_of_range_text(index: i64, total: usize) -> String {
    format!(
        "[error]序号超出范围。\n有效范围: 1 - {}\n当前输入: {}",
        total, index
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::info_image::paginate::paginate;
    use crate::plugins::info_image::records::NoticeImage;

    fn essence(n: i64) -> EssenceMessage {
        EssenceMessage {
            msg_seq: n,
            msg_random: 0,
            sender_id: 10000 + n,
            sender_nick: format!("用户{}", n),
            operator_id: 1,
            operator_nick: "群主".into(),
            message_id: n,
            operator_time: 0,
            content: Vec::new(),
        }
    }

    fn group_ctx() -> UnifiedContextInfo {
        UnifiedContextInfo {
            is_group: true,
            group_id: 123456,
            group_name: "测试群".into(),
            member_count: 42,
            max_member_count: 200,
            group_avatar_url: String::new(),
        }
    }

    #[test]
    fn test_fmt_ms_zero_is_empty() {
        assert_eq!(fmt_ms(0), "");
        assert_eq!(fmt_secs(-5), "");
        let s = fmt_ms(1_700_000_000_000);
        assert_eq!(s.len(), "2023/11/14 22:13".len());
        assert_eq!(&s[4..5], "/");
    }

    #[test]
    fn test_user_info_text_skips_empty_fields() {
        let user = UnifiedUserInfo {
            user_id: "10001".into(),
            nickname: "小明".into(),
            sex: "male".into(),
            ..Default::default()
        };
        let text = user_info_text(&user, &crate::plugins::info_image::convert::private_context());
        assert!(text.contains("QQ号\t(UserID): \t\t 10001\n"));
        assert!(text.contains("男 (Male)"));
        assert!(!text.contains("群昵称"));
        assert!(!text.contains("年龄"));
        assert!(text.contains("否 (No)"));
        assert!(!text.contains("GroupID"));
    }

    #[test]
    fn test_essence_list_text_navigation() {
        let items: Vec<_> = (1..=12).map(essence).collect();
        let page = paginate(&items, 2, 5);
        let text = essence_list_text(&page, &group_ctx(), "群精华");
        assert!(text.contains("第2/3页 (共12条精华)"));
        assert!(text.contains("-----No. 6-----"));
        assert!(text.contains("-----No. 10-----"));
        assert!(text.contains("上一页: 群精华 -p 1 -s 5"));
        assert!(text.contains("下一页: 群精华 -p 3 -s 5"));
        assert!(text.contains("内容: [空消息]"));
    }

    #[test]
    fn test_essence_caption_single_page() {
        let items: Vec<_> = (1..=3).map(essence).collect();
        let page = paginate(&items, 1, 5);
        assert_eq!(
            essence_image_caption(&page, "群精华"),
            "\n📖 用法: 群精华 -p <页码> -s <每页条数>"
        );
    }

    #[test]
    fn test_essence_forward_nodes() {
        let items: Vec<_> = (1..=3).map(essence).collect();
        let page = paginate(&items, 1, 5);
        let nodes = essence_list_forward(&page, &group_ctx(), "群精华");
        // 标题 + 3 条 + 用法，单页无导航
        assert_eq!(nodes.len(), 5);
        assert_eq!(nodes[1].user_id, "10001");
        assert_eq!(nodes[1].nickname, "用户1");
        assert!(nodes[0].user_id.is_empty());
    }

    #[test]
    fn test_notice_list_truncates_and_counts_images() {
        let notice = GroupNotice {
            notice_id: "n1".into(),
            sender_id: 10001,
            publish_time: 0,
            text: "公".repeat(120),
            images: vec![NoticeImage {
                id: "abc".into(),
                width: 1,
                height: 1,
            }],
        };
        let page = paginate(&[notice], 1, 10);
        let text = notice_list_text(&page, &group_ctx());
        assert!(text.contains(&format!("💬 {}...\n", "公".repeat(100))));
        assert!(text.contains("🖼️ 包含1张图片"));
        assert!(!text.contains("📖"));
        assert_eq!(
            notice_image_caption(&page),
            "\n📢 第1/1页 | 共1条公告"
        );
    }

    #[test]
    fn test_admin_list_text() {
        let admins = vec![
            UnifiedAdminInfo {
                user_id: 1,
                nickname: "老大".into(),
                role: "owner".into(),
                ..Default::default()
            },
            UnifiedAdminInfo {
                user_id: 2,
                role: "admin".into(),
                card: "二当家".into(),
                ..Default::default()
            },
        ];
        let text = admin_list_text(&admins, &group_ctx());
        assert!(text.contains("成员数 (Member Count): 42/200"));
        assert!(text.contains("-----No. 1. 群主 (Owner)-----"));
        assert!(text.contains("-----No. 2. 管理员 (Admin)-----"));
        assert!(text.contains("   昵称 (Nickname): 未知\n"));
        assert!(text.contains("   群名片 (Group Card): 二当家\n"));

        let nodes = admin_list_forward(&admins, &group_ctx());
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[1].nickname, "老大");
        assert_eq!(nodes[2].nickname, "二当家");
    }

    #[test]
    fn test_detail_prompts() {
        assert_eq!(
            missing_index_text("群公告详情", "公告", 2),
            "[error]请输入要查看的公告序号。\n用法: 群公告详情 <序号>\n示例: 群公告详情 2"
        );
        assert!(index_out_of_range_text(9, 3).contains("有效范围: 1 - 3"));
    }
}
