use super::convert::{field, int, text};
use regex::{Captures, Regex};
use simd_json::OwnedValue;
use std::sync::OnceLock;

/// 群精华消息，operator_time 为秒
#[derive(Debug, Clone, PartialEq)]
pub struct EssenceMessage {
    pub msg_seq: i64,
    pub msg_random: i64,
    pub sender_id: i64,
    pub sender_nick: String,
    pub operator_id: i64,
    pub operator_nick: String,
    pub message_id: i64,
    pub operator_time: i64,
    pub content: Vec<OwnedValue>,
}

impl EssenceMessage {
    /// 协议端返回的 id 可能是数字或数字字符串
    pub fn from_value(raw: &OwnedValue) -> Self {
        let content = match field(raw, "content") {
            Some(OwnedValue::Array(arr)) => arr.iter().cloned().collect(),
            _ => Vec::new(),
        };
        Self {
            msg_seq: int(raw, &["msg_seq"]),
            msg_random: int(raw, &["msg_random"]),
            sender_id: int(raw, &["sender_id"]),
            sender_nick: text(raw, &["sender_nick"]),
            operator_id: int(raw, &["operator_id"]),
            operator_nick: text(raw, &["operator_nick"]),
            message_id: int(raw, &["message_id"]),
            operator_time: int(raw, &["operator_time"]),
            content,
        }
    }

    pub fn content_text(&self) -> String {
        essence_content_text(&self.content)
    }
}

/// 公告图片
#[derive(Debug, Clone, PartialEq)]
pub struct NoticeImage {
    pub id: String,
    pub width: i64,
    pub height: i64,
}

impl NoticeImage {
    pub fn url(&self) -> String {
        format!("https://gdynamic.qpic.cn/gdynamic/{}/0", self.id)
    }
}

/// 群公告，publish_time 为秒
#[derive(Debug, Clone, PartialEq)]
pub struct GroupNotice {
    pub notice_id: String,
    pub sender_id: i64,
    pub publish_time: i64,
    pub text: String,
    pub images: Vec<NoticeImage>,
}

impl GroupNotice {
    pub fn from_value(raw: &OwnedValue) -> Self {
        let message = field(raw, "message");
        let images = message
            .and_then(|m| field(m, "images").or_else(|| field(m, "image")))
            .and_then(|v| match v {
                OwnedValue::Array(arr) => Some(arr.iter().map(parse_image).collect()),
                _ => None,
            })
            .unwrap_or_default();
        Self {
            notice_id: text(raw, &["notice_id"]),
            sender_id: int(raw, &["sender_id"]),
            publish_time: int(raw, &["publish_time"]),
            text: message.map(|m| text(m, &["text"])).unwrap_or_default(),
            images,
        }
    }

    /// 解码后的公告正文
    pub fn decoded_text(&self) -> String {
        notice_text(&self.text)
    }
}

fn parse_image(raw: &OwnedValue) -> NoticeImage {
    NoticeImage {
        id: text(raw, &["id"]),
        width: int(raw, &["width"]),
        height: int(raw, &["height"]),
    }
}

/// 将精华消息的消息段转换为可读文本
pub fn essence_content_text(segments: &[OwnedValue]) -> String {
    if segments.is_empty() {
        return "[空消息]".to_string();
    }

    segments
        .iter()
        .map(|seg| {
            let type_ = text(seg, &["type"]);
            let data = field(seg, "data").cloned().unwrap_or(OwnedValue::from(()));
            match type_.as_str() {
                "text" => text(&data, &["text"]),
                "image" => "[图片]".to_string(),
                "face" => format!("[表情:{}]", text(&data, &["id"])),
                "at" => {
                    let who = text(&data, &["qq", "name"]);
                    format!("@{}", if who.is_empty() { "某人" } else { &who })
                }
                "reply" => format!("[回复:{}]", text(&data, &["id", "qq"])),
                "forward" => "[转发消息]".to_string(),
                "video" => "[视频]".to_string(),
                "record" => "[语音]".to_string(),
                "file" => "[文件]".to_string(),
                other => format!("[{}]", other),
            }
        })
        .collect()
}

static NUMERIC_ENTITY: OnceLock<Regex> = OnceLock::new();

/// 解码公告中的 HTML 实体 (含 `&#10;` 等数字实体)，`&amp;` 最后处理以免二次解码
pub fn notice_text(raw: &str) -> String {
    let re = NUMERIC_ENTITY
        .get_or_init(|| Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").expect("Invalid Regex"));
    let decoded = re.replace_all(raw, |caps: &Captures| {
        let code = &caps[1];
        let n = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        n.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    decoded
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

/// 截断到指定字符数，超出时追加省略号
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}
