use crate::event::Context;
use simd_json::OwnedValue;
use simd_json::derived::{ValueObjectAccess, ValueObjectAccessAsArray, ValueObjectAccessAsScalar};
use std::collections::HashMap;

pub struct CommandMatch {
    /// 匹配后的参数列表（剩余的消息段）
    pub args: Vec<OwnedValue>,
    /// 被过滤掉的 AT 用户 ID 列表（出现在指令之前）
    pub at_ids: Vec<String>,
}

pub fn get_prefixes(ctx: &Context) -> Vec<String> {
    ctx.config
        .read()
        .map(|c| c.command_prefix.clone())
        .unwrap_or_default()
}

/// 读取消息段中可能为字符串或数字的字段
pub fn seg_id(data: &OwnedValue, key: &str) -> Option<String> {
    data.get_str(key)
        .map(String::from)
        .or_else(|| data.get_i64(key).map(|v| v.to_string()))
        .or_else(|| data.get_u64(key).map(|v| v.to_string()))
}

/// 解析指令：自动过滤头部的 Reply/At/空白，匹配 [Prefix][Command]，返回参数及指令前的 @
pub fn match_command(ctx: &Context, command_name: &str) -> Option<CommandMatch> {
    let prefixes = get_prefixes(ctx);
    let msg_arr = ctx.as_message()?.0.get_array("message")?;
    match_segments(msg_arr, &prefixes, command_name)
}

pub fn match_segments(
    msg_arr: &[OwnedValue],
    prefixes: &[String],
    command_name: &str,
) -> Option<CommandMatch> {
    if command_name.is_empty() {
        return None;
    }

    let mut at_ids = Vec::new();

    for (i, segment) in msg_arr.iter().enumerate() {
        let type_ = segment.get_str("type")?;
        let data = segment.get("data")?;

        match type_ {
            // 引用回复不影响匹配
            "reply" => {}
            "at" => {
                if let Some(qq) = seg_id(data, "qq") {
                    at_ids.push(qq);
                }
            }
            "text" => {
                let raw_text = data.get_str("text").unwrap_or("");
                let trimmed_start = raw_text.trim_start();
                if trimmed_start.is_empty() {
                    continue;
                }

                for prefix in prefixes {
                    let target = format!("{}{}", prefix, command_name);
                    let Some(rest_of_text) = trimmed_start.strip_prefix(&target) else {
                        continue;
                    };
                    // 指令名后必须是空白或结尾，避免 "群精华" 吞掉 "群精华详情"
                    if rest_of_text
                        .chars()
                        .next()
                        .is_some_and(|c| !c.is_whitespace())
                    {
                        continue;
                    }

                    let mut args = Vec::new();
                    let args_text = rest_of_text.trim_start();
                    if !args_text.is_empty() {
                        let mut new_seg = segment.clone();
                        new_seg["data"]["text"] = OwnedValue::from(args_text);
                        args.push(new_seg);
                    }
                    args.extend(msg_arr.iter().skip(i + 1).cloned());

                    return Some(CommandMatch {
                        at_ids,
                        args,
                    });
                }
                return None;
            }
            _ => return None,
        }
    }

    None
}

// ================== 参数解析 ==================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgToken {
    Text(String),
    At(String),
}

/// 将参数消息段切分为词元：文本按空白与引号切分，At 段各自成为一个词元
pub fn split_args(args: &[OwnedValue]) -> Vec<ArgToken> {
    let mut tokens = Vec::new();
    for seg in args {
        let Some(data) = seg.get("data") else {
            continue;
        };
        match seg.get_str("type") {
            Some("text") => {
                let text = data.get_str("text").unwrap_or("");
                tokens.extend(shell_split(text).into_iter().map(ArgToken::Text));
            }
            Some("at") => {
                if let Some(qq) = seg_id(data, "qq") {
                    tokens.push(ArgToken::At(qq));
                }
            }
            _ => {}
        }
    }
    tokens
}

pub fn shell_split(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in input.chars() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => quote = Some(ch),
            (None, c) if c.is_whitespace() => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            (None, c) => current.push(c),
        }
    }
    if !current.is_empty() {
        args.push(current);
    }
    args
}

/// 选项声明：规范名及其全部写法，如 ("page", &["-p", "--page"])
pub type OptionSpec = (&'static str, &'static [&'static str]);

#[derive(Debug, Default)]
pub struct ParsedArgs {
    pub positional: Vec<ArgToken>,
    pub options: HashMap<&'static str, String>,
}

impl ParsedArgs {
    /// 读取整数选项；未提供时为 Ok(None)，无法解析时返回错误提示
    pub fn get_i64(&self, name: &str) -> Result<Option<i64>, String> {
        match self.options.get(name) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<i64>()
                .map(Some)
                .map_err(|_| format!("选项 {} 需要一个整数，当前输入：{}", name, raw)),
        }
    }

    /// 第一个文本位置参数
    pub fn first_text(&self) -> Option<&str> {
        self.positional.iter().find_map(|t| match t {
            ArgToken::Text(s) => Some(s.as_str()),
            ArgToken::At(_) => None,
        })
    }

    pub fn first_at(&self) -> Option<&str> {
        self.positional.iter().find_map(|t| match t {
            ArgToken::At(s) => Some(s.as_str()),
            ArgToken::Text(_) => None,
        })
    }
}

/// 按声明解析选项，支持 `-p 2`、`--page 2`、`--page=2` 三种写法
pub fn parse_args(tokens: Vec<ArgToken>, specs: &[OptionSpec]) -> ParsedArgs {
    let mut parsed = ParsedArgs::default();
    let mut iter = tokens.into_iter().peekable();

    let lookup = |flag: &str| {
        specs
            .iter()
            .find(|(_, names)| names.iter().any(|n| *n == flag))
            .map(|(name, _)| *name)
    };

    while let Some(token) = iter.next() {
        let ArgToken::Text(text) = &token else {
            parsed.positional.push(token);
            continue;
        };

        if text.starts_with("--")
            && let Some((flag, value)) = text.split_once('=')
            && let Some(name) = lookup(flag)
        {
            parsed.options.insert(name, value.to_string());
            continue;
        }

        if let Some(name) = lookup(text) {
            if matches!(iter.peek(), Some(ArgToken::Text(_)))
                && let Some(ArgToken::Text(value)) = iter.next()
            {
                parsed.options.insert(name, value);
            }
            continue;
        }

        parsed.positional.push(token);
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use simd_json::json;

    const SPECS: &[OptionSpec] = &[
        ("page", &["-p", "--page"]),
        ("pagesize", &["-s", "--pagesize"]),
        ("index", &["-i", "--idx", "--index"]),
    ];

    fn text(t: &str) -> OwnedValue {
        json!({"type": "text", "data": {"text": t}})
    }

    fn at(qq: i64) -> OwnedValue {
        json!({"type": "at", "data": {"qq": qq}})
    }

    fn prefixes() -> Vec<String> {
        vec!["/".to_string()]
    }

    #[test]
    fn test_match_with_args() {
        let msg = vec![text("/群精华 -p 2")];
        let m = match_segments(&msg, &prefixes(), "群精华").unwrap();
        assert_eq!(m.args.len(), 1);
        let tokens = split_args(&m.args);
        assert_eq!(
            tokens,
            vec![ArgToken::Text("-p".into()), ArgToken::Text("2".into())]
        );
    }

    #[test]
    fn test_command_name_boundary() {
        let msg = vec![text("/群精华详情 3")];
        assert!(match_segments(&msg, &prefixes(), "群精华").is_none());
        assert!(match_segments(&msg, &prefixes(), "群精华详情").is_some());

        let msg = vec![text("/aged 1")];
        assert!(match_segments(&msg, &prefixes(), "age").is_none());
    }

    #[test]
    fn test_leading_reply_is_skipped_and_at_collected() {
        let msg = vec![
            json!({"type": "reply", "data": {"id": "42"}}),
            at(10001),
            text(" /用户信息"),
        ];
        let m = match_segments(&msg, &prefixes(), "用户信息").unwrap();
        assert_eq!(m.at_ids, vec!["10001"]);
        assert!(m.args.is_empty());
    }

    #[test]
    fn test_at_after_command_is_an_argument() {
        let msg = vec![text("/aui "), at(20002)];
        let m = match_segments(&msg, &prefixes(), "aui").unwrap();
        assert!(m.at_ids.is_empty());
        let parsed = parse_args(split_args(&m.args), SPECS);
        assert_eq!(parsed.first_at(), Some("20002"));
    }

    #[test]
    fn test_non_text_head_stops_matching() {
        let msg = vec![json!({"type": "image", "data": {"file": "x"}}), text("/aui")];
        assert!(match_segments(&msg, &prefixes(), "aui").is_none());
    }

    #[test]
    fn test_parse_options() {
        let tokens = shell_split("3 --pagesize=20 -i 1 --page 2")
            .into_iter()
            .map(ArgToken::Text)
            .collect();
        let parsed = parse_args(tokens, SPECS);
        assert_eq!(parsed.get_i64("page"), Ok(Some(2)));
        assert_eq!(parsed.get_i64("pagesize"), Ok(Some(20)));
        assert_eq!(parsed.get_i64("index"), Ok(Some(1)));
        assert_eq!(parsed.first_text(), Some("3"));
    }

    #[test]
    fn test_invalid_option_value() {
        let tokens = vec![ArgToken::Text("-p".into()), ArgToken::Text("abc".into())];
        let parsed = parse_args(tokens, SPECS);
        assert!(parsed.get_i64("page").is_err());
        assert_eq!(parsed.get_i64("index"), Ok(None));
    }

    #[test]
    fn test_shell_split_quotes() {
        assert_eq!(
            shell_split(r#"a "b c"  'd'"#),
            vec!["a".to_string(), "b c".to_string(), "d".to_string()]
        );
    }
}
