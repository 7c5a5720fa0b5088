use super::{LockedWriter, send_frame_raw};
use crate::event::Context;
use crate::message::Message;
use serde::{Deserialize, Serialize};
use simd_json::OwnedValue;
use simd_json::base::ValueAsArray;
use simd_json::derived::{ValueObjectAccess, ValueObjectAccessAsScalar};
use std::time::Duration;

pub type ApiError = Box<dyn std::error::Error + Send + Sync>;

const API_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct ApiRequest<T> {
    action: String,
    params: T,
    echo: String,
}

/// 通用 API 调用函数
pub async fn call_action<P, R>(
    ctx: &Context,
    writer: LockedWriter,
    action: &str,
    params: P,
) -> Result<R, ApiError>
where
    P: Serialize,
    R: serde::de::DeserializeOwned,
{
    let echo = ctx.matcher.next_echo(action);
    let req = ApiRequest {
        action: action.to_string(),
        params,
        echo: echo.clone(),
    };

    let json_str = simd_json::to_string(&req)?;

    let rx = ctx.matcher.register(echo.clone()).await;
    send_frame_raw(writer, json_str).await?;

    let resp_event = ctx
        .matcher
        .wait_resp(&echo, rx, API_TIMEOUT)
        .await
        .ok_or_else(|| format!("API 请求超时: {}", action))?;

    let data_val = check_response(resp_event)?;
    let data: R = simd_json::serde::from_owned_value(data_val)?;
    Ok(data)
}

/// 校验响应帧 { status, retcode, data, echo }，返回 data 字段
pub fn check_response(resp: OwnedValue) -> Result<OwnedValue, ApiError> {
    let retcode = resp
        .get_i64("retcode")
        .or_else(|| resp.get_u64("retcode").map(|v| v as i64))
        .unwrap_or(-1);

    if retcode != 0 {
        let msg = resp
            .get_str("wording")
            .or_else(|| resp.get_str("msg"))
            .or_else(|| resp.get_str("message"))
            .unwrap_or("Unknown Error");
        return Err(format!("API 调用失败 (retcode={}): {}", retcode, msg).into());
    }

    Ok(resp.get("data").cloned().unwrap_or(OwnedValue::from(())))
}

/// 不等待响应的 API 调用函数
pub async fn call_action_no_wait<P>(
    ctx: &Context,
    writer: LockedWriter,
    action: &str,
    params: P,
) -> Result<(), ApiError>
where
    P: Serialize,
{
    let req = ApiRequest {
        action: action.to_string(),
        params,
        echo: ctx.matcher.next_echo(action),
    };

    let json_str = simd_json::to_string(&req)?;
    send_frame_raw(writer, json_str).await?;
    Ok(())
}

/// 列表类接口在无数据时可能返回 null
fn into_list(value: OwnedValue) -> Vec<OwnedValue> {
    value.as_array().cloned().unwrap_or_default()
}

pub fn avatar_url(user_id: i64) -> String {
    format!("https://q1.qlogo.cn/g?b=qq&nk={}&s=640", user_id)
}

pub fn group_avatar_url(group_id: i64) -> String {
    format!("https://p.qlogo.cn/gh/{0}/{0}/640/", group_id)
}

// ================= API 定义 =================

// --- get_login_info ---

#[derive(Serialize)]
struct EmptyParams {}

#[derive(Debug, Deserialize)]
pub struct LoginInfo {
    pub user_id: i64,
    pub nickname: String,
}

pub async fn get_login_info(ctx: &Context, writer: LockedWriter) -> Result<LoginInfo, ApiError> {
    call_action(ctx, writer, "get_login_info", EmptyParams {}).await
}

// --- get_stranger_info ---

#[derive(Serialize)]
struct UserParams {
    user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    no_cache: Option<bool>,
}

/// 返回原始记录，字段随协议实现不同，交由转换层统一
pub async fn get_stranger_info(
    ctx: &Context,
    writer: LockedWriter,
    user_id: i64,
) -> Result<OwnedValue, ApiError> {
    let params = UserParams {
        user_id,
        no_cache: Some(true),
    };
    call_action(ctx, writer, "get_stranger_info", params).await
}

// --- nc_get_user_status (NapCat 扩展) ---

pub async fn nc_get_user_status(
    ctx: &Context,
    writer: LockedWriter,
    user_id: i64,
) -> Result<OwnedValue, ApiError> {
    let params = UserParams {
        user_id,
        no_cache: None,
    };
    call_action(ctx, writer, "nc_get_user_status", params).await
}

// --- get_group_member_info ---

#[derive(Serialize)]
struct GroupMemberParams {
    group_id: i64,
    user_id: i64,
    no_cache: bool,
}

pub async fn get_group_member_info(
    ctx: &Context,
    writer: LockedWriter,
    group_id: i64,
    user_id: i64,
) -> Result<OwnedValue, ApiError> {
    let params = GroupMemberParams {
        group_id,
        user_id,
        no_cache: true,
    };
    call_action(ctx, writer, "get_group_member_info", params).await
}

// --- group 级查询 ---

#[derive(Serialize)]
struct GroupParams {
    group_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    no_cache: Option<bool>,
}

pub async fn get_group_info(
    ctx: &Context,
    writer: LockedWriter,
    group_id: i64,
) -> Result<OwnedValue, ApiError> {
    let params = GroupParams {
        group_id,
        no_cache: Some(true),
    };
    call_action(ctx, writer, "get_group_info", params).await
}

pub async fn get_group_member_list(
    ctx: &Context,
    writer: LockedWriter,
    group_id: i64,
) -> Result<Vec<OwnedValue>, ApiError> {
    let params = GroupParams {
        group_id,
        no_cache: Some(true),
    };
    let data: OwnedValue = call_action(ctx, writer, "get_group_member_list", params).await?;
    Ok(into_list(data))
}

pub async fn get_essence_msg_list(
    ctx: &Context,
    writer: LockedWriter,
    group_id: i64,
) -> Result<Vec<OwnedValue>, ApiError> {
    let params = GroupParams {
        group_id,
        no_cache: None,
    };
    let data: OwnedValue = call_action(ctx, writer, "get_essence_msg_list", params).await?;
    Ok(into_list(data))
}

/// go-cqhttp 扩展接口 `_get_group_notice`
pub async fn get_group_notice(
    ctx: &Context,
    writer: LockedWriter,
    group_id: i64,
) -> Result<Vec<OwnedValue>, ApiError> {
    let params = GroupParams {
        group_id,
        no_cache: None,
    };
    let data: OwnedValue = call_action(ctx, writer, "_get_group_notice", params).await?;
    Ok(into_list(data))
}

// --- delete_msg ---

#[derive(Serialize)]
struct DeleteMsgParams {
    message_id: i64,
}

pub async fn delete_msg(
    ctx: &Context,
    writer: LockedWriter,
    message_id: i64,
) -> Result<(), ApiError> {
    call_action_no_wait(ctx, writer, "delete_msg", DeleteMsgParams { message_id }).await
}

// --- send_forward_msg (group/private) ---

#[derive(Serialize)]
struct SendForwardMsgParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    group_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<i64>,
    messages: Message,
}

pub async fn send_forward_msg(
    ctx: &Context,
    writer: LockedWriter,
    group_id: Option<i64>,
    user_id: Option<i64>,
    messages: Message,
) -> Result<OwnedValue, ApiError> {
    let action = if group_id.is_some() {
        "send_group_forward_msg"
    } else {
        "send_private_forward_msg"
    };

    let params = SendForwardMsgParams {
        group_id,
        user_id,
        messages,
    };

    call_action(ctx, writer, action, params).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use simd_json::json;

    #[test]
    fn test_check_response_ok() {
        let resp = json!({"status": "ok", "retcode": 0, "data": {"message_id": 7}, "echo": "x"});
        let data = check_response(resp).unwrap();
        assert_eq!(data.get_i64("message_id"), Some(7));
    }

    #[test]
    fn test_check_response_failure_message() {
        let resp = json!({"status": "failed", "retcode": 1200, "wording": "不是群成员"});
        let err = check_response(resp).unwrap_err();
        assert!(err.to_string().contains("retcode=1200"));
        assert!(err.to_string().contains("不是群成员"));
    }

    #[test]
    fn test_null_list_is_empty() {
        assert!(into_list(OwnedValue::from(())).is_empty());
        assert_eq!(into_list(json!([1, 2])).len(), 2);
    }

    #[test]
    fn test_avatar_urls() {
        assert_eq!(avatar_url(10001), "https://q1.qlogo.cn/g?b=qq&nk=10001&s=640");
        assert_eq!(group_avatar_url(42), "https://p.qlogo.cn/gh/42/42/640/");
    }
}
