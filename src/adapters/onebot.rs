use crate::config::{AppConfig, BotConfig};
use crate::event::{BotStatus, Context, Event, EventType, LoginUser, SendPacket};
use crate::matcher::Matcher;
use crate::plugins;
use futures_util::future::BoxFuture;
use futures_util::{Sink, SinkExt, StreamExt};
use http::HeaderValue;
use serde::Serialize;
use simd_json::derived::ValueObjectAccessAsScalar;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{client::IntoClientRequest, protocol::Message as WsMessage},
};

pub mod api;

pub type BotError = Box<dyn std::error::Error + Send + Sync>;

pub type TraitSink =
    Box<dyn Sink<WsMessage, Error = tokio_tungstenite::tungstenite::Error> + Send + Unpin>;
pub type LockedWriter = Arc<AsyncMutex<TraitSink>>;

#[derive(Serialize)]
struct SendParamsInner<T> {
    message_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    group_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<i64>,
    message: T,
}

/// 适配器入口函数
pub fn entry(
    bot_config: BotConfig,
    global_config: Arc<RwLock<AppConfig>>,
    config_path: String,
) -> BoxFuture<'static, ()> {
    Box::pin(async move { run_bot_loop(bot_config, global_config, config_path).await })
}

/// OneBot 协议的主循环，断线后 3 秒重连
pub async fn run_bot_loop(
    bot_config: BotConfig,
    global_config: Arc<RwLock<AppConfig>>,
    config_path: String,
) {
    let bot_url = bot_config
        .url
        .clone()
        .unwrap_or_else(|| "Unknown".to_string());
    loop {
        match connect_and_listen(&bot_config, global_config.clone(), config_path.clone()).await {
            Ok(()) => warn!(target: "Bot", "Bot [{}] 连接断开，3秒后重连...", bot_url),
            Err(e) => {
                error!(target: "Bot", "Bot [{}] 连接失败: {}。3秒后重试...", bot_url, e)
            }
        }
        tokio::time::sleep(Duration::from_secs(3)).await;
    }
}

async fn connect_and_listen(
    config: &BotConfig,
    global_config: Arc<RwLock<AppConfig>>,
    config_path: String,
) -> Result<(), BotError> {
    let url = config
        .url
        .as_deref()
        .ok_or_else(|| BotError::from("OneBot URL 未配置"))?;

    let mut request = url.into_client_request()?;

    if let Some(token) = &config.access_token
        && !token.is_empty()
    {
        let token_header = format!("Bearer {}", token);
        request
            .headers_mut()
            .insert("Authorization", HeaderValue::from_str(&token_header)?);
    }

    let (ws_stream, _) = connect_async(request).await?;
    info!(target: "Bot", "Bot [{}] 连接成功！(OneBot)", url);

    let (write_half, mut read_half) = ws_stream.split();

    let writer: LockedWriter = Arc::new(AsyncMutex::new(Box::new(write_half)));
    let matcher = Arc::new(Matcher::new());

    let bot_status = Arc::new(RwLock::new(BotStatus {
        adapter: "onebot".to_string(),
        platform: "qq".to_string(),
        login_user: LoginUser {
            id: "0".to_string(),
            ..Default::default()
        },
    }));

    // 后台获取登录信息，不阻塞事件读取
    {
        let status_ref = bot_status.clone();
        let ctx = Context {
            event: EventType::Init,
            config: global_config.clone(),
            matcher: matcher.clone(),
            config_path: config_path.clone(),
            bot: snapshot(&bot_status),
        };
        let writer_ref = writer.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;

            match api::get_login_info(&ctx, writer_ref).await {
                Ok(login) => {
                    if let Ok(mut guard) = status_ref.write() {
                        guard.login_user.id = login.user_id.to_string();
                        guard.login_user.name = Some(login.nickname.clone());
                        guard.login_user.nick = Some(login.nickname.clone());
                        guard.login_user.avatar = Some(api::avatar_url(login.user_id));
                    }
                    info!(target: "Bot", "已获取登录信息: {} ({})", login.nickname, login.user_id);
                }
                Err(e) => {
                    warn!(target: "Bot", "获取登录信息失败: {}", e);
                }
            }
        });
    }

    while let Some(message) = read_half.next().await {
        match message {
            Ok(WsMessage::Text(text)) => {
                let mut data = text.as_bytes().to_vec();

                let writer = writer.clone();
                let config = global_config.clone();
                let config_path = config_path.clone();
                let matcher = matcher.clone();
                let bot = snapshot(&bot_status);

                tokio::spawn(async move {
                    if let Err(e) =
                        process_frame(&mut data, writer, config, config_path, matcher, bot).await
                    {
                        error!(target: "Bot", "事件处理出错: {}", e);
                    }
                });
            }
            Ok(WsMessage::Close(_)) => return Ok(()),
            Err(e) => return Err(Box::new(e)),
            _ => {}
        }
    }
    Ok(())
}

fn snapshot(status: &RwLock<BotStatus>) -> BotStatus {
    status.read().map(|s| s.clone()).unwrap_or_default()
}

pub async fn process_frame(
    data: &mut [u8],
    writer: LockedWriter,
    config: Arc<RwLock<AppConfig>>,
    config_path: String,
    matcher: Arc<Matcher>,
    bot: BotStatus,
) -> Result<(), BotError> {
    let event: Event = match simd_json::to_owned_value(data) {
        Ok(v) => v,
        Err(_) => return Ok(()),
    };

    // API 响应交给等待者，其余事件进入插件流水线
    let event = match matcher.dispatch(event).await {
        Some(e) => e,
        None => return Ok(()),
    };

    let ctx = Context {
        event: EventType::Onebot(event),
        config,
        matcher,
        config_path,
        bot,
    };

    plugins::run(ctx, writer).await?;
    Ok(())
}

/// 经由插件流水线 (BeforeSend) 发送消息，返回协议端分配的 message_id
pub async fn send_msg<M>(
    ctx: &Context,
    writer: LockedWriter,
    group_id: Option<i64>,
    user_id: Option<i64>,
    message: M,
) -> Result<Option<i64>, BotError>
where
    M: Serialize,
{
    let (msg_type, target_group, target_user) = if let Some(gid) = group_id.filter(|&id| id != 0)
    {
        ("group", Some(gid), None)
    } else if let Some(uid) = user_id.filter(|&id| id != 0) {
        ("private", None, Some(uid))
    } else {
        return Ok(None);
    };

    let params = SendParamsInner {
        message_type: msg_type,
        group_id: target_group,
        user_id: target_user,
        message,
    };

    let json_str = simd_json::to_string(&params)?;
    let mut json_bytes = json_str.into_bytes();
    let params_val =
        simd_json::to_owned_value(&mut json_bytes).map_err(|e| Box::new(e) as BotError)?;

    let original_event = match &ctx.event {
        EventType::Onebot(ev) => Some(ev.clone()),
        EventType::BeforeSend(pkt) => pkt.original_event.clone(),
        EventType::Init => None,
    };

    let packet = SendPacket {
        action: "send_msg".to_string(),
        params: params_val,
        original_event,
    };

    let resp = plugins::run(ctx.with_event(EventType::BeforeSend(packet)), writer).await?;
    Ok(resp.and_then(|data| {
        data.get_i64("message_id")
            .or_else(|| data.get_u64("message_id").map(|v| v as i64))
    }))
}

pub async fn send_frame_raw(writer: LockedWriter, json_str: String) -> Result<(), BotError> {
    let mut guard = writer.lock().await;
    guard.send(WsMessage::Text(json_str.into())).await?;
    Ok(())
}
