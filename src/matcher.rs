use crate::event::Event;
use simd_json::derived::ValueObjectAccessAsScalar;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex as AsyncMutex, oneshot};

/// API 响应匹配器，按 echo 将响应帧投递给发起调用的等待者
pub struct Matcher {
    waiters: AsyncMutex<HashMap<String, oneshot::Sender<Event>>>,
    seq: AtomicU64,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher {
    pub fn new() -> Self {
        Self {
            waiters: AsyncMutex::new(HashMap::new()),
            seq: AtomicU64::new(0),
        }
    }

    /// 生成本连接内唯一的 echo
    pub fn next_echo(&self, action: &str) -> String {
        let n = self.seq.fetch_add(1, Ordering::Relaxed);
        format!("{}:{}", action, n)
    }

    /// 先登记等待者，再由调用方发送请求，避免响应早于登记到达
    pub async fn register(&self, echo: String) -> oneshot::Receiver<Event> {
        let (tx, rx) = oneshot::channel();
        self.waiters.lock().await.insert(echo, tx);
        rx
    }

    /// 等待已登记的响应，超时后清理等待者
    pub async fn wait_resp(
        &self,
        echo: &str,
        rx: oneshot::Receiver<Event>,
        timeout_duration: Duration,
    ) -> Option<Event> {
        match tokio::time::timeout(timeout_duration, rx).await {
            Ok(Ok(event)) => Some(event),
            _ => {
                self.waiters.lock().await.remove(echo);
                None
            }
        }
    }

    /// 尝试分发事件给等待者。如果事件被消费（匹配成功），返回 None；否则返回原事件。
    pub async fn dispatch(&self, event: Event) -> Option<Event> {
        let Some(echo) = event.get_str("echo") else {
            return Some(event);
        };

        let waiter = self.waiters.lock().await.remove(echo);
        match waiter {
            Some(sender) => {
                // 等待者可能已超时，忽略发送失败
                let _ = sender.send(event);
                None
            }
            None => Some(event),
        }
    }

    pub async fn pending(&self) -> usize {
        self.waiters.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simd_json::json;

    #[tokio::test]
    async fn test_dispatch_routes_by_echo() {
        let matcher = Matcher::new();
        let echo = matcher.next_echo("get_group_info");
        let rx = matcher.register(echo.clone()).await;

        let resp: Event = json!({"status": "ok", "retcode": 0, "echo": echo.clone()}).into();
        assert!(matcher.dispatch(resp).await.is_none());

        let got = matcher
            .wait_resp(&echo, rx, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(got.get_i64("retcode"), Some(0));
        assert_eq!(matcher.pending().await, 0);
    }

    #[tokio::test]
    async fn test_events_without_echo_pass_through() {
        let matcher = Matcher::new();
        let event: Event = json!({"post_type": "message", "user_id": 10001}).into();
        assert!(matcher.dispatch(event).await.is_some());

        let unknown: Event = json!({"echo": "nobody:0"}).into();
        assert!(matcher.dispatch(unknown).await.is_some());
    }

    #[tokio::test]
    async fn test_timeout_clears_waiter() {
        let matcher = Matcher::new();
        let echo = matcher.next_echo("delete_msg");
        let rx = matcher.register(echo.clone()).await;
        let got = matcher
            .wait_resp(&echo, rx, Duration::from_millis(10))
            .await;
        assert!(got.is_none());
        assert_eq!(matcher.pending().await, 0);
    }

    #[test]
    fn test_echo_is_unique() {
        let matcher = Matcher::new();
        assert_ne!(matcher.next_echo("a"), matcher.next_echo("a"));
    }
}
