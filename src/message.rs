use serde::Serialize;
use simd_json::owned::{Object, Value};

/// 消息段 (Segment)
#[derive(Debug, Serialize, Clone)]
pub struct Segment {
    #[serde(rename = "type")]
    pub type_: String,
    pub data: Object,
}

impl Segment {
    pub fn new(type_: &str, data: Object) -> Self {
        Self {
            type_: type_.to_string(),
            data,
        }
    }

    fn into_value(self) -> Value {
        let mut seg_obj = Object::new();
        seg_obj.insert("type".into(), Value::from(self.type_));
        seg_obj.insert("data".into(), Value::from(self.data));
        Value::from(seg_obj)
    }
}

/// 消息链 (Message Chain)
#[derive(Debug, Serialize, Clone, Default)]
pub struct Message(Vec<Segment>);

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, type_: &str, data: Object) -> Self {
        self.0.push(Segment::new(type_, data));
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 纯文本
    pub fn text(self, text: impl Into<String>) -> Self {
        let mut data = Object::new();
        data.insert("text".into(), Value::from(text.into()));
        self.add("text", data)
    }

    /// 图片
    /// - `file`: URL、`base64://` 数据或文件路径
    pub fn image(self, file: impl Into<String>) -> Self {
        let mut data = Object::new();
        data.insert("file".into(), Value::from(file.into()));
        self.add("image", data)
    }

    /// @某人
    pub fn at(self, user_id: impl ToString) -> Self {
        let mut data = Object::new();
        data.insert("qq".into(), Value::from(user_id.to_string()));
        self.add("at", data)
    }

    /// 回复消息
    pub fn reply(self, message_id: impl ToString) -> Self {
        let mut data = Object::new();
        data.insert("id".into(), Value::from(message_id.to_string()));
        self.add("reply", data)
    }

    /// 转发消息节点 - 自定义内容
    /// - `user_id`: 发送者 QQ
    /// - `nickname`: 发送者昵称
    /// - `content`: 消息内容 (Message 链)
    pub fn node_custom(
        self,
        user_id: impl ToString,
        nickname: impl Into<String>,
        content: Message,
    ) -> Self {
        let mut data = Object::new();
        data.insert("user_id".into(), Value::from(user_id.to_string()));
        data.insert("nickname".into(), Value::from(nickname.into()));

        let content_array: Vec<Value> = content.0.into_iter().map(Segment::into_value).collect();
        data.insert("content".into(), Value::from(content_array));

        self.add("node", data)
    }
}

impl From<&str> for Message {
    fn from(s: &str) -> Self {
        Message::new().text(s)
    }
}

impl From<String> for Message {
    fn from(s: String) -> Self {
        Message::new().text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simd_json::base::ValueAsArray;
    use simd_json::derived::{ValueObjectAccess, ValueObjectAccessAsScalar};

    #[test]
    fn test_builder_serializes_onebot_segments() {
        let msg = Message::new().reply(42).text("hi").at(10001);
        let json = simd_json::to_string(&msg).unwrap();
        let mut bytes = json.into_bytes();
        let val = simd_json::to_owned_value(&mut bytes).unwrap();
        let arr = val.as_array().unwrap();
        assert_eq!(arr.len(), 3);
        assert_eq!(arr[0].get_str("type"), Some("reply"));
        assert_eq!(arr[0].get("data").and_then(|d| d.get_str("id")), Some("42"));
        assert_eq!(arr[2].get("data").and_then(|d| d.get_str("qq")), Some("10001"));
    }

    #[test]
    fn test_node_custom_embeds_content() {
        let msg = Message::new().node_custom(10001, "Bot", Message::from("第一条"));
        let node = &msg.segments()[0];
        assert_eq!(node.type_, "node");
        let content = node.data.get("content").and_then(|c| c.as_array()).unwrap();
        assert_eq!(content.len(), 1);
        assert_eq!(content[0].get_str("type"), Some("text"));
    }
}
