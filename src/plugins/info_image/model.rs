use serde::{Deserialize, Serialize};
use simd_json::OwnedValue;

/// OneBot 协议实现方言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// 字段精简，注册时间为毫秒
    #[default]
    #[serde(alias = "Lagrange")]
    Lagrange,
    /// 字段冗长，附带资料/地址/VIP/生日/在线状态等扩展信息
    #[serde(alias = "NapCat")]
    NapCat,
}

impl Dialect {
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Lagrange => "Lagrange",
            Dialect::NapCat => "NapCat",
        }
    }
}

/// 在线状态 (NapCat 扩展)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceStatus {
    pub status: i64,
    pub ext_status: i64,
    pub label: String,
}

/// NapCat 独有的详细资料
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ExtendedProfile {
    pub uid: String,
    pub uin: String,
    pub nick: String,
    pub remark: String,
    pub long_nick: String,

    pub qq_level: i64,
    pub is_robot: bool,
    pub shut_up_timestamp: i64,

    /// 星座编号，1 为水瓶座
    pub constellation: i64,
    /// 生肖编号，1 为鼠
    pub shengxiao: i64,
    /// 血型编号，0 为 O 型
    pub blood_type: i64,

    pub home_town: String,
    pub make_friend_career: i64,
    pub pos: String,
    pub college: String,
    pub country: String,
    pub province: String,
    pub city: String,
    pub post_code: String,
    pub address: String,
    pub interest: String,
    pub labels: Vec<String>,

    pub birthday_year: i64,
    pub birthday_month: i64,
    pub birthday_day: i64,

    pub email: String,
    pub phone_num: String,

    pub is_vip: bool,
    pub is_years_vip: bool,
    pub vip_level: i64,
    pub login_days: i64,
}

/// 统一的用户信息
///
/// 身份字段总是有值 (缺省为空串或 0)；时间字段统一为毫秒。
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UnifiedUserInfo {
    pub user_id: String,
    pub nickname: String,
    pub sex: String,
    pub age: i64,
    pub avatar: String,

    // 群成员信息
    pub card: String,
    pub level: String,
    pub role: String,
    pub join_time: i64,
    pub last_sent_time: i64,
    pub title: String,
    pub title_expire_time: i64,
    pub unfriendly: bool,
    pub card_changeable: bool,
    pub group_level: String,

    // 资料
    pub sign: String,
    pub qid: String,
    pub register_time: i64,

    /// Lagrange 的业务标识列表，原样保留
    pub business: Vec<OwnedValue>,
    pub status: Option<PresenceStatus>,
    pub extended: Option<ExtendedProfile>,
}

impl UnifiedUserInfo {
    /// 优先显示 QQ 等级，其次等级字段
    pub fn display_level(&self) -> String {
        match &self.extended {
            Some(ext) if ext.qq_level > 0 => ext.qq_level.to_string(),
            _ => self.level.clone(),
        }
    }

    pub fn phone(&self) -> &str {
        self.extended
            .as_ref()
            .map(|e| e.phone_num.as_str())
            .unwrap_or("")
    }

    pub fn email(&self) -> &str {
        self.extended.as_ref().map(|e| e.email.as_str()).unwrap_or("")
    }
}

/// 统一的管理员信息，时间字段为毫秒
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UnifiedAdminInfo {
    pub user_id: i64,
    pub nickname: String,
    pub role: String,
    pub avatar: String,
    pub card: String,
    pub sex: String,
    pub age: i64,
    pub area: String,
    pub level: String,
    pub join_time: i64,
    pub last_sent_time: i64,
    pub title: String,
    pub title_expire_time: i64,
    pub unfriendly: bool,
    pub card_changeable: bool,
    pub qq_level: Option<i64>,
    pub is_robot: Option<bool>,
    pub shut_up_timestamp: Option<i64>,
}

impl UnifiedAdminInfo {
    /// 展示名称：群名片优先，否则昵称
    pub fn display_name(&self) -> &str {
        if self.card.is_empty() {
            &self.nickname
        } else {
            &self.card
        }
    }

    pub fn is_owner(&self) -> bool {
        self.role == "owner"
    }
}

/// 指令所在会话的信息
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UnifiedContextInfo {
    pub is_group: bool,
    pub group_id: i64,
    pub group_name: String,
    pub member_count: i64,
    pub max_member_count: i64,
    pub group_avatar_url: String,
}

pub fn sex_label(sex: &str) -> &'static str {
    match sex {
        "male" => "男",
        "female" => "女",
        _ => "未知",
    }
}

pub fn role_label(role: &str) -> &'static str {
    match role {
        "owner" => "群主",
        "admin" => "管理员",
        "member" => "成员",
        _ => "未知",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_display_name_falls_back_to_nickname() {
        let mut admin = UnifiedAdminInfo {
            nickname: "小明".into(),
            ..Default::default()
        };
        assert_eq!(admin.display_name(), "小明");
        admin.card = "明哥".into();
        assert_eq!(admin.display_name(), "明哥");
    }

    #[test]
    fn test_dialect_from_config_string() {
        #[derive(Deserialize)]
        struct Wrap {
            dialect: Dialect,
        }
        let w: Wrap = toml::from_str(r#"dialect = "napcat""#).unwrap();
        assert_eq!(w.dialect, Dialect::NapCat);
        let w: Wrap = toml::from_str(r#"dialect = "lagrange""#).unwrap();
        assert_eq!(w.dialect, Dialect::Lagrange);
        let w: Wrap = toml::from_str(r#"dialect = "NapCat""#).unwrap();
        assert_eq!(w.dialect, Dialect::NapCat);
    }

    #[test]
    fn test_display_level_prefers_qq_level() {
        let mut user = UnifiedUserInfo {
            level: "12".into(),
            ..Default::default()
        };
        assert_eq!(user.display_level(), "12");
        user.extended = Some(ExtendedProfile {
            qq_level: 64,
            ..Default::default()
        });
        assert_eq!(user.display_level(), "64");
    }
}
