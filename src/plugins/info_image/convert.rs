//! 原始记录 -> 统一记录
//!
//! 取值规则：按候选键顺序取第一个 "真值" (非空字符串、非零数字、true、数组/对象)，
//! 以字符串给出的数字会被转换。方言自身的拼写优先，其次是另一方言的别名。

use super::model::{
    Dialect, ExtendedProfile, PresenceStatus, UnifiedAdminInfo, UnifiedContextInfo,
    UnifiedUserInfo,
};
use super::status::status_label;
use simd_json::owned::Object;
use simd_json::{OwnedValue, StaticNode};

// ================== 取值工具 ==================

fn truthy(v: &OwnedValue) -> bool {
    match v {
        OwnedValue::Static(StaticNode::Null) => false,
        OwnedValue::Static(StaticNode::Bool(b)) => *b,
        OwnedValue::Static(StaticNode::I64(n)) => *n != 0,
        OwnedValue::Static(StaticNode::U64(n)) => *n != 0,
        OwnedValue::Static(StaticNode::F64(f)) => *f != 0.0 && !f.is_nan(),
        OwnedValue::String(s) => !s.is_empty(),
        OwnedValue::Array(_) | OwnedValue::Object(_) => true,
    }
}

pub(super) fn field<'a>(raw: &'a OwnedValue, key: &str) -> Option<&'a OwnedValue> {
    match raw {
        OwnedValue::Object(obj) => obj.get(key),
        _ => None,
    }
}

fn pick<'a>(raw: &'a OwnedValue, keys: &[&str]) -> Option<&'a OwnedValue> {
    keys.iter()
        .filter_map(|k| field(raw, k))
        .find(|v| truthy(v))
}

fn to_text(v: &OwnedValue) -> String {
    match v {
        OwnedValue::String(s) => s.to_string(),
        OwnedValue::Static(StaticNode::I64(n)) => n.to_string(),
        OwnedValue::Static(StaticNode::U64(n)) => n.to_string(),
        OwnedValue::Static(StaticNode::F64(f)) => f.to_string(),
        OwnedValue::Static(StaticNode::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn to_int(v: &OwnedValue) -> i64 {
    match v {
        OwnedValue::Static(StaticNode::I64(n)) => *n,
        OwnedValue::Static(StaticNode::U64(n)) => i64::try_from(*n).unwrap_or(i64::MAX),
        OwnedValue::Static(StaticNode::F64(f)) => *f as i64,
        OwnedValue::Static(StaticNode::Bool(b)) => *b as i64,
        OwnedValue::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

pub(super) fn text(raw: &OwnedValue, keys: &[&str]) -> String {
    pick(raw, keys).map(to_text).unwrap_or_default()
}

fn text_or(raw: &OwnedValue, keys: &[&str], default: &str) -> String {
    let s = text(raw, keys);
    if s.is_empty() { default.to_string() } else { s }
}

pub(super) fn int(raw: &OwnedValue, keys: &[&str]) -> i64 {
    pick(raw, keys).map(to_int).unwrap_or(0)
}

/// 秒级时间戳转毫秒
fn secs_to_ms(raw: &OwnedValue, keys: &[&str]) -> i64 {
    int(raw, keys).saturating_mul(1000)
}

fn flag(raw: &OwnedValue, keys: &[&str]) -> bool {
    match pick(raw, keys) {
        Some(OwnedValue::String(s)) => matches!(s.as_str(), "true" | "1"),
        Some(_) => true,
        None => false,
    }
}

fn list(raw: &OwnedValue, key: &str) -> Vec<OwnedValue> {
    match field(raw, key) {
        Some(OwnedValue::Array(arr)) => arr.iter().cloned().collect(),
        _ => Vec::new(),
    }
}

fn text_list(raw: &OwnedValue, key: &str) -> Vec<String> {
    list(raw, key)
        .iter()
        .map(to_text)
        .filter(|s| !s.is_empty())
        .collect()
}

// ================== 用户信息 ==================

pub fn convert_user_info(raw: &OwnedValue, dialect: Dialect) -> UnifiedUserInfo {
    match dialect {
        Dialect::Lagrange => lagrange_user(raw),
        Dialect::NapCat => napcat_user(raw),
    }
}

fn base_user(raw: &OwnedValue) -> UnifiedUserInfo {
    UnifiedUserInfo {
        user_id: text(raw, &["user_id", "userId"]),
        nickname: text(raw, &["nickname"]),
        sex: text_or(raw, &["sex"], "unknown"),
        age: int(raw, &["age"]),
        avatar: text(raw, &["avatar"]),
        ..Default::default()
    }
}

fn lagrange_user(raw: &OwnedValue) -> UnifiedUserInfo {
    UnifiedUserInfo {
        card: text(raw, &["card"]),
        level: text_or(raw, &["level"], "0"),
        role: text_or(raw, &["role"], "member"),
        join_time: secs_to_ms(raw, &["join_time"]),
        last_sent_time: secs_to_ms(raw, &["last_sent_time"]),
        title: text(raw, &["title"]),
        title_expire_time: int(raw, &["title_expire_time"]),
        unfriendly: flag(raw, &["unfriendly"]),
        card_changeable: flag(raw, &["card_changeable"]),
        group_level: text_or(raw, &["group_level", "level"], "0"),
        sign: text(raw, &["sign", "long_nick", "longNick"]),
        qid: text(raw, &["q_id", "qid"]),
        // Lagrange 的注册时间已是毫秒
        register_time: int(raw, &["RegisterTime"]),
        business: list(raw, "Business"),
        status: lagrange_presence(raw),
        extended: None,
        ..base_user(raw)
    }
}

fn napcat_user(raw: &OwnedValue) -> UnifiedUserInfo {
    let extended = ExtendedProfile {
        uid: text(raw, &["uid"]),
        uin: text(raw, &["uin"]),
        nick: text(raw, &["nick"]),
        remark: text(raw, &["remark"]),
        long_nick: text(raw, &["longNick", "long_nick"]),
        qq_level: int(raw, &["qq_level", "qqLevel"]),
        is_robot: flag(raw, &["is_robot"]),
        shut_up_timestamp: int(raw, &["shut_up_timestamp"]),
        constellation: int(raw, &["constellation"]),
        shengxiao: int(raw, &["shengXiao"]),
        blood_type: int(raw, &["kBloodType"]),
        home_town: text(raw, &["homeTown"]),
        make_friend_career: int(raw, &["makeFriendCareer"]),
        pos: text(raw, &["pos"]),
        college: text(raw, &["college"]),
        country: text(raw, &["country"]),
        province: text(raw, &["province"]),
        city: text(raw, &["city"]),
        post_code: text(raw, &["postCode"]),
        address: text(raw, &["address"]),
        interest: text(raw, &["interest"]),
        labels: text_list(raw, "labels"),
        birthday_year: int(raw, &["birthday_year"]),
        birthday_month: int(raw, &["birthday_month"]),
        birthday_day: int(raw, &["birthday_day"]),
        email: text(raw, &["eMail", "email"]),
        phone_num: text(raw, &["phoneNum", "phone"]),
        is_vip: flag(raw, &["is_vip"]),
        is_years_vip: flag(raw, &["is_years_vip"]),
        vip_level: int(raw, &["vip_level"]),
        login_days: int(raw, &["login_days"]),
    };

    UnifiedUserInfo {
        card: text(raw, &["card"]),
        level: text_or(raw, &["level"], "0"),
        role: text_or(raw, &["role"], "member"),
        join_time: secs_to_ms(raw, &["join_time"]),
        last_sent_time: secs_to_ms(raw, &["last_sent_time"]),
        title: text(raw, &["title"]),
        title_expire_time: int(raw, &["title_expire_time"]),
        unfriendly: flag(raw, &["unfriendly"]),
        card_changeable: flag(raw, &["card_changeable"]),
        group_level: text_or(raw, &["group_level", "level"], "0"),
        sign: text(raw, &["sign", "longNick", "long_nick"]),
        qid: text(raw, &["qid", "q_id"]),
        // NapCat 的 reg_time 为秒
        register_time: secs_to_ms(raw, &["reg_time"]),
        business: Vec::new(),
        status: napcat_presence(raw),
        extended: Some(extended),
        ..base_user(raw)
    }
}

/// Lagrange 的 status 为 { status_id, face_id, message }，仅在有文字时保留
fn lagrange_presence(raw: &OwnedValue) -> Option<PresenceStatus> {
    let obj = field(raw, "status").filter(|v| matches!(v, OwnedValue::Object(_)))?;
    let label = text(obj, &["message"]);
    if label.is_empty() {
        return None;
    }
    Some(PresenceStatus {
        status: int(obj, &["status_id", "status"]),
        ext_status: int(obj, &["face_id", "ext_status"]),
        label,
    })
}

/// NapCat 的 status 可能是 nc_get_user_status 返回的对象，也可能是数字配合 extStatus
fn napcat_presence(raw: &OwnedValue) -> Option<PresenceStatus> {
    let (status, ext_status) = match field(raw, "status") {
        Some(obj @ OwnedValue::Object(_)) => (
            int(obj, &["status"]),
            int(obj, &["ext_status", "extStatus"]),
        ),
        Some(v) if truthy(v) => (to_int(v), int(raw, &["extStatus", "ext_status"])),
        _ => return None,
    };
    if status == 0 {
        return None;
    }
    Some(PresenceStatus {
        status,
        ext_status,
        label: status_label(status, ext_status).to_string(),
    })
}

// ================== 管理员信息 ==================

pub fn convert_admin_info(raw: &OwnedValue, dialect: Dialect) -> UnifiedAdminInfo {
    let base = UnifiedAdminInfo {
        user_id: int(raw, &["user_id", "userId"]),
        nickname: text(raw, &["nickname"]),
        role: text_or(raw, &["role"], "admin"),
        avatar: text(raw, &["avatar"]),
        card: text(raw, &["card"]),
        age: int(raw, &["age"]),
        area: text(raw, &["area"]),
        level: text_or(raw, &["level"], "0"),
        join_time: secs_to_ms(raw, &["join_time"]),
        last_sent_time: secs_to_ms(raw, &["last_sent_time"]),
        title: text(raw, &["title"]),
        title_expire_time: int(raw, &["title_expire_time"]),
        unfriendly: flag(raw, &["unfriendly"]),
        card_changeable: flag(raw, &["card_changeable"]),
        ..Default::default()
    };

    match dialect {
        Dialect::Lagrange => UnifiedAdminInfo {
            sex: text(raw, &["sex"]),
            ..base
        },
        Dialect::NapCat => UnifiedAdminInfo {
            sex: text_or(raw, &["sex"], "unknown"),
            qq_level: Some(int(raw, &["qq_level"])),
            is_robot: Some(flag(raw, &["is_robot"])),
            shut_up_timestamp: Some(int(raw, &["shut_up_timestamp"])),
            ..base
        },
    }
}

// ================== 会话信息 ==================

/// 两种方言的群信息格式一致，无需区分
pub fn convert_context_info(raw: &OwnedValue) -> UnifiedContextInfo {
    let is_group = match field(raw, "is_group").or_else(|| field(raw, "isGroup")) {
        Some(OwnedValue::Static(StaticNode::Bool(b))) => *b,
        _ => true,
    };
    UnifiedContextInfo {
        is_group,
        group_id: int(raw, &["group_id", "groupId"]),
        group_name: text_or(raw, &["group_name", "groupName", "GroupName"], "未知群聊"),
        member_count: int(raw, &["member_count", "memberCount"]),
        max_member_count: int(raw, &["max_member_count", "maxMemberCount"]),
        group_avatar_url: text(raw, &["group_avatar_url", "groupAvatarUrl"]),
    }
}

/// 私聊会话
pub fn private_context() -> UnifiedContextInfo {
    UnifiedContextInfo {
        is_group: false,
        ..Default::default()
    }
}

// ================== 群成员 + 陌生人信息合并 ==================

fn set_or_remove(obj: &mut Object, key: &str, value: Option<&OwnedValue>) {
    match value {
        Some(v) => {
            obj.insert(key.to_string(), v.clone());
        }
        None => {
            obj.remove(key);
        }
    }
}

/// 以群成员信息为底，陌生人信息覆盖；年龄/等级/性别取陌生人信息，
/// 群相关字段取群成员信息，群等级取群成员的 level
pub fn merge_member_and_stranger(
    member: &OwnedValue,
    stranger: &OwnedValue,
    avatar: &str,
) -> OwnedValue {
    let mut merged = Object::new();
    for source in [member, stranger] {
        if let OwnedValue::Object(obj) = source {
            for (k, v) in obj.iter() {
                merged.insert(k.clone(), v.clone());
            }
        }
    }

    for key in ["age", "level", "sex"] {
        set_or_remove(&mut merged, key, field(stranger, key));
    }
    for key in ["card", "role", "join_time", "last_sent_time", "title"] {
        set_or_remove(&mut merged, key, field(member, key));
    }
    set_or_remove(&mut merged, "group_level", field(member, "level"));
    merged.insert("avatar".to_string(), OwnedValue::from(avatar));

    OwnedValue::from(merged)
}

/// 私聊或直接查询：仅陌生人信息，补上头像
pub fn with_avatar(stranger: &OwnedValue, avatar: &str) -> OwnedValue {
    let mut obj = match stranger {
        OwnedValue::Object(obj) => (**obj).clone(),
        _ => Object::new(),
    };
    obj.insert("avatar".to_string(), OwnedValue::from(avatar));
    OwnedValue::from(obj)
}

/// 将 nc_get_user_status 的结果挂到原始记录的 status 字段
pub fn attach_status(raw: OwnedValue, status: OwnedValue) -> OwnedValue {
    match raw {
        OwnedValue::Object(mut obj) => {
            obj.insert("status".to_string(), status);
            OwnedValue::Object(obj)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simd_json::json;

    #[test]
    fn test_lagrange_missing_fields_use_defaults() {
        let user = convert_user_info(&json!({}), Dialect::Lagrange);
        assert_eq!(user.user_id, "");
        assert_eq!(user.nickname, "");
        assert_eq!(user.sex, "unknown");
        assert_eq!(user.age, 0);
        assert_eq!(user.card, "");
        assert_eq!(user.level, "0");
        assert_eq!(user.role, "member");
        assert_eq!(user.join_time, 0);
        assert_eq!(user.group_level, "0");
        assert!(!user.unfriendly);
        assert!(user.business.is_empty());
        assert!(user.status.is_none());
        assert!(user.extended.is_none());
    }

    #[test]
    fn test_lagrange_user_mapping() {
        let raw = json!({
            "user_id": 10001,
            "nickname": "Alice",
            "sex": "female",
            "age": 20,
            "card": null,
            "level": 5,
            "join_time": 1_600_000_000,
            "long_nick": "hello",
            "qid": "alice_q",
            "RegisterTime": 1_500_000_000_000_i64,
            "Business": [{"type": 1}],
            "status": {"status_id": 10, "face_id": 0, "message": "在线"}
        });
        let user = convert_user_info(&raw, Dialect::Lagrange);
        assert_eq!(user.user_id, "10001");
        assert_eq!(user.card, "");
        assert_eq!(user.level, "5");
        assert_eq!(user.group_level, "5");
        assert_eq!(user.join_time, 1_600_000_000_000);
        assert_eq!(user.sign, "hello");
        assert_eq!(user.qid, "alice_q");
        assert_eq!(user.register_time, 1_500_000_000_000);
        assert_eq!(user.business.len(), 1);
        assert_eq!(user.status.unwrap().label, "在线");
    }

    #[test]
    fn test_napcat_register_time_in_ms() {
        let raw = json!({"user_id": 1, "reg_time": 1_234_567_890});
        let user = convert_user_info(&raw, Dialect::NapCat);
        assert_eq!(user.register_time, 1_234_567_890_000);

        let raw = json!({"user_id": 1, "reg_time": "1234567890"});
        let user = convert_user_info(&raw, Dialect::NapCat);
        assert_eq!(user.register_time, 1_234_567_890_000);
    }

    #[test]
    fn test_napcat_extended_profile() {
        let raw = json!({
            "user_id": 20002,
            "nickname": "Bob",
            "qq_level": 64,
            "long_nick": "签名",
            "eMail": "bob@example.com",
            "phoneNum": "13800000000",
            "constellation": 3,
            "shengXiao": 5,
            "kBloodType": 1,
            "country": "中国",
            "city": "上海",
            "birthday_year": 2000,
            "birthday_month": 1,
            "birthday_day": 2,
            "is_vip": true,
            "vip_level": 7,
            "labels": ["a", "b"],
            "status": 10,
            "extStatus": 1028
        });
        let user = convert_user_info(&raw, Dialect::NapCat);
        assert_eq!(user.sign, "签名");
        let ext = user.extended.as_ref().unwrap();
        assert_eq!(ext.qq_level, 64);
        assert_eq!(ext.long_nick, "签名");
        assert_eq!(ext.email, "bob@example.com");
        assert_eq!(ext.constellation, 3);
        assert_eq!(ext.shengxiao, 5);
        assert_eq!(ext.blood_type, 1);
        assert!(ext.is_vip);
        assert!(!ext.is_years_vip);
        assert_eq!(ext.labels, vec!["a", "b"]);
        let status = user.status.unwrap();
        assert_eq!((status.status, status.ext_status), (10, 1028));
        assert_eq!(status.label, "听歌中");
    }

    #[test]
    fn test_napcat_status_object() {
        let raw = attach_status(
            json!({"user_id": 1}),
            json!({"status": 30, "ext_status": 0}),
        );
        let user = convert_user_info(&raw, Dialect::NapCat);
        assert_eq!(user.status.unwrap().label, "离开");

        let raw = attach_status(json!({"user_id": 1}), json!({"status": 99, "ext_status": 99}));
        let user = convert_user_info(&raw, Dialect::NapCat);
        assert_eq!(user.status.unwrap().label, "未知状态");
    }

    #[test]
    fn test_alias_priority_follows_dialect() {
        let raw = json!({"qid": "napcat_style", "q_id": "lagrange_style"});
        assert_eq!(convert_user_info(&raw, Dialect::Lagrange).qid, "lagrange_style");
        assert_eq!(convert_user_info(&raw, Dialect::NapCat).qid, "napcat_style");

        // 缺少自身拼写时回退到别名
        let raw = json!({"qid": "only_qid"});
        assert_eq!(convert_user_info(&raw, Dialect::Lagrange).qid, "only_qid");
        let raw = json!({"q_id": "only_q_id"});
        assert_eq!(convert_user_info(&raw, Dialect::NapCat).qid, "only_q_id");
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let raw = json!({"user_id": "3", "nickname": "C", "reg_time": 5, "labels": ["x"]});
        for dialect in [Dialect::Lagrange, Dialect::NapCat] {
            assert_eq!(
                convert_user_info(&raw, dialect),
                convert_user_info(&raw, dialect)
            );
        }
    }

    #[test]
    fn test_wrong_types_do_not_panic() {
        for raw in [
            json!(null),
            json!([1, 2, 3]),
            json!("text"),
            json!({"user_id": [1], "age": "abc", "join_time": {"x": 1}, "status": "busy"}),
        ] {
            let user = convert_user_info(&raw, Dialect::NapCat);
            assert_eq!(user.age, 0);
            let _ = convert_user_info(&raw, Dialect::Lagrange);
            let _ = convert_admin_info(&raw, Dialect::NapCat);
            let _ = convert_context_info(&raw);
        }
    }

    #[test]
    fn test_admin_times_in_ms_for_both_dialects() {
        let raw = json!({
            "user_id": 30003,
            "nickname": "Carol",
            "role": "owner",
            "join_time": 100,
            "last_sent_time": 200
        });
        for dialect in [Dialect::Lagrange, Dialect::NapCat] {
            let admin = convert_admin_info(&raw, dialect);
            assert_eq!(admin.user_id, 30003);
            assert_eq!(admin.join_time, 100_000);
            assert_eq!(admin.last_sent_time, 200_000);
            assert!(admin.is_owner());
        }
        let lagrange = convert_admin_info(&json!({}), Dialect::Lagrange);
        assert_eq!(lagrange.role, "admin");
        assert_eq!(lagrange.sex, "");
        assert!(lagrange.qq_level.is_none());
        let napcat = convert_admin_info(&json!({}), Dialect::NapCat);
        assert_eq!(napcat.sex, "unknown");
        assert_eq!(napcat.is_robot, Some(false));
    }

    #[test]
    fn test_context_defaults() {
        let ctx = convert_context_info(&json!({"group_id": 42}));
        assert!(ctx.is_group);
        assert_eq!(ctx.group_id, 42);
        assert_eq!(ctx.group_name, "未知群聊");
        assert_eq!(ctx.member_count, 0);

        let ctx = convert_context_info(&json!({"GroupName": "测试群", "member_count": 10}));
        assert_eq!(ctx.group_name, "测试群");
        assert_eq!(ctx.member_count, 10);
        assert!(!private_context().is_group);
    }

    #[test]
    fn test_merge_member_and_stranger() {
        let member = json!({
            "user_id": 1,
            "nickname": "member_nick",
            "card": "群名片",
            "role": "admin",
            "level": "42",
            "title": "头衔",
            "join_time": 10,
            "age": 99
        });
        let stranger = json!({
            "user_id": 1,
            "nickname": "stranger_nick",
            "sex": "male",
            "level": 7,
            "card": "should_be_replaced"
        });
        let merged = merge_member_and_stranger(&member, &stranger, "http://avatar");
        let user = convert_user_info(&merged, Dialect::Lagrange);
        assert_eq!(user.nickname, "stranger_nick");
        assert_eq!(user.card, "群名片");
        assert_eq!(user.role, "admin");
        assert_eq!(user.title, "头衔");
        assert_eq!(user.level, "7");
        assert_eq!(user.group_level, "42");
        // 陌生人信息缺少 age 时不沿用群成员的值
        assert_eq!(user.age, 0);
        assert_eq!(user.sex, "male");
        assert_eq!(user.join_time, 10_000);
        assert_eq!(user.avatar, "http://avatar");
    }
}
