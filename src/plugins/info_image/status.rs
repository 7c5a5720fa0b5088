/// NapCat 在线状态表：(主状态码, 扩展状态码) -> 名称
const NAPCAT_STATUS_TABLE: &[((i64, i64), &str)] = &[
    ((10, 0), "在线"),
    ((60, 0), "Q我吧"),
    ((30, 0), "离开"),
    ((50, 0), "忙碌"),
    ((70, 0), "请勿打扰"),
    ((40, 0), "隐身"),
    ((10, 1028), "听歌中"),
    ((10, 2037), "春日限定"),
    ((10, 2025), "一起元梦"),
    ((10, 2026), "求星搭子"),
    ((10, 2014), "被掏空"),
    ((10, 1030), "今日天气"),
    ((10, 2019), "我crash了"),
    ((10, 2006), "爱你"),
    ((10, 1051), "恋爱中"),
    ((10, 1071), "好运锦鲤"),
    ((10, 1201), "水逆退散"),
    ((10, 1056), "嗨到飞起"),
    ((10, 1058), "元气满满"),
    ((10, 1070), "宝宝认证"),
    ((10, 1063), "一言难尽"),
    ((10, 2001), "难得糊涂"),
    ((10, 1401), "emo中"),
    ((10, 1062), "我太难了"),
    ((10, 2013), "我想开了"),
    ((10, 1052), "我没事"),
    ((10, 1061), "想静静"),
    ((10, 1059), "悠哉哉"),
    ((10, 2015), "去旅行"),
    ((10, 1011), "信号弱"),
    ((10, 2003), "出去浪"),
    ((10, 2012), "肝作业"),
    ((10, 1018), "学习中"),
    ((10, 2023), "搬砖中"),
    ((10, 1300), "摸鱼中"),
    ((10, 1060), "无聊中"),
    ((10, 1027), "timi中"),
    ((10, 1016), "睡觉中"),
    ((10, 1032), "熬夜中"),
    ((10, 1021), "追剧中"),
];

pub const UNKNOWN_STATUS: &str = "未知状态";

/// 精确匹配状态码，未收录的组合返回 "未知状态"
pub fn status_label(status: i64, ext_status: i64) -> &'static str {
    NAPCAT_STATUS_TABLE
        .iter()
        .find(|(key, _)| *key == (status, ext_status))
        .map(|(_, label)| *label)
        .unwrap_or(UNKNOWN_STATUS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_known_codes() {
        assert_eq!(status_label(10, 0), "在线");
        assert_eq!(status_label(30, 0), "离开");
        assert_eq!(status_label(10, 1028), "听歌中");
        assert_eq!(status_label(10, 1021), "追剧中");
    }

    #[test]
    fn test_unmapped_codes() {
        assert_eq!(status_label(99, 99), UNKNOWN_STATUS);
        assert_eq!(status_label(0, 0), UNKNOWN_STATUS);
        assert_eq!(status_label(-1, 1028), UNKNOWN_STATUS);
    }

    #[test]
    fn test_table_has_unique_keys() {
        let keys: HashSet<_> = NAPCAT_STATUS_TABLE.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys.len(), NAPCAT_STATUS_TABLE.len());
        assert_eq!(NAPCAT_STATUS_TABLE.len(), 40);
    }
}
