use serde::{Deserialize, Serialize};

/// 卡片图片样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageStyle {
    #[serde(rename = "SOURCE_HAN_SERIF_SC")]
    SourceHanSerifSC,
    #[serde(rename = "LXGW_WENKAI")]
    LxgwWenKai,
    #[serde(rename = "FLAT_MINIMAL")]
    FlatMinimal,
}

impl ImageStyle {
    pub const ALL: [ImageStyle; 3] = [
        ImageStyle::SourceHanSerifSC,
        ImageStyle::LxgwWenKai,
        ImageStyle::FlatMinimal,
    ];

    /// 配置中使用的键名
    pub fn key(&self) -> &'static str {
        match self {
            ImageStyle::SourceHanSerifSC => "SOURCE_HAN_SERIF_SC",
            ImageStyle::LxgwWenKai => "LXGW_WENKAI",
            ImageStyle::FlatMinimal => "FLAT_MINIMAL",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ImageStyle::SourceHanSerifSC => "思源宋体SourceHanSerifSC",
            ImageStyle::LxgwWenKai => "落霞孤鹜文楷LXGWWenKai",
            ImageStyle::FlatMinimal => "扁平化简约FlatMinimal",
        }
    }

    /// CSS font-family，字体需已安装在渲染机上
    pub fn font_family(&self) -> &'static str {
        match self {
            ImageStyle::SourceHanSerifSC => {
                "'Source Han Serif SC', 'Noto Serif CJK SC', 'Songti SC', serif"
            }
            ImageStyle::LxgwWenKai => "'LXGW WenKai', 'LXGW WenKai Screen', 'KaiTi', cursive",
            ImageStyle::FlatMinimal => {
                "'PingFang SC', 'Microsoft YaHei', 'Noto Sans CJK SC', sans-serif"
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageStyleDetail {
    pub style_key: ImageStyle,
    pub dark_mode: bool,
}

/// 默认样式表：每种样式各有浅色与深色两项，第一项为默认样式
pub fn default_style_details() -> Vec<ImageStyleDetail> {
    ImageStyle::ALL
        .iter()
        .flat_map(|&style_key| {
            [false, true].map(|dark_mode| ImageStyleDetail {
                style_key,
                dark_mode,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    #[default]
    Png,
    Jpeg,
}

/// 按 `-i` 参数选择样式；未指定时使用第一项，样式表为空时回退到思源宋体浅色
pub fn select_style(
    details: &[ImageStyleDetail],
    index: Option<i64>,
    inspect_command: &str,
) -> Result<ImageStyleDetail, String> {
    let fallback = ImageStyleDetail {
        style_key: ImageStyle::SourceHanSerifSC,
        dark_mode: false,
    };

    let Some(idx) = index else {
        return Ok(details.first().copied().unwrap_or(fallback));
    };

    if idx >= 0
        && let Some(detail) = details.get(idx as usize)
    {
        return Ok(*detail);
    }

    Err([
        "图片样式索引不合法。".to_string(),
        format!(
            "\t 合法范围：[0, {}]双闭区间。",
            details.len() as i64 - 1
        ),
        format!("\t 当前输入：{}", idx),
        "\n".to_string(),
        format!("输入指令 {} 查看图片样式列表。", inspect_command),
    ]
    .join("\n"))
}

/// 查看图片样式指令的回复文本
pub fn style_list_text(details: &[ImageStyleDetail]) -> String {
    let mut msg = String::from("用户信息图片样式列表：\n");
    for (i, d) in details.iter().enumerate() {
        msg.push_str(&format!(
            "\t【{}】: {} {} ({})\n",
            i,
            d.style_key.display_name(),
            if d.dark_mode { "深色模式" } else { "浅色模式" },
            d.style_key.key()
        ));
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_details_cover_each_style_twice() {
        let details = default_style_details();
        assert_eq!(details.len(), 6);
        assert_eq!(details[0].style_key, ImageStyle::SourceHanSerifSC);
        assert!(!details[0].dark_mode);
        assert!(details[1].dark_mode);
        assert_eq!(details[5].style_key, ImageStyle::FlatMinimal);
    }

    #[test]
    fn test_select_style() {
        let details = default_style_details();
        assert_eq!(select_style(&details, None, "查看图片样式").unwrap(), details[0]);
        assert_eq!(select_style(&details, Some(3), "查看图片样式").unwrap(), details[3]);

        let err = select_style(&details, Some(6), "查看图片样式").unwrap_err();
        assert!(err.contains("[0, 5]"));
        assert!(err.contains("当前输入：6"));
        assert!(select_style(&details, Some(-1), "查看图片样式").is_err());
    }

    #[test]
    fn test_empty_details_fall_back() {
        let picked = select_style(&[], None, "ais").unwrap();
        assert_eq!(picked.style_key, ImageStyle::SourceHanSerifSC);
    }

    #[test]
    fn test_style_keys_in_toml() {
        #[derive(Deserialize)]
        struct Wrap {
            details: Vec<ImageStyleDetail>,
            image_type: ImageType,
        }
        let w: Wrap = toml::from_str(
            r#"
            image_type = "jpeg"
            details = [{ style_key = "LXGW_WENKAI", dark_mode = true }]
            "#,
        )
        .unwrap();
        assert_eq!(w.details[0].style_key, ImageStyle::LxgwWenKai);
        assert_eq!(w.image_type, ImageType::Jpeg);
    }

    #[test]
    fn test_style_list_text() {
        let text = style_list_text(&default_style_details()[..2]);
        assert!(text.starts_with("用户信息图片样式列表：\n"));
        assert!(text.contains("\t【0】: 思源宋体SourceHanSerifSC 浅色模式 (SOURCE_HAN_SERIF_SC)\n"));
        assert!(text.contains("\t【1】: 思源宋体SourceHanSerifSC 深色模式 (SOURCE_HAN_SERIF_SC)\n"));
    }
}
