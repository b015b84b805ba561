//! 清单模块
//!
//! 提供EPUB包中文件清单的结构定义。

/// 清单项信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
    /// 项目ID，脊柱通过它引用清单项
    pub id: String,
    /// 文件路径(相对于OPF文件)
    pub href: String,
    /// 媒体类型
    pub media_type: String,
    /// 属性(如nav、cover-image等)
    pub properties: Option<String>,
}

impl ManifestItem {
    /// 创建新的清单项
    pub fn new(id: impl Into<String>, href: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            href: href.into(),
            media_type: media_type.into(),
            properties: None,
        }
    }

    /// 创建带属性的清单项
    pub fn with_properties(
        id: impl Into<String>,
        href: impl Into<String>,
        media_type: impl Into<String>,
        properties: impl Into<String>,
    ) -> Self {
        Self {
            properties: Some(properties.into()),
            ..Self::new(id, href, media_type)
        }
    }
}
