//! 脊柱模块
//!
//! 提供EPUB包中阅读顺序（脊柱）的结构定义。

/// 脊柱项信息(阅读顺序)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpineItem {
    /// 引用的清单项ID
    pub idref: String,
}

impl SpineItem {
    /// 创建新的脊柱项
    pub fn new(idref: impl Into<String>) -> Self {
        Self {
            idref: idref.into(),
        }
    }
}
