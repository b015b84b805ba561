//! 元数据模块
//!
//! 包文档 `<metadata>` 部分的结构定义。

use chrono::{DateTime, SecondsFormat, Utc};

/// 创建者信息(作者)
#[derive(Debug, Clone)]
pub struct Creator {
    /// 创建者姓名
    pub name: String,
    /// 元素ID
    pub id: String,
}

/// 标识符信息
#[derive(Debug, Clone)]
pub struct Identifier {
    /// 标识符值
    pub value: String,
    /// 元素ID，package的unique-identifier引用它
    pub id: String,
}

/// OPF文件中的元数据信息
#[derive(Debug, Clone)]
pub struct Metadata {
    pub identifier: Identifier,
    pub title: String,
    pub language: String,
    pub creator: Creator,
    pub description: String,
    /// 封面清单项的ID（EPUB2兼容的 `<meta name="cover">`）
    pub cover_id: String,
    /// 最后修改时间（dcterms:modified），唯一依赖构建时间的字段
    pub modified: DateTime<Utc>,
}

impl Metadata {
    /// `CCYY-MM-DDThh:mm:ssZ` 格式的修改时间
    pub fn modified_timestamp(&self) -> String {
        self.modified.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}
