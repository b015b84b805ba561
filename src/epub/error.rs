use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EpubError>;

/// 生成的XML文档种类，用于在错误中指明出错位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// 章节文档（带章节序号）
    Chapter(usize),
    /// EPUB3导航文档 nav.xhtml
    Navigation,
    /// 旧式目录 toc.ncx
    Ncx,
    /// 包文档 content.opf
    Package,
    /// META-INF/container.xml
    Container,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Chapter(index) => write!(f, "章节文档 chapter_{}.xhtml", index),
            DocumentKind::Navigation => write!(f, "导航文档 nav.xhtml"),
            DocumentKind::Ncx => write!(f, "NCX目录 toc.ncx"),
            DocumentKind::Package => write!(f, "包文档 content.opf"),
            DocumentKind::Container => write!(f, "container.xml"),
        }
    }
}

/// EPUB装订相关的错误类型
#[derive(Error, Debug)]
pub enum EpubError {
    #[error("第{chapter}章的HTML中找不到body内容")]
    MalformedInput { chapter: usize },

    #[error("{document}序列化失败: {reason}")]
    Serialization { document: DocumentKind, reason: String },

    #[error("暂存目录写入失败 ({}): {source}", path.display())]
    StagingIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("归档条目写入失败 ({entry}): {source}")]
    ArchiveIo {
        entry: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("无效的书籍数据: {0}")]
    InvalidBook(String),

    #[error("配置文件错误: {0}")]
    ConfigError(String),

    #[error("书籍清单错误 ({}): {reason}", path.display())]
    SourceError { path: PathBuf, reason: String },

    #[error("IO错误: {0}")]
    Io(#[from] io::Error),
}

impl EpubError {
    pub(crate) fn serialization(document: DocumentKind, reason: impl fmt::Display) -> Self {
        EpubError::Serialization {
            document,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn archive(entry: impl Into<String>, source: impl Into<zip::result::ZipError>) -> Self {
        EpubError::ArchiveIo {
            entry: entry.into(),
            source: source.into(),
        }
    }
}
