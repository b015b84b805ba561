pub mod epub;

// === 核心API重新导出 ===

/// EPUB写入器（主要接口）
pub use epub::EpubWriter;

/// 错误处理
pub use epub::{DocumentKind, EpubError, Result};

/// 装订配置
pub use epub::EpubConfig;

// === 数据结构 ===

/// 书籍、章节和图片
pub use epub::{Book, BookMetadata, ChapterImage, ChapterRecord, CoverImage, NavEntry};

/// 本地书籍清单
pub use epub::BookSource;

// === 底层组件（高级用法） ===

/// XHTML规范化
pub use epub::{normalize_fragment, NormalizeError, XhtmlNormalizer};

/// 文档构建器
pub use epub::{ChapterDocument, Container, NavDocument, Ncx, PackageDocument};

/// 暂存与归档
pub use epub::{ArchiveAssembler, ChapterFacts, StagedBook, StagedChapters, StagingArea};

// === 库信息 ===

/// inkbind库的版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// inkbind库的描述
pub const DESCRIPTION: &str = "把章节HTML和书籍元数据装订成EPUB3文件";

// === 便捷函数 ===

/// 使用默认配置把书籍写成EPUB文件
///
/// 这是 `EpubWriter::write` 的便捷包装函数。
///
/// # 参数
/// * `book` - 书籍元数据和章节
/// * `path` - 输出文件路径
pub fn write_epub<P: AsRef<std::path::Path>>(book: &Book, path: P) -> Result<()> {
    EpubWriter::default().write(book, path)
}
