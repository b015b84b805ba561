pub mod error;
pub mod assets;
pub mod config;
pub mod model;
pub mod xml;
pub mod xhtml;
pub mod container;
pub mod chapter;
pub mod nav;
pub mod ncx;
pub mod opf;
pub mod staging;
pub mod archive;
pub mod writer;
pub mod source;

// 重新导出错误处理
pub use error::{DocumentKind, EpubError, Result};

// 重新导出配置
pub use config::EpubConfig;

// 重新导出书籍数据模型
pub use model::{Book, BookMetadata, ChapterImage, ChapterRecord, CoverImage, NavEntry};

// 重新导出XHTML规范化
pub use xhtml::{normalize_fragment, NormalizeError, XhtmlNormalizer};

// 重新导出各类文档构建器
pub use chapter::ChapterDocument;
pub use container::{Container, RootFile};
pub use nav::NavDocument;
pub use ncx::{DocTitle, NavMap, NavPoint, Ncx};
pub use opf::{Creator, Identifier, ManifestItem, Metadata, PackageDocument, SpineItem};

// 重新导出装订流程
pub use staging::{ChapterFacts, StagedBook, StagedChapters, StagingArea};
pub use archive::ArchiveAssembler;
pub use writer::EpubWriter;
pub use source::BookSource;
