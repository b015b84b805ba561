//! NCX（Navigation Control file for XML）文件生成模块
//!
//! NCX是EPUB2时代的目录文件。EPUB3阅读器优先使用nav.xhtml，
//! 但为了兼容旧阅读器仍需生成，并与导航文档保持相同的顺序和标题。

pub mod navigation;
pub mod builder;

pub use navigation::{
    NavPoint,
    NavLabel,
    NavContent,
    NavMap,
    DocTitle,
    NcxMetadata,
};
pub use builder::Ncx;
