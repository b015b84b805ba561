//! OPF（Open Packaging Format）包文档生成模块
//!
//! 包文档是EPUB的入口，列出包内全部资源（清单）并定义阅读顺序（脊柱）。

mod metadata;
mod manifest;
mod spine;
mod package;

pub use metadata::{Creator, Identifier, Metadata};
pub use manifest::ManifestItem;
pub use spine::SpineItem;
pub use package::{PackageDocument, COVER_ID, DOC_STYLE_ID, NAV_ID, NAV_STYLE_ID, NCX_ID};
