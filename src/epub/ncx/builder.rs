//! NCX文件生成器
//!
//! 旧式阅读器依赖的目录文件，内容与nav.xhtml保持一致。

use crate::epub::error::{DocumentKind, Result};
use crate::epub::model::NavEntry;
use crate::epub::ncx::navigation::{DocTitle, NavMap, NcxMetadata};
use crate::epub::xml::XmlDocument;

const NCX_NS: &str = "http://www.daisy.org/z3986/2005/ncx/";
const NCX_VERSION: &str = "2005-1";

/// NCX文档
#[derive(Debug, Clone)]
pub struct Ncx {
    /// NCX版本
    pub version: String,
    pub metadata: NcxMetadata,
    pub doc_title: DocTitle,
    pub nav_map: NavMap,
}

impl Ncx {
    /// 由书名、标识符和目录条目创建NCX
    pub fn new(title: impl Into<String>, uid: impl Into<String>, entries: &[NavEntry]) -> Self {
        Self {
            version: NCX_VERSION.to_string(),
            metadata: NcxMetadata::new(uid),
            doc_title: DocTitle::new(title),
            nav_map: NavMap::from_entries(entries),
        }
    }

    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut doc = XmlDocument::new(DocumentKind::Ncx)?;
        doc.start("ncx", &[("xmlns", NCX_NS), ("version", self.version.as_str())])?;

        doc.start("head", &[])?;
        for (name, content) in self.metadata.entries() {
            doc.empty("meta", &[("name", name), ("content", content.as_str())])?;
        }
        doc.end("head")?;

        doc.start("docTitle", &[])?;
        doc.text_element("text", &[], &self.doc_title.text)?;
        doc.end("docTitle")?;

        doc.start("navMap", &[])?;
        for point in &self.nav_map.nav_points {
            let play_order = point.play_order.to_string();
            doc.start(
                "navPoint",
                &[("id", point.id.as_str()), ("playOrder", play_order.as_str())],
            )?;
            doc.start("navLabel", &[])?;
            doc.text_element("text", &[], &point.nav_label.text)?;
            doc.end("navLabel")?;
            doc.empty("content", &[("src", point.content.src.as_str())])?;
            doc.end("navPoint")?;
        }
        doc.end("navMap")?;

        doc.end("ncx")?;
        doc.finish()
    }
}
