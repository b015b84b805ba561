//! EPUB3导航文档（nav.xhtml）构建

use crate::epub::assets::{OPS_NS, XHTML_NS};
use crate::epub::error::{DocumentKind, Result};
use crate::epub::model::NavEntry;
use crate::epub::xml::XmlDocument;

const NAV_STYLESHEET_HREF: &str = "../style/nav.css";

/// 导航文档
#[derive(Debug, Clone)]
pub struct NavDocument {
    /// 书名，同时作为文档标题和目录标题
    pub title: String,
    pub language: String,
    pub entries: Vec<NavEntry>,
}

impl NavDocument {
    pub fn new(title: impl Into<String>, language: impl Into<String>, entries: Vec<NavEntry>) -> Self {
        Self {
            title: title.into(),
            language: language.into(),
            entries,
        }
    }

    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut doc = XmlDocument::new(DocumentKind::Navigation)?;
        doc.start(
            "html",
            &[
                ("xmlns", XHTML_NS),
                ("xmlns:epub", OPS_NS),
                ("lang", self.language.as_str()),
                ("xml:lang", self.language.as_str()),
            ],
        )?;

        doc.start("head", &[])?;
        doc.text_element("title", &[], &self.title)?;
        doc.empty(
            "link",
            &[
                ("href", NAV_STYLESHEET_HREF),
                ("rel", "stylesheet"),
                ("type", "text/css"),
            ],
        )?;
        doc.end("head")?;

        doc.start("body", &[])?;
        doc.start("nav", &[("epub:type", "toc"), ("id", "id"), ("role", "doc-toc")])?;
        doc.text_element("h2", &[], &self.title)?;
        doc.start("ol", &[])?;
        for entry in &self.entries {
            doc.start("li", &[])?;
            doc.text_element("a", &[("href", entry.href.as_str())], &entry.title)?;
            doc.end("li")?;
        }
        doc.end("ol")?;
        doc.end("nav")?;
        doc.end("body")?;

        doc.end("html")?;
        doc.finish()
    }
}
