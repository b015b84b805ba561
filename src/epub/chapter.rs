//! 章节文档构建
//!
//! 把规范化后的正文包进固定的XHTML外壳。

use crate::epub::assets::{OPS_NS, XHTML_NS};
use crate::epub::error::{DocumentKind, EpubError, Result};
use crate::epub::model::ChapterRecord;
use crate::epub::xhtml::{NormalizeError, XhtmlNormalizer};
use crate::epub::xml::XmlDocument;

const STRUCTURE_PREFIX: &str = "z3998: http://www.daisy.org/z3998/2012/vocab/structure/#";
const MAIN_STYLESHEET_HREF: &str = "../style/main.css";

/// 一个章节的XHTML文档
#[derive(Debug, Clone)]
pub struct ChapterDocument {
    pub index: usize,
    pub title: String,
    pub language: String,
    /// 已规范化的XHTML正文片段
    pub body: String,
}

impl ChapterDocument {
    /// 规范化章节正文（同时改写章节插图的地址）
    pub fn from_record(chapter: &ChapterRecord, language: &str) -> Result<Self> {
        let body = XhtmlNormalizer::with_images(&chapter.images)
            .normalize(&chapter.body_html)
            .map_err(|e| match e {
                NormalizeError::BodyNotFound => EpubError::MalformedInput {
                    chapter: chapter.index,
                },
                NormalizeError::Serialize(reason) => {
                    EpubError::serialization(DocumentKind::Chapter(chapter.index), reason)
                }
            })?;

        Ok(Self {
            index: chapter.index,
            title: chapter.title.clone(),
            language: language.to_string(),
            body,
        })
    }

    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut doc = XmlDocument::new(DocumentKind::Chapter(self.index))?;
        doc.doctype("html")?;
        doc.start(
            "html",
            &[
                ("xmlns", XHTML_NS),
                ("xmlns:epub", OPS_NS),
                ("epub:prefix", STRUCTURE_PREFIX),
                ("lang", self.language.as_str()),
                ("xml:lang", self.language.as_str()),
            ],
        )?;

        doc.start("head", &[])?;
        doc.text_element("title", &[], &self.title)?;
        doc.empty(
            "link",
            &[
                ("href", MAIN_STYLESHEET_HREF),
                ("rel", "stylesheet"),
                ("type", "text/css"),
            ],
        )?;
        doc.end("head")?;

        doc.start("body", &[])?;
        doc.raw(&self.body)?;
        doc.end("body")?;

        doc.end("html")?;
        doc.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epub::model::ChapterImage;

    #[test]
    fn test_chapter_document_shell() {
        let chapter = ChapterRecord::new(1, "Ch1", "<p>Hi</p>");
        let doc = ChapterDocument::from_record(&chapter, "en").unwrap();
        let xml = String::from_utf8(doc.to_xml().unwrap()).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("<!DOCTYPE html>"));
        assert!(xml.contains("xmlns=\"http://www.w3.org/1999/xhtml\""));
        assert!(xml.contains("xmlns:epub=\"http://www.idpf.org/2007/ops\""));
        assert!(xml.contains("xml:lang=\"en\""));
        assert!(xml.contains("<title>Ch1</title>"));
        assert!(xml.contains("<link href=\"../style/main.css\" rel=\"stylesheet\" type=\"text/css\"/>"));
        assert!(xml.contains("<body><p>Hi</p></body>"));
    }

    #[test]
    fn test_title_is_escaped() {
        let chapter = ChapterRecord::new(2, "Tom & Jerry <1>", "<p>x</p>");
        let doc = ChapterDocument::from_record(&chapter, "en").unwrap();
        let xml = String::from_utf8(doc.to_xml().unwrap()).unwrap();
        assert!(xml.contains("<title>Tom &amp; Jerry &lt;1&gt;</title>"));
    }

    #[test]
    fn test_invalid_title_is_serialization_error() {
        let chapter = ChapterRecord::new(4, "bad\u{7}", "<p>x</p>");
        let doc = ChapterDocument::from_record(&chapter, "en").unwrap();
        match doc.to_xml() {
            Err(EpubError::Serialization { document, .. }) => {
                assert_eq!(document, DocumentKind::Chapter(4))
            }
            other => panic!("期望Serialization错误, 得到 {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_body_reports_chapter_index() {
        let chapter = ChapterRecord::new(3, "x", "<frameset><frame src=\"a.html\"></frameset>");
        match ChapterDocument::from_record(&chapter, "en") {
            Err(EpubError::MalformedInput { chapter }) => assert_eq!(chapter, 3),
            other => panic!("期望MalformedInput错误, 得到 {:?}", other),
        }
    }

    #[test]
    fn test_images_are_rewritten() {
        let image = ChapterImage::new(5, 0, "img/a.gif", "image/gif", vec![1]);
        let chapter = ChapterRecord::new(5, "x", "<p><img src=\"img/a.gif\"></p>").with_images(vec![image]);
        let doc = ChapterDocument::from_record(&chapter, "en").unwrap();
        assert_eq!(doc.body, "<p><img src=\"../images/chapter5_img0.gif\" width=\"100%\"/></p>");
    }
}
