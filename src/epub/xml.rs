//! XML写出辅助模块
//!
//! 对 `quick_xml::Writer` 的薄封装：统一XML声明、缩进和字符合法性检查，
//! 所有文档构建器都通过它输出，错误统一映射为带文档种类的序列化错误。

use crate::epub::error::{DocumentKind, EpubError, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

/// XML 1.0 允许出现的字符
pub fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

/// 正在构建的XML文档
pub(crate) struct XmlDocument {
    writer: Writer<Vec<u8>>,
    kind: DocumentKind,
}

impl XmlDocument {
    /// 创建带两空格缩进的文档，并写入XML声明
    pub fn new(kind: DocumentKind) -> Result<Self> {
        let mut doc = Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
            kind,
        };
        doc.emit(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        Ok(doc)
    }

    pub fn doctype(&mut self, doctype: &str) -> Result<()> {
        self.emit(Event::DocType(BytesText::from_escaped(doctype)))
    }

    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let start = self.element(name, attrs)?;
        self.emit(Event::Start(start))
    }

    pub fn end(&mut self, name: &str) -> Result<()> {
        self.emit(Event::End(BytesEnd::new(name)))
    }

    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let start = self.element(name, attrs)?;
        self.emit(Event::Empty(start))
    }

    /// 写出只包含文本的元素，如 `<dc:title>书名</dc:title>`
    pub fn text_element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        if text.is_empty() {
            return self.empty(name, attrs);
        }
        self.check(text)?;
        self.start(name, attrs)?;
        self.emit(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    /// 原样写入已经是合法XML的片段（规范化后的章节正文）
    pub fn raw(&mut self, xml: &str) -> Result<()> {
        if xml.is_empty() {
            return Ok(());
        }
        self.emit(Event::Text(BytesText::from_escaped(xml)))
    }

    pub fn finish(self) -> Result<Vec<u8>> {
        let mut bytes = self.writer.into_inner();
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn element<'a>(&self, name: &'a str, attrs: &[(&'a str, &'a str)]) -> Result<BytesStart<'a>> {
        let mut start = BytesStart::new(name);
        for &(key, value) in attrs {
            self.check(value)?;
            start.push_attribute((key, value));
        }
        Ok(start)
    }

    fn check(&self, text: &str) -> Result<()> {
        match text.chars().find(|c| !is_xml_char(*c)) {
            Some(c) => Err(EpubError::serialization(
                self.kind,
                format!("包含XML不允许的字符 U+{:04X}", c as u32),
            )),
            None => Ok(()),
        }
    }

    fn emit(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| EpubError::serialization(self.kind, e))
    }
}
