//! XHTML规范化模块
//!
//! 章节正文来自网页，常常不是合法的XML。这里分两步处理：
//! 1. 宽松解析：按HTML5规则解析（scraper/html5ever），自动补全标签、生成html/body；
//! 2. 严格序列化：深度优先找到第一个body元素，按XML规则输出其子节点。
//!
//! 输出片段是合法的XML，可以直接嵌入章节文档的 `<body>` 中。

use std::borrow::Cow;
use std::collections::HashMap;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use scraper::{ElementRef, Html, Node};
use thiserror::Error;

use crate::epub::assets::XHTML_NS;
use crate::epub::model::ChapterImage;
use crate::epub::xml::is_xml_char;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const MATHML_NS: &str = "http://www.w3.org/1998/Math/MathML";

/// HTML空元素，序列化为自闭合标签
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
    "source", "track", "wbr",
];

/// 布尔属性，空值时补上显式的值
const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "allowfullscreen", "async", "autofocus", "autoplay", "checked", "controls", "default", "defer",
    "disabled", "formnovalidate", "hidden", "ismap", "itemscope", "loop", "multiple", "muted",
    "nomodule", "novalidate", "open", "readonly", "required", "reversed", "selected",
];

/// 直接丢弃的元素（连同内容）
const DROPPED_ELEMENTS: &[&str] = &["script"];

/// 规范化失败的原因
#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("解析结果中没有body元素")]
    BodyNotFound,

    #[error("XHTML序列化失败: {0}")]
    Serialize(String),
}

/// 第一步：按HTML5规则宽松解析
pub fn parse_lenient(html: &str) -> Html {
    Html::parse_document(html)
}

/// 深度优先查找第一个body元素
pub fn locate_body(document: &Html) -> Option<ElementRef<'_>> {
    document
        .tree
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "body")
}

/// 规范化单个HTML片段
pub fn normalize_fragment(html: &str) -> Result<String, NormalizeError> {
    XhtmlNormalizer::new().normalize(html)
}

/// XHTML规范化器
///
/// 可选地携带插图改写表：`img` 的 `src` 命中表中的原始地址时，
/// 改写为包内路径并设置 `width="100%"`。
#[derive(Debug, Default, Clone)]
pub struct XhtmlNormalizer {
    image_hrefs: HashMap<String, String>,
}

impl XhtmlNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用章节插图构建改写表
    pub fn with_images(images: &[ChapterImage]) -> Self {
        let image_hrefs = images
            .iter()
            .map(|image| (image.source.trim().to_string(), image.href()))
            .collect();
        Self { image_hrefs }
    }

    /// 宽松解析后严格序列化body的内容
    pub fn normalize(&self, html: &str) -> Result<String, NormalizeError> {
        let document = parse_lenient(html);
        let body = locate_body(&document).ok_or(NormalizeError::BodyNotFound)?;
        self.serialize_children(body)
    }

    /// 第二步：把元素的子节点序列化为XHTML片段
    pub fn serialize_children(&self, element: ElementRef<'_>) -> Result<String, NormalizeError> {
        let mut serializer = Serializer {
            writer: Writer::new(Vec::new()),
            image_hrefs: &self.image_hrefs,
        };
        serializer.write_children(element, XHTML_NS)?;
        String::from_utf8(serializer.writer.into_inner())
            .map_err(|e| NormalizeError::Serialize(e.to_string()))
    }
}

struct Serializer<'a> {
    writer: Writer<Vec<u8>>,
    image_hrefs: &'a HashMap<String, String>,
}

impl Serializer<'_> {
    fn write_children(&mut self, element: ElementRef<'_>, parent_ns: &str) -> Result<(), NormalizeError> {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => self.write_text(text)?,
                Node::Element(_) => {
                    if let Some(child_element) = ElementRef::wrap(child) {
                        self.write_element(child_element, parent_ns)?;
                    }
                }
                // 注释、文档类型和处理指令都不输出
                _ => {}
            }
        }
        Ok(())
    }

    fn write_element(&mut self, element: ElementRef<'_>, parent_ns: &str) -> Result<(), NormalizeError> {
        let value = element.value();
        let name = value.name();
        let ns: &str = &value.name.ns;

        if DROPPED_ELEMENTS.contains(&name) {
            return Ok(());
        }
        if !is_plain_name(name) {
            // 名字不合法的元素只保留内容
            return self.write_children(element, parent_ns);
        }

        let mut start = BytesStart::new(name);
        if ns != parent_ns && (ns == SVG_NS || ns == MATHML_NS || ns == XHTML_NS) {
            start.push_attribute(("xmlns", ns));
        }
        for (key, value) in self.attributes(name, value.attrs()) {
            start.push_attribute((key, value.as_ref()));
        }

        let has_children = element.children().next().is_some();
        let self_closing = if ns == XHTML_NS {
            VOID_ELEMENTS.contains(&name)
        } else {
            !has_children
        };

        if self_closing {
            self.emit(Event::Empty(start))
        } else {
            self.emit(Event::Start(start))?;
            self.write_children(element, ns)?;
            self.emit(Event::End(BytesEnd::new(name)))
        }
    }

    /// 过滤并修正属性列表
    fn attributes<'v>(
        &self,
        element_name: &str,
        attrs: impl Iterator<Item = (&'v str, &'v str)>,
    ) -> Vec<(&'v str, Cow<'v, str>)> {
        let mut result: Vec<(&'v str, Cow<'v, str>)> = Vec::new();
        for (key, value) in attrs {
            if !is_allowed_attribute(key) || result.iter().any(|(k, _)| *k == key) {
                continue;
            }
            let value = if value.is_empty() && BOOLEAN_ATTRIBUTES.contains(&key) {
                Cow::Borrowed(key)
            } else {
                strip_invalid_chars(value)
            };
            result.push((key, value));
        }

        if element_name == "img" {
            let rewritten = result
                .iter()
                .find(|(k, _)| *k == "src")
                .and_then(|(_, src)| self.image_hrefs.get(src.trim()))
                .cloned();
            if let Some(href) = rewritten {
                result.retain(|(k, _)| *k != "src" && *k != "width");
                result.push(("src", Cow::Owned(href)));
                result.push(("width", Cow::Borrowed("100%")));
            }
        }
        result
    }

    fn write_text(&mut self, text: &str) -> Result<(), NormalizeError> {
        let text = strip_invalid_chars(text);
        if text.is_empty() {
            return Ok(());
        }
        self.emit(Event::Text(BytesText::new(&text)))
    }

    fn emit(&mut self, event: Event<'_>) -> Result<(), NormalizeError> {
        self.writer
            .write_event(event)
            .map_err(|e| NormalizeError::Serialize(e.to_string()))
    }
}

/// 不带前缀的XML名字
fn is_plain_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn is_allowed_attribute(key: &str) -> bool {
    if key == "xmlns" || key.starts_with("xmlns:") {
        return false;
    }
    match key.split_once(':') {
        Some(("xml", local)) => matches!(local, "lang" | "space"),
        Some(("epub", local)) => is_plain_name(local),
        Some(_) => false,
        None => is_plain_name(key),
    }
}

fn strip_invalid_chars(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|c| is_xml_char(*c)).collect())
    }
}
