//! 包文档（content.opf）生成器
//!
//! 根据元数据、章节数量、封面类型和插图合成完整的清单与脊柱。
//! 清单ID按固定规则生成，脊柱引用因此总能唯一解析。

use crate::epub::assets::{
    cover_extension, CSS_MEDIA_TYPE, IMAGES_DIR, NCX_MEDIA_TYPE, XHTML_MEDIA_TYPE,
};
use crate::epub::error::{DocumentKind, Result};
use crate::epub::model::{chapter_file_name, chapter_id, ChapterImage};
use crate::epub::opf::manifest::ManifestItem;
use crate::epub::opf::metadata::Metadata;
use crate::epub::opf::spine::SpineItem;
use crate::epub::xml::XmlDocument;

pub const DOC_STYLE_ID: &str = "doc_style";
pub const NAV_STYLE_ID: &str = "style_nav";
pub const COVER_ID: &str = "cover";
pub const NCX_ID: &str = "ncx";
pub const NAV_ID: &str = "nav";

const OPF_NS: &str = "http://www.idpf.org/2007/opf";
const DC_NS: &str = "http://purl.org/dc/elements/1.1/";
const RENDITION_PREFIX: &str = "rendition: http://www.idpf.org/vocab/rendition/#";

/// 包文档
#[derive(Debug, Clone)]
pub struct PackageDocument {
    /// EPUB版本
    pub version: String,
    /// 元数据
    pub metadata: Metadata,
    /// 清单项，按输出顺序排列
    pub manifest: Vec<ManifestItem>,
    /// 脊柱(阅读顺序)
    pub spine: Vec<SpineItem>,
    /// 脊柱的目录引用
    pub spine_toc: Option<String>,
}

impl PackageDocument {
    /// 合成清单和脊柱
    ///
    /// # 参数
    /// * `metadata` - 书籍元数据
    /// * `chapter_count` - 章节总数，章节ID为 `chapter_1..chapter_n`
    /// * `cover_media_type` - 封面媒体类型，决定封面文件扩展名
    /// * `images` - 章节插图对应的清单项
    pub fn new(
        metadata: Metadata,
        chapter_count: usize,
        cover_media_type: &str,
        images: Vec<ManifestItem>,
    ) -> Self {
        let mut manifest = vec![
            ManifestItem::new(DOC_STYLE_ID, "../style/main.css", CSS_MEDIA_TYPE),
            ManifestItem::new(NAV_STYLE_ID, "../style/nav.css", CSS_MEDIA_TYPE),
            ManifestItem::with_properties(
                COVER_ID,
                format!("../cover.{}", cover_extension(cover_media_type)),
                cover_media_type,
                "cover-image",
            ),
            ManifestItem::new(NCX_ID, "toc.ncx", NCX_MEDIA_TYPE),
        ];
        manifest.extend((1..=chapter_count).map(|index| {
            ManifestItem::new(chapter_id(index), chapter_file_name(index), XHTML_MEDIA_TYPE)
        }));
        manifest.extend(images);
        manifest.push(ManifestItem::with_properties(
            NAV_ID,
            "nav.xhtml",
            XHTML_MEDIA_TYPE,
            "nav",
        ));

        let spine = (1..=chapter_count)
            .map(|index| SpineItem::new(chapter_id(index)))
            .collect();

        Self {
            version: "3.0".to_string(),
            metadata,
            manifest,
            spine,
            spine_toc: Some(NCX_ID.to_string()),
        }
    }

    /// 章节插图的清单项，ID为 `image_<序号>`
    pub fn image_item(ordinal: usize, image: &ChapterImage) -> ManifestItem {
        ManifestItem::new(
            format!("image_{}", ordinal),
            format!("../{}/{}", IMAGES_DIR, image.file_name),
            image.media_type.clone(),
        )
    }

    /// 根据ID查找清单项
    pub fn manifest_item(&self, id: &str) -> Option<&ManifestItem> {
        self.manifest.iter().find(|item| item.id == id)
    }

    pub fn spine_idrefs(&self) -> Vec<&str> {
        self.spine.iter().map(|item| item.idref.as_str()).collect()
    }

    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut doc = XmlDocument::new(DocumentKind::Package)?;
        doc.start(
            "package",
            &[
                ("xmlns", OPF_NS),
                ("unique-identifier", self.metadata.identifier.id.as_str()),
                ("version", self.version.as_str()),
                ("prefix", RENDITION_PREFIX),
            ],
        )?;

        self.write_metadata(&mut doc)?;

        doc.start("manifest", &[])?;
        for item in &self.manifest {
            let mut attrs = vec![
                ("href", item.href.as_str()),
                ("id", item.id.as_str()),
                ("media-type", item.media_type.as_str()),
            ];
            if let Some(properties) = &item.properties {
                attrs.push(("properties", properties.as_str()));
            }
            doc.empty("item", &attrs)?;
        }
        doc.end("manifest")?;

        let spine_attrs: Vec<(&str, &str)> = self
            .spine_toc
            .as_deref()
            .map(|toc| vec![("toc", toc)])
            .unwrap_or_default();
        doc.start("spine", &spine_attrs)?;
        for item in &self.spine {
            doc.empty("itemref", &[("idref", item.idref.as_str())])?;
        }
        doc.end("spine")?;

        doc.end("package")?;
        doc.finish()
    }

    fn write_metadata(&self, doc: &mut XmlDocument) -> Result<()> {
        let metadata = &self.metadata;
        doc.start("metadata", &[("xmlns:dc", DC_NS), ("xmlns:opf", OPF_NS)])?;
        doc.text_element(
            "meta",
            &[("property", "dcterms:modified")],
            &metadata.modified_timestamp(),
        )?;
        doc.text_element(
            "dc:identifier",
            &[("id", metadata.identifier.id.as_str())],
            &metadata.identifier.value,
        )?;
        doc.text_element("dc:title", &[], &metadata.title)?;
        doc.text_element("dc:language", &[], &metadata.language)?;
        // 作者和简介可缺省，空元素不合规
        if !metadata.creator.name.trim().is_empty() {
            doc.text_element(
                "dc:creator",
                &[("id", metadata.creator.id.as_str())],
                &metadata.creator.name,
            )?;
        }
        if !metadata.description.trim().is_empty() {
            doc.text_element("dc:description", &[], &metadata.description)?;
        }
        doc.empty("meta", &[("name", "cover"), ("content", metadata.cover_id.as_str())])?;
        doc.end("metadata")
    }
}
