//! 书籍数据模型
//!
//! 由采集方提供的元数据、章节和插图，以及它们在包内的命名规则。

use std::collections::HashSet;

use crate::epub::assets::{cover_extension, image_extension, IMAGES_DIR};
use crate::epub::error::{EpubError, Result};

/// 封面图片
#[derive(Debug, Clone)]
pub struct CoverImage {
    /// 图片二进制数据
    pub data: Vec<u8>,
    /// 声明的媒体类型，如 `image/jpeg`
    pub media_type: String,
}

impl CoverImage {
    pub fn new(data: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            data,
            media_type: media_type.into(),
        }
    }

    /// 封面扩展名
    pub fn extension(&self) -> &'static str {
        cover_extension(&self.media_type)
    }

    /// 包根目录下的封面文件名，如 `cover.jpg`
    pub fn file_name(&self) -> String {
        format!("cover.{}", self.extension())
    }
}

/// 书籍元数据
#[derive(Debug, Clone)]
pub struct BookMetadata {
    pub title: String,
    pub author: String,
    pub description: String,
    pub cover: CoverImage,
}

/// 章节中引用的一张插图
#[derive(Debug, Clone)]
pub struct ChapterImage {
    /// 正文中 `img` 的原始 `src`
    pub source: String,
    /// 包内文件名，如 `chapter3_img0.png`
    pub file_name: String,
    pub media_type: String,
    pub data: Vec<u8>,
}

impl ChapterImage {
    /// 按 `chapter<章节序号>_img<图片序号>.<扩展名>` 命名插图
    pub fn new(
        chapter_index: usize,
        ordinal: usize,
        source: impl Into<String>,
        media_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        let media_type = media_type.into();
        let file_name = format!(
            "chapter{}_img{}.{}",
            chapter_index,
            ordinal,
            image_extension(&media_type)
        );
        Self {
            source: source.into(),
            file_name,
            media_type,
            data,
        }
    }

    /// 章节文档中使用的相对路径
    pub fn href(&self) -> String {
        format!("../{}/{}", IMAGES_DIR, self.file_name)
    }
}

/// 一个章节
#[derive(Debug, Clone)]
pub struct ChapterRecord {
    /// 从1开始的章节序号
    pub index: usize,
    pub title: String,
    /// 原始HTML正文
    pub body_html: String,
    pub images: Vec<ChapterImage>,
}

impl ChapterRecord {
    pub fn new(index: usize, title: impl Into<String>, body_html: impl Into<String>) -> Self {
        Self {
            index,
            title: title.into(),
            body_html: body_html.into(),
            images: Vec::new(),
        }
    }

    pub fn with_images(mut self, images: Vec<ChapterImage>) -> Self {
        self.images = images;
        self
    }

    pub fn file_name(&self) -> String {
        chapter_file_name(self.index)
    }

    pub fn nav_entry(&self) -> NavEntry {
        NavEntry::new(self.file_name(), self.title.clone())
    }
}

/// `chapter_<n>.xhtml`
pub fn chapter_file_name(index: usize) -> String {
    format!("chapter_{}.xhtml", index)
}

/// `chapter_<n>`，清单、脊柱和NCX共用的标识
pub fn chapter_id(index: usize) -> String {
    format!("chapter_{}", index)
}

/// 目录条目，导航文档和NCX共用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub href: String,
    pub title: String,
}

impl NavEntry {
    pub fn new(href: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            title: title.into(),
        }
    }
}

/// 一次装订的全部输入
#[derive(Debug, Clone)]
pub struct Book {
    pub metadata: BookMetadata,
    pub chapters: Vec<ChapterRecord>,
}

impl Book {
    pub fn new(metadata: BookMetadata, chapters: Vec<ChapterRecord>) -> Self {
        Self { metadata, chapters }
    }

    /// 检查书名非空，章节序号从1开始连续且唯一，插图文件名不重复
    pub fn validate(&self) -> Result<()> {
        if self.metadata.title.trim().is_empty() {
            return Err(EpubError::InvalidBook("书名为空".to_string()));
        }

        if self.chapters.is_empty() {
            return Err(EpubError::InvalidBook("没有任何章节".to_string()));
        }

        for (position, chapter) in self.chapters.iter().enumerate() {
            if chapter.index != position + 1 {
                return Err(EpubError::InvalidBook(format!(
                    "第{}个章节的序号为{}，章节序号必须从1开始连续递增",
                    position + 1,
                    chapter.index
                )));
            }
        }

        let mut seen = HashSet::new();
        for chapter in &self.chapters {
            for image in &chapter.images {
                if !seen.insert(image.file_name.as_str()) {
                    return Err(EpubError::InvalidBook(format!(
                        "插图文件名重复: {}",
                        image.file_name
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> BookMetadata {
        BookMetadata {
            title: "T".to_string(),
            author: "A".to_string(),
            description: "D".to_string(),
            cover: CoverImage::new(vec![0xFF, 0xD8], "image/jpeg"),
        }
    }

    #[test]
    fn test_chapter_naming() {
        let chapter = ChapterRecord::new(7, "第七章", "<p>x</p>");
        assert_eq!(chapter.file_name(), "chapter_7.xhtml");
        assert_eq!(chapter.nav_entry(), NavEntry::new("chapter_7.xhtml", "第七章"));
    }

    #[test]
    fn test_image_naming() {
        let image = ChapterImage::new(3, 0, "pic.png", "image/png", vec![1, 2, 3]);
        assert_eq!(image.file_name, "chapter3_img0.png");
        assert_eq!(image.href(), "../images/chapter3_img0.png");

        let unknown = ChapterImage::new(1, 2, "x", "application/octet-stream", vec![]);
        assert_eq!(unknown.file_name, "chapter1_img2.jpg");
    }

    #[test]
    fn test_cover_file_name() {
        assert_eq!(CoverImage::new(vec![], "image/png").file_name(), "cover.png");
        assert_eq!(CoverImage::new(vec![], "image/tiff").file_name(), "cover.jpg");
    }

    #[test]
    fn test_validate_accepts_dense_indices() {
        let book = Book::new(
            metadata(),
            vec![ChapterRecord::new(1, "a", ""), ChapterRecord::new(2, "b", "")],
        );
        assert!(book.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_gaps_and_empty_books() {
        let gap = Book::new(
            metadata(),
            vec![ChapterRecord::new(1, "a", ""), ChapterRecord::new(3, "b", "")],
        );
        assert!(matches!(gap.validate(), Err(EpubError::InvalidBook(_))));

        let empty = Book::new(metadata(), Vec::new());
        assert!(matches!(empty.validate(), Err(EpubError::InvalidBook(_))));
    }

    #[test]
    fn test_validate_rejects_duplicate_image_names() {
        let image = ChapterImage::new(1, 0, "a.png", "image/png", vec![]);
        let book = Book::new(
            metadata(),
            vec![ChapterRecord::new(1, "a", "").with_images(vec![image.clone(), image])],
        );
        assert!(matches!(book.validate(), Err(EpubError::InvalidBook(_))));
    }

    #[test]
    fn test_validate_rejects_blank_title() {
        for title in ["", "  \t"] {
            let mut metadata = metadata();
            metadata.title = title.to_string();
            let book = Book::new(metadata, vec![ChapterRecord::new(1, "a", "")]);
            assert!(matches!(book.validate(), Err(EpubError::InvalidBook(_))));
        }
    }
}
