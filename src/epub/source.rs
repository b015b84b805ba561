//! 本地书籍清单
//!
//! 从YAML清单读取书籍元数据、封面和章节HTML，供命令行直接装订本地文件：
//!
//! ```yaml
//! title: 书名
//! author: 作者
//! description: 简介
//! cover: cover.jpg
//! chapters:
//!   - title: 第一章
//!     file: chapters/001.html
//! ```
//!
//! 路径都相对于清单文件所在目录。章节中引用的本地图片会一并读入，
//! 远程图片和读取失败的图片跳过并记录警告。

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use scraper::Selector;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::epub::assets::media_type_for_extension;
use crate::epub::error::{EpubError, Result};
use crate::epub::model::{Book, BookMetadata, ChapterImage, ChapterRecord, CoverImage};
use crate::epub::xhtml::parse_lenient;

static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("img选择器语法固定"));

/// 未知扩展名按JPEG处理
const FALLBACK_MEDIA_TYPE: &str = "image/jpeg";

#[derive(Debug, Deserialize)]
struct BookManifest {
    title: String,
    author: String,
    #[serde(default)]
    description: String,
    cover: PathBuf,
    #[serde(default)]
    chapters: Vec<ChapterEntry>,
}

#[derive(Debug, Deserialize)]
struct ChapterEntry {
    title: String,
    file: PathBuf,
}

/// 本地书籍来源
#[derive(Debug, Clone)]
pub struct BookSource {
    manifest_path: PathBuf,
    base_dir: PathBuf,
}

impl BookSource {
    pub fn new<P: AsRef<Path>>(manifest_path: P) -> Self {
        let manifest_path = manifest_path.as_ref().to_path_buf();
        let base_dir = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            manifest_path,
            base_dir,
        }
    }

    /// 读取清单文件并加载整本书
    ///
    /// # 参数
    /// * `path` - YAML清单路径
    ///
    /// # 返回值
    /// * `Result<Book>` - 章节序号按清单顺序从1开始编号
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Book> {
        Self::new(path).read()
    }

    pub fn read(&self) -> Result<Book> {
        let content = fs::read_to_string(&self.manifest_path)
            .map_err(|e| self.error(&self.manifest_path, format!("无法读取书籍清单: {}", e)))?;
        let manifest: BookManifest = serde_yml::from_str(&content)
            .map_err(|e| self.error(&self.manifest_path, format!("书籍清单格式错误: {}", e)))?;

        let cover_path = self.base_dir.join(&manifest.cover);
        let cover_data = fs::read(&cover_path)
            .map_err(|e| self.error(&cover_path, format!("无法读取封面: {}", e)))?;
        let cover = CoverImage::new(cover_data, media_type_of(&cover_path));

        let mut chapters = Vec::with_capacity(manifest.chapters.len());
        for (position, entry) in manifest.chapters.iter().enumerate() {
            chapters.push(self.read_chapter(position + 1, entry)?);
        }

        Ok(Book::new(
            BookMetadata {
                title: manifest.title,
                author: manifest.author,
                description: manifest.description,
                cover,
            },
            chapters,
        ))
    }

    fn read_chapter(&self, index: usize, entry: &ChapterEntry) -> Result<ChapterRecord> {
        let path = self.base_dir.join(&entry.file);
        let html = fs::read_to_string(&path)
            .map_err(|e| self.error(&path, format!("无法读取章节: {}", e)))?;

        let chapter_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let images = collect_images(index, &html, &chapter_dir);
        debug!(index, title = %entry.title, images = images.len(), "章节已读取");

        Ok(ChapterRecord::new(index, entry.title.clone(), html).with_images(images))
    }

    fn error(&self, path: &Path, reason: String) -> EpubError {
        EpubError::SourceError {
            path: path.to_path_buf(),
            reason,
        }
    }
}

/// 读入章节中引用的本地图片
///
/// 图片序号是 `img` 元素在章节中的位置，同一地址只读一次。
fn collect_images(chapter_index: usize, html: &str, chapter_dir: &Path) -> Vec<ChapterImage> {
    let document = parse_lenient(html);
    let mut seen = HashSet::new();
    let mut images = Vec::new();

    for (ordinal, img) in document.select(&IMG_SELECTOR).enumerate() {
        let Some(src) = img.value().attr("src").map(str::trim) else {
            continue;
        };
        if src.is_empty() || !seen.insert(src.to_string()) {
            continue;
        }
        if is_remote(src) {
            warn!(chapter = chapter_index, src, "跳过远程图片");
            continue;
        }

        let path = chapter_dir.join(src);
        match fs::read(&path) {
            Ok(data) => images.push(ChapterImage::new(
                chapter_index,
                ordinal,
                src,
                media_type_of(&path),
                data,
            )),
            Err(e) => warn!(chapter = chapter_index, src, "读取图片失败: {}", e),
        }
    }

    images
}

fn is_remote(src: &str) -> bool {
    let lower = src.to_ascii_lowercase();
    ["http:", "https:", "data:", "//"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}

fn media_type_of(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(media_type_for_extension)
        .unwrap_or(FALLBACK_MEDIA_TYPE)
}
