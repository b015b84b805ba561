//! 暂存目录管理
//!
//! 一次装订独占一个临时目录，目录结构与最终EPUB包一致：
//!
//! ```text
//! META-INF/container.xml
//! OEBPS/content.opf, nav.xhtml, toc.ncx, chapter_<n>.xhtml
//! style/main.css, style/nav.css
//! cover.<ext>
//! images/*
//! ```
//!
//! 暂存分两个阶段：先写入全部章节并收集章节数、插图等事实，
//! 再据此写入包文档、导航文档和NCX。两个阶段用不同的类型表示，
//! 包文档无法在章节暂存之前生成。目录由 [`TempDir`] 持有，
//! 无论成功还是出错，值被丢弃时目录都会被删除。

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::TempDir;
use tracing::{debug, info};

use crate::epub::assets::{
    CONTAINER_PATH, IMAGES_DIR, LAYOUT_DIRS, MAIN_CSS_PATH, NAV_CSS_PATH, NAV_PATH, NCX_PATH,
    PACKAGE_PATH,
};
use crate::epub::chapter::ChapterDocument;
use crate::epub::config::EpubConfig;
use crate::epub::container::Container;
use crate::epub::error::{EpubError, Result};
use crate::epub::model::{BookMetadata, ChapterRecord, NavEntry};
use crate::epub::nav::NavDocument;
use crate::epub::ncx::Ncx;
use crate::epub::opf::{
    Creator, Identifier, ManifestItem, Metadata, PackageDocument, COVER_ID,
};

const IDENTIFIER_ID: &str = "id";
const CREATOR_ID: &str = "creator";

/// 章节暂存完成后才能确定的信息
#[derive(Debug, Clone, Default)]
pub struct ChapterFacts {
    /// 章节总数
    pub chapter_count: usize,
    /// 是否有章节带插图
    pub has_images: bool,
    /// 插图对应的清单项
    pub images: Vec<ManifestItem>,
    /// 目录条目，导航文档和NCX共用
    pub nav_entries: Vec<NavEntry>,
}

/// 刚创建、尚未写入章节的暂存目录
#[derive(Debug)]
pub struct StagingArea {
    dir: TempDir,
    config: EpubConfig,
}

impl StagingArea {
    /// 创建临时目录和固定的子目录结构，并写入与书籍内容无关的文件
    ///
    /// # 参数
    /// * `config` - 装订配置（语言、样式表、目录前缀）
    pub fn create(config: &EpubConfig) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(&config.scratch_prefix)
            .tempdir()
            .map_err(|source| EpubError::StagingIo {
                path: std::env::temp_dir(),
                source,
            })?;
        debug!(path = %dir.path().display(), "创建暂存目录");

        let area = Self {
            dir,
            config: config.clone(),
        };

        for sub in LAYOUT_DIRS {
            area.create_dir(sub)?;
        }
        area.write(CONTAINER_PATH, &Container::for_package().to_xml()?)?;
        area.write(MAIN_CSS_PATH, area.config.main_css.as_bytes())?;
        area.write(NAV_CSS_PATH, area.config.nav_css.as_bytes())?;
        Ok(area)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// 第一阶段：写入全部章节文档和章节插图
    ///
    /// 任何一章失败都会终止暂存，暂存目录随之删除。
    pub fn stage_chapters(self, chapters: &[ChapterRecord]) -> Result<StagedChapters> {
        let mut facts = ChapterFacts {
            chapter_count: chapters.len(),
            ..ChapterFacts::default()
        };

        let mut chapter_entries = Vec::with_capacity(chapters.len());
        for chapter in chapters {
            let document = ChapterDocument::from_record(chapter, &self.config.language)?;
            let path = format!("OEBPS/{}", chapter.file_name());
            self.write(&path, &document.to_xml()?)?;
            debug!(index = chapter.index, title = %chapter.title, "章节已暂存");
            facts.nav_entries.push(chapter.nav_entry());
            chapter_entries.push(path);
        }

        let mut image_entries = Vec::new();
        for image in chapters.iter().flat_map(|c| c.images.iter()) {
            if !facts.has_images {
                self.create_dir(IMAGES_DIR)?;
                facts.has_images = true;
            }
            let path = format!("{}/{}", IMAGES_DIR, image.file_name);
            self.write(&path, &image.data)?;
            facts
                .images
                .push(PackageDocument::image_item(facts.images.len() + 1, image));
            image_entries.push(path);
        }

        info!(
            chapters = facts.chapter_count,
            images = facts.images.len(),
            "章节暂存完成"
        );

        Ok(StagedChapters {
            area: self,
            facts,
            chapter_entries,
            image_entries,
        })
    }

    fn create_dir(&self, relative: &str) -> Result<()> {
        let path = self.root().join(relative);
        fs::create_dir_all(&path).map_err(|source| EpubError::StagingIo { path, source })
    }

    fn write(&self, relative: &str, bytes: &[u8]) -> Result<()> {
        let path = self.root().join(relative);
        fs::write(&path, bytes).map_err(|source| EpubError::StagingIo { path, source })
    }
}

/// 章节已暂存、等待写入包文档的暂存目录
#[derive(Debug)]
pub struct StagedChapters {
    area: StagingArea,
    facts: ChapterFacts,
    chapter_entries: Vec<String>,
    image_entries: Vec<String>,
}

impl StagedChapters {
    pub fn facts(&self) -> &ChapterFacts {
        &self.facts
    }

    pub fn root(&self) -> &Path {
        self.area.root()
    }

    /// 第二阶段：写入包文档、导航文档、NCX和封面，并确定归档顺序
    ///
    /// # 参数
    /// * `metadata` - 书籍元数据
    /// * `modified` - 写入 `dcterms:modified` 的构建时间
    pub fn stage_package(self, metadata: &BookMetadata, modified: DateTime<Utc>) -> Result<StagedBook> {
        let Self {
            area,
            facts,
            chapter_entries,
            image_entries,
        } = self;

        let identifier = area.config.identifier_for(metadata);
        let package = PackageDocument::new(
            Metadata {
                identifier: Identifier {
                    value: identifier.clone(),
                    id: IDENTIFIER_ID.to_string(),
                },
                title: metadata.title.clone(),
                language: area.config.language.clone(),
                creator: Creator {
                    name: metadata.author.clone(),
                    id: CREATOR_ID.to_string(),
                },
                description: metadata.description.clone(),
                cover_id: COVER_ID.to_string(),
                modified,
            },
            facts.chapter_count,
            &metadata.cover.media_type,
            facts.images.clone(),
        );
        area.write(PACKAGE_PATH, &package.to_xml()?)?;

        let nav = NavDocument::new(
            metadata.title.clone(),
            area.config.language.clone(),
            facts.nav_entries.clone(),
        );
        area.write(NAV_PATH, &nav.to_xml()?)?;

        let ncx = Ncx::new(metadata.title.clone(), identifier, &facts.nav_entries);
        area.write(NCX_PATH, &ncx.to_xml()?)?;

        let cover = metadata.cover.file_name();
        area.write(&cover, &metadata.cover.data)?;

        let mut entries = vec![CONTAINER_PATH.to_string(), PACKAGE_PATH.to_string()];
        entries.extend(chapter_entries);
        entries.extend(
            [MAIN_CSS_PATH, NAV_CSS_PATH, NAV_PATH, NCX_PATH]
                .into_iter()
                .map(str::to_string),
        );
        entries.push(cover);
        entries.extend(image_entries);

        info!(entries = entries.len(), "包文档暂存完成");
        Ok(StagedBook {
            area,
            facts,
            entries,
        })
    }
}

/// 全部文件已暂存、可以归档的暂存目录
#[derive(Debug)]
pub struct StagedBook {
    area: StagingArea,
    facts: ChapterFacts,
    /// 按归档顺序排列的条目，不含mimetype
    entries: Vec<String>,
}

impl StagedBook {
    pub fn root(&self) -> &Path {
        self.area.root()
    }

    pub fn facts(&self) -> &ChapterFacts {
        &self.facts
    }

    /// 按归档顺序排列的条目（相对路径，不含mimetype）
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// 条目在暂存目录中的完整路径
    pub fn path_of(&self, entry: &str) -> PathBuf {
        self.root().join(entry)
    }

    /// 删除暂存目录并报告删除失败
    pub fn close(self) -> Result<()> {
        let path = self.root().to_path_buf();
        self.area
            .dir
            .close()
            .map_err(|source| EpubError::StagingIo { path, source })
    }
}
