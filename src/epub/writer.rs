//! EPUB写入器
//!
//! 串起整条装订流程：校验输入、两阶段暂存、归档。

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::epub::archive::ArchiveAssembler;
use crate::epub::config::EpubConfig;
use crate::epub::error::Result;
use crate::epub::model::Book;
use crate::epub::staging::StagingArea;

/// EPUB写入器
#[derive(Debug, Clone, Default)]
pub struct EpubWriter {
    config: EpubConfig,
}

impl EpubWriter {
    pub fn new(config: EpubConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EpubConfig {
        &self.config
    }

    /// 把书籍写成EPUB文件，修改时间取当前时间
    ///
    /// # 参数
    /// * `book` - 书籍元数据和章节
    /// * `output` - 输出文件路径
    ///
    /// # 示例
    ///
    /// ```rust,no_run
    /// use inkbind::{Book, BookMetadata, ChapterRecord, CoverImage, EpubWriter};
    ///
    /// let book = Book::new(
    ///     BookMetadata {
    ///         title: "T".to_string(),
    ///         author: "A".to_string(),
    ///         description: "D".to_string(),
    ///         cover: CoverImage::new(std::fs::read("cover.jpg")?, "image/jpeg"),
    ///     },
    ///     vec![ChapterRecord::new(1, "Ch1", "<p>Hi</p>")],
    /// );
    /// EpubWriter::default().write(&book, "T - A.epub")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn write<P: AsRef<Path>>(&self, book: &Book, output: P) -> Result<()> {
        self.write_at(book, output, Utc::now())
    }

    /// 以指定的修改时间写出EPUB，相同输入和时间得到相同内容的文档
    pub fn write_at<P: AsRef<Path>>(
        &self,
        book: &Book,
        output: P,
        modified: DateTime<Utc>,
    ) -> Result<()> {
        book.validate()?;
        info!(
            title = %book.metadata.title,
            chapters = book.chapters.len(),
            "开始装订EPUB"
        );

        let staged = StagingArea::create(&self.config)?
            .stage_chapters(&book.chapters)?
            .stage_package(&book.metadata, modified)?;
        debug!(
            root = %staged.root().display(),
            has_images = staged.facts().has_images,
            "暂存完成，开始归档"
        );

        ArchiveAssembler::new(&self.config).assemble(&staged, output.as_ref())?;

        if let Err(e) = staged.close() {
            warn!("清理暂存目录失败: {}", e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epub::error::EpubError;
    use crate::epub::model::{BookMetadata, ChapterImage, ChapterRecord, CoverImage};
    use quick_xml::events::Event;
    use quick_xml::reader::Reader;
    use std::fs::{self, File};
    use std::io::Read;
    use tempfile::tempdir;
    use zip::ZipArchive;

    fn metadata() -> BookMetadata {
        BookMetadata {
            title: "T".to_string(),
            author: "A".to_string(),
            description: "D".to_string(),
            cover: CoverImage::new(vec![0xFF, 0xD8, 0xFF, 0xE0], "image/jpeg"),
        }
    }

    fn two_chapters() -> Book {
        Book::new(
            metadata(),
            vec![
                ChapterRecord::new(1, "Ch1", "<p>Hi</p>"),
                ChapterRecord::new(2, "Ch2", "<p>Bye</p>"),
            ],
        )
    }

    fn read_entry(archive: &mut ZipArchive<File>, name: &str) -> String {
        let mut content = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        content
    }

    fn read_bytes(archive: &mut ZipArchive<File>, name: &str) -> Vec<u8> {
        let mut content = Vec::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_end(&mut content)
            .unwrap();
        content
    }

    fn entry_names(archive: &mut ZipArchive<File>) -> Vec<String> {
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    /// 收集指定元素内的文本
    fn texts_of(xml: &str, element: &[u8]) -> Vec<String> {
        let mut reader = Reader::from_str(xml);
        let mut texts = Vec::new();
        let mut current: Option<String> = None;
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) if e.local_name().as_ref() == element => {
                    current = Some(String::new());
                }
                Event::Text(e) => {
                    if let Some(text) = current.as_mut() {
                        text.push_str(&e.unescape().unwrap());
                    }
                }
                Event::End(e) if e.local_name().as_ref() == element => {
                    if let Some(text) = current.take() {
                        texts.push(text.trim().to_string());
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }
        texts
    }

    #[test]
    fn test_two_chapter_book() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("T - A.epub");
        EpubWriter::default().write(&two_chapters(), &output).unwrap();
        assert!(fs::metadata(&output).unwrap().len() > 0);

        let mut archive = ZipArchive::new(File::open(&output).unwrap()).unwrap();
        assert_eq!(
            entry_names(&mut archive),
            vec![
                "mimetype",
                "META-INF/container.xml",
                "OEBPS/content.opf",
                "OEBPS/chapter_1.xhtml",
                "OEBPS/chapter_2.xhtml",
                "style/main.css",
                "style/nav.css",
                "OEBPS/nav.xhtml",
                "OEBPS/toc.ncx",
                "cover.jpg",
            ]
        );

        let opf = read_entry(&mut archive, "OEBPS/content.opf");
        let first = opf.find("<itemref idref=\"chapter_1\"/>").unwrap();
        let second = opf.find("<itemref idref=\"chapter_2\"/>").unwrap();
        assert!(first < second);

        assert!(read_entry(&mut archive, "OEBPS/chapter_1.xhtml").contains("<p>Hi</p>"));
        assert!(read_entry(&mut archive, "OEBPS/chapter_2.xhtml").contains("<p>Bye</p>"));
        assert!(read_entry(&mut archive, "META-INF/container.xml")
            .contains("full-path=\"OEBPS/content.opf\""));
    }

    #[test]
    fn test_nav_and_ncx_stay_in_lockstep() {
        let titles = ["Prologue", "A & B", "<Interlude>", "Épilogue"];
        let chapters = titles
            .iter()
            .enumerate()
            .map(|(i, title)| ChapterRecord::new(i + 1, *title, "<p>text</p>"))
            .collect();
        let book = Book::new(metadata(), chapters);

        let dir = tempdir().unwrap();
        let output = dir.path().join("book.epub");
        EpubWriter::default().write(&book, &output).unwrap();

        let mut archive = ZipArchive::new(File::open(&output).unwrap()).unwrap();
        let nav_titles = texts_of(&read_entry(&mut archive, "OEBPS/nav.xhtml"), b"a");
        let ncx_titles = texts_of(&read_entry(&mut archive, "OEBPS/toc.ncx"), b"text");

        assert_eq!(nav_titles, titles);
        // NCX的第一个text是书名
        assert_eq!(ncx_titles[0], "T");
        assert_eq!(ncx_titles[1..], nav_titles[..]);
    }

    #[test]
    fn test_book_with_images() {
        let chapters = vec![
            ChapterRecord::new(1, "Ch1", "<p>Hi</p>"),
            ChapterRecord::new(2, "Ch2", "<p><img src=\"p.gif\" alt=\"x\"></p>").with_images(
                vec![ChapterImage::new(2, 0, "p.gif", "image/gif", b"GIF89a".to_vec())],
            ),
        ];
        let book = Book::new(metadata(), chapters);

        let dir = tempdir().unwrap();
        let output = dir.path().join("book.epub");
        EpubWriter::default().write(&book, &output).unwrap();

        let mut archive = ZipArchive::new(File::open(&output).unwrap()).unwrap();
        let names = entry_names(&mut archive);
        assert_eq!(names.last().unwrap(), "images/chapter2_img0.gif");

        let chapter = read_entry(&mut archive, "OEBPS/chapter_2.xhtml");
        assert!(chapter.contains("src=\"../images/chapter2_img0.gif\""));
        let opf = read_entry(&mut archive, "OEBPS/content.opf");
        assert!(opf.contains("media-type=\"image/gif\""));
    }

    #[test]
    fn test_same_time_same_documents() {
        let modified = Utc::now();
        let dir = tempdir().unwrap();
        let first = dir.path().join("a.epub");
        let second = dir.path().join("b.epub");
        let writer = EpubWriter::default();
        writer.write_at(&two_chapters(), &first, modified).unwrap();
        writer.write_at(&two_chapters(), &second, modified).unwrap();

        let mut a = ZipArchive::new(File::open(&first).unwrap()).unwrap();
        let mut b = ZipArchive::new(File::open(&second).unwrap()).unwrap();
        let names = entry_names(&mut a);
        assert_eq!(names, entry_names(&mut b));
        for name in &names {
            assert_eq!(read_bytes(&mut a, name), read_bytes(&mut b, name), "{}", name);
        }
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let mut book = two_chapters();
        book.metadata.title = " ".to_string();
        let dir = tempdir().unwrap();
        let output = dir.path().join("blank.epub");

        let result = EpubWriter::default().write(&book, &output);
        assert!(matches!(result, Err(EpubError::InvalidBook(_))));
        assert!(!output.exists());
    }

    #[test]
    fn test_invalid_book_writes_nothing() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("empty.epub");
        let result = EpubWriter::default().write(&Book::new(metadata(), Vec::new()), &output);
        assert!(matches!(result, Err(EpubError::InvalidBook(_))));
        assert!(!output.exists());
    }

    #[test]
    fn test_scratch_dir_is_removed() {
        let config = EpubConfig {
            scratch_prefix: "inkbind-writer-test-".to_string(),
            ..EpubConfig::default_config()
        };
        let writer = EpubWriter::new(config);
        let dir = tempdir().unwrap();

        writer.write(&two_chapters(), dir.path().join("ok.epub")).unwrap();
        let failed = writer.write(&two_chapters(), dir.path().join("missing/ko.epub"));
        assert!(failed.is_err());

        let leftovers = fs::read_dir(std::env::temp_dir())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with("inkbind-writer-test-")
            })
            .count();
        assert_eq!(leftovers, 0);
    }
}
