//! 归档装配
//!
//! 把暂存目录写成一个EPUB（zip）文件。第一个条目必须是未压缩的
//! `mimetype`，其余条目按暂存时记录的顺序压缩写入。
//! 归档先写到输出目录下的临时文件，全部成功后再原子地改名为目标文件，
//! 失败时目标路径上不会留下残缺的文件。

use std::fs;
use std::io::{self, Seek, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::epub::assets::{EPUB_MIMETYPE, MIMETYPE_PATH};
use crate::epub::config::EpubConfig;
use crate::epub::error::{EpubError, Result};
use crate::epub::staging::StagedBook;

/// EPUB归档装配器
#[derive(Debug, Clone, Default)]
pub struct ArchiveAssembler {
    /// Deflate压缩级别，`None` 时使用zip的默认级别
    compression_level: Option<i64>,
}

impl ArchiveAssembler {
    pub fn new(config: &EpubConfig) -> Self {
        Self {
            compression_level: config.compression_level,
        }
    }

    /// 把暂存好的书籍写成EPUB文件
    ///
    /// # 参数
    /// * `book` - 已完成两阶段暂存的书籍
    /// * `output` - 目标文件路径
    ///
    /// # 返回值
    /// * `Result<()>` - 成功时目标文件已完整写入；失败时目标路径保持原状
    pub fn assemble(&self, book: &StagedBook, output: &Path) -> Result<()> {
        let target = output.display().to_string();
        let parent = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp =
            output_temp_file(parent).map_err(|e| EpubError::archive(target.as_str(), e))?;
        self.write_archive(book, temp.as_file_mut())?;

        temp.persist(output)
            .map_err(|e| EpubError::archive(target.as_str(), e.error))?;
        info!(path = %target, entries = book.entries().len() + 1, "EPUB已生成");
        Ok(())
    }

    fn write_archive<W: Write + Seek>(&self, book: &StagedBook, writer: W) -> Result<()> {
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(self.compression_level);

        let mut zip = ZipWriter::new(writer);
        write_entry(&mut zip, MIMETYPE_PATH, stored, EPUB_MIMETYPE.as_bytes())?;

        for entry in book.entries() {
            let data = fs::read(book.path_of(entry))
                .map_err(|e| EpubError::archive(entry.as_str(), e))?;
            write_entry(&mut zip, entry, deflated, &data)?;
        }

        zip.finish()
            .map_err(|e| EpubError::archive("central directory", e))?;
        Ok(())
    }
}

/// 输出目录下的临时文件，权限与普通新建文件相同（受umask约束）
fn output_temp_file(parent: &Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".inkbind-").suffix(".epub.tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(parent)
}

fn write_entry<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    options: SimpleFileOptions,
    data: &[u8],
) -> Result<()> {
    zip.start_file(name, options)
        .map_err(|e| EpubError::archive(name, e))?;
    zip.write_all(data).map_err(|e| EpubError::archive(name, e))?;
    debug!(entry = name, bytes = data.len(), "写入归档条目");
    Ok(())
}
