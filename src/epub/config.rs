//! 装订配置模块
//!
//! 提供装订参数的配置管理功能，支持从YAML文件加载配置。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::epub::assets::{MAIN_CSS, NAV_CSS};
use crate::epub::error::{EpubError, Result};
use crate::epub::model::BookMetadata;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "inkbind.yaml";

/// EPUB装订配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpubConfig {
    /// 书籍语言（dc:language 以及各文档的 lang 属性）
    pub language: String,
    /// 书籍唯一标识符，未设置时由标题和作者推导
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// 章节样式表内容
    pub main_css: String,
    /// 导航文档样式表内容
    pub nav_css: String,
    /// 压缩级别（Deflate，0-9），未设置时使用默认级别
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression_level: Option<i64>,
    /// 临时暂存目录的名称前缀
    pub scratch_prefix: String,
}

impl Default for EpubConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

impl EpubConfig {
    /// 从配置文件中加载装订配置
    ///
    /// # 参数
    ///
    /// * `path` - YAML配置文件路径
    ///
    /// # 返回值
    ///
    /// * `Result<Self>` - 加载成功返回配置实例，失败返回错误
    ///
    /// # 示例
    ///
    /// ```rust,no_run
    /// use inkbind::epub::EpubConfig;
    /// let config = EpubConfig::from_file("inkbind.yaml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| EpubError::ConfigError(format!("无法读取配置文件: {}", e)))?;

        serde_yml::from_str(&content)
            .map_err(|e| EpubError::ConfigError(format!("配置文件格式错误: {}", e)))
    }

    /// 生成默认配置文件
    ///
    /// # 参数
    ///
    /// * `path` - 配置文件输出路径
    ///
    /// # 返回值
    ///
    /// * `Result<()>` - 生成成功返回Ok，失败返回错误
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let yaml_content = serde_yml::to_string(&Self::default_config())
            .map_err(|e| EpubError::ConfigError(format!("序列化配置失败: {}", e)))?;

        let content_with_header = format!(
            "# inkbind 装订配置文件\n# language: 书籍语言\n# identifier: 书籍标识符，不填时由标题和作者生成 urn:uuid\n# compression_level: Deflate压缩级别，不填时使用默认级别\n\n{}",
            yaml_content
        );

        fs::write(path.as_ref(), content_with_header)
            .map_err(|e| EpubError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }

    /// 获取默认配置
    pub fn default_config() -> Self {
        Self {
            language: "en".to_string(),
            identifier: None,
            main_css: MAIN_CSS.to_string(),
            nav_css: NAV_CSS.to_string(),
            compression_level: None,
            scratch_prefix: "epub-story-".to_string(),
        }
    }

    /// 尝试从配置文件加载，文件不存在时返回默认配置
    ///
    /// 文件存在但内容有误时仍然返回错误。
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default_config())
        }
    }

    /// 书籍的唯一标识符
    ///
    /// 配置中显式给出时直接使用；否则用标题和作者生成确定性的v5 UUID，
    /// 同一本书重复装订得到同一个标识符。
    pub fn identifier_for(&self, metadata: &BookMetadata) -> String {
        match &self.identifier {
            Some(identifier) if !identifier.trim().is_empty() => identifier.clone(),
            _ => {
                let name = format!("{}\u{1f}{}", metadata.title, metadata.author);
                let uuid = Uuid::new_v5(&Uuid::NAMESPACE_URL, name.as_bytes());
                format!("urn:uuid:{}", uuid)
            }
        }
    }
}
