//! 静态资源与包内路径
//!
//! 样式表文本、媒体类型和EPUB包内的固定路径都是静态配置数据。

/// mimetype条目的内容（不能带换行）
pub const EPUB_MIMETYPE: &str = "application/epub+zip";

pub const MIMETYPE_PATH: &str = "mimetype";
pub const CONTAINER_PATH: &str = "META-INF/container.xml";
pub const PACKAGE_PATH: &str = "OEBPS/content.opf";
pub const NAV_PATH: &str = "OEBPS/nav.xhtml";
pub const NCX_PATH: &str = "OEBPS/toc.ncx";
pub const MAIN_CSS_PATH: &str = "style/main.css";
pub const NAV_CSS_PATH: &str = "style/nav.css";
pub const IMAGES_DIR: &str = "images";

/// 包内目录结构
pub const LAYOUT_DIRS: [&str; 3] = ["META-INF", "OEBPS", "style"];

pub const XHTML_MEDIA_TYPE: &str = "application/xhtml+xml";
pub const CSS_MEDIA_TYPE: &str = "text/css";
pub const NCX_MEDIA_TYPE: &str = "application/x-dtbncx+xml";
pub const PACKAGE_MEDIA_TYPE: &str = "application/oebps-package+xml";

pub const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";
pub const OPS_NS: &str = "http://www.idpf.org/2007/ops";

/// 章节正文样式
pub const MAIN_CSS: &str = r#"@namespace epub "http://www.idpf.org/2007/ops";

body {
    font-family: Verdana, Helvetica, Arial, sans-serif;
}

h1 {
    text-align: center;
}

h2 {
    text-align: left;
    font-weight: bold;
}

ol {
    list-style-type: none;
    margin: 0;
}

ol > li {
    margin-top: 0.3em;
}

ol > li > span {
    font-weight: bold;
}

ol > li > ol {
    margin-left: 0.5em;
}

.spoiler {
    padding-left: 0.4em;
    border-left: 0.2em solid #c7ccd1;
}
"#;

/// 导航文档样式
pub const NAV_CSS: &str = r#"nav ol {
    list-style-type: none;
    padding-left: 0;
}
"#;

/// 封面文件扩展名：png、gif，其余一律按jpg处理
pub fn cover_extension(media_type: &str) -> &'static str {
    match media_type {
        "image/png" => "png",
        "image/gif" => "gif",
        _ => "jpg",
    }
}

/// 章节插图的文件扩展名
pub fn image_extension(media_type: &str) -> &'static str {
    match media_type {
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "image/bmp" => "bmp",
        _ => "jpg",
    }
}

/// 根据文件扩展名推断图片的媒体类型
pub fn media_type_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}
