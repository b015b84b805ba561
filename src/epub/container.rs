use crate::epub::assets::{PACKAGE_MEDIA_TYPE, PACKAGE_PATH};
use crate::epub::error::{DocumentKind, Result};
use crate::epub::xml::XmlDocument;

const CONTAINER_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:container";

/// Container.xml中的rootfile信息
#[derive(Debug, Clone)]
pub struct RootFile {
    pub full_path: String,
    pub media_type: String,
}

/// META-INF/container.xml，声明包文档的位置
#[derive(Debug, Clone)]
pub struct Container {
    pub rootfiles: Vec<RootFile>,
}

impl Container {
    /// 指向 `OEBPS/content.opf` 的标准容器描述
    pub fn for_package() -> Self {
        Self {
            rootfiles: vec![RootFile {
                full_path: PACKAGE_PATH.to_string(),
                media_type: PACKAGE_MEDIA_TYPE.to_string(),
            }],
        }
    }

    /// 序列化为container.xml内容
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut doc = XmlDocument::new(DocumentKind::Container)?;
        doc.start("container", &[("xmlns", CONTAINER_NS), ("version", "1.0")])?;
        doc.start("rootfiles", &[])?;
        for rootfile in &self.rootfiles {
            doc.empty(
                "rootfile",
                &[
                    ("full-path", rootfile.full_path.as_str()),
                    ("media-type", rootfile.media_type.as_str()),
                ],
            )?;
        }
        doc.end("rootfiles")?;
        doc.end("container")?;
        doc.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::events::Event;
    use quick_xml::reader::Reader;

    #[test]
    fn test_container_points_to_package() {
        let xml = Container::for_package().to_xml().unwrap();
        let xml = String::from_utf8(xml).unwrap();

        let mut reader = Reader::from_str(&xml);
        let mut rootfiles = Vec::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Empty(e) if e.local_name().as_ref() == b"rootfile" => {
                    let full_path = e.try_get_attribute("full-path").unwrap().unwrap();
                    let media_type = e.try_get_attribute("media-type").unwrap().unwrap();
                    rootfiles.push((
                        String::from_utf8(full_path.value.to_vec()).unwrap(),
                        String::from_utf8(media_type.value.to_vec()).unwrap(),
                    ));
                }
                Event::Eof => break,
                _ => {}
            }
        }

        assert_eq!(
            rootfiles,
            vec![(
                "OEBPS/content.opf".to_string(),
                "application/oebps-package+xml".to_string()
            )]
        );
        assert!(xml.contains("xmlns=\"urn:oasis:names:tc:opendocument:xmlns:container\""));
    }
}
