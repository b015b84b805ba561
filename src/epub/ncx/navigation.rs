//! NCX导航元素数据结构定义
//!
//! 定义NCX文件中的导航点、导航标签、内容引用等元素。

use crate::epub::model::{chapter_id, NavEntry};

/// NCX头部元数据
#[derive(Debug, Clone)]
pub struct NcxMetadata {
    /// 唯一标识符（dtb:uid），与包文档的dc:identifier一致
    pub uid: String,
    /// 导航深度（dtb:depth）
    pub depth: u32,
    /// 总页数（dtb:totalPageCount）
    pub total_page_count: u32,
    /// 最大页码（dtb:maxPageNumber）
    pub max_page_number: u32,
}

impl NcxMetadata {
    /// 单层目录、无页码列表的元数据
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            depth: 1,
            total_page_count: 0,
            max_page_number: 0,
        }
    }

    /// 按输出顺序排列的 (name, content) 对
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("dtb:uid", self.uid.clone()),
            ("dtb:depth", self.depth.to_string()),
            ("dtb:totalPageCount", self.total_page_count.to_string()),
            ("dtb:maxPageNumber", self.max_page_number.to_string()),
        ]
    }
}

/// 文档标题
#[derive(Debug, Clone)]
pub struct DocTitle {
    /// 标题文本
    pub text: String,
}

impl DocTitle {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// 导航标签
#[derive(Debug, Clone)]
pub struct NavLabel {
    /// 标签文本
    pub text: String,
}

/// 导航内容引用
#[derive(Debug, Clone)]
pub struct NavContent {
    /// 源文件路径
    pub src: String,
}

/// 导航点
#[derive(Debug, Clone)]
pub struct NavPoint {
    /// 唯一标识符
    pub id: String,
    /// 播放顺序，从1开始
    pub play_order: u32,
    /// 导航标签
    pub nav_label: NavLabel,
    /// 内容引用
    pub content: NavContent,
}

impl NavPoint {
    /// 由目录条目生成第 `play_order` 个导航点
    pub fn from_entry(play_order: u32, entry: &NavEntry) -> Self {
        Self {
            id: chapter_id(play_order as usize),
            play_order,
            nav_label: NavLabel {
                text: entry.title.clone(),
            },
            content: NavContent {
                src: entry.href.clone(),
            },
        }
    }
}

/// 导航地图
#[derive(Debug, Clone, Default)]
pub struct NavMap {
    /// 导航点列表
    pub nav_points: Vec<NavPoint>,
}

impl NavMap {
    /// 按条目顺序生成导航点，playOrder依次为1..n
    pub fn from_entries(entries: &[NavEntry]) -> Self {
        let nav_points = entries
            .iter()
            .zip(1u32..)
            .map(|(entry, play_order)| NavPoint::from_entry(play_order, entry))
            .collect();
        Self { nav_points }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_map_play_order() {
        let entries = vec![
            NavEntry::new("chapter_1.xhtml", "一"),
            NavEntry::new("chapter_2.xhtml", "二"),
            NavEntry::new("chapter_3.xhtml", "三"),
        ];
        let nav_map = NavMap::from_entries(&entries);

        let orders: Vec<u32> = nav_map.nav_points.iter().map(|p| p.play_order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert_eq!(nav_map.nav_points[2].id, "chapter_3");
        assert_eq!(nav_map.nav_points[2].content.src, "chapter_3.xhtml");
        let titles: Vec<&str> = nav_map
            .nav_points
            .iter()
            .map(|p| p.nav_label.text.as_str())
            .collect();
        assert_eq!(titles, vec!["一", "二", "三"]);
    }

    #[test]
    fn test_metadata_entries() {
        let metadata = NcxMetadata::new("urn:uuid:1");
        let entries = metadata.entries();
        assert_eq!(entries[0], ("dtb:uid", "urn:uuid:1".to_string()));
        assert_eq!(entries[1], ("dtb:depth", "1".to_string()));
        assert_eq!(entries.len(), 4);
    }
}
