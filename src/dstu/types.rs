//! DSTU 访达协议层类型定义
//!
//! 本模块定义 DSTU 协议的核心类型，包括：
//! - `DstuNodeType`: 节点类型枚举（即资源类型标签）
//! - `DstuNode`: 资源节点（由外部存储层产生，本 crate 只读取 `node_type` 和 `path`）

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// 节点类型枚举
// ============================================================================

/// DSTU 节点类型
///
/// 封闭的资源类型集合，序列化为小写字符串。每个类型（除无前缀的类型外）
/// 都绑定到 `path_types::RESOURCE_ID_PREFIXES` 中唯一的 ID 前缀。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DstuNodeType {
    /// 文件夹
    Folder,
    /// 笔记
    Note,
    /// 教材
    Textbook,
    /// 题目集识别
    Exam,
    /// 翻译
    Translation,
    /// 作文批改
    Essay,
    /// 附件
    Attachment,
    /// 图片
    Image,
    /// 文件
    File,
    /// 知识导图
    MindMap,
}

impl DstuNodeType {
    /// 所有类型（稳定顺序）
    pub const ALL: [DstuNodeType; 10] = [
        DstuNodeType::Folder,
        DstuNodeType::Note,
        DstuNodeType::Textbook,
        DstuNodeType::Exam,
        DstuNodeType::Translation,
        DstuNodeType::Essay,
        DstuNodeType::Attachment,
        DstuNodeType::Image,
        DstuNodeType::File,
        DstuNodeType::MindMap,
    ];

    /// 从字符串解析节点类型
    ///
    /// 接受单复数和中文别名（如 "notes"、"笔记"）。
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "folder" | "folders" | "文件夹" => Some(DstuNodeType::Folder),
            "note" | "notes" | "笔记" => Some(DstuNodeType::Note),
            "textbook" | "textbooks" | "教材" => Some(DstuNodeType::Textbook),
            "exam" | "exams" | "题目集" | "试卷" => Some(DstuNodeType::Exam),
            "translation" | "translations" | "翻译" => Some(DstuNodeType::Translation),
            "essay" | "essays" | "作文" | "作文批改" => Some(DstuNodeType::Essay),
            "attachment" | "attachments" | "附件" => Some(DstuNodeType::Attachment),
            "image" | "images" | "图片" => Some(DstuNodeType::Image),
            "file" | "files" | "文件" => Some(DstuNodeType::File),
            "mindmap" | "mindmaps" | "知识导图" | "导图" => Some(DstuNodeType::MindMap),
            _ => None,
        }
    }

    /// 规范名称（与序列化结果一致）
    pub fn as_str(&self) -> &'static str {
        match self {
            DstuNodeType::Folder => "folder",
            DstuNodeType::Note => "note",
            DstuNodeType::Textbook => "textbook",
            DstuNodeType::Exam => "exam",
            DstuNodeType::Translation => "translation",
            DstuNodeType::Essay => "essay",
            DstuNodeType::Attachment => "attachment",
            DstuNodeType::Image => "image",
            DstuNodeType::File => "file",
            DstuNodeType::MindMap => "mindmap",
        }
    }

    /// 获取预览类型
    pub fn preview_type(&self) -> &'static str {
        match self {
            DstuNodeType::Folder => "none",
            DstuNodeType::Note => "markdown",
            DstuNodeType::Textbook => "pdf",
            DstuNodeType::Exam => "exam",
            DstuNodeType::Translation => "markdown",
            DstuNodeType::Essay => "markdown",
            DstuNodeType::Attachment => "none",
            DstuNodeType::Image => "image",
            DstuNodeType::File => "none",
            DstuNodeType::MindMap => "mindmap",
        }
    }
}

impl std::fmt::Display for DstuNodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// 资源节点
// ============================================================================

/// DSTU 资源节点
///
/// 由节点解析器（存储层）产生。分发层只依赖 `node_type` 和 `path`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DstuNode {
    /// 节点 ID（资源 ID）
    pub id: String,

    /// 规范路径，如 "/高考复习/函数/note_abc123"
    pub path: String,

    /// 显示名称
    pub name: String,

    /// 节点类型
    #[serde(rename = "type")]
    pub node_type: DstuNodeType,

    /// 内容大小（字节）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// 创建时间（毫秒时间戳）
    pub created_at: i64,

    /// 更新时间（毫秒时间戳）
    pub updated_at: i64,

    /// 资源内容 hash
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_hash: Option<String>,

    /// 预览类型（markdown | pdf | exam | image | mindmap | none）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_type: Option<String>,

    /// 扩展元数据
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl DstuNode {
    /// 创建文件夹节点
    pub fn folder(id: impl Into<String>, path: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, path, name, DstuNodeType::Folder)
    }

    /// 创建资源节点
    pub fn resource(
        id: impl Into<String>,
        path: impl Into<String>,
        name: impl Into<String>,
        node_type: DstuNodeType,
    ) -> Self {
        Self::new(id, path, name, node_type)
    }

    fn new(
        id: impl Into<String>,
        path: impl Into<String>,
        name: impl Into<String>,
        node_type: DstuNodeType,
    ) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: id.into(),
            path: path.into(),
            name: name.into(),
            node_type,
            size: None,
            created_at: now,
            updated_at: now,
            resource_hash: None,
            preview_type: Some(node_type.preview_type().to_string()),
            metadata: None,
        }
    }

    /// 设置时间戳
    pub fn with_timestamps(mut self, created_at: i64, updated_at: i64) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    /// 设置资源 hash
    pub fn with_resource_hash(mut self, hash: impl Into<String>) -> Self {
        self.resource_hash = Some(hash.into());
        self
    }

    pub fn is_folder(&self) -> bool {
        self.node_type == DstuNodeType::Folder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_from_str() {
        assert_eq!(DstuNodeType::from_str("note"), Some(DstuNodeType::Note));
        assert_eq!(DstuNodeType::from_str("Notes"), Some(DstuNodeType::Note));
        assert_eq!(DstuNodeType::from_str("教材"), Some(DstuNodeType::Textbook));
        assert_eq!(
            DstuNodeType::from_str("attachment"),
            Some(DstuNodeType::Attachment)
        );
        assert_eq!(DstuNodeType::from_str("retrieval"), None);
    }

    #[test]
    fn test_node_type_display_matches_serde() {
        for t in DstuNodeType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t));
            assert_eq!(DstuNodeType::from_str(t.as_str()), Some(t));
        }
    }

    #[test]
    fn test_node_serialization() {
        let node = DstuNode::resource("note_1", "/数学/note_1", "函数笔记", DstuNodeType::Note)
            .with_timestamps(1, 2)
            .with_resource_hash("abc");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "note");
        assert_eq!(json["path"], "/数学/note_1");
        assert_eq!(json["createdAt"], 1);
        assert_eq!(json["resourceHash"], "abc");
        assert_eq!(json["previewType"], "markdown");
        assert!(json.get("size").is_none());
    }

    #[test]
    fn test_folder_node() {
        let node = DstuNode::folder("fld_1", "/高考复习", "高考复习");
        assert!(node.is_folder());
        assert_eq!(node.preview_type.as_deref(), Some("none"));
    }
}
