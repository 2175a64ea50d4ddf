//! 打开资源相关的类型：位置、模式、打开选项

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dstu::error::DstuError;
use crate::dstu::types::DstuNode;

/// 打开位置（资源的展示上下文）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorLocation {
    /// 内嵌面板
    Panel,
    /// 完整页面路由
    Page,
    /// 全屏查看器
    Fullscreen,
    /// 模态框
    Modal,
}

impl EditorLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorLocation::Panel => "panel",
            EditorLocation::Page => "page",
            EditorLocation::Fullscreen => "fullscreen",
            EditorLocation::Modal => "modal",
        }
    }
}

impl std::fmt::Display for EditorLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditorLocation {
    type Err = DstuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "panel" => Ok(EditorLocation::Panel),
            "page" => Ok(EditorLocation::Page),
            "fullscreen" => Ok(EditorLocation::Fullscreen),
            "modal" => Ok(EditorLocation::Modal),
            other => Err(DstuError::validation(format!("Unknown editor location: {}", other))
                .with_location(other)),
        }
    }
}

/// 交互模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    View,
    Edit,
}

impl std::fmt::Display for EditorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditorMode::View => f.write_str("view"),
            EditorMode::Edit => f.write_str("edit"),
        }
    }
}

/// 打开选项
///
/// `location` 保留为字符串：选项通常来自 IPC/JSON，无法识别的值需要在分发时
/// 以 `VALIDATION` 错误报告，而不是在反序列化阶段丢失。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenResourceOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<EditorMode>,
    /// 只读：强制 view 模式，优先于 `mode`
    #[serde(default)]
    pub read_only: bool,
}

impl OpenResourceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn at(self, location: EditorLocation) -> Self {
        self.location(location.as_str())
    }

    pub fn mode(mut self, mode: EditorMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}

/// 打开目标：路径（需要解析）或已解析的节点
#[derive(Debug, Clone)]
pub enum OpenTarget {
    Path(String),
    Node(DstuNode),
}

impl OpenTarget {
    /// 用于日志和错误上下文的路径
    pub fn path(&self) -> &str {
        match self {
            OpenTarget::Path(path) => path,
            OpenTarget::Node(node) => &node.path,
        }
    }
}

impl From<&str> for OpenTarget {
    fn from(path: &str) -> Self {
        OpenTarget::Path(path.to_string())
    }
}

impl From<String> for OpenTarget {
    fn from(path: String) -> Self {
        OpenTarget::Path(path)
    }
}

impl From<DstuNode> for OpenTarget {
    fn from(node: DstuNode) -> Self {
        OpenTarget::Node(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_location_from_str() {
        assert_eq!("panel".parse::<EditorLocation>().unwrap(), EditorLocation::Panel);
        assert_eq!("modal".parse::<EditorLocation>().unwrap(), EditorLocation::Modal);
        let err = "bogus".parse::<EditorLocation>().unwrap_err();
        assert_matches!(err, DstuError::Validation { .. });
        assert_eq!(err.context().location.as_deref(), Some("bogus"));
    }

    #[test]
    fn test_options_deserialize() {
        let options: OpenResourceOptions =
            serde_json::from_str(r#"{"location":"bogus","mode":"edit","readOnly":true}"#).unwrap();
        assert_eq!(options.location.as_deref(), Some("bogus"));
        assert_eq!(options.mode, Some(EditorMode::Edit));
        assert!(options.read_only);

        let options: OpenResourceOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, OpenResourceOptions::default());
    }

    #[test]
    fn test_options_builder() {
        let options = OpenResourceOptions::new()
            .at(EditorLocation::Fullscreen)
            .mode(EditorMode::View);
        assert_eq!(options.location.as_deref(), Some("fullscreen"));
        assert_eq!(options.mode, Some(EditorMode::View));
        assert!(!options.read_only);
    }
}
