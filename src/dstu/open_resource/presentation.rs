//! 各资源类型的默认展示配置（默认打开位置 + 默认模式）

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::{EditorLocation, EditorMode};
use crate::dstu::types::DstuNodeType;

/// 某类型的默认展示配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorDefaults {
    pub default_location: EditorLocation,
    pub default_mode: EditorMode,
}

impl EditorDefaults {
    pub const fn new(default_location: EditorLocation, default_mode: EditorMode) -> Self {
        Self {
            default_location,
            default_mode,
        }
    }
}

/// 默认展示配置查询（同步）
pub trait PresentationDefaults: Send + Sync {
    fn lookup(&self, node_type: DstuNodeType) -> Option<EditorDefaults>;
}

/// 内置的编辑器默认配置
///
/// 文件夹没有条目：文件夹从不作为编辑器打开。
const BUILTIN_DEFAULTS: &[(DstuNodeType, EditorDefaults)] = &[
    (
        DstuNodeType::Note,
        EditorDefaults::new(EditorLocation::Panel, EditorMode::Edit),
    ),
    (
        DstuNodeType::Textbook,
        EditorDefaults::new(EditorLocation::Panel, EditorMode::View),
    ),
    (
        DstuNodeType::Exam,
        EditorDefaults::new(EditorLocation::Panel, EditorMode::Edit),
    ),
    (
        DstuNodeType::Translation,
        EditorDefaults::new(EditorLocation::Panel, EditorMode::Edit),
    ),
    (
        DstuNodeType::Essay,
        EditorDefaults::new(EditorLocation::Panel, EditorMode::Edit),
    ),
    (
        DstuNodeType::MindMap,
        EditorDefaults::new(EditorLocation::Page, EditorMode::Edit),
    ),
    (
        DstuNodeType::Image,
        EditorDefaults::new(EditorLocation::Fullscreen, EditorMode::View),
    ),
    (
        DstuNodeType::Attachment,
        EditorDefaults::new(EditorLocation::Modal, EditorMode::View),
    ),
    (
        DstuNodeType::File,
        EditorDefaults::new(EditorLocation::Modal, EditorMode::View),
    ),
];

/// 编辑器注册表：类型 → 默认展示配置
#[derive(Debug, Clone, Default)]
pub struct EditorRegistry {
    entries: HashMap<DstuNodeType, EditorDefaults>,
}

impl EditorRegistry {
    /// 空注册表
    pub fn empty() -> Self {
        Self::default()
    }

    /// 带内置默认配置的注册表
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_DEFAULTS.iter().copied().collect(),
        }
    }

    /// 在当前配置上应用覆盖项
    ///
    /// 文件夹的覆盖项会被忽略。
    pub fn with_overrides(
        mut self,
        overrides: impl IntoIterator<Item = (DstuNodeType, EditorDefaults)>,
    ) -> Self {
        for (node_type, defaults) in overrides {
            if node_type == DstuNodeType::Folder {
                log::warn!("[EditorRegistry] Ignoring presentation override for folder");
                continue;
            }
            log::debug!(
                "[EditorRegistry] Override {} -> {}/{}",
                node_type,
                defaults.default_location,
                defaults.default_mode
            );
            self.entries.insert(node_type, defaults);
        }
        self
    }

    pub fn register(&mut self, node_type: DstuNodeType, defaults: EditorDefaults) {
        self.entries.insert(node_type, defaults);
    }

    pub fn unregister(&mut self, node_type: DstuNodeType) -> Option<EditorDefaults> {
        self.entries.remove(&node_type)
    }

    pub fn supported_types(&self) -> Vec<DstuNodeType> {
        let mut types: Vec<_> = self.entries.keys().copied().collect();
        types.sort();
        types
    }
}

impl PresentationDefaults for EditorRegistry {
    fn lookup(&self, node_type: DstuNodeType) -> Option<EditorDefaults> {
        self.entries.get(&node_type).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_every_openable_type() {
        let registry = EditorRegistry::builtin();
        for t in DstuNodeType::ALL {
            if t == DstuNodeType::Folder {
                assert!(registry.lookup(t).is_none());
            } else {
                assert!(registry.lookup(t).is_some(), "missing defaults for {}", t);
            }
        }
    }

    #[test]
    fn test_overrides() {
        let registry = EditorRegistry::builtin().with_overrides([
            (
                DstuNodeType::Textbook,
                EditorDefaults::new(EditorLocation::Fullscreen, EditorMode::View),
            ),
            (
                DstuNodeType::Folder,
                EditorDefaults::new(EditorLocation::Page, EditorMode::Edit),
            ),
        ]);
        assert_eq!(
            registry.lookup(DstuNodeType::Textbook).map(|d| d.default_location),
            Some(EditorLocation::Fullscreen)
        );
        assert!(registry.lookup(DstuNodeType::Folder).is_none());
    }

    #[test]
    fn test_register_unregister() {
        let mut registry = EditorRegistry::empty();
        assert!(registry.supported_types().is_empty());
        registry.register(
            DstuNodeType::Note,
            EditorDefaults::new(EditorLocation::Page, EditorMode::View),
        );
        assert_eq!(registry.supported_types(), vec![DstuNodeType::Note]);
        assert!(registry.unregister(DstuNodeType::Note).is_some());
        assert!(registry.lookup(DstuNodeType::Note).is_none());
    }
}
