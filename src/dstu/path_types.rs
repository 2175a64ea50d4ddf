//! DSTU 路径类型定义
//!
//! 本模块定义 DSTU 路径架构的核心类型和语法常量，支持文件夹层级路径。
//!
//! ## 路径格式
//! ```text
//! /{folder_path}/{resource_id}
//!
//! 示例：
//! - /高考复习/函数/note_abc123    ← 在"高考复习/函数"文件夹下的笔记
//! - /我的教材/tb_xyz789           ← 在"我的教材"文件夹下的教材
//! - /exam_sheet_001               ← 根目录下的题目集（无文件夹）
//! - /                             ← 根目录
//! - /@trash                       ← 回收站（虚拟路径）
//! - /@recent/note_abc123          ← 最近使用中的笔记（虚拟路径）
//! ```
//!
//! ## 资源 ID 前缀规范
//! - `note_xxx` → 笔记
//! - `tb_xxx` → 教材
//! - `exam_xxx` → 题目集
//! - `tr_xxx` → 翻译
//! - `essay_xxx` → 作文
//! - `fld_xxx` → 文件夹
//! - `att_xxx` → 附件
//! - `img_xxx` → 图片
//! - `file_xxx` → 文件
//! - `mm_xxx` → 思维导图

use serde::{Deserialize, Serialize};

use super::error::{DstuError, DstuResult};
use super::types::DstuNodeType;

// ============================================================================
// 路径和资源 ID 长度限制
// ============================================================================

/// 资源 ID 最大长度（按 Unicode 字符计）
///
/// 安全限制：防止超长资源 ID 进入前缀扫描
pub const MAX_RESOURCE_ID_LENGTH: usize = 128;

/// 路径分隔符
pub const PATH_SEPARATOR: char = '/';

/// 虚拟路径段前缀（`/@trash` 中的 `@`）
pub const VIRTUAL_SEGMENT_MARKER: char = '@';

// ============================================================================
// 路径解析结果
// ============================================================================

/// 解析后的 DSTU 路径
///
/// # 示例
/// ```text
/// 路径: /高考复习/函数/note_abc123
/// 解析结果:
///   full_path: "/高考复习/函数/note_abc123"
///   folder_path: Some("/高考复习/函数")
///   resource_id: Some("note_abc123")
///   resource_type: Some(Note)
///   is_root: false
///   is_virtual: false
/// ```
///
/// 不变量：`resource_id` 有值时 `resource_type` 必有值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedPath {
    /// 完整路径（规范化后，总以 `/` 开头）
    pub full_path: String,

    /// 文件夹部分（不含资源 ID）
    /// - `/高考复习/函数/note_abc` → Some("/高考复习/函数")
    /// - `/note_abc` → None（根目录）
    /// - `/` → None
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_path: Option<String>,

    /// 资源 ID（最后一段，符合 ID 前缀规范）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,

    /// 资源类型（从 ID 前缀推断，不单独存储）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<DstuNodeType>,

    /// 是否为根目录
    pub is_root: bool,

    /// 是否为虚拟路径（@trash, @recent, @favorites, @all）
    pub is_virtual: bool,

    /// 虚拟路径类型（仅当 is_virtual 为 true 时有效）
    /// - `/@trash` → Some("trash")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_type: Option<String>,
}

impl ParsedPath {
    /// 创建根目录路径
    pub fn root() -> Self {
        Self {
            full_path: "/".to_string(),
            folder_path: None,
            resource_id: None,
            resource_type: None,
            is_root: true,
            is_virtual: false,
            virtual_type: None,
        }
    }

    /// 创建虚拟路径
    ///
    /// `full_path` 必须是已规范化的路径；`resource_id` 仅在能推断出类型时保留。
    pub fn virtual_path(full_path: &str, virtual_type: &str, resource_id: Option<&str>) -> Self {
        let (resource_id, resource_type) = match resource_id.and_then(|id| {
            infer_type(id).map(|t| (id.to_string(), t))
        }) {
            Some((id, t)) => (Some(id), Some(t)),
            None => (None, None),
        };

        Self {
            full_path: full_path.to_string(),
            folder_path: None,
            resource_id,
            resource_type,
            is_root: false,
            is_virtual: true,
            virtual_type: Some(virtual_type.to_lowercase()),
        }
    }

    /// 创建文件夹路径（无资源）
    pub fn folder(folder_path: &str) -> Self {
        let full_path = if folder_path.is_empty() || folder_path == "/" {
            "/".to_string()
        } else if folder_path.starts_with('/') {
            folder_path.to_string()
        } else {
            format!("/{}", folder_path)
        };

        let is_root = full_path == "/";
        Self {
            folder_path: if is_root {
                None
            } else {
                Some(full_path.clone())
            },
            full_path,
            resource_id: None,
            resource_type: None,
            is_root,
            is_virtual: false,
            virtual_type: None,
        }
    }

    /// 创建资源路径
    pub fn resource(
        folder_path: Option<&str>,
        resource_id: &str,
        resource_type: DstuNodeType,
    ) -> Self {
        let folder_path = folder_path
            .map(|fp| fp.trim_end_matches('/'))
            .filter(|fp| !fp.is_empty())
            .map(|fp| {
                if fp.starts_with('/') {
                    fp.to_string()
                } else {
                    format!("/{}", fp)
                }
            });

        let full_path = match folder_path {
            Some(ref fp) => format!("{}/{}", fp, resource_id),
            None => format!("/{}", resource_id),
        };

        Self {
            full_path,
            folder_path,
            resource_id: Some(resource_id.to_string()),
            resource_type: Some(resource_type),
            is_root: false,
            is_virtual: false,
            virtual_type: None,
        }
    }

    /// 是否是纯文件夹路径（无 resource_id，非根目录，非虚拟）
    pub fn is_folder_only(&self) -> bool {
        self.resource_id.is_none() && !self.is_root && !self.is_virtual
    }
}

impl Default for ParsedPath {
    fn default() -> Self {
        Self::root()
    }
}

// ============================================================================
// 资源类型推断
// ============================================================================

/// 资源 ID 前缀映射表（唯一权威来源，按顺序扫描）
pub const RESOURCE_ID_PREFIXES: &[(&str, DstuNodeType)] = &[
    ("note_", DstuNodeType::Note),
    ("tb_", DstuNodeType::Textbook),
    ("exam_", DstuNodeType::Exam),
    ("tr_", DstuNodeType::Translation),
    ("essay_", DstuNodeType::Essay),
    ("fld_", DstuNodeType::Folder),
    ("att_", DstuNodeType::Attachment),
    ("img_", DstuNodeType::Image),
    ("file_", DstuNodeType::File),
    ("mm_", DstuNodeType::MindMap),
];

/// 从资源 ID 推断资源类型
///
/// 超过 [`MAX_RESOURCE_ID_LENGTH`] 的 ID 直接返回 `None`，不进入前缀扫描。
pub fn infer_type(id: &str) -> Option<DstuNodeType> {
    if resource_id_length(id) > MAX_RESOURCE_ID_LENGTH {
        return None;
    }
    RESOURCE_ID_PREFIXES
        .iter()
        .find(|(prefix, _)| id.starts_with(prefix))
        .map(|(_, resource_type)| *resource_type)
}

/// 资源 ID 长度（字符数，与路径中的中文等多字节字符一致）
pub fn resource_id_length(id: &str) -> usize {
    id.chars().count()
}

/// 是否带有已知的资源 ID 前缀（不检查长度）
pub fn has_resource_prefix(segment: &str) -> bool {
    RESOURCE_ID_PREFIXES
        .iter()
        .any(|(prefix, _)| segment.starts_with(prefix))
}

/// 获取某类型对应的 ID 前缀
pub fn prefix_for_type(resource_type: DstuNodeType) -> Option<&'static str> {
    RESOURCE_ID_PREFIXES
        .iter()
        .find(|(_, t)| *t == resource_type)
        .map(|(prefix, _)| *prefix)
}

/// 检查前缀表：不同类型的两个前缀不能互为前缀，且每个前缀只出现一次
///
/// 应用启动时调用（见 `DstuRuntime::new`）。
pub fn check_prefix_table() -> DstuResult<()> {
    for (i, (a, type_a)) in RESOURCE_ID_PREFIXES.iter().enumerate() {
        if a.is_empty() {
            return Err(DstuError::internal(format!(
                "empty resource id prefix for type {}",
                type_a
            )));
        }
        for (b, type_b) in RESOURCE_ID_PREFIXES.iter().skip(i + 1) {
            if a == b {
                return Err(DstuError::internal(format!(
                    "duplicate resource id prefix '{}' ({} / {})",
                    a, type_a, type_b
                )));
            }
            if type_a != type_b && (a.starts_with(b) || b.starts_with(a)) {
                return Err(DstuError::internal(format!(
                    "ambiguous resource id prefixes '{}' ({}) and '{}' ({})",
                    a, type_a, b, type_b
                )));
            }
        }
    }
    Ok(())
}

/// 资源 ID 校验结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResourceIdValidation {
    fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
        }
    }
}

/// 校验资源 ID，返回结构化结果（不抛错）
pub fn validate_resource_id(id: &str) -> ResourceIdValidation {
    if id.is_empty() {
        return ResourceIdValidation::invalid("资源ID不能为空");
    }
    if resource_id_length(id) > MAX_RESOURCE_ID_LENGTH {
        return ResourceIdValidation::invalid(format!(
            "资源ID长度超限: {} 字符（最大 {}）",
            resource_id_length(id),
            MAX_RESOURCE_ID_LENGTH
        ));
    }
    if infer_type(id).is_none() {
        return ResourceIdValidation::invalid(format!("资源ID格式无效（未知前缀）: {}", id));
    }
    ResourceIdValidation::ok()
}

/// 检查字符串是否是有效的资源 ID（符合前缀规范和长度限制）
pub fn is_valid_resource_id(id: &str) -> bool {
    validate_resource_id(id).valid
}

// ============================================================================
// 虚拟路径类型
// ============================================================================

/// 支持的虚拟路径类型
pub const VIRTUAL_PATH_TYPES: &[&str] = &["trash", "recent", "favorites", "all"];

/// 检查是否是虚拟路径类型（不区分大小写）
pub fn is_virtual_path_type(path_type: &str) -> bool {
    VIRTUAL_PATH_TYPES.contains(&path_type.to_lowercase().as_str())
}

// ============================================================================
// 单元测试
// ============================================================================
