//! DSTU 路径解析器
//!
//! 本模块负责把 DSTU 路径解析为结构化数据，以及反向构建路径。
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
//! `parse` 是宽松的：它只做规范化，不做安全校验。来自不可信来源的路径应当使用
//! `parse_checked`，它会先运行 [`validate_path`](super::path_security::validate_path)。

use super::error::{DstuError, DstuResult};
use super::path_security::validate_path;
use super::path_types::{
    has_resource_prefix, infer_type, is_virtual_path_type, resource_id_length, ParsedPath,
    MAX_RESOURCE_ID_LENGTH, PATH_SEPARATOR, VIRTUAL_SEGMENT_MARKER,
};
use super::types::DstuNodeType;

// 重导出，便于调用方只引入 path_parser
pub use super::path_security::is_valid_path;
pub use super::path_types::{is_valid_resource_id, validate_resource_id};

// ============================================================================
// 解析
// ============================================================================

/// 解析路径
///
/// 1. 规范化（补前导 `/`，去尾部 `/`）
/// 2. `/` → 根目录
/// 3. `/@{virtual}` 及其子路径 → 虚拟路径；多段时最后一段若能推断类型则为资源 ID
/// 4. 否则最后一段能推断类型时为资源 ID，其余段为文件夹；不能推断时整体为文件夹路径
pub fn parse(path: &str) -> ParsedPath {
    let normalized = normalize_path(path);

    if normalized == "/" {
        return ParsedPath::root();
    }

    let segments = split_segments(&normalized);
    let last_segment = match segments.last() {
        Some(s) => *s,
        None => return ParsedPath::root(),
    };

    if let Some(virtual_type) = virtual_root(&segments) {
        let candidate = if segments.len() > 1 {
            Some(last_segment)
        } else {
            None
        };
        return ParsedPath::virtual_path(&normalized, virtual_type, candidate);
    }

    match infer_type(last_segment) {
        Some(resource_type) => {
            let folder_path = if segments.len() > 1 {
                Some(format!("/{}", segments[..segments.len() - 1].join("/")))
            } else {
                None
            };
            let resource_id = last_segment.to_string();
            ParsedPath {
                full_path: normalized,
                folder_path,
                resource_id: Some(resource_id),
                resource_type: Some(resource_type),
                is_root: false,
                is_virtual: false,
                virtual_type: None,
            }
        }
        // 最后一段不是资源 ID，这是纯文件夹路径
        None => ParsedPath::folder(&normalized),
    }
}

/// 校验后解析
///
/// 不合法的路径返回 `INVALID_PATH`；最后一段带有资源 ID 前缀但超长时返回长度超限错误，
/// 而不是静默地把它当作文件夹名。没有资源前缀的最后一段是文件夹名，不受此限制。
pub fn parse_checked(path: &str) -> DstuResult<ParsedPath> {
    validate_path(path)
        .map_err(|violation| DstuError::invalid_path(violation.to_string()).with_path(path))?;

    if let Some(last_segment) = path.rsplit(PATH_SEPARATOR).next() {
        let length = resource_id_length(last_segment);
        if has_resource_prefix(last_segment) && length > MAX_RESOURCE_ID_LENGTH {
            return Err(DstuError::invalid_path(format!(
                "资源ID长度超限: {} 字符（最大 {}）",
                length, MAX_RESOURCE_ID_LENGTH
            ))
            .with_path(path));
        }
    }

    Ok(parse(path))
}

/// 按路径推断资源类型（路径不指向资源时返回 None）
pub fn get_resource_type(path: &str) -> Option<DstuNodeType> {
    parse(path).resource_type
}

/// 是否是虚拟路径（`/@trash` 或其子路径）
pub fn is_virtual_path(path: &str) -> bool {
    let normalized = normalize_path(path);
    virtual_root(&split_segments(&normalized)).is_some()
}

/// 从路径中提取资源 ID（如果有的话）
pub fn extract_resource_id(path: &str) -> Option<String> {
    parse(path).resource_id
}

/// 从路径中提取文件夹部分
///
/// 最后一段是资源 ID 时返回之前的部分（根目录下返回 None），否则返回整个路径
pub fn extract_folder_path(path: &str) -> Option<String> {
    parse(path).folder_path
}

// ============================================================================
// 构建
// ============================================================================

/// 构建路径
///
/// # 示例
/// ```rust
/// use dstu_core::dstu::path_parser::build;
///
/// assert_eq!(build(Some("/高考复习/函数"), "note_abc123").unwrap(), "/高考复习/函数/note_abc123");
/// assert_eq!(build(None, "note_abc123").unwrap(), "/note_abc123");
/// assert_eq!(build(Some("/"), "").unwrap(), "/");
/// ```
pub fn build(folder_path: Option<&str>, resource_id: &str) -> DstuResult<String> {
    if resource_id.is_empty() {
        return Ok(folder_path
            .filter(|fp| !fp.trim().is_empty())
            .map(normalize_path)
            .unwrap_or_else(|| "/".to_string()));
    }

    if resource_id_length(resource_id) > MAX_RESOURCE_ID_LENGTH {
        return Err(DstuError::invalid_path(format!(
            "资源ID长度超限: {} 字符（最大 {}）",
            resource_id_length(resource_id),
            MAX_RESOURCE_ID_LENGTH
        )));
    }

    let folder = folder_path.map(normalize_path);
    match folder {
        Some(fp) if fp != "/" => Ok(format!("{}/{}", fp, resource_id)),
        _ => Ok(format!("/{}", resource_id)),
    }
}

/// 构建根目录下的资源路径：`/{resource_id}`
pub fn build_simple_resource_path(id: &str) -> String {
    format!("/{}", id)
}

/// 拼接路径段
///
/// 去掉每段首尾的 `/`，丢弃空段，用单个 `/` 连接；没有非空段时返回根目录。
pub fn join<S: AsRef<str>>(segments: &[S]) -> String {
    let parts: Vec<&str> = segments
        .iter()
        .map(|s| s.as_ref().trim_matches(PATH_SEPARATOR))
        .filter(|s| !s.is_empty())
        .collect();

    if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", parts.join("/"))
    }
}

// ============================================================================
// 辅助函数
// ============================================================================

/// 规范化路径
///
/// - 去掉首尾空白
/// - 确保以 / 开头
/// - 移除尾部斜杠（除了根路径）
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();

    if trimmed.is_empty() {
        return "/".to_string();
    }

    let with_slash = if trimmed.starts_with(PATH_SEPARATOR) {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    };

    let without_trailing = with_slash.trim_end_matches(PATH_SEPARATOR);
    if without_trailing.is_empty() {
        "/".to_string()
    } else {
        without_trailing.to_string()
    }
}

fn split_segments(normalized: &str) -> Vec<&str> {
    normalized
        .split(PATH_SEPARATOR)
        .filter(|s| !s.is_empty())
        .collect()
}

/// 第一段是 `@{virtual}` 时返回虚拟类型名
fn virtual_root<'a>(segments: &[&'a str]) -> Option<&'a str> {
    let first = segments.first()?;
    let name = first.strip_prefix(VIRTUAL_SEGMENT_MARKER)?;
    if is_virtual_path_type(name) {
        Some(name)
    } else {
        None
    }
}

/// 判断路径是否是另一个路径的父路径
pub fn is_parent_path(parent: &str, child: &str) -> bool {
    let parent_normalized = normalize_path(parent);
    let child_normalized = normalize_path(child);

    if parent_normalized == "/" {
        return child_normalized != "/";
    }

    child_normalized.len() > parent_normalized.len()
        && child_normalized.starts_with(&parent_normalized)
        && child_normalized[parent_normalized.len()..].starts_with(PATH_SEPARATOR)
}

/// 获取父路径
///
/// 根目录 → None；单段 → 根目录；N 段 → 前 N-1 段
pub fn get_parent_path(path: &str) -> Option<String> {
    let normalized = normalize_path(path);

    if normalized == "/" {
        return None;
    }

    match normalized.rfind(PATH_SEPARATOR) {
        Some(0) | None => Some("/".to_string()),
        Some(idx) => Some(normalized[..idx].to_string()),
    }
}

/// 获取路径的最后一段（根目录返回空字符串）
pub fn get_basename(path: &str) -> String {
    let normalized = normalize_path(path);

    if normalized == "/" {
        return String::new();
    }

    normalized
        .rsplit(PATH_SEPARATOR)
        .next()
        .unwrap_or("")
        .to_string()
}

// ============================================================================
// 单元测试
// ============================================================================
