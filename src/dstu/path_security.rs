//! DSTU 路径安全校验
//!
//! 在任何解析步骤消费路径字符串之前运行。解析器信任通过校验的路径是良构的。
//!
//! ## 规则
//! 1. 路径不能为空，必须以 `/` 开头
//! 2. 路径不能包含连续的 `/`
//! 3. 路径不能以 `/` 结尾（根目录除外）
//! 4. 路径不能包含 Unicode 绕过字符（全角斜杠、零宽字符等）
//! 5. 路径段不能是 `.` 或 `..`，不能为空白，不能包含控制字符
//! 6. `@` 开头的段必须是 `@` + 至少一个字母/数字/下划线

use serde::Serialize;

use super::path_types::{PATH_SEPARATOR, VIRTUAL_SEGMENT_MARKER};
use crate::utils::unicode::{find_bypass_char, is_control_char};

/// 路径违规原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum PathViolation {
    Empty,
    MissingLeadingSlash,
    ConsecutiveSeparators,
    TrailingSeparator,
    BypassCharacter(char),
    Traversal(String),
    BlankSegment,
    ControlCharacter(String),
    MalformedAtSegment(String),
}

impl std::fmt::Display for PathViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathViolation::Empty => write!(f, "路径为空"),
            PathViolation::MissingLeadingSlash => write!(f, "路径必须以 / 开头"),
            PathViolation::ConsecutiveSeparators => write!(f, "路径包含连续的 /"),
            PathViolation::TrailingSeparator => write!(f, "路径不能以 / 结尾"),
            PathViolation::BypassCharacter(c) => {
                write!(f, "路径包含非法 Unicode 字符 U+{:04X}", *c as u32)
            }
            PathViolation::Traversal(seg) => write!(f, "禁止路径遍历段: {}", seg),
            PathViolation::BlankSegment => write!(f, "路径段为空白"),
            PathViolation::ControlCharacter(seg) => {
                write!(f, "路径段包含控制字符: {:?}", seg)
            }
            PathViolation::MalformedAtSegment(seg) => write!(f, "非法的 @ 路径段: {}", seg),
        }
    }
}

/// 校验路径，返回第一个违规原因
pub fn validate_path(path: &str) -> Result<(), PathViolation> {
    if path.is_empty() {
        return Err(PathViolation::Empty);
    }

    if !path.starts_with(PATH_SEPARATOR) {
        return Err(PathViolation::MissingLeadingSlash);
    }

    if path == "/" {
        return Ok(());
    }

    if path.contains("//") {
        return Err(PathViolation::ConsecutiveSeparators);
    }

    if path.ends_with(PATH_SEPARATOR) {
        return Err(PathViolation::TrailingSeparator);
    }

    // 绕过字符在任何位置都拒绝，包括看起来像分隔符的位置
    if let Some(c) = find_bypass_char(path) {
        return Err(PathViolation::BypassCharacter(c));
    }

    for segment in path.split(PATH_SEPARATOR).filter(|s| !s.is_empty()) {
        validate_segment(segment)?;
    }

    Ok(())
}

fn validate_segment(segment: &str) -> Result<(), PathViolation> {
    if segment == "." || segment == ".." {
        return Err(PathViolation::Traversal(segment.to_string()));
    }

    if segment.trim().is_empty() {
        return Err(PathViolation::BlankSegment);
    }

    if segment.chars().any(is_control_char) {
        return Err(PathViolation::ControlCharacter(segment.to_string()));
    }

    if let Some(name) = segment.strip_prefix(VIRTUAL_SEGMENT_MARKER) {
        let well_formed =
            !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !well_formed {
            return Err(PathViolation::MalformedAtSegment(segment.to_string()));
        }
    }

    Ok(())
}

/// 验证路径格式是否有效（纯布尔谓词）
pub fn is_valid_path(path: &str) -> bool {
    validate_path(path).is_ok()
}
