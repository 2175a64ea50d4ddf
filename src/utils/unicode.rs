//! Unicode 安全处理工具
//!
//! 识别可以在视觉或结构上伪装成路径分隔符的字符，防止路径校验被绕过。

/// ★ BE-06 安全修复：路径中禁止出现的 Unicode 绕过字符
///
/// - 全角斜杠/反斜杠、分数斜杠、除法斜杠：可伪装成 `/`
/// - 零宽字符：可隐藏在路径段内，让两个"看起来相同"的路径指向不同资源
pub const PATH_BYPASS_CHARS: &[char] = &[
    '\u{FF0F}', // 全角斜杠 ／
    '\u{FF3C}', // 全角反斜杠 ＼
    '\u{2044}', // 分数斜杠 ⁄
    '\u{2215}', // 除法斜杠 ∕
    '\u{200B}', // 零宽空格 (Zero Width Space)
    '\u{200C}', // 零宽非连接符 (Zero Width Non-Joiner)
    '\u{200D}', // 零宽连接符 (Zero Width Joiner)
    '\u{FEFF}', // 零宽非断空格 / BOM
];

/// 返回输入中第一个绕过字符（如有）
#[inline]
pub fn find_bypass_char(input: &str) -> Option<char> {
    input.chars().find(|c| PATH_BYPASS_CHARS.contains(c))
}

#[inline]
pub fn contains_bypass_char(input: &str) -> bool {
    find_bypass_char(input).is_some()
}

/// ASCII 控制字符（0x00–0x1F 与 0x7F）
#[inline]
pub fn is_control_char(c: char) -> bool {
    matches!(c, '\u{0000}'..='\u{001F}' | '\u{007F}')
}
