//! DSTU 访达协议层 (DS-Tauri-Unified Finder Protocol)
//!
//! DSTU 是存储层与上层应用之间的统一寻址接口，类似于操作系统的文件管理器协议。
//! 所有模块（笔记、教材、题目集等）都通过同一种路径语法定位资源。
//!
//! ## 设计目标
//! 1. **统一寻址**：路径即资源地址，类型由资源 ID 前缀决定，不单独存储
//! 2. **安全优先**：任何解析之前先做路径安全校验
//! 3. **解耦存储与展示**：节点解析、默认展示配置、打开处理器都以接口注入
//!
//! ## 路径规范
//! ```text
//! 路径格式：/{folder_path}/{resource_id}
//!
//! 示例：
//! - /高考复习/函数/note_abc123   → 在"高考复习/函数"文件夹下的笔记
//! - /我的教材/tb_xyz789          → 在"我的教材"文件夹下的教材
//! - /exam_sheet_001              → 根目录下的题目集（无文件夹）
//! - /                            → 根目录
//! - /@trash                      → 回收站（虚拟路径）
//! ```
//!
//! ## 模块结构
//! - `types` - DSTU 类型定义（DstuNode、DstuNodeType）
//! - `error` - 错误类型（DstuError、DstuResult）
//! - `path_types` - 解析结果、ID 前缀表、资源 ID 校验
//! - `path_security` - 路径安全校验
//! - `path_parser` - 路径解析器与构建器
//! - `open_resource` - 打开处理器注册表与分发器
//! - `runtime` - 运行时装配
//! - `handlers` - 命令处理器

pub mod error;
pub mod handlers;
pub mod open_resource;
pub mod path_parser;
pub mod path_security;
pub mod path_types;
pub mod runtime;
pub mod types;

// ============================================================================
// 重导出核心类型
// ============================================================================

// 错误类型
pub use error::{DstuError, DstuResult, ErrorContext};

// 路径解析器
pub use path_parser::{
    build, build_simple_resource_path, extract_folder_path, extract_resource_id,
    get_basename, get_parent_path, get_resource_type, is_parent_path, is_virtual_path, join,
    normalize_path, parse, parse_checked,
};

// 路径校验
pub use path_security::{is_valid_path, validate_path, PathViolation};

// 路径类型
pub use path_types::{
    check_prefix_table, infer_type, is_valid_resource_id, is_virtual_path_type,
    prefix_for_type, resource_id_length, validate_resource_id, ParsedPath, ResourceIdValidation,
    MAX_RESOURCE_ID_LENGTH, RESOURCE_ID_PREFIXES, VIRTUAL_PATH_TYPES,
};

// 核心类型
pub use types::{DstuNode, DstuNodeType};

// 打开资源
pub use open_resource::{
    EditorDefaults, EditorLocation, EditorMode, EditorRegistry, NodeResolver,
    OpenResourceDispatcher, OpenResourceHandler, OpenResourceOptions, OpenResourceRegistry,
};

pub use runtime::DstuRuntime;

// handlers 导出
pub use handlers::{
    dstu_build_path, dstu_execute, dstu_get_basename, dstu_get_parent_path, dstu_infer_type,
    dstu_join_path, dstu_parse_path, dstu_preview_open, dstu_validate_path,
    dstu_validate_resource_id, DstuRequest,
};
