//! DSTU 命令处理器
//!
//! 面向 IPC 的命令层：参数和返回值都可 JSON 序列化，错误统一转为 `String`。
//! `dstu` 命令行入口通过 [`DstuRequest`] 调用这些命令。

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::DstuError;
use super::open_resource::{
    EditorLocation, EditorMode, InMemoryNodeResolver, OpenResourceHandler, OpenResourceOptions,
    OpenResourceRegistry,
};
use super::path_parser;
use super::path_security::validate_path;
use super::path_types::{infer_type, validate_resource_id, ParsedPath, ResourceIdValidation};
use super::runtime::DstuRuntime;
use super::types::{DstuNode, DstuNodeType};

// ============================================================================
// 返回类型
// ============================================================================

/// 路径校验结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 一次打开请求最终的分发结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenPreview {
    pub path: String,
    pub node_id: String,
    pub node_type: DstuNodeType,
    pub location: EditorLocation,
    pub mode: EditorMode,
}

// ============================================================================
// 路径命令
// ============================================================================

/// 解析 DSTU 路径
///
/// 先做安全校验，校验失败返回错误字符串。
pub async fn dstu_parse_path(path: String) -> Result<ParsedPath, String> {
    log::info!("[DSTU::handlers] dstu_parse_path: path={}", path);
    Ok(path_parser::parse_checked(&path)?)
}

/// 构建 DSTU 路径
///
/// ## 参数
/// - `folder_path`: 文件夹路径（None = 根目录）
/// - `resource_id`: 资源 ID；为空时返回文件夹路径本身
pub async fn dstu_build_path(
    folder_path: Option<String>,
    resource_id: String,
) -> Result<String, String> {
    log::info!(
        "[DSTU::handlers] dstu_build_path: folder_path={:?}, resource_id={}",
        folder_path,
        resource_id
    );
    let full_path = path_parser::build(folder_path.as_deref(), &resource_id)?;
    log::info!("[DSTU::handlers] dstu_build_path: result={}", full_path);
    Ok(full_path)
}

pub async fn dstu_validate_path(path: String) -> Result<PathValidation, String> {
    log::debug!("[DSTU::handlers] dstu_validate_path: path={}", path);
    Ok(match validate_path(&path) {
        Ok(()) => PathValidation {
            valid: true,
            error: None,
        },
        Err(violation) => PathValidation {
            valid: false,
            error: Some(violation.to_string()),
        },
    })
}

/// 从资源 ID 前缀推断类型；无法识别时返回 `None`
pub async fn dstu_infer_type(resource_id: String) -> Result<Option<DstuNodeType>, String> {
    Ok(infer_type(&resource_id))
}

pub async fn dstu_validate_resource_id(resource_id: String) -> Result<ResourceIdValidation, String> {
    Ok(validate_resource_id(&resource_id))
}

pub async fn dstu_join_path(segments: Vec<String>) -> Result<String, String> {
    Ok(path_parser::join(&segments))
}

pub async fn dstu_get_parent_path(path: String) -> Result<Option<String>, String> {
    Ok(path_parser::get_parent_path(&path))
}

pub async fn dstu_get_basename(path: String) -> Result<String, String> {
    Ok(path_parser::get_basename(&path))
}

// ============================================================================
// 打开资源预演
// ============================================================================

/// 记录分发结果的处理器
#[derive(Default)]
struct PreviewHandler {
    opened: Mutex<Option<OpenPreview>>,
}

impl PreviewHandler {
    fn record(&self, path: &str, node: &DstuNode, location: EditorLocation, mode: EditorMode) {
        *self.opened.lock().unwrap_or_else(|e| e.into_inner()) = Some(OpenPreview {
            path: path.to_string(),
            node_id: node.id.clone(),
            node_type: node.node_type,
            location,
            mode,
        });
    }

    fn take(&self) -> Option<OpenPreview> {
        self.opened.lock().unwrap_or_else(|e| e.into_inner()).take()
    }
}

impl OpenResourceHandler for PreviewHandler {
    fn open_in_panel(&self, path: &str, node: &DstuNode, mode: EditorMode) {
        self.record(path, node, EditorLocation::Panel, mode)
    }

    fn open_in_page(&self, path: &str, node: &DstuNode, mode: EditorMode) {
        self.record(path, node, EditorLocation::Page, mode)
    }

    fn open_in_fullscreen(&self, path: &str, node: &DstuNode, mode: EditorMode) {
        self.record(path, node, EditorLocation::Fullscreen, mode)
    }

    fn open_in_modal(&self, path: &str, node: &DstuNode, mode: EditorMode) {
        self.record(path, node, EditorLocation::Modal, mode)
    }
}

/// 对给定的节点快照执行一次打开流程，返回分发结果而不产生 UI 副作用
///
/// 运行时注册表中的处理器不会被调用，也不会被替换。
pub async fn dstu_preview_open(
    runtime: &DstuRuntime,
    nodes: Vec<DstuNode>,
    path: String,
    options: OpenResourceOptions,
) -> Result<OpenPreview, String> {
    log::info!(
        "[DSTU::handlers] dstu_preview_open: path={}, nodes={}",
        path,
        nodes.len()
    );

    // 预演使用独立的注册表，不触碰运行时中已注册的处理器
    let registry = OpenResourceRegistry::new();
    let handler = Arc::new(PreviewHandler::default());
    let _registration =
        registry.register(handler.clone(), runtime.config().default_namespace.as_str());
    let dispatcher = runtime
        .dispatcher_with_registry(registry, Arc::new(InMemoryNodeResolver::with_nodes(nodes)));

    dispatcher.open(path, options).await?;

    handler
        .take()
        .ok_or_else(|| "Handler was not invoked".to_string())
}

// ============================================================================
// 请求分发（命令行入口）
// ============================================================================

/// 一条 JSON 命令请求
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum DstuRequest {
    ParsePath {
        path: String,
    },
    BuildPath {
        #[serde(default)]
        folder_path: Option<String>,
        resource_id: String,
    },
    ValidatePath {
        path: String,
    },
    InferType {
        resource_id: String,
    },
    ValidateResourceId {
        resource_id: String,
    },
    JoinPath {
        segments: Vec<String>,
    },
    GetParentPath {
        path: String,
    },
    GetBasename {
        path: String,
    },
    PreviewOpen {
        path: String,
        #[serde(default)]
        options: OpenResourceOptions,
        #[serde(default)]
        nodes: Vec<DstuNode>,
    },
}

fn to_value<T: Serialize>(result: Result<T, String>) -> Result<Value, String> {
    result.and_then(|v| serde_json::to_value(v).map_err(|e| DstuError::from(e).into()))
}

/// 执行一条请求
pub async fn dstu_execute(runtime: &DstuRuntime, request: DstuRequest) -> Result<Value, String> {
    match request {
        DstuRequest::ParsePath { path } => to_value(dstu_parse_path(path).await),
        DstuRequest::BuildPath {
            folder_path,
            resource_id,
        } => to_value(dstu_build_path(folder_path, resource_id).await),
        DstuRequest::ValidatePath { path } => to_value(dstu_validate_path(path).await),
        DstuRequest::InferType { resource_id } => to_value(dstu_infer_type(resource_id).await),
        DstuRequest::ValidateResourceId { resource_id } => {
            to_value(dstu_validate_resource_id(resource_id).await)
        }
        DstuRequest::JoinPath { segments } => to_value(dstu_join_path(segments).await),
        DstuRequest::GetParentPath { path } => to_value(dstu_get_parent_path(path).await),
        DstuRequest::GetBasename { path } => to_value(dstu_get_basename(path).await),
        DstuRequest::PreviewOpen {
            path,
            options,
            nodes,
        } => to_value(dstu_preview_open(runtime, nodes, path, options).await),
    }
}

// ============================================================================
// 单元测试
// ============================================================================
