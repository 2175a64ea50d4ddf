//! 打开资源分发器
//!
//! 把路径（或已解析的节点）、类型默认展示配置和活跃处理器串成一次异步、可失败的操作。
//!
//! ## 流程
//! 1. 读取活跃处理器；没有则立即返回 `INVALID_STATE`，不做解析
//! 2. 只有路径时：先做路径校验，再调用节点解析器；解析不到返回 `NOT_FOUND`，
//!    解析器自身出错原样返回
//! 3. 文件夹节点返回 `INVALID_STATE`
//! 4. 查询类型默认展示配置；没有则返回 `INVALID_STATE`
//! 5. 计算最终位置和模式（只读强制 view）
//! 6. 调用处理器对应的方法；无法识别的位置返回 `VALIDATION`
//!
//! 处理器在第 1 步被捕获，之后注册表的变化不影响进行中的请求。
//! 处理器调用是"发出即完成"的，分发器不等待 UI 副作用。

use std::sync::Arc;

use super::diagnostics::{DiagnosticsSink, LogDiagnostics};
use super::presentation::{EditorDefaults, PresentationDefaults};
use super::registry::OpenResourceRegistry;
use super::resolver::NodeResolver;
use super::types::{EditorLocation, EditorMode, OpenResourceOptions, OpenTarget};
use crate::dstu::error::{DstuError, DstuResult};
use crate::dstu::path_security::validate_path;
use crate::dstu::path_types::infer_type;
use crate::dstu::types::DstuNode;

const OPERATION: &str = "open_resource";

pub struct OpenResourceDispatcher {
    registry: OpenResourceRegistry,
    resolver: Arc<dyn NodeResolver>,
    presentation: Arc<dyn PresentationDefaults>,
    diagnostics: Arc<dyn DiagnosticsSink>,
}

impl OpenResourceDispatcher {
    pub fn new(
        registry: OpenResourceRegistry,
        resolver: Arc<dyn NodeResolver>,
        presentation: Arc<dyn PresentationDefaults>,
    ) -> Self {
        Self {
            registry,
            resolver,
            presentation,
            diagnostics: Arc::new(LogDiagnostics),
        }
    }

    /// 替换诊断汇聚点
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn registry(&self) -> &OpenResourceRegistry {
        &self.registry
    }

    /// 打开资源
    pub async fn open(
        &self,
        target: impl Into<OpenTarget>,
        options: OpenResourceOptions,
    ) -> DstuResult<()> {
        let target = target.into();
        log::debug!(
            "[OpenResourceDispatcher] open: path={}, options={:?}",
            target.path(),
            options
        );

        let result = self.dispatch(target, options).await;
        if let Err(ref err) = result {
            self.diagnostics.report(OPERATION, err);
        }
        result
    }

    pub async fn open_in_panel(
        &self,
        target: impl Into<OpenTarget>,
        options: OpenResourceOptions,
    ) -> DstuResult<()> {
        self.open(target, options.at(EditorLocation::Panel)).await
    }

    pub async fn open_in_page(
        &self,
        target: impl Into<OpenTarget>,
        options: OpenResourceOptions,
    ) -> DstuResult<()> {
        self.open(target, options.at(EditorLocation::Page)).await
    }

    pub async fn open_in_fullscreen(
        &self,
        target: impl Into<OpenTarget>,
        options: OpenResourceOptions,
    ) -> DstuResult<()> {
        self.open(target, options.at(EditorLocation::Fullscreen)).await
    }

    pub async fn open_in_modal(
        &self,
        target: impl Into<OpenTarget>,
        options: OpenResourceOptions,
    ) -> DstuResult<()> {
        self.open(target, options.at(EditorLocation::Modal)).await
    }

    async fn dispatch(&self, target: OpenTarget, options: OpenResourceOptions) -> DstuResult<()> {
        // 1. 在任何挂起点之前捕获处理器
        let handler = self.registry.get_active().ok_or_else(|| {
            DstuError::invalid_state("No open resource handler registered").with_path(target.path())
        })?;

        // 2. 解析节点
        let (path, node) = match target {
            OpenTarget::Node(node) => (node.path.clone(), node),
            OpenTarget::Path(path) => {
                validate_path(&path).map_err(|violation| {
                    DstuError::invalid_path(violation.to_string()).with_path(path.as_str())
                })?;
                let node = self.resolver.resolve(&path).await?.ok_or_else(|| {
                    DstuError::not_found(format!("No resource at {}", path))
                        .with_path(path.as_str())
                })?;
                (path, node)
            }
        };
        confirm_node_type(&node);

        // 3. 文件夹不作为编辑器打开
        if node.is_folder() {
            return Err(DstuError::invalid_state("Folders cannot be opened as editors")
                .with_path(path)
                .with_resource_type(node.node_type));
        }

        // 4. 默认展示配置
        let defaults = self.presentation.lookup(node.node_type).ok_or_else(|| {
            DstuError::invalid_state(format!(
                "No editor registered for resource type: {}",
                node.node_type
            ))
            .with_path(path.as_str())
            .with_resource_type(node.node_type)
        })?;

        // 5. 位置与模式
        let location = resolve_location(&options, &defaults)
            .map_err(|err| err.with_path(path.as_str()).with_resource_type(node.node_type))?;
        let mode = resolve_mode(&options, &defaults);

        // 6. 分发
        log::info!(
            "[OpenResourceDispatcher] Dispatching {} ({}) to {} in {} mode",
            path,
            node.node_type,
            location,
            mode
        );
        match location {
            EditorLocation::Panel => handler.open_in_panel(&path, &node, mode),
            EditorLocation::Page => handler.open_in_page(&path, &node, mode),
            EditorLocation::Fullscreen => handler.open_in_fullscreen(&path, &node, mode),
            EditorLocation::Modal => handler.open_in_modal(&path, &node, mode),
        }

        Ok(())
    }
}

fn resolve_location(
    options: &OpenResourceOptions,
    defaults: &EditorDefaults,
) -> DstuResult<EditorLocation> {
    match options.location.as_deref() {
        Some(raw) => raw.parse(),
        None => Ok(defaults.default_location),
    }
}

/// 只读优先于显式模式
fn resolve_mode(options: &OpenResourceOptions, defaults: &EditorDefaults) -> EditorMode {
    if options.read_only {
        EditorMode::View
    } else {
        options.mode.unwrap_or(defaults.default_mode)
    }
}

/// ID 前缀与节点类型不一致时只记录警告，以节点类型为准
fn confirm_node_type(node: &DstuNode) {
    if let Some(inferred) = infer_type(&node.id) {
        if inferred != node.node_type {
            log::warn!(
                "[OpenResourceDispatcher] Node type mismatch: id={} implies {}, node says {}",
                node.id,
                inferred,
                node.node_type
            );
        }
    }
}
