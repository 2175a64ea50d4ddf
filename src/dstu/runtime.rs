//! DSTU 运行时
//!
//! 应用启动时构造一次，持有处理器注册表、编辑器默认配置和诊断记录，
//! 并按需为注入的节点解析器创建分发器。

use std::sync::Arc;

use super::error::DstuResult;
use super::open_resource::{
    DiagnosticsSink, EditorRegistry, HandlerRegistration, MemoryDiagnostics, NodeResolver,
    OpenResourceDispatcher, OpenResourceHandler, OpenResourceRegistry, PresentationDefaults,
};
use super::path_types::check_prefix_table;
use crate::config::DstuConfig;

pub struct DstuRuntime {
    config: DstuConfig,
    registry: OpenResourceRegistry,
    editors: Arc<EditorRegistry>,
    diagnostics: Arc<MemoryDiagnostics>,
}

impl DstuRuntime {
    /// 校验前缀表并按配置构建运行时
    pub fn new(config: DstuConfig) -> DstuResult<Self> {
        check_prefix_table()?;

        let builtin = EditorRegistry::builtin();
        let overrides = config.presentation_overrides(|t| builtin.lookup(t));
        let editors = builtin.with_overrides(overrides);

        log::info!(
            "[DSTU::runtime] Initialized: namespace={}, editor types={}",
            config.default_namespace,
            editors.supported_types().len()
        );

        Ok(Self {
            registry: OpenResourceRegistry::new(),
            editors: Arc::new(editors),
            diagnostics: Arc::new(MemoryDiagnostics::with_capacity(
                config.diagnostics_capacity,
            )),
            config,
        })
    }

    pub fn config(&self) -> &DstuConfig {
        &self.config
    }

    pub fn registry(&self) -> &OpenResourceRegistry {
        &self.registry
    }

    pub fn editors(&self) -> &EditorRegistry {
        &self.editors
    }

    pub fn diagnostics(&self) -> &MemoryDiagnostics {
        &self.diagnostics
    }

    /// 以配置的默认命名空间注册处理器
    pub fn register_handler(&self, handler: Arc<dyn OpenResourceHandler>) -> HandlerRegistration {
        self.registry
            .register(handler, self.config.default_namespace.as_str())
    }

    /// 为给定的节点解析器创建分发器（共享注册表与诊断记录）
    pub fn dispatcher(&self, resolver: Arc<dyn NodeResolver>) -> OpenResourceDispatcher {
        self.dispatcher_with_registry(self.registry.clone(), resolver)
    }

    /// 使用独立的处理器注册表创建分发器，编辑器默认配置与诊断记录仍与运行时共享
    pub fn dispatcher_with_registry(
        &self,
        registry: OpenResourceRegistry,
        resolver: Arc<dyn NodeResolver>,
    ) -> OpenResourceDispatcher {
        let presentation: Arc<dyn PresentationDefaults> = self.editors.clone();
        let diagnostics: Arc<dyn DiagnosticsSink> = self.diagnostics.clone();
        OpenResourceDispatcher::new(registry, resolver, presentation).with_diagnostics(diagnostics)
    }
}
