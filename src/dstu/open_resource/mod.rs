//! 打开资源
//!
//! ## 模块结构
//! - `types` - 打开位置、模式、选项
//! - `registry` - 按命名空间注册的打开处理器（最后注册者生效）
//! - `resolver` - 路径 → 节点解析接口
//! - `presentation` - 各类型的默认展示配置
//! - `diagnostics` - 错误诊断汇报
//! - `dispatcher` - 异步打开流程

pub mod diagnostics;
pub mod dispatcher;
pub mod presentation;
pub mod registry;
pub mod resolver;
pub mod types;

pub use diagnostics::{DiagnosticRecord, DiagnosticsSink, LogDiagnostics, MemoryDiagnostics};
pub use dispatcher::OpenResourceDispatcher;
pub use presentation::{EditorDefaults, EditorRegistry, PresentationDefaults};
pub use registry::{
    get_open_resource_handler, get_registered_handler_namespaces, register_open_resource_handler,
    set_active_open_resource_handler, HandlerRegistration, OpenResourceHandler,
    OpenResourceRegistry, DEFAULT_NAMESPACE,
};
pub use resolver::{InMemoryNodeResolver, NodeResolver};
pub use types::{EditorLocation, EditorMode, OpenResourceOptions, OpenTarget};
