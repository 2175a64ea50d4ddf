//! 打开资源处理器注册表
//!
//! 多个互相独立的 UI 界面（如聊天主界面、资料库视图）各自提供"打开资源"的实现，
//! 按命名空间注册。同一时刻只有一个处理器是活跃的：最近注册的命名空间胜出，
//! 注销活跃命名空间时回退到注册顺序中最后一个剩余的命名空间。
//!
//! 注册表是显式对象，在应用启动时构造一次，通过克隆句柄注入到需要它的模块。

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use super::types::EditorMode;
use crate::dstu::types::DstuNode;

/// 默认命名空间
pub const DEFAULT_NAMESPACE: &str = "default";

/// 打开资源处理器
///
/// 四种打开位置各对应一个方法。方法没有返回值：对分发器来说调用即完成，
/// UI 副作用由处理器自己负责。
pub trait OpenResourceHandler: Send + Sync {
    fn open_in_panel(&self, path: &str, node: &DstuNode, mode: EditorMode);
    fn open_in_page(&self, path: &str, node: &DstuNode, mode: EditorMode);
    fn open_in_fullscreen(&self, path: &str, node: &DstuNode, mode: EditorMode);
    fn open_in_modal(&self, path: &str, node: &DstuNode, mode: EditorMode);
}

#[derive(Default)]
struct RegistryState {
    entries: HashMap<String, Arc<dyn OpenResourceHandler>>,
    /// 注册顺序（最近注册的在末尾，无重复）
    registration_order: Vec<String>,
    active_namespace: Option<String>,
}

/// 比较两个处理器是否是同一个实例（只比较数据指针，忽略 vtable）
fn same_handler(a: &Arc<dyn OpenResourceHandler>, b: &Arc<dyn OpenResourceHandler>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

/// 处理器注册表（可廉价克隆的共享句柄）
#[derive(Clone, Default)]
pub struct OpenResourceRegistry {
    state: Arc<RwLock<RegistryState>>,
}

impl OpenResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// 注册处理器
    ///
    /// 覆盖同名命名空间的旧条目，把命名空间移到注册顺序末尾，并设为活跃。
    /// 用同一个处理器重复注册也会重新提升为最近注册。
    pub fn register(
        &self,
        handler: Arc<dyn OpenResourceHandler>,
        namespace: impl Into<String>,
    ) -> HandlerRegistration {
        let namespace = namespace.into();
        {
            let mut state = self.write();
            state.entries.insert(namespace.clone(), handler.clone());
            state.registration_order.retain(|ns| ns != &namespace);
            state.registration_order.push(namespace.clone());
            state.active_namespace = Some(namespace.clone());
        }

        log::debug!(
            "[OpenResourceRegistry] Registered handler: namespace={}",
            namespace
        );

        HandlerRegistration {
            state: Arc::downgrade(&self.state),
            namespace,
            handler,
        }
    }

    /// 以默认命名空间注册
    pub fn register_default(&self, handler: Arc<dyn OpenResourceHandler>) -> HandlerRegistration {
        self.register(handler, DEFAULT_NAMESPACE)
    }

    /// 获取当前活跃的处理器
    pub fn get_active(&self) -> Option<Arc<dyn OpenResourceHandler>> {
        let state = self.read();
        state
            .active_namespace
            .as_ref()
            .and_then(|ns| state.entries.get(ns))
            .cloned()
    }

    /// 按命名空间获取处理器
    pub fn get_by_namespace(&self, namespace: &str) -> Option<Arc<dyn OpenResourceHandler>> {
        self.read().entries.get(namespace).cloned()
    }

    /// 切换活跃命名空间；命名空间不存在时不做任何修改并返回 false
    pub fn set_active(&self, namespace: &str) -> bool {
        let mut state = self.write();
        if !state.entries.contains_key(namespace) {
            log::warn!(
                "[OpenResourceRegistry] set_active ignored, namespace not registered: {}",
                namespace
            );
            return false;
        }
        state.active_namespace = Some(namespace.to_string());
        log::debug!("[OpenResourceRegistry] Active namespace -> {}", namespace);
        true
    }

    pub fn active_namespace(&self) -> Option<String> {
        self.read().active_namespace.clone()
    }

    /// 注册顺序快照
    pub fn list_namespaces(&self) -> Vec<String> {
        self.read().registration_order.clone()
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().entries.is_empty()
    }
}

/// 注册凭据，调用 [`unregister`](HandlerRegistration::unregister) 注销
///
/// 丢弃凭据不会注销处理器。
#[must_use = "dropping the registration keeps the handler registered forever"]
pub struct HandlerRegistration {
    state: Weak<RwLock<RegistryState>>,
    namespace: String,
    handler: Arc<dyn OpenResourceHandler>,
}

impl HandlerRegistration {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// 注销
    ///
    /// 只有当命名空间下仍是本次注册的处理器时才移除（同名命名空间已被更新的处理器
    /// 占用时什么也不做）。被移除的是活跃命名空间时，激活注册顺序末尾的命名空间。
    /// 返回是否真的移除了条目。
    pub fn unregister(self) -> bool {
        let Some(shared) = self.state.upgrade() else {
            return false;
        };
        let mut state = shared.write().unwrap_or_else(|e| e.into_inner());

        let still_ours = state
            .entries
            .get(&self.namespace)
            .map(|current| same_handler(current, &self.handler))
            .unwrap_or(false);
        if !still_ours {
            log::debug!(
                "[OpenResourceRegistry] Stale unregister ignored: namespace={}",
                self.namespace
            );
            return false;
        }

        state.entries.remove(&self.namespace);
        state.registration_order.retain(|ns| ns != &self.namespace);

        if state.active_namespace.as_deref() == Some(self.namespace.as_str()) {
            state.active_namespace = state.registration_order.last().cloned();
        }

        log::debug!(
            "[OpenResourceRegistry] Unregistered handler: namespace={}, active={:?}",
            self.namespace,
            state.active_namespace
        );
        true
    }
}

// ============================================================================
// 函数式门面
// ============================================================================

/// 注册处理器，`namespace` 为 None 时使用默认命名空间
pub fn register_open_resource_handler(
    registry: &OpenResourceRegistry,
    handler: Arc<dyn OpenResourceHandler>,
    namespace: Option<&str>,
) -> HandlerRegistration {
    registry.register(handler, namespace.unwrap_or(DEFAULT_NAMESPACE))
}

/// 获取处理器：指定命名空间时按命名空间查找，否则返回活跃处理器
pub fn get_open_resource_handler(
    registry: &OpenResourceRegistry,
    namespace: Option<&str>,
) -> Option<Arc<dyn OpenResourceHandler>> {
    match namespace {
        Some(ns) => registry.get_by_namespace(ns),
        None => registry.get_active(),
    }
}

pub fn set_active_open_resource_handler(registry: &OpenResourceRegistry, namespace: &str) -> bool {
    registry.set_active(namespace)
}

pub fn get_registered_handler_namespaces(registry: &OpenResourceRegistry) -> Vec<String> {
    registry.list_namespaces()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NamedHandler;

    impl OpenResourceHandler for NamedHandler {
        fn open_in_panel(&self, _path: &str, _node: &DstuNode, _mode: EditorMode) {}
        fn open_in_page(&self, _path: &str, _node: &DstuNode, _mode: EditorMode) {}
        fn open_in_fullscreen(&self, _path: &str, _node: &DstuNode, _mode: EditorMode) {}
        fn open_in_modal(&self, _path: &str, _node: &DstuNode, _mode: EditorMode) {}
    }

    fn handler() -> Arc<dyn OpenResourceHandler> {
        Arc::new(NamedHandler)
    }

    fn is_same(
        found: Option<Arc<dyn OpenResourceHandler>>,
        expected: &Arc<dyn OpenResourceHandler>,
    ) -> bool {
        found.map(|h| same_handler(&h, expected)).unwrap_or(false)
    }

    #[test]
    fn test_empty_registry() {
        let registry = OpenResourceRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get_active().is_none());
        assert!(registry.active_namespace().is_none());
        assert!(registry.list_namespaces().is_empty());
    }

    #[test]
    fn test_last_writer_wins_and_fallback() {
        let registry = OpenResourceRegistry::new();
        let a = handler();
        let b = handler();

        let reg_a = registry.register(a.clone(), "x");
        let reg_b = registry.register(b.clone(), "y");
        assert!(is_same(registry.get_active(), &b));

        assert!(reg_b.unregister());
        assert!(is_same(registry.get_active(), &a));

        assert!(reg_a.unregister());
        assert!(registry.get_active().is_none());
        assert!(registry.active_namespace().is_none());
    }

    #[test]
    fn test_unregister_inactive_keeps_active() {
        let registry = OpenResourceRegistry::new();
        let a = handler();
        let b = handler();
        let reg_a = registry.register(a, "x");
        let _reg_b = registry.register(b.clone(), "y");

        assert!(reg_a.unregister());
        assert!(is_same(registry.get_active(), &b));
        assert_eq!(registry.list_namespaces(), vec!["y".to_string()]);
    }

    #[test]
    fn test_stale_unregister_is_ignored() {
        let registry = OpenResourceRegistry::new();
        let old = handler();
        let new = handler();

        let stale = registry.register(old, "chat");
        let _current = registry.register(new.clone(), "chat");

        assert!(!stale.unregister());
        assert!(is_same(registry.get_by_namespace("chat"), &new));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reregister_repromotes_without_duplicates() {
        let registry = OpenResourceRegistry::new();
        let a = handler();
        let b = handler();

        let _ra = registry.register(a.clone(), "x");
        let _rb = registry.register(b, "y");
        let ra2 = registry.register(a.clone(), "x");

        assert_eq!(
            registry.list_namespaces(),
            vec!["y".to_string(), "x".to_string()]
        );
        assert_eq!(registry.active_namespace().as_deref(), Some("x"));

        // 同一个处理器实例，任一凭据都能注销
        assert!(ra2.unregister());
        assert_eq!(registry.active_namespace().as_deref(), Some("y"));
    }

    #[test]
    fn test_set_active() {
        let registry = OpenResourceRegistry::new();
        let a = handler();
        let _ra = registry.register(a.clone(), "x");
        let _rb = registry.register(handler(), "y");

        assert!(registry.set_active("x"));
        assert!(is_same(registry.get_active(), &a));
        // 注册顺序不变
        assert_eq!(
            registry.list_namespaces(),
            vec!["x".to_string(), "y".to_string()]
        );

        assert!(!registry.set_active("missing"));
        assert_eq!(registry.active_namespace().as_deref(), Some("x"));
    }

    #[test]
    fn test_unregister_after_registry_dropped() {
        let registry = OpenResourceRegistry::new();
        let reg = registry.register(handler(), "x");
        drop(registry);
        assert!(!reg.unregister());
    }

    #[test]
    fn test_facade_functions() {
        let registry = OpenResourceRegistry::new();
        let a = handler();
        let reg = register_open_resource_handler(&registry, a.clone(), None);
        assert_eq!(reg.namespace(), DEFAULT_NAMESPACE);
        assert!(is_same(get_open_resource_handler(&registry, None), &a));
        assert!(is_same(
            get_open_resource_handler(&registry, Some(DEFAULT_NAMESPACE)),
            &a
        ));
        assert!(get_open_resource_handler(&registry, Some("nope")).is_none());
        assert!(set_active_open_resource_handler(&registry, DEFAULT_NAMESPACE));
        assert_eq!(
            get_registered_handler_namespaces(&registry),
            vec![DEFAULT_NAMESPACE.to_string()]
        );
    }
}
