//! DSTU 访达协议层错误定义
//!
//! 错误是值而不是异常：分发管线返回 `DstuResult`，调用方按 [`DstuError::code`] 分支处理。

use serde::Serialize;
use thiserror::Error;

/// 错误的结构化上下文（用于诊断）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ErrorContext {
    pub fn is_empty(&self) -> bool {
        self.path.is_none() && self.resource_type.is_none() && self.location.is_none()
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref path) = self.path {
            parts.push(format!("path={}", path));
        }
        if let Some(ref t) = self.resource_type {
            parts.push(format!("type={}", t));
        }
        if let Some(ref loc) = self.location {
            parts.push(format!("location={}", loc));
        }
        write!(f, "{}", parts.join(", "))
    }
}

/// DSTU 错误类型
#[derive(Debug, Clone, Error, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DstuError {
    /// 路径解析不到任何资源
    #[error("Resource not found: {message}")]
    NotFound {
        message: String,
        #[serde(skip_serializing_if = "ErrorContext::is_empty")]
        context: ErrorContext,
    },

    /// 路径语法或安全校验失败
    #[error("Invalid DSTU path: {message}")]
    InvalidPath {
        message: String,
        #[serde(skip_serializing_if = "ErrorContext::is_empty")]
        context: ErrorContext,
    },

    /// 权限不足（保留给存储层使用）
    #[error("Permission denied: {message}")]
    PermissionDenied {
        message: String,
        #[serde(skip_serializing_if = "ErrorContext::is_empty")]
        context: ErrorContext,
    },

    /// 冲突（保留）
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        #[serde(skip_serializing_if = "ErrorContext::is_empty")]
        context: ErrorContext,
    },

    /// 存储层等外部协作方的意外失败
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[serde(skip_serializing_if = "ErrorContext::is_empty")]
        context: ErrorContext,
    },

    /// 状态不允许：文件夹被当作编辑器打开、未注册处理器、类型无默认展示配置
    #[error("Invalid state: {message}")]
    InvalidState {
        message: String,
        #[serde(skip_serializing_if = "ErrorContext::is_empty")]
        context: ErrorContext,
    },

    /// 参数校验失败（如无法识别的打开位置）
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[serde(skip_serializing_if = "ErrorContext::is_empty")]
        context: ErrorContext,
    },
}

/// DSTU 结果类型
pub type DstuResult<T> = Result<T, DstuError>;

impl DstuError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        DstuError::NotFound {
            message: msg.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn invalid_path(msg: impl Into<String>) -> Self {
        DstuError::InvalidPath {
            message: msg.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        DstuError::PermissionDenied {
            message: msg.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        DstuError::Conflict {
            message: msg.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        DstuError::Internal {
            message: msg.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        DstuError::InvalidState {
            message: msg.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        DstuError::Validation {
            message: msg.into(),
            context: ErrorContext::default(),
        }
    }

    /// 错误码（稳定的字符串，跨 IPC 使用）
    pub fn code(&self) -> &'static str {
        match self {
            DstuError::NotFound { .. } => "NOT_FOUND",
            DstuError::InvalidPath { .. } => "INVALID_PATH",
            DstuError::PermissionDenied { .. } => "PERMISSION_DENIED",
            DstuError::Conflict { .. } => "CONFLICT",
            DstuError::Internal { .. } => "INTERNAL",
            DstuError::InvalidState { .. } => "INVALID_STATE",
            DstuError::Validation { .. } => "VALIDATION",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            DstuError::NotFound { message, .. }
            | DstuError::InvalidPath { message, .. }
            | DstuError::PermissionDenied { message, .. }
            | DstuError::Conflict { message, .. }
            | DstuError::Internal { message, .. }
            | DstuError::InvalidState { message, .. }
            | DstuError::Validation { message, .. } => message,
        }
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            DstuError::NotFound { context, .. }
            | DstuError::InvalidPath { context, .. }
            | DstuError::PermissionDenied { context, .. }
            | DstuError::Conflict { context, .. }
            | DstuError::Internal { context, .. }
            | DstuError::InvalidState { context, .. }
            | DstuError::Validation { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            DstuError::NotFound { context, .. }
            | DstuError::InvalidPath { context, .. }
            | DstuError::PermissionDenied { context, .. }
            | DstuError::Conflict { context, .. }
            | DstuError::Internal { context, .. }
            | DstuError::InvalidState { context, .. }
            | DstuError::Validation { context, .. } => context,
        }
    }

    /// 附加路径上下文
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.context_mut().path = Some(path.into());
        self
    }

    /// 附加资源类型上下文
    pub fn with_resource_type(mut self, resource_type: impl ToString) -> Self {
        self.context_mut().resource_type = Some(resource_type.to_string());
        self
    }

    /// 附加打开位置上下文
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.context_mut().location = Some(location.into());
        self
    }
}

// 用于命令层返回
impl From<DstuError> for String {
    fn from(err: DstuError) -> Self {
        err.to_string()
    }
}

impl From<serde_json::Error> for DstuError {
    fn from(err: serde_json::Error) -> Self {
        DstuError::internal(format!("Serialization error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DstuError::invalid_path("/invalid/path");
        assert_eq!(err.to_string(), "Invalid DSTU path: /invalid/path");

        let err = DstuError::not_found("/数学/note_123");
        assert_eq!(err.to_string(), "Resource not found: /数学/note_123");

        let err = DstuError::invalid_state("no handler registered");
        assert_eq!(err.to_string(), "Invalid state: no handler registered");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(DstuError::not_found("x").code(), "NOT_FOUND");
        assert_eq!(DstuError::invalid_path("x").code(), "INVALID_PATH");
        assert_eq!(DstuError::permission_denied("x").code(), "PERMISSION_DENIED");
        assert_eq!(DstuError::conflict("x").code(), "CONFLICT");
        assert_eq!(DstuError::internal("x").code(), "INTERNAL");
        assert_eq!(DstuError::invalid_state("x").code(), "INVALID_STATE");
        assert_eq!(DstuError::validation("x").code(), "VALIDATION");
    }

    #[test]
    fn test_error_context() {
        let err = DstuError::validation("unknown location")
            .with_path("/note_1")
            .with_resource_type("note")
            .with_location("bogus");
        assert_eq!(err.context().path.as_deref(), Some("/note_1"));
        assert_eq!(err.context().to_string(), "path=/note_1, type=note, location=bogus");
        assert_eq!(err.message(), "unknown location");
    }

    #[test]
    fn test_error_serialization() {
        let err = DstuError::not_found("gone").with_path("/note_1");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "NOT_FOUND");
        assert_eq!(json["message"], "gone");
        assert_eq!(json["context"]["path"], "/note_1");

        let json = serde_json::to_value(DstuError::internal("boom")).unwrap();
        assert!(json.get("context").is_none());
    }

    #[test]
    fn test_error_to_string_conversion() {
        let s: String = DstuError::invalid_path("test").into();
        assert_eq!(s, "Invalid DSTU path: test");
    }
}
