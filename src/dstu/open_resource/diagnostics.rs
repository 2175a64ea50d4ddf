//! 诊断汇报
//!
//! 分发器在返回错误之前先汇报到诊断汇聚点，这样即使调用方忽略了返回值也会留下记录。

use std::sync::Mutex;

use chrono::Utc;
use serde::Serialize;

use crate::dstu::error::{DstuError, ErrorContext};

/// 一条诊断记录
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticRecord {
    pub timestamp: String,
    pub operation: String,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "ErrorContext::is_empty")]
    pub context: ErrorContext,
}

impl DiagnosticRecord {
    pub fn from_error(operation: &str, error: &DstuError) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            operation: operation.to_string(),
            code: error.code().to_string(),
            message: error.message().to_string(),
            context: error.context().clone(),
        }
    }
}

/// 诊断汇聚点
pub trait DiagnosticsSink: Send + Sync {
    fn report(&self, operation: &str, error: &DstuError);
}

/// 写入日志的诊断汇聚点（默认）
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl DiagnosticsSink for LogDiagnostics {
    fn report(&self, operation: &str, error: &DstuError) {
        let context = error.context();
        if context.is_empty() {
            log::warn!(
                "[DSTU::diagnostics] {} failed: code={}, message={}",
                operation,
                error.code(),
                error.message()
            );
        } else {
            log::warn!(
                "[DSTU::diagnostics] {} failed: code={}, message={}, {}",
                operation,
                error.code(),
                error.message(),
                context
            );
        }
    }
}

/// 保留最近若干条记录的诊断汇聚点，同时转发到日志
pub struct MemoryDiagnostics {
    records: Mutex<Vec<DiagnosticRecord>>,
    capacity: usize,
}

impl MemoryDiagnostics {
    const DEFAULT_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn records(&self) -> Vec<DiagnosticRecord> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl Default for MemoryDiagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticsSink for MemoryDiagnostics {
    fn report(&self, operation: &str, error: &DstuError) {
        LogDiagnostics.report(operation, error);

        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        if records.len() >= self.capacity {
            let overflow = records.len() + 1 - self.capacity;
            records.drain(..overflow);
        }
        records.push(DiagnosticRecord::from_error(operation, error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_diagnostics_records() {
        let sink = MemoryDiagnostics::new();
        sink.report("open", &DstuError::not_found("gone").with_path("/note_1"));

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].operation, "open");
        assert_eq!(records[0].code, "NOT_FOUND");
        assert_eq!(records[0].context.path.as_deref(), Some("/note_1"));

        sink.clear();
        assert!(sink.records().is_empty());
    }

    #[test]
    fn test_memory_diagnostics_capacity() {
        let sink = MemoryDiagnostics::with_capacity(2);
        for i in 0..5 {
            sink.report("open", &DstuError::internal(format!("e{}", i)));
        }
        let messages: Vec<String> = sink.records().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, vec!["e3".to_string(), "e4".to_string()]);
    }

    #[test]
    fn test_record_serialization() {
        let record = DiagnosticRecord::from_error("open", &DstuError::validation("bad"));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["code"], "VALIDATION");
        assert!(json.get("context").is_none());
        assert!(json["timestamp"].as_str().is_some());
    }
}
