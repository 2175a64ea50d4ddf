//! 节点解析器接口
//!
//! 分发器不关心节点从哪里来：存储层在构造分发器时注入一个 [`NodeResolver`]。

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::dstu::error::DstuResult;
use crate::dstu::path_parser::normalize_path;
use crate::dstu::types::DstuNode;

/// 路径 → 节点解析
///
/// 找不到节点用 `Ok(None)` 表示，`Err` 只用于调用本身失败。
#[async_trait]
pub trait NodeResolver: Send + Sync {
    async fn resolve(&self, path: &str) -> DstuResult<Option<DstuNode>>;
}

/// 内存节点表
///
/// 适用于预加载的节点集合（离线快照、测试夹具）。按规范化路径索引。
#[derive(Default)]
pub struct InMemoryNodeResolver {
    nodes: RwLock<HashMap<String, DstuNode>>,
}

impl InMemoryNodeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nodes(nodes: impl IntoIterator<Item = DstuNode>) -> Self {
        let resolver = Self::new();
        for node in nodes {
            resolver.insert(node);
        }
        resolver
    }

    /// 插入或替换节点，返回被替换的旧节点
    pub fn insert(&self, node: DstuNode) -> Option<DstuNode> {
        let key = normalize_path(&node.path);
        self.nodes
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, node)
    }

    pub fn remove(&self, path: &str) -> Option<DstuNode> {
        self.nodes
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&normalize_path(path))
    }

    pub fn len(&self) -> usize {
        self.nodes.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl NodeResolver for InMemoryNodeResolver {
    async fn resolve(&self, path: &str) -> DstuResult<Option<DstuNode>> {
        let node = self
            .nodes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&normalize_path(path))
            .cloned();
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dstu::types::DstuNodeType;

    #[tokio::test]
    async fn test_in_memory_resolver() {
        let resolver = InMemoryNodeResolver::with_nodes([DstuNode::resource(
            "note_1",
            "/数学/note_1",
            "函数",
            DstuNodeType::Note,
        )]);
        assert_eq!(resolver.len(), 1);

        let found = resolver.resolve("/数学/note_1").await.unwrap();
        assert_eq!(found.map(|n| n.id), Some("note_1".to_string()));

        // 规范化后命中
        assert!(resolver.resolve("数学/note_1/").await.unwrap().is_some());
        assert!(resolver.resolve("/数学/note_2").await.unwrap().is_none());

        assert!(resolver.remove("/数学/note_1").is_some());
        assert!(resolver.is_empty());
    }
}
