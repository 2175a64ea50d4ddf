//! DSTU 运行配置
//!
//! 加载顺序：`.env`（dotenvy）→ 环境变量（前缀 `DSTU_`，层级分隔符 `__`）→
//! 可选的 `config/dstu.toml`。加载或反序列化失败时回退到默认值。
//!
//! ```text
//! DSTU_LOG_FILTER=debug
//! DSTU_DEFAULT_NAMESPACE=learning-hub
//! DSTU_PRESENTATION__TEXTBOOK__DEFAULT_LOCATION=fullscreen
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dstu::open_resource::{EditorDefaults, EditorLocation, EditorMode, DEFAULT_NAMESPACE};
use crate::dstu::types::DstuNodeType;

const ENV_PREFIX: &str = "DSTU";
const CONFIG_FILE: &str = "config/dstu";

/// 单个类型的展示覆盖项
///
/// 未给出的字段沿用内置默认值。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationOverride {
    #[serde(default, alias = "defaultLocation")]
    pub default_location: Option<EditorLocation>,
    #[serde(default, alias = "defaultMode")]
    pub default_mode: Option<EditorMode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DstuConfig {
    /// tracing EnvFilter 指令；`RUST_LOG` 优先
    pub log_filter: String,
    /// 注册打开处理器时使用的命名空间
    pub default_namespace: String,
    /// 诊断记录保留条数
    pub diagnostics_capacity: usize,
    /// 类型名 → 展示覆盖项
    pub presentation: BTreeMap<String, PresentationOverride>,
}

impl Default for DstuConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            diagnostics_capacity: 256,
            presentation: BTreeMap::new(),
        }
    }
}

impl DstuConfig {
    pub fn from_env_and_file() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let file = Path::new(CONFIG_FILE).with_extension("toml");
        Self::load(file.exists().then_some(file.as_path()))
    }

    /// 从环境变量和指定的配置文件加载
    pub fn load(file: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder().add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );
        if let Some(file) = file {
            builder = builder.add_source(config::File::from(file));
        }

        let loaded = match builder.build() {
            Ok(loaded) => loaded,
            Err(e) => {
                log::warn!("[DstuConfig] Failed to load config, using defaults: {}", e);
                return Ok(Self::default());
            }
        };

        let mut cfg = match loaded.try_deserialize::<serde_json::Value>() {
            Ok(val) => serde_json::from_value::<DstuConfig>(val).unwrap_or_else(|e| {
                log::warn!("[DstuConfig] Invalid config, using defaults: {}", e);
                Self::default()
            }),
            Err(_) => Self::default(),
        };

        if cfg.default_namespace.trim().is_empty() {
            cfg.default_namespace = DEFAULT_NAMESPACE.to_string();
        }
        cfg.diagnostics_capacity = cfg.diagnostics_capacity.max(1);
        Ok(cfg)
    }

    /// 把覆盖项合并到给定的基础配置上
    ///
    /// 未知类型名和 `folder` 会被跳过并记录警告；没有基础配置且覆盖项不完整的类型也会被跳过。
    pub fn presentation_overrides(
        &self,
        base: impl Fn(DstuNodeType) -> Option<EditorDefaults>,
    ) -> Vec<(DstuNodeType, EditorDefaults)> {
        let mut out = Vec::new();
        for (name, item) in &self.presentation {
            let node_type = match DstuNodeType::from_str(name) {
                Some(t) if t != DstuNodeType::Folder => t,
                _ => {
                    log::warn!("[DstuConfig] Skipping presentation override for '{}'", name);
                    continue;
                }
            };
            let current = base(node_type);
            let location = item
                .default_location
                .or(current.map(|d| d.default_location));
            let mode = item.default_mode.or(current.map(|d| d.default_mode));
            match (location, mode) {
                (Some(location), Some(mode)) => {
                    out.push((node_type, EditorDefaults::new(location, mode)));
                }
                _ => log::warn!(
                    "[DstuConfig] Incomplete presentation override for '{}'",
                    name
                ),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_toml(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let cfg = DstuConfig::default();
        assert_eq!(cfg.log_filter, "info");
        assert_eq!(cfg.default_namespace, "default");
        assert!(cfg.presentation.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let file = write_toml(
            r#"
default_namespace = "learning-hub"
diagnostics_capacity = 8

[presentation.textbook]
default_location = "fullscreen"

[presentation.note]
default_location = "page"
default_mode = "view"
"#,
        );
        let cfg = DstuConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.default_namespace, "learning-hub");
        assert_eq!(cfg.diagnostics_capacity, 8);
        assert_eq!(
            cfg.presentation["textbook"].default_location,
            Some(EditorLocation::Fullscreen)
        );
        assert_eq!(cfg.presentation["textbook"].default_mode, None);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let file = write_toml(
            r#"
[presentation.note]
default_location = "sidebar"
"#,
        );
        let cfg = DstuConfig::load(Some(file.path())).unwrap();
        assert!(cfg.presentation.is_empty());
        assert_eq!(cfg.default_namespace, "default");
    }

    #[test]
    fn test_presentation_overrides_merge_with_base() {
        let mut cfg = DstuConfig::default();
        cfg.presentation.insert(
            "textbook".to_string(),
            PresentationOverride {
                default_location: Some(EditorLocation::Fullscreen),
                default_mode: None,
            },
        );
        cfg.presentation.insert(
            "folder".to_string(),
            PresentationOverride {
                default_location: Some(EditorLocation::Page),
                default_mode: Some(EditorMode::Edit),
            },
        );
        cfg.presentation
            .insert("spreadsheet".to_string(), PresentationOverride::default());

        let base = |t: DstuNodeType| {
            (t == DstuNodeType::Textbook)
                .then(|| EditorDefaults::new(EditorLocation::Panel, EditorMode::View))
        };
        let overrides = cfg.presentation_overrides(base);
        assert_eq!(
            overrides,
            vec![(
                DstuNodeType::Textbook,
                EditorDefaults::new(EditorLocation::Fullscreen, EditorMode::View)
            )]
        );
    }
}
