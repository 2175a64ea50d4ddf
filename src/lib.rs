// DSTU library entry
// 路径寻址、校验与打开资源分发；`dstu` 命令行入口见 main.rs。

pub mod config;
pub mod dstu;
pub mod utils;

pub use config::DstuConfig;
pub use dstu::{DstuError, DstuResult, DstuRuntime};
