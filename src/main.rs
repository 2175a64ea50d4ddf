//! `dstu` 命令行入口
//!
//! 从 stdin 读取一条 JSON 请求，执行后把 JSON 结果打印到 stdout。
//!
//! ```text
//! echo '{"command":"parse_path","path":"/高考复习/函数/note_abc123"}' | dstu
//! ```

use std::io::Read;

use dstu_core::dstu::{dstu_execute, DstuRequest, DstuRuntime};
use dstu_core::DstuConfig;
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 先安装日志，配置加载过程中的告警才不会丢失；RUST_LOG 未设置时再换成配置里的过滤器
    let rust_log = EnvFilter::try_from_default_env().ok();
    let from_rust_log = rust_log.is_some();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(rust_log.unwrap_or_else(|| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_filter_reloading();
    let reload = builder.reload_handle();
    builder.init();

    let cfg = DstuConfig::from_env_and_file()?;
    if !from_rust_log {
        reload.reload(EnvFilter::new(&cfg.log_filter))?;
    }

    let runtime = DstuRuntime::new(cfg)?;

    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    let request: DstuRequest = serde_json::from_str(&buf)?;
    tracing::debug!("dstu request: {:?}", request);

    let out = match dstu_execute(&runtime, request).await {
        Ok(result) => json!({ "ok": true, "result": result }),
        Err(error) => json!({ "ok": false, "error": error }),
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
