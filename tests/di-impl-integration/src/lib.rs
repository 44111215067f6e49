//! di-impl 集中测试工程的共享工具

use tracing_subscriber::EnvFilter;

/// 初始化测试日志，重复调用时忽略
///
/// 日志级别由 `RUST_LOG` 控制。
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
