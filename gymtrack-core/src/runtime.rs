use anyhow::Result;
use log::debug;
use std::sync::OnceLock;
use tokio::runtime::Runtime;

static GLOBAL_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Process-wide runtime for callers that have none of their own, such as the
/// mobile shell. Built on first use.
pub fn global_runtime() -> Result<&'static Runtime> {
    if let Some(rt) = GLOBAL_RUNTIME.get() {
        return Ok(rt);
    }
    let threads = std::cmp::max(num_cpus::get(), 2);
    debug!("Initializing global runtime with {} threads", threads);
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(threads)
        .enable_all()
        .build()?;
    // A concurrent caller may have won the race; its runtime is kept.
    let _ = GLOBAL_RUNTIME.set(rt);
    GLOBAL_RUNTIME
        .get()
        .ok_or_else(|| anyhow::anyhow!("global runtime unavailable"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_is_shared() {
        let a = global_runtime().unwrap() as *const Runtime;
        let b = global_runtime().unwrap() as *const Runtime;
        assert_eq!(a, b);
        assert_eq!(global_runtime().unwrap().block_on(async { 2 + 2 }), 4);
    }
}
