pub mod factories;

/// Install `env_logger` once so `RUST_LOG=shieldbuf=trace` shows builder and reader output.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
