//! Logging initialization and utilities

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable. Calling this more than
/// once is harmless; later calls leave the first logger in place.
///
/// # Example
/// ```
/// tilegen::core::logging::init();
/// log::info!("Generator started");
/// ```
pub fn init() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    )
    .format_timestamp_millis()
    .try_init();
}
