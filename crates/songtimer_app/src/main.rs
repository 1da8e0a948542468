use songtimer_app::app::{run, AppConfig};

#[cfg(target_os = "android")]
fn main() {
    // Android entry-point handled via `lib.rs`.
}

#[cfg(not(target_os = "android"))]
fn main() {
    tracing_subscriber::fmt::init();
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(%err, "ignoring invalid configuration");
            AppConfig::default()
        }
    };
    if let Err(err) = run(config) {
        eprintln!("Failed to start Song Timer: {err:#}");
    }
}
