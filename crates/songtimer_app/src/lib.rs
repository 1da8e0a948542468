pub mod app;
pub mod platform;

#[cfg(target_os = "android")]
use winit::platform::android::activity::AndroidApp;

#[cfg(target_os = "android")]
#[no_mangle]
pub extern "C" fn android_main(android_app: AndroidApp) {
    tracing_subscriber::fmt::init();

    let storage_root = android_app.internal_data_path();

    let mut config = app::AppConfig::from_env().unwrap_or_default();
    config.bootstrap_mobile_defaults(storage_root);

    let options = eframe::NativeOptions {
        android_app: Some(android_app),
        ..Default::default()
    };
    if let Err(err) = app::run_with_options(config, options) {
        tracing::error!(%err, "Android runtime terminated unexpectedly");
    }
}
