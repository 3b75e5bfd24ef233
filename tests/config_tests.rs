use std::env;
use std::time::Duration;

use serial_test::serial;

use mxtgen::config::{get_config, MxtgenConfig};
use mxtgen::controller::ControllerSettings;
use mxtgen::locale::Locale;

fn clear_env() {
    for var in [
        "MXTGEN_BASE_URL",
        "MXTGEN_RESET_DELAY_MS",
        "MXTGEN_DEFAULT_LOCALE",
        "MXTGEN_STORAGE_PATH",
        "MXTGEN_LOGGING_ENABLED",
        "MXTGEN_LOG_LEVEL",
    ] {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn load_uses_defaults_without_overrides() {
    clear_env();
    let config = MxtgenConfig::load().expect("config should load");

    assert_eq!(config.endpoint.path, "./gen");
    assert_eq!(config.endpoint.filename, "Custom.mxtpro");
    assert_eq!(config.form.default_version, "25.2");
    assert_eq!(config.form.default_count, "1");
    assert_eq!((config.form.min_count, config.form.max_count), (1, 999));
    assert_eq!(config.ui.reset_delay(), Duration::from_secs(1));
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn env_overrides_win() {
    clear_env();
    env::set_var("MXTGEN_BASE_URL", "https://keys.example.test/app/");
    env::set_var("MXTGEN_RESET_DELAY_MS", "250");
    env::set_var("MXTGEN_DEFAULT_LOCALE", "en");
    env::set_var("MXTGEN_STORAGE_PATH", "/tmp/mxtgen-test/prefs.json");

    let config = MxtgenConfig::load().expect("config should load");
    clear_env();

    assert_eq!(config.endpoint.base_url, "https://keys.example.test/app/");
    assert_eq!(config.ui.reset_delay(), Duration::from_millis(250));
    assert_eq!(config.ui.default_locale(), Locale::En);
    assert_eq!(
        config.storage.resolve_path().as_deref(),
        Some(std::path::Path::new("/tmp/mxtgen-test/prefs.json"))
    );

    let settings = ControllerSettings::from(&config);
    assert_eq!(settings.default_locale, Locale::En);
    assert_eq!(settings.reset_delay, Duration::from_millis(250));
}

#[test]
#[serial]
fn invalid_env_values_fail_validation() {
    clear_env();
    env::set_var("MXTGEN_LOG_LEVEL", "loud");

    let config = MxtgenConfig::load().expect("config should load");
    clear_env();

    assert!(config.validate().is_err());
}

#[test]
#[serial]
fn global_config_is_cached() {
    clear_env();
    let first = get_config().expect("config should initialise");
    let second = get_config().expect("config should be cached");
    assert!(std::ptr::eq(first, second));
}
