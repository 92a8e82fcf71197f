use once_cell::sync::OnceCell;

pub const VERSION_ENV: &str = "BOOTSTRAPPER_VERSION";
pub const UNSPECIFIED: &str = "unspecified";

static VERSION: OnceCell<String> = OnceCell::new();

/// Version string for this process. The environment is read on first call only.
pub fn get_version() -> &'static str {
    VERSION.get_or_init(|| resolve(std::env::var(VERSION_ENV).ok().as_deref()))
}

pub fn resolve(value: Option<&str>) -> String {
    match value {
        Some(version) if !version.is_empty() => version.to_owned(),
        _ => UNSPECIFIED.to_owned(),
    }
}
