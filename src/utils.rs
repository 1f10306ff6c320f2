use dirs::data_dir;
use std::path::PathBuf;

pub fn data_root() -> PathBuf {
    let base = data_dir()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    base.join("fab-event-feed")
}

pub fn config_path() -> PathBuf {
    data_root().join("config.json")
}
