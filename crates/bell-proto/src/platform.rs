use std::path::PathBuf;

pub fn data_dir() -> PathBuf {
    // On macOS and Linux, use ~/.local/share/bell/ (XDG standard)
    // instead of macOS Application Support for consistency
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".local")
            .join("share")
            .join("bell")
    }
    #[cfg(windows)]
    {
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("bell")
    }
}

pub fn config_dir() -> PathBuf {
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".config")
            .join("bell")
    }
    #[cfg(windows)]
    {
        dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("bell")
    }
}

/// Program and leading arguments used to hand a URL to the desktop.
pub fn default_open_command() -> (&'static str, &'static [&'static str]) {
    #[cfg(target_os = "macos")]
    {
        ("open", &[])
    }
    #[cfg(windows)]
    {
        ("cmd", &["/C", "start", ""])
    }
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        ("xdg-open", &[])
    }
}
