use std::sync::OnceLock;

/// Operating system family, as far as socket address layouts are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    Linux,
    /// FreeBSD, OpenBSD, NetBSD, DragonFly and Apple kernels.
    Bsd,
}

static CURRENT: OnceLock<Platform> = OnceLock::new();

impl Platform {
    /// Platform of the running process. Detected on first use and constant afterwards.
    pub fn current() -> Platform {
        *CURRENT.get_or_init(Platform::detect)
    }

    fn detect() -> Platform {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(any(
            target_os = "macos",
            target_os = "ios",
            target_os = "tvos",
            target_os = "watchos",
            target_os = "visionos",
            target_os = "freebsd",
            target_os = "dragonfly",
            target_os = "openbsd",
            target_os = "netbsd",
        )) {
            Platform::Bsd
        } else {
            // Everything else speaks the Linux layout.
            Platform::Linux
        }
    }

    pub fn is_windows(self) -> bool {
        self == Platform::Windows
    }
    pub fn is_linux(self) -> bool {
        self == Platform::Linux
    }
    pub fn is_bsd(self) -> bool {
        self == Platform::Bsd
    }
}
