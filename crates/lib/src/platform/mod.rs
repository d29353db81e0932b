//! Platform detection and the capabilities that differ between platforms.

pub mod paths;

const LINUX_LIBRARY_SUFFIXES: &[&str] = &[".so"];
const MACOS_LIBRARY_SUFFIXES: &[&str] = &[".so", ".dylib"];

/// Operating systems with a known set of capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
  Linux,
  MacOs,
  Windows,
}

impl Os {
  pub fn current() -> Option<Self> {
    Self::from_name(std::env::consts::OS)
  }

  /// Map a `std::env::consts::OS` value.
  pub fn from_name(name: &str) -> Option<Self> {
    match name {
      "linux" => Some(Self::Linux),
      "macos" => Some(Self::MacOs),
      "windows" => Some(Self::Windows),
      _ => None,
    }
  }
}

/// What the current platform supports, decided once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformCapabilities {
  pub os: Os,
  /// The produced executable can have a loader-relative search path added after linking.
  pub supports_runtime_path_patch: bool,
  /// File name suffixes of native shared libraries to carry next to the executable.
  pub library_suffixes: &'static [&'static str],
}

impl PlatformCapabilities {
  pub fn for_os(os: Os) -> Self {
    match os {
      Os::MacOs => Self {
        os,
        supports_runtime_path_patch: true,
        library_suffixes: MACOS_LIBRARY_SUFFIXES,
      },
      // Linux deployments rely on LD_LIBRARY_PATH instead of a patched binary.
      Os::Linux | Os::Windows => Self {
        os,
        supports_runtime_path_patch: false,
        library_suffixes: LINUX_LIBRARY_SUFFIXES,
      },
    }
  }

  /// Detect the capabilities of the current platform
  ///
  /// Returns `None` if the OS is not supported
  pub fn current() -> Option<Self> {
    Os::current().map(Self::for_os)
  }

  /// Whether `file_name` looks like a native shared library on this platform.
  pub fn is_native_library(&self, file_name: &str) -> bool {
    self.library_suffixes.iter().any(|suffix| file_name.ends_with(suffix))
  }
}
