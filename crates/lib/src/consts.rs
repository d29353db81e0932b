//! Fixed names describing the project layout this tool builds.

/// Manifest that marks the top of a buildable source tree.
pub const MANIFEST_FILE: &str = "go.mod";

/// Folder, relative to the source root, where the toolchain is invoked.
pub const ENTRY_POINT_DIR: [&str; 2] = ["cmd", "node"];

/// Name of the executable produced in the entry point folder (without platform suffix).
pub const EXECUTABLE_NAME: &str = "node";

/// Module whose pinned version locates the prebuilt native libraries.
pub const NATIVE_DEPENDENCY_MODULE: &str = "github.com/multiversx/mx-chain-vm-go";

/// Sub-folders of the dependency holding native libraries, one per execution backend generation.
pub const NATIVE_LIBRARY_DIRS: [&str; 2] = ["wasmer", "wasmer2"];

/// Read, write and execute by owner; read and execute by group and others.
pub const FILE_MODE_NICE: u32 = 0o755;

pub const DEFAULT_TOOLCHAIN: &str = "go";
pub const RUNTIME_PATH_PATCH_TOOL: &str = "install_name_tool";

/// Loader-relative search path added to the executable on macOS.
pub const LOADER_RELATIVE_RPATH: &str = "@loader_path";

/// Archive name stem inside the per-entry downloads folder.
pub const ARCHIVE_STEM: &str = "source";
