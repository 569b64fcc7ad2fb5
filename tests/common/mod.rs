//! Common test utilities for vtkpkg integration tests
//!
//! [`PackageTree`] lays out an installed VTK package folder in a temporary
//! directory, with CMake files that reference dependency roots the way the
//! install step writes them.

// Not every test file uses every helper
#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const ZLIB_ROOT: &str = "/home/build/.conan/data/zlib/1.2.11/sight/stable/package/1a2b3c";
pub const FREETYPE_ROOT: &str = "/home/build/.conan/data/freetype/2.9.1/sight/stable/package/4d5e6f";
pub const GLEW_ROOT: &str = "/home/build/.conan/data/glew/2.0.0/sight/stable/package/7a8b9c";
pub const EXPAT_ROOT: &str = "/home/build/.conan/data/expat/2.2.5/sight/stable/package/0d1e2f";
pub const LIBJPEG_ROOT: &str = "/home/build/.conan/data/libjpeg/9c/sight/stable/package/3a4b5c";
pub const LIBPNG_ROOT: &str = "/home/build/.conan/data/libpng/1.6.34/sight/stable/package/6d7e8f";
pub const LIBTIFF_ROOT: &str = "/home/build/.conan/data/libtiff/4.0.9/sight/stable/package/9a0b1c";

pub const SDK_INCLUDE: &str = "/Applications/Xcode.app/Contents/Developer/Platforms/MacOSX.platform/Developer/SDKs/MacOSX10.13.sdk/usr/include";

/// Relative location of VTK's CMake package directory.
pub const CMAKE_DIR: &str = "lib/cmake/vtk-8.0";

/// A temporary package folder plus an empty config file.
pub struct PackageTree {
    temp: TempDir,
}

impl PackageTree {
    /// An empty package folder.
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("package")).unwrap();
        fs::write(temp.path().join("vtkpkg.toml"), "").unwrap();
        Self {
            temp,
        }
    }

    /// A package folder with every file the non-Linux fixups expect.
    pub fn vtk() -> Self {
        let tree = Self::new();
        tree.write(
            &format!("{CMAKE_DIR}/VTKTargets.cmake"),
            &format!(
                "set_target_properties(vtkIOImage PROPERTIES\n  \
                 INTERFACE_LINK_LIBRARIES \"{ZLIB_ROOT}/lib/libz.a;{FREETYPE_ROOT}/lib/libfreetype.a\"\n  \
                 INTERFACE_INCLUDE_DIRECTORIES \"${{_IMPORT_PREFIX}}/include;{GLEW_ROOT}/include;{SDK_INCLUDE}\"\n)\n"
            ),
        );
        for (module, body) in [
            ("vtkexpat", format!("set(vtkexpat_LIBRARIES \"{EXPAT_ROOT}/lib/libexpat.a\")\n")),
            ("vtkfreetype", format!("set(vtkfreetype_INCLUDE_DIRS \"{FREETYPE_ROOT}/include/freetype2\")\n")),
            ("vtkglew", format!("set(vtkglew_INCLUDE_DIRS \"{GLEW_ROOT}/include\")\n")),
            ("vtkjpeg", format!("set(vtkjpeg_LIBRARIES \"{LIBJPEG_ROOT}/lib/libjpeg.a\")\n")),
            (
                "vtkpng",
                format!("set(vtkpng_INCLUDE_DIRS \"{LIBPNG_ROOT}/include;{ZLIB_ROOT}/include\")\n"),
            ),
            ("vtktiff", format!("set(vtktiff_LIBRARIES \"{LIBTIFF_ROOT}/lib/libtiff.a\")\n")),
            ("vtkzlib", format!("set(vtkzlib_INCLUDE_DIRS \"{ZLIB_ROOT}/include\")\n")),
        ] {
            tree.write(&format!("{CMAKE_DIR}/Modules/{module}.cmake"), &body);
        }
        tree
    }

    /// The package folder.
    pub fn package(&self) -> PathBuf {
        self.temp.path().join("package")
    }

    /// The config file passed with `--config`.
    pub fn config_path(&self) -> PathBuf {
        self.temp.path().join("vtkpkg.toml")
    }

    /// Replaces the config file contents.
    pub fn write_config(&self, content: &str) {
        fs::write(self.config_path(), content).unwrap();
    }

    /// Writes a `conanbuildinfo.json` next to the package folder.
    pub fn write_buildinfo(&self, deps: &[(&str, &str)]) -> PathBuf {
        let dependencies: Vec<_> = deps
            .iter()
            .map(|(name, root)| serde_json::json!({ "name": name, "rootpath": root }))
            .collect();
        let path = self.temp.path().join("conanbuildinfo.json");
        fs::write(&path, serde_json::json!({ "dependencies": dependencies }).to_string()).unwrap();
        path
    }

    /// Writes a file relative to the package folder.
    pub fn write(&self, rel: &str, content: &str) {
        let path = self.package().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    /// Reads a file relative to the package folder.
    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.package().join(rel)).unwrap()
    }

    /// `vtkpkg --config <tree config>` with logging silenced.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("vtkpkg").unwrap();
        cmd.env_remove("RUST_LOG")
            .env_remove("VTKPKG_CONFIG_PATH")
            .arg("--quiet")
            .arg("--config")
            .arg(self.config_path());
        cmd
    }
}

/// Every non-Linux requirement with its root, as `--dep` arguments.
pub fn all_dep_args() -> Vec<String> {
    all_deps().iter().flat_map(|(name, root)| ["--dep".to_string(), format!("{name}={root}")]).collect()
}

/// Every non-Linux requirement with its root.
pub fn all_deps() -> Vec<(&'static str, &'static str)> {
    vec![
        ("zlib", ZLIB_ROOT),
        ("freetype", FREETYPE_ROOT),
        ("glew", GLEW_ROOT),
        ("expat", EXPAT_ROOT),
        ("libjpeg", LIBJPEG_ROOT),
        ("libpng", LIBPNG_ROOT),
        ("libtiff", LIBTIFF_ROOT),
    ]
}

/// Asserts that no dependency root occurs in `content`.
pub fn assert_no_roots(content: &str) {
    for (name, root) in all_deps() {
        assert!(!content.contains(root), "root of {name} survived:\n{content}");
    }
}

