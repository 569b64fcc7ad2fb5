use crate::common::{
    CMAKE_DIR, GLEW_ROOT, PackageTree, SDK_INCLUDE, ZLIB_ROOT, all_dep_args, assert_no_roots,
};
use predicates::prelude::*;
use std::fs;
use vtkpkg::test_utils::init_test_logging;

#[test]
fn test_relocate_replaces_every_root() {
    init_test_logging(None);
    let tree = PackageTree::vtk();

    tree.command()
        .arg("relocate")
        .arg(tree.package())
        .args(all_dep_args())
        .assert()
        .success()
        .stdout(predicate::str::contains("Relocated 11 root reference(s) in 8 of 8 file(s)"));

    let targets = tree.read(&format!("{CMAKE_DIR}/VTKTargets.cmake"));
    assert_no_roots(&targets);
    assert!(targets.contains("${CONAN_ZLIB_ROOT}/lib/libz.a"));
    assert!(targets.contains("${CONAN_GLEW_ROOT}/include"));
    // SDK paths are left alone unless requested
    assert!(targets.contains(SDK_INCLUDE));

    let png = tree.read(&format!("{CMAKE_DIR}/Modules/vtkpng.cmake"));
    assert_eq!(
        png,
        "set(vtkpng_INCLUDE_DIRS \"${CONAN_LIBPNG_ROOT}/include;${CONAN_ZLIB_ROOT}/include\")\n"
    );
}

#[test]
fn test_relocate_twice_is_byte_identical() {
    let tree = PackageTree::vtk();
    let run = || {
        tree.command()
            .arg("relocate")
            .arg(tree.package())
            .arg("--strip-sdk")
            .args(all_dep_args())
            .assert()
            .success();
    };

    run();
    let first = fs::read(tree.package().join(CMAKE_DIR).join("VTKTargets.cmake")).unwrap();
    run();
    let second = fs::read(tree.package().join(CMAKE_DIR).join("VTKTargets.cmake")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_strip_sdk_flag_removes_sdk_paths() {
    let tree = PackageTree::vtk();

    tree.command()
        .arg("relocate")
        .arg(tree.package())
        .arg("--strip-sdk")
        .args(all_dep_args())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 SDK path(s)"));

    let targets = tree.read(&format!("{CMAKE_DIR}/VTKTargets.cmake"));
    assert!(!targets.contains("MacOSX10.13.sdk"));
    assert!(targets.contains("\"${_IMPORT_PREFIX}/include;${CONAN_GLEW_ROOT}/include\""));
}

#[test]
fn test_unrelated_path_sharing_a_prefix_survives() {
    let tree = PackageTree::new();
    let sibling = format!("{ZLIB_ROOT}-debug/lib/libz.a");
    tree.write("Foo.cmake", &format!("{ZLIB_ROOT}/lib/libz.a;{sibling}"));

    tree.command()
        .arg("relocate")
        .arg(tree.package())
        .arg("--dep")
        .arg(format!("zlib={ZLIB_ROOT}"))
        .assert()
        .success();

    assert_eq!(tree.read("Foo.cmake"), format!("${{CONAN_ZLIB_ROOT}}/lib/libz.a;{sibling}"));
}

#[test]
fn test_pattern_limits_targets() {
    let tree = PackageTree::new();
    tree.write("lib/cmake/A.cmake", ZLIB_ROOT);
    tree.write("share/notes.txt", ZLIB_ROOT);

    tree.command()
        .arg("relocate")
        .arg(tree.package())
        .arg("--pattern")
        .arg("**/*.txt")
        .arg("--dep")
        .arg(format!("zlib={ZLIB_ROOT}"))
        .assert()
        .success();

    assert_eq!(tree.read("lib/cmake/A.cmake"), ZLIB_ROOT);
    assert_eq!(tree.read("share/notes.txt"), "${CONAN_ZLIB_ROOT}");
}

#[test]
fn test_non_strict_missing_root_is_noop() {
    let tree = PackageTree::new();
    tree.write("A.cmake", "set(X 1)\n");

    tree.command()
        .arg("relocate")
        .arg(tree.package())
        .arg("--dep")
        .arg(format!("zlib={ZLIB_ROOT}"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Relocated 0 root reference(s) in 0 of 1 file(s)"));

    assert_eq!(tree.read("A.cmake"), "set(X 1)\n");
}

#[test]
fn test_strict_missing_root_fails() {
    let tree = PackageTree::new();
    tree.write("A.cmake", "set(X 1)\n");

    tree.command()
        .arg("relocate")
        .arg(tree.package())
        .arg("--strict")
        .arg("--dep")
        .arg(format!("zlib={ZLIB_ROOT}"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Install root of 'zlib' not found"));
}

#[test]
fn test_roots_from_buildinfo_and_config() {
    let tree = PackageTree::new();
    tree.write("A.cmake", &format!("{ZLIB_ROOT}/include;{GLEW_ROOT}/include"));
    let buildinfo = tree.write_buildinfo(&[("zlib", ZLIB_ROOT)]);
    tree.write_config(&format!("[dependencies]\nglew = \"{GLEW_ROOT}\"\n"));

    tree.command()
        .arg("relocate")
        .arg(tree.package())
        .arg("--buildinfo")
        .arg(&buildinfo)
        .assert()
        .success();

    assert_eq!(tree.read("A.cmake"), "${CONAN_ZLIB_ROOT}/include;${CONAN_GLEW_ROOT}/include");
}

#[test]
fn test_config_enables_strict_and_strip_sdk() {
    let tree = PackageTree::new();
    tree.write("A.cmake", &format!("{ZLIB_ROOT}/include;{SDK_INCLUDE}"));
    tree.write_config(&format!(
        "strict = true\nstrip_sdk = true\n\n[dependencies]\nzlib = \"{ZLIB_ROOT}\"\n"
    ));

    tree.command().arg("relocate").arg(tree.package()).assert().success();
    assert_eq!(tree.read("A.cmake"), "${CONAN_ZLIB_ROOT}/include");

    tree.write("B.cmake", "nothing here");
    tree.command()
        .arg("relocate")
        .arg(tree.package())
        .assert()
        .failure()
        .stderr(predicate::str::contains("B.cmake"));
}

#[test]
fn test_strip_sdk_command() {
    let tree = PackageTree::new();
    tree.write("A.cmake", &format!("a;{SDK_INCLUDE};b"));
    tree.write("B.cmake", "/usr/include");

    tree.command()
        .arg("strip-sdk")
        .arg(tree.package())
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 SDK path(s) from 1 file(s)"));

    assert_eq!(tree.read("A.cmake"), "a;b");
    assert_eq!(tree.read("B.cmake"), "/usr/include");
}
