use crate::common::{CMAKE_DIR, PackageTree, SDK_INCLUDE, ZLIB_ROOT, all_dep_args, all_deps, assert_no_roots};
use predicates::prelude::*;

const FIXUP_FILES: [&str; 8] = [
    "VTKTargets.cmake",
    "Modules/vtkexpat.cmake",
    "Modules/vtkfreetype.cmake",
    "Modules/vtkglew.cmake",
    "Modules/vtkjpeg.cmake",
    "Modules/vtkpng.cmake",
    "Modules/vtktiff.cmake",
    "Modules/vtkzlib.cmake",
];

#[test]
fn test_windows_package_relocates_every_fixup() {
    let tree = PackageTree::vtk();

    tree.command()
        .arg("package")
        .arg(tree.package())
        .arg("--platform")
        .arg("windows")
        .args(all_dep_args())
        .assert()
        .success()
        .stdout(predicate::str::contains("Packaged for windows: 11 root reference(s) relocated"));

    for file in FIXUP_FILES {
        assert_no_roots(&tree.read(&format!("{CMAKE_DIR}/{file}")));
    }
    // Windows keeps SDK paths
    assert!(tree.read(&format!("{CMAKE_DIR}/VTKTargets.cmake")).contains(SDK_INCLUDE));
}

#[test]
fn test_macos_package_strips_sdk() {
    let tree = PackageTree::vtk();
    tree.write(&format!("{CMAKE_DIR}/VTKConfig.cmake"), &format!("set(VTK_INCLUDE_DIRS \"a;{SDK_INCLUDE}\")"));

    tree.command()
        .arg("package")
        .arg(tree.package())
        .arg("--platform")
        .arg("macos")
        .args(all_dep_args())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 SDK path(s) removed"));

    let targets = tree.read(&format!("{CMAKE_DIR}/VTKTargets.cmake"));
    assert_no_roots(&targets);
    assert!(!targets.contains("MacOSX10.13.sdk"));
    assert_eq!(tree.read(&format!("{CMAKE_DIR}/VTKConfig.cmake")), "set(VTK_INCLUDE_DIRS \"a\")");
}

#[test]
fn test_linux_package_is_noop() {
    let tree = PackageTree::vtk();
    let before = tree.read(&format!("{CMAKE_DIR}/VTKTargets.cmake"));

    tree.command()
        .arg("package")
        .arg(tree.package())
        .arg("--platform")
        .arg("linux")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to relocate on linux"));

    assert_eq!(tree.read(&format!("{CMAKE_DIR}/VTKTargets.cmake")), before);
}

#[test]
fn test_package_twice_succeeds_in_strict_mode() {
    let tree = PackageTree::vtk();
    let run = || {
        tree.command()
            .arg("package")
            .arg(tree.package())
            .arg("--platform")
            .arg("windows")
            .args(all_dep_args())
            .assert()
            .success();
    };

    run();
    let first = tree.read(&format!("{CMAKE_DIR}/Modules/vtkpng.cmake"));
    run();
    assert_eq!(tree.read(&format!("{CMAKE_DIR}/Modules/vtkpng.cmake")), first);
}

#[test]
fn test_dependency_missing_from_build_is_skipped() {
    let tree = PackageTree::vtk();
    // No libtiff in this build: its fixup is not applicable, not an error
    let deps: Vec<_> = all_deps().into_iter().filter(|(name, _)| *name != "libtiff").collect();
    let buildinfo = tree.write_buildinfo(&deps);

    tree.command()
        .arg("package")
        .arg(tree.package())
        .arg("--platform")
        .arg("windows")
        .arg("--buildinfo")
        .arg(&buildinfo)
        .assert()
        .success()
        .stdout(predicate::str::contains("not in this build: libtiff"));
}

#[test]
fn test_missing_root_in_fixup_fails() {
    let tree = PackageTree::vtk();
    tree.write(&format!("{CMAKE_DIR}/Modules/vtkzlib.cmake"), "set(vtkzlib_INCLUDE_DIRS \"\")\n");

    tree.command()
        .arg("package")
        .arg(tree.package())
        .arg("--platform")
        .arg("windows")
        .args(all_dep_args())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Install root of 'zlib' not found"))
        .stderr(predicate::str::contains(ZLIB_ROOT));
}

#[test]
fn test_missing_fixup_file_fails() {
    let tree = PackageTree::new();

    tree.command()
        .arg("package")
        .arg(tree.package())
        .arg("--platform")
        .arg("windows")
        .args(all_dep_args())
        .assert()
        .failure()
        .stderr(predicate::str::contains("VTKTargets.cmake"));
}

#[test]
fn test_package_without_roots_fails() {
    let tree = PackageTree::vtk();

    tree.command()
        .arg("package")
        .arg(tree.package())
        .arg("--platform")
        .arg("macos")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no dependency roots configured"));
}
