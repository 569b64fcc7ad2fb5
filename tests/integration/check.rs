use crate::common::{CMAKE_DIR, PackageTree, SDK_INCLUDE, ZLIB_ROOT, all_dep_args};
use predicates::prelude::*;

#[test]
fn test_check_reports_leftovers_then_passes() {
    let tree = PackageTree::vtk();

    tree.command()
        .arg("check")
        .arg(tree.package())
        .args(all_dep_args())
        .assert()
        .failure()
        .stdout(predicate::str::contains("root of 'zlib'"))
        .stdout(predicate::str::contains("SDK include path"))
        .stderr(predicate::str::contains("absolute path reference(s) remain"));

    tree.command()
        .arg("relocate")
        .arg(tree.package())
        .arg("--strip-sdk")
        .args(all_dep_args())
        .assert()
        .success();

    tree.command()
        .arg("check")
        .arg(tree.package())
        .args(all_dep_args())
        .assert()
        .success()
        .stdout(predicate::str::contains("No absolute dependency paths remain"));
}

#[test]
fn test_check_json_output() {
    let tree = PackageTree::new();
    tree.write(&format!("{CMAKE_DIR}/VTKTargets.cmake"), &format!("{ZLIB_ROOT}/lib;{ZLIB_ROOT}/include;{SDK_INCLUDE}"));

    let output = tree
        .command()
        .arg("check")
        .arg(tree.package())
        .arg("--format")
        .arg("json")
        .arg("--dep")
        .arg(format!("zlib={ZLIB_ROOT}"))
        .output()
        .unwrap();
    assert!(!output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["valid"], false);
    assert_eq!(json["dependencies"], 1);
    let leftovers = json["leftovers"].as_array().unwrap();
    assert_eq!(leftovers.len(), 2);
    assert_eq!(leftovers[0]["dependency"], "zlib");
    assert_eq!(leftovers[0]["count"], 2);
    assert!(leftovers[1]["dependency"].is_null());
}

#[test]
fn test_check_without_dependencies_only_looks_for_sdk_paths() {
    let tree = PackageTree::new();
    tree.write("A.cmake", &format!("{ZLIB_ROOT}/include"));

    tree.command().arg("check").arg(tree.package()).assert().success();
}
