use crate::common::PackageTree;
use predicates::prelude::*;

fn profile_json(tree: &PackageTree, args: &[&str]) -> serde_json::Value {
    let output = tree
        .command()
        .arg("profile")
        .args(args)
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_macos_profile_json() {
    let tree = PackageTree::new();
    let json = profile_json(&tree, &["--platform", "macos"]);

    assert_eq!(json["platform"], "macos");
    assert_eq!(json["version"], "8.0.1-r1");
    assert_eq!(json["source_url"], "https://github.com/Kitware/VTK/archive/v8.0.1.tar.gz");
    assert_eq!(json["strip_sdk"], true);
    assert_eq!(json["requirements"].as_array().unwrap().len(), 9);
    assert_eq!(json["cmake_definitions"]["VTK_USE_COCOA"], "ON");
    assert_eq!(json["fixups"].as_array().unwrap().len(), 8);
    assert_eq!(json["install_action"]["action"], "skip");

    let args: Vec<&str> =
        json["cmake_args"].as_array().unwrap().iter().map(|a| a.as_str().unwrap()).collect();
    assert!(args.contains(&"-DBUILD_SHARED_LIBS=ON"));
    assert!(args.contains(&"-DCMAKE_POSITION_INDEPENDENT_CODE=ON"));
}

#[test]
fn test_static_windows_profile() {
    let tree = PackageTree::new();
    let json = profile_json(&tree, &["--platform", "windows", "--static"]);

    assert_eq!(json["cmake_definitions"]["BUILD_SHARED_LIBS"], "OFF");
    assert!(json["cmake_definitions"].get("CMAKE_POSITION_INDEPENDENT_CODE").is_none());
}

#[test]
fn test_linux_mint_install_action_follows_config() {
    let tree = PackageTree::new();
    tree.write_config("sysrequires_mode = \"verify\"\n");
    let json = profile_json(&tree, &["--platform", "linux", "--distro", "linuxmint"]);

    assert_eq!(json["install_action"]["action"], "verify");
    assert!(
        json["install_action"]["packages"]
            .as_array()
            .unwrap()
            .iter()
            .any(|p| p == "libgl1-mesa-dev")
    );
    assert!(json["fixups"].as_array().unwrap().is_empty());
}

#[test]
fn test_platform_from_config() {
    let tree = PackageTree::new();
    tree.write_config("platform = \"windows\"\n");
    let json = profile_json(&tree, &[]);
    assert_eq!(json["platform"], "windows");
}

#[test]
fn test_text_output() {
    let tree = PackageTree::new();
    tree.command()
        .arg("profile")
        .arg("--platform")
        .arg("windows")
        .assert()
        .success()
        .stdout(predicate::str::contains("zlib/1.2.11@sight/stable"))
        .stdout(predicate::str::contains("patches/offscreen_size_windows.diff"))
        .stdout(predicate::str::contains("-DVTK_QT_VERSION=5"))
        .stdout(predicate::str::contains("<- libpng, zlib"));
}
