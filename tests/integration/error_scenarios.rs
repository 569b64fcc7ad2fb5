use crate::common::{PackageTree, ZLIB_ROOT};
use predicates::prelude::*;

#[test]
fn test_missing_directory() {
    let tree = PackageTree::new();
    tree.command()
        .arg("relocate")
        .arg(tree.package().join("nope"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn test_invalid_dep_spec() {
    let tree = PackageTree::new();
    tree.command()
        .arg("relocate")
        .arg(tree.package())
        .arg("--dep")
        .arg("zlib")
        .assert()
        .failure()
        .stderr(predicate::str::contains("NAME=ROOT"));
}

#[test]
fn test_relative_root_rejected() {
    let tree = PackageTree::new();
    tree.command()
        .arg("relocate")
        .arg(tree.package())
        .arg("--dep")
        .arg("zlib=conan/zlib")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an absolute path"));
}

#[test]
fn test_invalid_pattern() {
    let tree = PackageTree::new();
    tree.command()
        .arg("relocate")
        .arg(tree.package())
        .arg("--pattern")
        .arg("[")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid file pattern"))
        .stderr(predicate::str::contains("suggestion"));
}

#[test]
fn test_malformed_config() {
    let tree = PackageTree::new();
    tree.write_config("strict = ");
    tree.command()
        .arg("relocate")
        .arg(tree.package())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse configuration file"));
}

#[test]
fn test_malformed_buildinfo() {
    let tree = PackageTree::new();
    let buildinfo = tree.package().join("conanbuildinfo.json");
    std::fs::write(&buildinfo, "{ nope").unwrap();

    tree.command()
        .arg("relocate")
        .arg(tree.package())
        .arg("--buildinfo")
        .arg(&buildinfo)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse build info"));
}

#[test]
fn test_quiet_still_prints_errors() {
    let tree = PackageTree::new();
    tree.write("A.cmake", "nothing");
    tree.command()
        .arg("relocate")
        .arg(tree.package())
        .arg("--strict")
        .arg("--dep")
        .arg(format!("zlib={ZLIB_ROOT}"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("suggestion"));
}
