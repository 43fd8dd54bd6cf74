use std::fs;
use std::path::Path;

use frameset_core::IngestError;
use frameset_core::fs::{ChannelFileLocator, find_channel_files};
use tempfile::tempdir;

fn populate(dir: &Path, names: &[&str]) {
    for name in names {
        fs::write(dir.join(name), b"frame").unwrap();
    }
}

#[test]
fn finds_channel_and_multi_position_files() {
    let dir = tempdir().unwrap();
    populate(dir.path(), &["channel.tif", "multi1.tif", "multi2.tif"]);

    assert_eq!(find_channel_files(dir.path(), "channel").unwrap(), vec!["channel.tif"]);
    assert_eq!(find_channel_files(dir.path(), "multi").unwrap(), vec!["multi1.tif", "multi2.tif"]);
    assert!(find_channel_files(dir.path(), "bad_channel_name").unwrap().is_empty());
}

#[test]
fn missing_directory_is_an_error_not_an_empty_list() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("never_created");

    let err = find_channel_files(&missing, "multi").unwrap_err();
    assert!(matches!(err, IngestError::DirectoryNotFound { ref path } if path == &missing));
}

#[test]
fn orders_many_positions_numerically() {
    let dir = tempdir().unwrap();
    let names: Vec<String> = (0..25).rev().map(|i| format!("multi{i}.tif")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    populate(dir.path(), &refs);

    let found = find_channel_files(dir.path(), "multi").unwrap();
    let expected: Vec<String> = (0..25).map(|i| format!("multi{i}.tif")).collect();
    assert_eq!(found, expected);
}

#[test]
fn concurrent_lookups_are_independent() {
    let dir = tempdir().unwrap();
    populate(dir.path(), &["dapi_3.tif", "dapi_1.tif", "fitc_2.tif", "fitc_10.tif"]);
    let locator = ChannelFileLocator::new();

    std::thread::scope(|scope| {
        let dapi = scope.spawn(|| locator.find(dir.path(), "dapi"));
        let fitc = scope.spawn(|| locator.find(dir.path(), "fitc"));

        assert_eq!(dapi.join().unwrap().unwrap(), vec!["dapi_1.tif", "dapi_3.tif"]);
        assert_eq!(fitc.join().unwrap().unwrap(), vec!["fitc_2.tif", "fitc_10.tif"]);
    });
}

#[cfg(unix)]
#[test]
fn unreadable_directory_is_access_denied() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    populate(&locked, &["multi1.tif"]);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users bypass permission bits; the refusal cannot be observed then.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        eprintln!("skipping: directory permissions are not enforced for this user");
        return;
    }

    let result = find_channel_files(&locked, "multi");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let err = result.expect_err("listing a locked directory must fail");
    assert!(matches!(err, IngestError::AccessDenied { ref path } if path == &locked), "{err}");
}
