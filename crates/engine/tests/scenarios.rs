//! End-to-end scenarios over local filesystems.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use dfs::{FileSystem, LocalFs};
use engine::{sync, SyncError, SyncOptions};
use logging::{ActionMode, ActionTag};
use tempfile::tempdir;

fn furi(path: &Path) -> String {
    format!("file:{}", path.display())
}

fn write(path: &Path, payload: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parents");
    }
    fs::write(path, payload).expect("write file");
}

fn stamp(path: &Path, mtime_ms: i64) {
    LocalFs::new().set_times(path, mtime_ms).expect("set mtime");
}

#[test]
fn log_only_mode_lists_files_without_writing() {
    let temp = tempdir().expect("tempdir");
    let src = temp.path().join("src");
    write(&src.join("a"), b"aa");
    write(&src.join("b"), b"bb");

    let summary = sync(SyncOptions::new([
        furi(&src.join("a")),
        furi(&src.join("b")),
    ]))
    .expect("run succeeds");

    let records = summary.records();
    assert_eq!(records.len(), 2);
    for record in records {
        assert_eq!(record.tag(), ActionTag::CopyFile);
        assert_eq!(record.mode(), ActionMode::LogOnly);
    }
    assert_eq!(records[0].path(), src.join("a"));
    assert_eq!(records[1].path(), src.join("b"));
}

#[test]
fn dry_run_mirror_logs_intent_in_walk_order() {
    let temp = tempdir().expect("tempdir");
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");
    write(&src.join("test_folder/file_1"), b"one");
    write(&src.join("test_folder/folder_1/file_2"), b"two");
    fs::create_dir_all(&dst).expect("create dst root");

    let summary = sync(
        SyncOptions::new([furi(&src.join("test_folder"))])
            .destination(furi(&dst))
            .recurse(true)
            .dry_run(true),
    )
    .expect("run succeeds");

    let rendered: Vec<String> = summary
        .records()
        .iter()
        .map(ToString::to_string)
        .collect();
    let expected = [
        format!("CREATE_DIR [dryrun] - {}/test_folder", dst.display()),
        format!(
            "COPY_FILE [dryrun] - {}/test_folder/file_1 --> {}/test_folder/file_1",
            src.display(),
            dst.display()
        ),
        format!(
            "CREATE_DIR [dryrun] - {}/test_folder/folder_1",
            dst.display()
        ),
        format!(
            "COPY_FILE [dryrun] - {}/test_folder/folder_1/file_2 --> {}/test_folder/folder_1/file_2",
            src.display(),
            dst.display()
        ),
    ];
    assert_eq!(rendered, expected);
    assert!(
        !dst.join("test_folder").exists(),
        "dry run must not create anything"
    );
}

#[test]
fn size_only_reports_same_and_restores_deleted_files() {
    let temp = tempdir().expect("tempdir");
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");
    write(&src.join("test_folder/file_1"), b"one");
    write(&src.join("test_folder/folder_1/file_2"), b"two");
    fs::create_dir_all(&dst).expect("create dst root");

    let options = || {
        SyncOptions::new([furi(&src.join("test_folder"))])
            .destination(furi(&dst))
            .recurse(true)
            .size_only(true)
    };

    sync(options()).expect("first run succeeds");
    let restored = dst.join("test_folder/folder_1/file_2");
    assert!(restored.exists());
    fs::remove_file(&restored).expect("delete file_2");

    let summary = sync(options()).expect("second run succeeds");
    assert!(restored.exists(), "file_2 reappears");
    assert_eq!(summary.files_unchanged(), 1, "exactly one SAME_FILE");
    assert_eq!(
        summary.records()[0].tag(),
        ActionTag::SameFile,
        "file_1 is reported unchanged"
    );
    assert_eq!(summary.files_copied(), 1);
}

#[test]
fn excluded_destination_entries_survive_deletion() {
    let temp = tempdir().expect("tempdir");
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");
    write(&src.join("test_folder/file_1"), b"one");
    write(&dst.join("test_folder/folder_to_delete/file_to_delete"), b"x");

    let summary = sync(
        SyncOptions::new([furi(&src.join("test_folder"))])
            .destination(furi(&dst))
            .recurse(true)
            .delete_extraneous(true)
            .filter_rules(["- folder_to_delete"]),
    )
    .expect("run succeeds");

    assert!(dst.join("test_folder/folder_to_delete/file_to_delete").exists());
    assert_eq!(summary.protected_destinations(), 1);
    assert_eq!(summary.deletions(), 0);
}

#[test]
fn delete_excluded_overrides_protection() {
    let temp = tempdir().expect("tempdir");
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");
    write(&src.join("test_folder/file_1"), b"one");
    write(&dst.join("test_folder/folder_to_delete/file_to_delete"), b"x");

    let summary = sync(
        SyncOptions::new([furi(&src.join("test_folder"))])
            .destination(furi(&dst))
            .recurse(true)
            .delete_extraneous(true)
            .delete_excluded(true)
            .filter_rules(["- folder_to_delete"]),
    )
    .expect("run succeeds");

    assert!(!dst.join("test_folder/folder_to_delete").exists());
    assert_eq!(summary.deletions(), 1);
    assert_eq!(summary.protected_destinations(), 0);
}

#[test]
fn conflict_resolution_takes_the_most_recent_source() {
    let temp = tempdir().expect("tempdir");
    let src_a = temp.path().join("src");
    let src_b = temp.path().join("src2");
    let dst = temp.path().join("dst");
    write(&src_a.join("test_folder/file_1"), b"older");
    write(&src_b.join("test_folder/file_1"), b"newer");
    fs::create_dir_all(&dst).expect("create dst root");

    let older = 1_600_000_000_000;
    let newer = 1_700_000_000_000;
    stamp(&src_a.join("test_folder/file_1"), older);
    stamp(&src_b.join("test_folder/file_1"), newer);

    sync(
        SyncOptions::new([
            format!("{}/*", furi(&src_a)),
            format!("{}/*", furi(&src_b)),
        ])
        .destination(furi(&dst))
        .recurse(true)
        .preserve_times(true)
        .resolve_conflicts(true)
        .use_most_recent(true),
    )
    .expect("run succeeds");

    let placed = dst.join("test_folder/file_1");
    assert_eq!(fs::read(&placed).expect("read"), b"newer");
    let meta = LocalFs::new().stat(&placed).expect("stat");
    assert_eq!(meta.mtime_ms(), newer);
}

#[test]
fn unresolved_conflict_aborts_the_run() {
    let temp = tempdir().expect("tempdir");
    let src_a = temp.path().join("src");
    let src_b = temp.path().join("src2");
    let dst = temp.path().join("dst");
    write(&src_a.join("test_folder/file_1"), b"older");
    write(&src_b.join("test_folder/file_1"), b"newer");
    fs::create_dir_all(&dst).expect("create dst root");

    let error = sync(
        SyncOptions::new([
            format!("{}/*", furi(&src_a)),
            format!("{}/*", furi(&src_b)),
        ])
        .destination(furi(&dst))
        .recurse(true),
    )
    .expect_err("conflict is fatal");

    assert!(matches!(error, SyncError::SourceConflict { .. }));
    assert!(error.to_string().contains("SRC_CONFLICT"));
}

#[test]
fn update_flag_skips_newer_destinations() {
    let temp = tempdir().expect("tempdir");
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");
    write(&src.join("report"), b"from-source");
    write(&dst.join("report"), b"kept-value!");
    stamp(&src.join("report"), 1_600_000_000_000);
    stamp(&dst.join("report"), 1_700_000_000_000);

    let summary = sync(
        SyncOptions::new([furi(&src.join("report"))])
            .destination(furi(&dst))
            .update(true),
    )
    .expect("run succeeds");

    assert_eq!(summary.files_skipped(), 1);
    assert_eq!(summary.records()[0].qualifier(), Some("update"));
    assert_eq!(fs::read(dst.join("report")).expect("read"), b"kept-value!");
}

#[test]
fn ignore_existing_never_touches_present_entries() {
    let temp = tempdir().expect("tempdir");
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");
    write(&src.join("report"), b"new-content-longer");
    write(&dst.join("report"), b"old");

    let summary = sync(
        SyncOptions::new([furi(&src.join("report"))])
            .destination(furi(&dst))
            .ignore_existing(true),
    )
    .expect("run succeeds");

    assert_eq!(summary.files_skipped(), 1);
    assert_eq!(summary.records()[0].qualifier(), Some("ignore-existing"));
    assert_eq!(fs::read(dst.join("report")).expect("read"), b"old");
}

#[test]
fn existing_flag_never_creates_entries() {
    let temp = tempdir().expect("tempdir");
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");
    write(&src.join("fresh"), b"data");
    fs::create_dir_all(&dst).expect("create dst root");

    let summary = sync(
        SyncOptions::new([furi(&src.join("fresh"))])
            .destination(furi(&dst))
            .existing(true),
    )
    .expect("run succeeds");

    assert_eq!(summary.files_skipped(), 1);
    assert_eq!(summary.records()[0].qualifier(), Some("existing"));
    assert!(!dst.join("fresh").exists());
}

#[test]
fn directories_are_skipped_without_recurse() {
    let temp = tempdir().expect("tempdir");
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");
    write(&src.join("tree/inner"), b"data");
    fs::create_dir_all(&dst).expect("create dst root");

    let summary = sync(
        SyncOptions::new([furi(&src.join("tree"))]).destination(furi(&dst)),
    )
    .expect("run succeeds");

    assert_eq!(summary.dirs_skipped(), 1);
    assert_eq!(summary.records()[0].qualifier(), Some("no-recurse"));
    assert!(!dst.join("tree").exists());
}

#[test]
fn copy_dirs_transfers_trees_as_units() {
    let temp = tempdir().expect("tempdir");
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");
    write(&src.join("tree/inner/deep"), b"data");
    fs::create_dir_all(&dst).expect("create dst root");

    let summary = sync(
        SyncOptions::new([furi(&src.join("tree"))])
            .destination(furi(&dst))
            .copy_dirs(true),
    )
    .expect("run succeeds");

    assert_eq!(summary.files_copied(), 1, "one opaque unit");
    assert_eq!(
        fs::read(dst.join("tree/inner/deep")).expect("read"),
        b"data"
    );
}

#[test]
fn prune_removes_directories_emptied_by_filters() {
    let temp = tempdir().expect("tempdir");
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");
    write(&src.join("tree/only.tmp"), b"scratch");
    fs::create_dir_all(&dst).expect("create dst root");

    let summary = sync(
        SyncOptions::new([furi(&src.join("tree"))])
            .destination(furi(&dst))
            .recurse(true)
            .prune_empty_dirs(true)
            .filter_rules(["- *.tmp"]),
    )
    .expect("run succeeds");

    assert_eq!(summary.excluded_sources(), 1);
    assert_eq!(summary.pruned_dirs(), 1);
    assert!(!dst.join("tree").exists());
}

#[test]
fn chmod_rewrites_new_files_without_preserve() {
    let temp = tempdir().expect("tempdir");
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");
    write(&src.join("data"), b"payload");
    fs::create_dir_all(&dst).expect("create dst root");

    sync(
        SyncOptions::new([furi(&src.join("data"))])
            .destination(furi(&dst))
            .chmod(["F600"]),
    )
    .expect("run succeeds");

    let meta = LocalFs::new().stat(&dst.join("data")).expect("stat");
    assert_eq!(meta.perms(), 0o600);
}

#[test]
fn preserve_perms_replicates_source_bits() {
    let temp = tempdir().expect("tempdir");
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");
    write(&src.join("data"), b"payload");
    fs::create_dir_all(&dst).expect("create dst root");
    let fs_handle = LocalFs::new();
    fs_handle
        .set_permission(&src.join("data"), 0o640)
        .expect("chmod src");

    sync(
        SyncOptions::new([furi(&src.join("data"))])
            .destination(furi(&dst))
            .preserve_perms(true),
    )
    .expect("run succeeds");

    let meta = fs_handle.stat(&dst.join("data")).expect("stat");
    assert_eq!(meta.perms(), 0o640);
}

#[test]
fn directory_mtime_survives_descent() {
    let temp = tempdir().expect("tempdir");
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");
    write(&src.join("tree/inner"), b"data");
    fs::create_dir_all(&dst).expect("create dst root");
    let dir_mtime = 1_550_000_000_000;
    stamp(&src.join("tree"), dir_mtime);

    sync(
        SyncOptions::new([furi(&src.join("tree"))])
            .destination(furi(&dst))
            .recurse(true)
            .preserve_times(true),
    )
    .expect("run succeeds");

    let meta = LocalFs::new().stat(&dst.join("tree")).expect("stat");
    assert_eq!(
        meta.mtime_ms(),
        dir_mtime,
        "metadata is applied after the subtree, so the copy inside cannot clobber it"
    );
}

#[test]
fn overwrite_file_with_directory() {
    let temp = tempdir().expect("tempdir");
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");
    write(&src.join("slot/inner"), b"data");
    write(&dst.join("slot"), b"i-am-a-file");

    let summary = sync(
        SyncOptions::new([furi(&src.join("slot"))])
            .destination(furi(&dst))
            .recurse(true),
    )
    .expect("run succeeds");

    assert_eq!(summary.dirs_overwritten(), 1);
    assert!(dst.join("slot").is_dir());
    assert_eq!(fs::read(dst.join("slot/inner")).expect("read"), b"data");
}

#[test]
fn trailing_slash_source_copies_contents() {
    let temp = tempdir().expect("tempdir");
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");
    write(&src.join("tree/a"), b"a");
    write(&src.join("tree/b"), b"b");
    fs::create_dir_all(&dst).expect("create dst root");

    sync(
        SyncOptions::new([format!("{}/", furi(&src.join("tree")))])
            .destination(furi(&dst))
            .recurse(true),
    )
    .expect("run succeeds");

    // The directory itself is not replicated, its children are.
    assert!(dst.join("a").is_file());
    assert!(dst.join("b").is_file());
    assert!(!dst.join("tree").exists());
}

#[test]
fn unreadable_source_subdirectory_aborts_the_run() {
    let temp = tempdir().expect("tempdir");
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");
    write(&src.join("tree/locked/secret"), b"hidden");
    fs::create_dir_all(&dst).expect("create dst root");

    let locked = src.join("tree/locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("lock dir");
    // Privileged runs can list a mode-000 directory; nothing to observe then.
    let readable = fs::read_dir(&locked).is_ok();

    let result = sync(
        SyncOptions::new([furi(&src.join("tree"))])
            .destination(furi(&dst))
            .recurse(true),
    );
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("unlock dir");

    if readable {
        result.expect("privileged run lists the directory fine");
    } else {
        let error = result.expect_err("listing failures below a root are fatal");
        assert!(matches!(error, SyncError::Filesystem(_)));
    }
}

#[test]
fn missing_source_root_is_tolerated() {
    let temp = tempdir().expect("tempdir");
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");
    write(&src.join("real"), b"data");
    fs::create_dir_all(&dst).expect("create dst root");

    let summary = sync(
        SyncOptions::new([furi(&src.join("ghost")), furi(&src.join("real"))])
            .destination(furi(&dst)),
    )
    .expect("missing sources are not fatal");

    assert_eq!(summary.files_copied(), 1);
    assert!(dst.join("real").exists());
}

#[test]
fn merged_directories_union_their_children() {
    let temp = tempdir().expect("tempdir");
    let src_a = temp.path().join("src");
    let src_b = temp.path().join("src2");
    let dst = temp.path().join("dst");
    write(&src_a.join("shared/from_a"), b"a");
    write(&src_b.join("shared/from_b"), b"b");
    fs::create_dir_all(&dst).expect("create dst root");

    sync(
        SyncOptions::new([
            format!("{}/*", furi(&src_a)),
            format!("{}/*", furi(&src_b)),
        ])
        .destination(furi(&dst))
        .recurse(true),
    )
    .expect("run succeeds");

    assert!(dst.join("shared/from_a").exists());
    assert!(dst.join("shared/from_b").exists());
}

#[test]
fn chown_rewrites_ownership_only_through_mapping() {
    // Actually changing owners needs privileges; map the source owner to
    // itself so the planner sees no change and performs no call.
    let temp = tempdir().expect("tempdir");
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");
    write(&src.join("data"), b"payload");
    fs::create_dir_all(&dst).expect("create dst root");

    let owner = LocalFs::new()
        .stat(&src.join("data"))
        .expect("stat")
        .owner()
        .to_string();

    let summary = sync(
        SyncOptions::new([furi(&src.join("data"))])
            .destination(furi(&dst))
            .preserve_owner(true)
            .usermap([format!("*:{owner}")]),
    )
    .expect("run succeeds");

    assert_eq!(summary.owners_updated(), 0);
}
