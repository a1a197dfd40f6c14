//! File lifecycle integration tests.

use filenest_core::error::ErrorKind;
use filenest_core::traits::blob::BlobStore;
use filenest_core::types::{ConflictPolicy, ReadScope};

use super::helpers::{TestEnv, content, read_all};

#[tokio::test]
async fn test_create_then_new_version() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();

    let v1 = env
        .manager
        .create_or_update_file(&root, "doc.txt", content("abc"))
        .await
        .unwrap();
    assert_eq!(v1.current_version, 1);
    assert_eq!(v1.size_bytes, 3);
    assert_eq!(v1.full_path, "/doc.txt");

    let v2 = env
        .manager
        .create_or_update_file(&root, "doc.txt", content("hello"))
        .await
        .unwrap();
    assert_eq!(v2.current_version, 2);
    assert_eq!(v2.size_bytes, 5);
    assert_eq!(v2.id, v1.id);
    assert_ne!(v2.blob_id, v1.blob_id);

    let stream = env.manager.read_file(&v2).await.unwrap();
    assert_eq!(read_all(stream).await, b"hello");

    // Resolving gives the current version.
    let resolved = env
        .manager
        .resolve_file(&root, "doc.txt", ReadScope::ActiveOnly)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolved.current_version, 2);
}

#[tokio::test]
async fn test_copy_shares_blob() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let original = env
        .manager
        .create_or_update_file(&root, "copy1.pdf", content("pdf bytes"))
        .await
        .unwrap();

    let err = env
        .manager
        .copy_file(&original, &root, None, ConflictPolicy::RaiseConflict)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FileAlreadyExists);

    let copy = env
        .manager
        .copy_file(&original, &root, None, ConflictPolicy::Copy)
        .await
        .unwrap();
    assert_eq!(copy.name, "copy1 - Copy.pdf");
    assert_eq!(copy.full_path, "/copy1 - Copy.pdf");
    assert_eq!(copy.current_version, 1);
    assert_eq!(copy.blob_id, original.blob_id);

    let stream = env.manager.read_file(&copy).await.unwrap();
    assert_eq!(read_all(stream).await, b"pdf bytes");
}

#[tokio::test]
async fn test_copy_into_other_folder() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let docs = env
        .manager
        .create_folder(&root, "docs", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    let file = env
        .manager
        .create_or_update_file(&root, "a.txt", content("a"))
        .await
        .unwrap();

    let copy = env
        .manager
        .copy_file(&file, &docs, None, ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    assert_eq!(copy.full_path, "/docs/a.txt");
    assert_eq!(copy.name, "a.txt");

    let renamed_copy = env
        .manager
        .copy_file(&file, &docs, Some("b.txt"), ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    assert_eq!(renamed_copy.full_path, "/docs/b.txt");
}

#[tokio::test]
async fn test_move_file_keeps_history() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let archive = env
        .manager
        .create_folder(&root, "archive", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    env.manager
        .create_or_update_file(&root, "m.txt", content("v1"))
        .await
        .unwrap();
    let file = env
        .manager
        .create_or_update_file(&root, "m.txt", content("v2 data"))
        .await
        .unwrap();

    let moved = env
        .manager
        .move_file(&file, &archive, None, ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    assert_eq!(moved.full_path, "/archive/m.txt");
    assert_eq!(moved.current_version, 2);

    assert!(
        env.manager
            .resolve_file(&root, "m.txt", ReadScope::ActiveOnly)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_move_with_name_conflict() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let docs = env
        .manager
        .create_folder(&root, "docs", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    env.manager
        .create_or_update_file(&docs, "x.txt", content("kept"))
        .await
        .unwrap();
    let file = env
        .manager
        .create_or_update_file(&root, "x.txt", content("moved"))
        .await
        .unwrap();

    let err = env
        .manager
        .move_file(&file, &docs, None, ConflictPolicy::RaiseConflict)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FileAlreadyExists);

    let moved = env
        .manager
        .move_file(&file, &docs, None, ConflictPolicy::Copy)
        .await
        .unwrap();
    assert_eq!(moved.full_path, "/docs/x - Copy.txt");
}

#[tokio::test]
async fn test_rename_file() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let file = env
        .manager
        .create_or_update_file(&root, "old.txt", content("data"))
        .await
        .unwrap();

    let renamed = env.manager.rename_file(&file, "new.txt").await.unwrap();
    assert_eq!(renamed.full_path, "/new.txt");
    assert_eq!(renamed.id, file.id);

    // Renaming to its own name is a no-op, not a conflict.
    let same = env.manager.rename_file(&renamed, "new.txt").await.unwrap();
    assert_eq!(same.full_path, "/new.txt");

    env.manager
        .create_or_update_file(&root, "taken.txt", content("t"))
        .await
        .unwrap();
    let err = env
        .manager
        .rename_file(&renamed, "taken.txt")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FileAlreadyExists);
}

#[tokio::test]
async fn test_delete_and_restore() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let file = env
        .manager
        .create_or_update_file(&root, "d.txt", content("d"))
        .await
        .unwrap();

    let deleted = env.manager.delete_file(&file).await.unwrap();
    assert!(deleted.is_deleted);

    assert!(
        env.manager
            .resolve_file(&root, "d.txt", ReadScope::ActiveOnly)
            .await
            .unwrap()
            .is_none()
    );
    let found = env
        .manager
        .resolve_file(&root, "d.txt", ReadScope::DeletedOnly)
        .await
        .unwrap()
        .expect("deleted file should resolve in deleted scope");

    let restored = env.manager.restore_file(&found).await.unwrap();
    assert!(!restored.is_deleted);
    assert_eq!(restored.full_path, "/d.txt");
}

#[tokio::test]
async fn test_restore_with_name_conflict() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let old = env
        .manager
        .create_or_update_file(&root, "a.txt", content("old"))
        .await
        .unwrap();
    let old = env.manager.delete_file(&old).await.unwrap();

    env.manager
        .create_or_update_file(&root, "a.txt", content("new"))
        .await
        .unwrap();

    let restored = env.manager.restore_file(&old).await.unwrap();
    assert_eq!(restored.name, "a - Copy.txt");
    assert_eq!(restored.full_path, "/a - Copy.txt");

    let stream = env.manager.read_file(&restored).await.unwrap();
    assert_eq!(read_all(stream).await, b"old");
}

#[tokio::test]
async fn test_restore_active_file_fails() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let file = env
        .manager
        .create_or_update_file(&root, "a.txt", content("a"))
        .await
        .unwrap();

    let err = env.manager.restore_file(&file).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::FileIsNotDeleted);
}

#[tokio::test]
async fn test_purge_releases_unshared_blobs_only() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let original = env
        .manager
        .create_or_update_file(&root, "s.txt", content("shared"))
        .await
        .unwrap();
    let copy = env
        .manager
        .copy_file(&original, &root, None, ConflictPolicy::Copy)
        .await
        .unwrap();
    assert_eq!(copy.blob_id, original.blob_id);

    // Purging the copy keeps the blob: the original still references it.
    let copy = env.manager.delete_file(&copy).await.unwrap();
    env.manager.purge_file(&copy).await.unwrap();
    assert!(env.blobs.exists(original.blob_id).await.unwrap());

    let stream = env.manager.read_file(&original).await.unwrap();
    assert_eq!(read_all(stream).await, b"shared");

    // Purging the last reference releases it.
    let original = env.manager.delete_file(&original).await.unwrap();
    env.manager.purge_file(&original).await.unwrap();
    assert!(!env.blobs.exists(original.blob_id).await.unwrap());
}

#[tokio::test]
async fn test_purge_requires_prior_delete() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let file = env
        .manager
        .create_or_update_file(&root, "keep.txt", content("k"))
        .await
        .unwrap();

    let err = env.manager.purge_file(&file).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::FileIsNotDeleted);
}

#[tokio::test]
async fn test_write_into_deleted_folder_fails() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let folder = env
        .manager
        .create_folder(&root, "gone", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    env.manager.delete_folder(&folder).await.unwrap();

    let err = env
        .manager
        .create_or_update_file(&folder, "f.txt", content("f"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::CannotModifyDeletedItems);
}

#[tokio::test]
async fn test_stale_file_handle_cannot_mutate() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let file = env
        .manager
        .create_or_update_file(&root, "stale.txt", content("x"))
        .await
        .unwrap();

    // Handle captured before the delete; the flag must come from the row.
    env.manager.delete_file(&file).await.unwrap();

    let err = env.manager.rename_file(&file, "new.txt").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::CannotModifyDeletedItems);
}

#[tokio::test]
async fn test_folder_move_carries_files() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let docs = env
        .manager
        .create_folder(&root, "docs", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    env.manager
        .create_or_update_file(&docs, "report.pdf", content("report"))
        .await
        .unwrap();
    let archive = env
        .manager
        .create_folder(&root, "archive", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();

    env.manager
        .move_folder(&docs, &archive, ConflictPolicy::RaiseConflict)
        .await
        .unwrap();

    let moved_docs = env
        .manager
        .resolve_folder("/archive/docs/", ReadScope::ActiveOnly)
        .await
        .unwrap();
    let report = env
        .manager
        .resolve_file(&moved_docs, "report.pdf", ReadScope::ActiveOnly)
        .await
        .unwrap()
        .expect("file should follow its folder");
    assert_eq!(report.full_path, "/archive/docs/report.pdf");

    let stream = env.manager.read_file(&report).await.unwrap();
    assert_eq!(read_all(stream).await, b"report");
}
