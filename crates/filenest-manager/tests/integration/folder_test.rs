//! Folder lifecycle integration tests.

use filenest_core::error::ErrorKind;
use filenest_core::traits::blob::BlobStore;
use filenest_core::types::{ConflictPolicy, DescendantKind, ReadScope};

use super::helpers::{TestEnv, content};

#[tokio::test]
async fn test_root_is_auto_provisioned() {
    let env = TestEnv::new().await;

    let root = env.manager.root().await.unwrap();
    assert!(root.is_root());
    assert_eq!(root.full_path, "/");

    let resolved = env
        .manager
        .resolve_folder("/", ReadScope::ActiveOnly)
        .await
        .unwrap();
    assert_eq!(resolved.id, root.id);
}

#[tokio::test]
async fn test_create_basic() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();

    let folder = env
        .manager
        .create_folder(&root, "BasicCreate", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    assert_eq!(folder.full_path, "/BasicCreate/");
    assert_eq!(folder.name, "BasicCreate");
    assert_eq!(folder.parent_id, Some(root.id));

    let resolved = env
        .manager
        .resolve_folder("/BasicCreate/", ReadScope::ActiveOnly)
        .await
        .unwrap();
    assert_eq!(resolved.id, folder.id);
}

#[tokio::test]
async fn test_create_duplicate() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    env.manager
        .create_folder(&root, "dup", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();

    let err = env
        .manager
        .create_folder(&root, "dup", ConflictPolicy::RaiseConflict)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FolderAlreadyExists);

    let copy = env
        .manager
        .create_folder(&root, "dup", ConflictPolicy::Copy)
        .await
        .unwrap();
    assert_eq!(copy.full_path, "/dup - Copy/");

    let second_copy = env
        .manager
        .create_folder(&root, "dup", ConflictPolicy::Copy)
        .await
        .unwrap();
    assert_eq!(second_copy.full_path, "/dup - Copy - Copy/");
}

#[tokio::test]
async fn test_create_nested() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();

    let a = env
        .manager
        .create_folder(&root, "a", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    let b = env
        .manager
        .create_folder(&a, "b", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    assert_eq!(b.full_path, "/a/b/");

    env.manager
        .resolve_folder("/a/b/", ReadScope::ActiveOnly)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_invalid_paths_rejected() {
    let env = TestEnv::new().await;

    for path in ["docs/", "/docs", "", "docs"] {
        let err = env
            .manager
            .resolve_folder(path, ReadScope::ActiveOnly)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidFolderPath, "path: {path:?}");
    }
}

#[tokio::test]
async fn test_rename_rewrites_descendants() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let folder = env
        .manager
        .create_folder(&root, "ren", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    env.manager
        .create_folder(&folder, "sub", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();

    let renamed = env.manager.rename_folder(&folder, "renamed").await.unwrap();
    assert_eq!(renamed.full_path, "/renamed/");

    env.manager
        .resolve_folder("/renamed/sub/", ReadScope::ActiveOnly)
        .await
        .unwrap();
    let err = env
        .manager
        .resolve_folder("/ren/", ReadScope::ActiveOnly)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FolderNotFound);
}

#[tokio::test]
async fn test_rename_conflict() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let first = env
        .manager
        .create_folder(&root, "first", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    env.manager
        .create_folder(&root, "second", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();

    let err = env
        .manager
        .rename_folder(&first, "second")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FolderAlreadyExists);
}

#[tokio::test]
async fn test_root_cannot_be_renamed_or_deleted() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();

    let err = env.manager.rename_folder(&root, "r").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = env.manager.delete_folder(&root).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_move_makes_source_a_child_of_target() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let docs = env
        .manager
        .create_folder(&root, "docs", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    env.manager
        .create_folder(&docs, "inner", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    let archive = env
        .manager
        .create_folder(&root, "archive", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();

    let moved = env
        .manager
        .move_folder(&docs, &archive, ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    assert_eq!(moved.full_path, "/archive/docs/");
    assert_eq!(moved.parent_id, Some(archive.id));

    env.manager
        .resolve_folder("/archive/docs/inner/", ReadScope::ActiveOnly)
        .await
        .unwrap();
    let err = env
        .manager
        .resolve_folder("/docs/", ReadScope::ActiveOnly)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FolderNotFound);
}

#[tokio::test]
async fn test_move_with_name_conflict() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let move1 = env
        .manager
        .create_folder(&root, "Move1", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    let move2 = env
        .manager
        .create_folder(&root, "Move2", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    env.manager
        .create_folder(&move1, "Move2", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();

    let err = env
        .manager
        .move_folder(&move2, &move1, ConflictPolicy::RaiseConflict)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FolderAlreadyExists);

    let moved = env
        .manager
        .move_folder(&move2, &move1, ConflictPolicy::Copy)
        .await
        .unwrap();
    assert_eq!(moved.full_path, "/Move1/Move2 - Copy/");
}

#[tokio::test]
async fn test_move_into_own_subtree() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let a = env
        .manager
        .create_folder(&root, "a", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    let b = env
        .manager
        .create_folder(&a, "b", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();

    let err = env
        .manager
        .move_folder(&a, &b, ConflictPolicy::RaiseConflict)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::TargetIsChildOfSource);
}

#[tokio::test]
async fn test_move_into_multibyte_named_folder() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let source = env
        .manager
        .create_folder(&root, "ab", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    let target = env
        .manager
        .create_folder(&root, "aあb", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();

    // The cycle check compares path prefixes whose byte lengths land
    // inside the multi-byte character.
    let moved = env
        .manager
        .move_folder(&source, &target, ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    assert_eq!(moved.full_path, "/aあb/ab/");
}

#[tokio::test]
async fn test_recursive_copy() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let src = env
        .manager
        .create_folder(&root, "src", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    env.manager
        .create_or_update_file(&src, "f.txt", content("one"))
        .await
        .unwrap();
    let sub = env
        .manager
        .create_folder(&src, "sub", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    env.manager
        .create_or_update_file(&sub, "g.txt", content("two"))
        .await
        .unwrap();
    let dst = env
        .manager
        .create_folder(&root, "dst", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();

    let copied = env
        .manager
        .copy_folder(&src, &dst, ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    assert_eq!(copied.full_path, "/dst/src/");

    let copied_sub = env
        .manager
        .resolve_folder("/dst/src/sub/", ReadScope::ActiveOnly)
        .await
        .unwrap();
    let copy_of_g = env
        .manager
        .resolve_file(&copied_sub, "g.txt", ReadScope::ActiveOnly)
        .await
        .unwrap()
        .expect("copied file should resolve");
    assert_eq!(copy_of_g.current_version, 1);

    // The copy shares the original's blob.
    let original_g = env
        .manager
        .resolve_file(&sub, "g.txt", ReadScope::ActiveOnly)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(copy_of_g.blob_id, original_g.blob_id);

    let (folders, files) = env
        .manager
        .descendants_of(&copied, DescendantKind::Both)
        .await
        .unwrap();
    assert_eq!(folders.len(), 1);
    assert_eq!(files.len(), 2);

    // The source tree is untouched.
    let (folders, files) = env
        .manager
        .descendants_of(&src, DescendantKind::Both)
        .await
        .unwrap();
    assert_eq!(folders.len(), 1);
    assert_eq!(files.len(), 2);
}

#[tokio::test]
async fn test_copy_into_own_subtree() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let a = env
        .manager
        .create_folder(&root, "a", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    let b = env
        .manager
        .create_folder(&a, "b", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();

    let err = env
        .manager
        .copy_folder(&a, &b, ConflictPolicy::RaiseConflict)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::TargetIsChildOfSource);
}

#[tokio::test]
async fn test_delete_and_restore() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let folder = env
        .manager
        .create_folder(&root, "todelete", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();

    let deleted = env.manager.delete_folder(&folder).await.unwrap();
    assert!(deleted.is_deleted);

    let err = env
        .manager
        .resolve_folder("/todelete/", ReadScope::ActiveOnly)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FolderNotFound);

    let found = env
        .manager
        .resolve_folder("/todelete/", ReadScope::DeletedOnly)
        .await
        .unwrap();
    assert_eq!(found.id, folder.id);

    let restored = env.manager.restore_folder(&found).await.unwrap();
    assert!(!restored.is_deleted);
    env.manager
        .resolve_folder("/todelete/", ReadScope::ActiveOnly)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_restore_with_path_conflict() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let old = env
        .manager
        .create_folder(&root, "todelete", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    let old = env.manager.delete_folder(&old).await.unwrap();

    // The freed path gets reused by a new active folder.
    env.manager
        .create_folder(&root, "todelete", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();

    let restored = env.manager.restore_folder(&old).await.unwrap();
    assert_eq!(restored.full_path, "/todelete - Copy/");
    assert!(!restored.is_deleted);

    // Both folders are active now.
    env.manager
        .resolve_folder("/todelete/", ReadScope::ActiveOnly)
        .await
        .unwrap();
    env.manager
        .resolve_folder("/todelete - Copy/", ReadScope::ActiveOnly)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_restore_active_folder_fails() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let folder = env
        .manager
        .create_folder(&root, "active", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();

    let err = env.manager.restore_folder(&folder).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::FolderIsNotDeleted);
}

#[tokio::test]
async fn test_deleted_subtree_is_unreachable() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let parent = env
        .manager
        .create_folder(&root, "p", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    let child = env
        .manager
        .create_folder(&parent, "c", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();

    env.manager.delete_folder(&parent).await.unwrap();

    // The child row carries no flag of its own but its subtree is gone.
    let err = env
        .manager
        .resolve_folder("/p/c/", ReadScope::ActiveOnly)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FolderNotFound);

    // Mutations through a stale handle are rejected too.
    let err = env
        .manager
        .create_folder(&child, "x", ConflictPolicy::RaiseConflict)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::CannotModifyDeletedItems);
}

#[tokio::test]
async fn test_purge_removes_subtree_and_blobs() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let folder = env
        .manager
        .create_folder(&root, "pg", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    let sub = env
        .manager
        .create_folder(&folder, "sub", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    let file = env
        .manager
        .create_or_update_file(&sub, "f.txt", content("payload"))
        .await
        .unwrap();

    let deleted = env.manager.delete_folder(&folder).await.unwrap();
    env.manager.purge_folder(&deleted).await.unwrap();

    let err = env
        .manager
        .resolve_folder("/pg/", ReadScope::All)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FolderNotFound);
    let err = env
        .manager
        .resolve_folder("/pg/sub/", ReadScope::All)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FolderNotFound);

    assert!(!env.blobs.exists(file.blob_id).await.unwrap());
}

#[tokio::test]
async fn test_purge_requires_prior_delete() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let folder = env
        .manager
        .create_folder(&root, "keep", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();

    let err = env.manager.purge_folder(&folder).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::FolderIsNotDeleted);
}

#[tokio::test]
async fn test_children_listing() {
    let env = TestEnv::new().await;
    let root = env.manager.root().await.unwrap();
    let folder = env
        .manager
        .create_folder(&root, "list", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    env.manager
        .create_folder(&folder, "beta", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    env.manager
        .create_folder(&folder, "alpha", ConflictPolicy::RaiseConflict)
        .await
        .unwrap();
    env.manager
        .create_or_update_file(&folder, "n.txt", content("n"))
        .await
        .unwrap();

    let (folders, files) = env
        .manager
        .children_of(&folder, ReadScope::ActiveOnly)
        .await
        .unwrap();
    let names: Vec<&str> = folders.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta"]);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].full_path, "/list/n.txt");
}
