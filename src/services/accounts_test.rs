use super::*;

fn scratch() -> tempfile::TempDir {
    tempfile::tempdir().expect("tempdir should be created")
}

#[tokio::test]
async fn load_missing_index_is_empty() {
    let dir = scratch();
    let index = AccountIndex::new(dir.path());
    let doc = index.load().await.unwrap();
    assert!(doc.accounts.is_empty());
}

#[tokio::test]
async fn register_creates_index_when_missing() {
    let dir = scratch();
    let index = AccountIndex::new(dir.path());

    assert!(index.register("alice").await.unwrap());

    let raw = std::fs::read_to_string(dir.path().join("accounts.json")).unwrap();
    let doc = AccountsDocument::parse(&raw).unwrap();
    assert_eq!(doc.accounts, vec!["alice"]);
}

#[tokio::test]
async fn register_appends_and_keeps_order() {
    let dir = scratch();
    std::fs::write(dir.path().join("accounts.json"), r#"{"accounts":["zoe","adam"]}"#).unwrap();
    let index = AccountIndex::new(dir.path());

    assert!(index.register("mia").await.unwrap());

    let doc = index.load().await.unwrap();
    assert_eq!(doc.accounts, vec!["zoe", "adam", "mia"]);
}

#[tokio::test]
async fn register_is_idempotent() {
    let dir = scratch();
    std::fs::write(dir.path().join("accounts.json"), r#"{"accounts":["zoe"]}"#).unwrap();
    let index = AccountIndex::new(dir.path());

    assert!(!index.register("zoe").await.unwrap());
    assert!(index.register("bob").await.unwrap());
    assert!(!index.register("bob").await.unwrap());

    let doc = index.load().await.unwrap();
    assert_eq!(doc.accounts, vec!["zoe", "bob"]);
}

#[tokio::test]
async fn known_accounts_skip_the_file() {
    let dir = scratch();
    let index = AccountIndex::new(dir.path());
    index.register("alice").await.unwrap();

    // Someone else rewrites the index; a known name does not touch it.
    std::fs::write(index.path(), r#"{"accounts":[]}"#).unwrap();
    assert!(!index.register("alice").await.unwrap());
    assert!(index.load().await.unwrap().accounts.is_empty());
}

#[tokio::test]
async fn register_preserves_extra_fields() {
    let dir = scratch();
    std::fs::write(dir.path().join("accounts.json"), r#"{"accounts":[],"title":"crew"}"#).unwrap();
    let index = AccountIndex::new(dir.path());

    index.register("alice").await.unwrap();

    let raw = std::fs::read_to_string(index.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["title"], "crew");
    assert_eq!(value["accounts"], serde_json::json!(["alice"]));
}

#[tokio::test]
async fn corrupt_index_is_an_error_and_not_remembered() {
    let dir = scratch();
    std::fs::write(dir.path().join("accounts.json"), "{not json").unwrap();
    let index = AccountIndex::new(dir.path());

    let err = index.register("alice").await.unwrap_err();
    assert!(matches!(err, AccountIndexError::Json(_)));

    std::fs::write(index.path(), r#"{"accounts":[]}"#).unwrap();
    assert!(index.register("alice").await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_first_uploads_rewrite_index_once() {
    let dir = scratch();
    let seed: Vec<String> = (0..5000).map(|i| format!("user-{i}")).collect();
    let raw = serde_json::json!({ "accounts": seed }).to_string();

    for round in 0..10 {
        std::fs::write(dir.path().join("accounts.json"), &raw).unwrap();
        let index = std::sync::Arc::new(AccountIndex::new(dir.path()));
        let name = format!("new-{round}");

        let handles: Vec<_> = (0..12)
            .map(|_| {
                let index = std::sync::Arc::clone(&index);
                let name = name.clone();
                tokio::spawn(async move { index.register(&name).await })
            })
            .collect();

        let mut rewrites = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(true) => rewrites += 1,
                Ok(false) => {}
                Err(e) => panic!("register failed in round {round}: {e}"),
            }
        }
        assert_eq!(rewrites, 1, "round {round}");

        let doc = index.load().await.unwrap();
        assert_eq!(doc.accounts.len(), 5001);
        assert_eq!(doc.accounts.last(), Some(&name));
    }
}

#[tokio::test]
async fn successful_register_leaves_no_staging_files() {
    let dir = scratch();
    let index = AccountIndex::new(dir.path());
    index.register("alice").await.unwrap();
    index.register("bob").await.unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["accounts.json"]);
}
