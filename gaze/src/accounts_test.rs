use super::*;
use serde_json::json;

#[test]
fn parse_reads_account_list_in_order() {
    let doc = AccountsDocument::parse(r#"{"accounts":["zoe","adam","mia"]}"#).unwrap();
    assert_eq!(doc.accounts, vec!["zoe", "adam", "mia"]);
    assert!(doc.extra.is_empty());
}

#[test]
fn parse_defaults_missing_accounts() {
    let doc = AccountsDocument::parse("{}").unwrap();
    assert!(doc.accounts.is_empty());
}

#[test]
fn parse_rejects_non_string_accounts() {
    assert!(AccountsDocument::parse(r#"{"accounts":[1,2]}"#).is_err());
    assert!(AccountsDocument::parse("not json").is_err());
}

#[test]
fn insert_appends_new_names() {
    let mut doc = AccountsDocument::default();
    assert!(doc.insert("alice"));
    assert!(doc.insert("bob"));
    assert!(!doc.insert("alice"));
    assert_eq!(doc.accounts, vec!["alice", "bob"]);
}

#[test]
fn insert_collapses_existing_duplicates() {
    let mut doc = AccountsDocument::parse(r#"{"accounts":["a","b","a"]}"#).unwrap();
    assert!(doc.insert("c"));
    assert_eq!(doc.accounts, vec!["a", "b", "c"]);
}

#[test]
fn extra_fields_survive_a_rewrite() {
    let mut doc = AccountsDocument::parse(r#"{"accounts":["a"],"title":"team"}"#).unwrap();
    doc.insert("b");
    let value: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
    assert_eq!(value, json!({"accounts": ["a", "b"], "title": "team"}));
}

#[test]
fn frame_image_path_follows_convention() {
    assert_eq!(frame_image_path("alice", 0), "alice/f0.png");
    assert_eq!(frame_image_path("bob", 11), "bob/f11.png");
}
