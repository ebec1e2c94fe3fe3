use futures::executor::block_on;
use serde_json::json;

use super::*;
use crate::net::memory::MemoryBackend;

fn seeded() -> MemoryBackend {
    let memory = MemoryBackend::new();
    memory.seed(TABLE, json!({ "id": 1, "titre": "plage", "user_id": "u1" }));
    memory.seed(TABLE, json!({ "id": 2, "titre": "Montagne", "user_id": "u1" }));
    memory.seed(TABLE, json!({ "id": 3, "titre": "musée", "user_id": "u1" }));
    memory.seed(TABLE, json!({ "id": 4, "titre": "autre", "user_id": "u2" }));
    memory
}

fn titles(tags: &[Tag]) -> Vec<&str> {
    tags.iter().map(|t| t.title.as_str()).collect()
}

#[test]
fn validate_requires_title() {
    assert_eq!(TagForm { title: "  ".to_owned() }.validate(), Err("Tag title is required."));
    assert_eq!(TagForm { title: " food ".to_owned() }.validate(), Ok("food".to_owned()));
}

#[test]
fn list_is_scoped_to_user_and_ordered_by_title() {
    let memory = seeded();
    let tags = block_on(list(&memory, "u1", "")).unwrap();
    assert_eq!(titles(&tags), vec!["Montagne", "musée", "plage"]);
}

#[test]
fn search_is_case_insensitive() {
    let memory = seeded();
    let tags = block_on(list(&memory, "u1", "MU")).unwrap();
    assert_eq!(titles(&tags), vec!["musée"]);
}

#[test]
fn list_query_skips_blank_search() {
    let query = list_query("u1", "   ");
    assert_eq!(query.filters().len(), 1);
}

#[test]
fn create_navigates_to_tag_list() {
    let memory = MemoryBackend::new();
    let route = block_on(save(&memory, "u1", None, &TagForm { title: "food".to_owned() }));
    assert_eq!(route, Ok("/tags".to_owned()));
    let rows = memory.rows(TABLE);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["titre"], "food");
    assert_eq!(rows[0]["user_id"], "u1");
}

#[test]
fn blank_title_is_rejected_before_insert() {
    let memory = MemoryBackend::new();
    let result = block_on(save(&memory, "u1", None, &TagForm::default()));
    assert_eq!(result, Err("Tag title is required.".to_owned()));
    assert_eq!(memory.insert_calls(), 0);
}

#[test]
fn update_renames_existing_tag() {
    let memory = seeded();
    block_on(save(&memory, "u1", Some(2), &TagForm { title: "Sommets".to_owned() })).unwrap();
    let tag = block_on(get(&memory, 2)).unwrap().unwrap();
    assert_eq!(tag.title, "Sommets");
}

#[test]
fn update_of_missing_tag_reports_not_found() {
    let memory = seeded();
    let result = block_on(save(&memory, "u1", Some(99), &TagForm { title: "Sommets".to_owned() }));
    assert_eq!(result, Err("Tag not found.".to_owned()));
    assert_eq!(memory.rows(TABLE).len(), 4);
}

#[test]
fn delete_removes_only_that_tag() {
    let memory = seeded();
    block_on(delete(&memory, 1)).unwrap();
    assert_eq!(block_on(get(&memory, 1)).unwrap(), None);
    assert_eq!(block_on(list(&memory, "u1", "")).unwrap().len(), 2);
}
