use super::*;

#[test]
fn voyage_paths() {
    assert_eq!(voyage(4), "/voyages/4");
    assert_eq!(voyage_edit(4), "/voyages/4/edit");
}

#[test]
fn etape_paths_nest_under_voyage() {
    assert_eq!(new_etape(2), "/voyages/2/etapes/new");
    assert_eq!(etape(2, 9), "/voyages/2/etapes/9");
    assert_eq!(etape_edit(2, 9), "/voyages/2/etapes/9/edit");
}

#[test]
fn tag_edit_path() {
    assert_eq!(tag_edit(3), "/tags/3/edit");
}

#[test]
fn parse_id_accepts_positive_integers_only() {
    assert_eq!(parse_id("12"), Some(12));
    assert_eq!(parse_id("new"), None);
    assert_eq!(parse_id("0"), None);
    assert_eq!(parse_id("-3"), None);
    assert_eq!(parse_id(""), None);
}
