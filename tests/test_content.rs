use portfolio_arcade::content::*;
use portfolio_arcade::error::ContentError;

fn draft(slug: &str, title: &str) -> NewPost {
    NewPost {
        slug: slug.to_string(),
        title: title.to_string(),
        sections: vec![Section::new(SectionKind::Paragraph, "hello")],
    }
}

// ── Sections ──────────────────────────────────────────────────────────────────

#[test]
fn parses_section_json() {
    let raw = r#"[
        {"type": "heading", "content": "Intro"},
        {"type": "code", "content": "fn main() {}", "language": "rust"},
        {"type": "image", "content": "/img/a.png", "caption": "A"}
    ]"#;
    let sections = parse_sections(raw);

    assert_eq!(sections.len(), 3);
    assert_eq!(sections[0], Section::new(SectionKind::Heading, "Intro"));
    assert_eq!(sections[1].language.as_deref(), Some("rust"));
    assert_eq!(sections[2].kind, SectionKind::Image);
    assert_eq!(sections[2].caption.as_deref(), Some("A"));
}

#[test]
fn malformed_sections_yield_nothing() {
    assert!(parse_sections("").is_empty());
    assert!(parse_sections("not json").is_empty());
    assert!(parse_sections(r#"[{"type": "marquee", "content": "x"}]"#).is_empty());
    assert!(parse_sections(r#"{"type": "heading", "content": "x"}"#).is_empty());
}

#[test]
fn sections_serialize_with_type_tag() {
    let json = serde_json::to_string(&Section::new(SectionKind::Note, "n")).unwrap();
    assert_eq!(json, r#"{"type":"note","content":"n"}"#);
}

// ── Store ─────────────────────────────────────────────────────────────────────

#[test]
fn insert_assigns_increasing_ids() {
    let store = MemoryContentStore::new();
    let a = store.insert(draft("first", "First")).unwrap();
    let b = store.insert(draft("second", "Second")).unwrap();

    assert_eq!(a.id, 1);
    assert_eq!(b.id, 2);
    assert_eq!(store.list().unwrap(), vec![a, b]);
}

#[test]
fn lookup_by_id_or_slug() {
    let store = MemoryContentStore::new();
    let post = store.insert(draft("hello-world", "Hello")).unwrap();

    assert_eq!(store.get_by_key(&PostKey::Id(post.id)).unwrap(), post);
    assert_eq!(
        store.get_by_key(&PostKey::Slug("hello-world".into())).unwrap(),
        post
    );
    assert!(matches!(
        store.get_by_key(&PostKey::Slug("missing".into())),
        Err(ContentError::NotFound(_))
    ));
}

#[test]
fn duplicate_slug_is_rejected() {
    let store = MemoryContentStore::new();
    store.insert(draft("same", "One")).unwrap();
    assert!(matches!(
        store.insert(draft("same", "Two")),
        Err(ContentError::DuplicateSlug(slug)) if slug == "same"
    ));
    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn update_keeps_the_id() {
    let store = MemoryContentStore::new();
    let post = store.insert(draft("old", "Old")).unwrap();
    store.insert(draft("taken", "Taken")).unwrap();

    let updated = store
        .update(&PostKey::Slug("old".into()), draft("new", "New"))
        .unwrap();
    assert_eq!(updated.id, post.id);
    assert_eq!(updated.title, "New");
    assert_eq!(store.get_by_key(&PostKey::Slug("new".into())).unwrap(), updated);

    // Re-saving under its own slug is fine; stealing another's is not.
    assert!(store.update(&PostKey::Id(post.id), draft("new", "Again")).is_ok());
    assert!(matches!(
        store.update(&PostKey::Id(post.id), draft("taken", "Clash")),
        Err(ContentError::DuplicateSlug(_))
    ));
    assert!(matches!(
        store.update(&PostKey::Id(99), draft("x", "X")),
        Err(ContentError::NotFound(_))
    ));
}

#[test]
fn delete_returns_the_removed_post() {
    let store = MemoryContentStore::new();
    let post = store.insert(draft("gone", "Gone")).unwrap();

    assert_eq!(store.delete(&PostKey::Id(post.id)).unwrap(), post);
    assert!(store.list().unwrap().is_empty());
    assert!(matches!(
        store.delete(&PostKey::Id(post.id)),
        Err(ContentError::NotFound(_))
    ));
}

#[test]
fn not_found_names_the_key() {
    let store = MemoryContentStore::new();
    let err = store.get_by_key(&PostKey::Id(7)).unwrap_err();
    assert_eq!(err.to_string(), "no post matches id 7");
}
