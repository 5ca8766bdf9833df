//! Field map building from CMS-shaped JSON

use visual_builder_schema::{parse_schema, FieldKind, FieldType, SchemaFieldMap};

const PAGE_SCHEMA: &str = r#"[
    { "uid": "title", "display_name": "Title", "data_type": "text", "mandatory": true },
    {
        "uid": "seo",
        "display_name": "SEO",
        "data_type": "group",
        "schema": [
            { "uid": "description", "data_type": "text", "field_metadata": { "multiline": true } }
        ]
    },
    {
        "uid": "sections",
        "display_name": "Sections",
        "data_type": "blocks",
        "multiple": true,
        "blocks": [
            {
                "uid": "hero",
                "title": "Hero",
                "schema": [
                    { "uid": "heading", "data_type": "text" },
                    { "uid": "cta", "data_type": "link" }
                ]
            },
            {
                "uid": "gallery",
                "title": "Gallery",
                "schema": [
                    { "uid": "images", "data_type": "file", "multiple": true }
                ]
            }
        ]
    },
    {
        "uid": "personalized",
        "data_type": "experience_container",
        "variations": [
            { "uid": "returning", "schema": [ { "uid": "greeting", "data_type": "text" } ] }
        ]
    },
    { "uid": "footer", "data_type": "global_field", "schema": [
        { "uid": "copyright", "data_type": "text", "non_localizable": true }
    ] },
    { "uid": "body", "data_type": "json", "field_metadata": { "allow_json_rte": true } }
]"#;

#[test]
fn test_every_reachable_path_is_registered() {
    let schema = parse_schema(PAGE_SCHEMA).unwrap();
    let map = SchemaFieldMap::build(&schema);

    for path in [
        "title",
        "seo",
        "seo.description",
        "sections",
        "sections.hero",
        "sections.hero.heading",
        "sections.hero.cta",
        "sections.hero.cta.title",
        "sections.hero.cta.url",
        "sections.gallery",
        "sections.gallery.images",
        "sections.gallery.images.url",
        "personalized",
        "personalized.returning.greeting",
        "footer",
        "footer.copyright",
        "body",
    ] {
        assert!(map.contains(path), "missing path {path}");
    }
    assert!(!map.contains("personalized.greeting"));
}

#[test]
fn test_block_entries_are_block_typed() {
    let schema = parse_schema(PAGE_SCHEMA).unwrap();
    let map = SchemaFieldMap::build(&schema);

    let hero = map.get("sections.hero").unwrap();
    assert!(matches!(hero.kind, FieldKind::Block { .. }));
    assert_eq!(FieldType::classify(&hero), Some(FieldType::Block));
    assert_eq!(
        FieldType::classify(&map.get("sections").unwrap()),
        Some(FieldType::ModularBlock)
    );
}

#[test]
fn test_classification_through_map() {
    let schema = parse_schema(PAGE_SCHEMA).unwrap();
    let map = SchemaFieldMap::build(&schema);

    let classify = |path: &str| map.get(path).and_then(|s| FieldType::classify(&s));
    assert_eq!(classify("title"), Some(FieldType::Singleline));
    assert_eq!(classify("seo.description"), Some(FieldType::Multiline));
    assert_eq!(classify("sections.hero.cta.url"), Some(FieldType::Link));
    assert_eq!(classify("body"), Some(FieldType::JsonRte));
    assert_eq!(classify("footer"), Some(FieldType::GlobalField));
    assert_eq!(classify("nope"), None);
    assert!(map.get("footer.copyright").unwrap().non_localizable);
}

#[test]
fn test_invalid_json_is_reported() {
    assert!(parse_schema("{ not json").is_err());
    assert!(parse_schema(r#"[{ "uid": "x" }]"#).is_err());
}
