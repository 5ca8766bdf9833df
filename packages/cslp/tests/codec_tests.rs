//! Decoding behaviour across address shapes

use visual_builder_cslp::{decode, encode, FieldAddress};

#[test]
fn test_decode_recovers_entry_and_stripped_path() {
    let cases = [
        ("blog", "blt0a1", "en-us", "title", "title"),
        ("blog", "blt0a1", "fr-fr", "author.name", "author.name"),
        ("blog", "blt0a1", "en-us", "body.0.paragraph", "body.paragraph"),
        ("blog", "blt0a1", "en-us", "links.4", "links"),
        ("blog", "blt0a1", "ja-jp", "a.10.b.2.c", "a.b.c"),
    ];

    for (ct, entry, locale, path, stripped) in cases {
        let cslp = encode(ct, entry, locale, None, path);
        let address = decode(&cslp).unwrap_or_else(|| panic!("failed to decode {cslp}"));

        assert_eq!(address.content_type_uid, ct);
        assert_eq!(address.entry_uid, entry);
        assert_eq!(address.locale, locale);
        assert_eq!(address.field_path, stripped);
        assert_eq!(address.field_path_with_index, path);
        assert_eq!(address.to_cslp(), cslp);
    }
}

#[test]
fn test_index_presence_matches_last_segment() {
    let indexed = decode("blog.blt1.en-us.body.0").unwrap();
    let nested = decode("blog.blt1.en-us.body.0.paragraph").unwrap();

    assert!(indexed.multiple_field_metadata.index >= 0);
    assert_eq!(nested.multiple_field_metadata.index, -1);
    assert_eq!(nested.instance.field_path_with_index, "body.0");
}

#[test]
fn test_serialized_shape_matches_wire_names() {
    let address = decode("all_fields.bltentryuid.en-us.title").unwrap();
    let json = serde_json::to_value(&address).unwrap();

    assert_eq!(json["content_type_uid"], "all_fields");
    assert_eq!(json["entry_uid"], "bltentryuid");
    assert_eq!(json["fieldPath"], "title");
    assert_eq!(json["fieldPathWithIndex"], "title");
    assert_eq!(json["multipleFieldMetadata"]["index"], -1);
    assert!(json["multipleFieldMetadata"]["parentDetails"].is_null());
    assert_eq!(json["instance"]["fieldPathWithIndex"], "title");
    assert!(json.get("variant").is_none());

    let back: FieldAddress = serde_json::from_value(json).unwrap();
    assert_eq!(back, address);
}

#[test]
fn test_variant_without_suffix_keeps_entry() {
    let address = decode("v2:blog.blt1.en-us.title").unwrap();

    assert_eq!(address.entry_uid, "blt1");
    assert!(address.variant.is_none());
}
