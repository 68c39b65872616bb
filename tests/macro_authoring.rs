use veneer_rs::{Engine, StyleValue, sheet, style};

#[test]
fn test_style_macro_preserves_declaration_order() {
    let map = style! {
        color: "red",
        height: 20,
        zIndex: 3,
    };
    let keys: Vec<_> = map.keys().collect();
    assert_eq!(keys, vec!["color", "height", "zIndex"]);
    assert_eq!(map.get("height"), Some(&StyleValue::Number(20.0)));
}

#[test]
fn test_style_macro_nests_blocks_under_literal_keys() {
    let map = style! {
        color: "red",
        ":hover": {
            color: "blue",
        },
        "@media screen": {
            height: 10,
        },
    };

    let hover = map.get(":hover").and_then(StyleValue::as_mapping).unwrap();
    assert_eq!(hover.get("color"), Some(&StyleValue::Str("blue".into())));
    let media = map
        .get("@media screen")
        .and_then(StyleValue::as_mapping)
        .unwrap();
    assert_eq!(media.get("height"), Some(&StyleValue::Number(10.0)));
}

#[test]
fn test_style_macro_builds_sequences() {
    let map = style! {
        fontFamily: ["Helvetica", "Arial"],
    };
    assert_eq!(
        map.get("fontFamily"),
        Some(&StyleValue::Sequence(vec![
            StyleValue::Str("Helvetica".into()),
            StyleValue::Str("Arial".into()),
        ]))
    );
}

#[test]
fn test_sheet_macro_feeds_the_engine() {
    let engine = Engine::no_important();
    engine.suppress_injection().unwrap();

    let styles = engine.compile(sheet! {
        button: {
            color: "red",
            ":hover": { color: "blue" },
        },
        link: { color: "green" },
    });
    assert_eq!(styles.len(), 2);

    let class = engine.class_name(&[styles.get("button").into()]).unwrap();
    let css = engine.buffered_styles().concat();
    assert!(css.contains(&format!(".{class}{{color:red;}}")));
    assert!(css.contains(&format!(".{class}:hover{{color:blue;}}")));
}

#[test]
fn test_empty_style_macro_is_an_empty_map() {
    let map = style! {};
    assert!(map.is_empty());
}
