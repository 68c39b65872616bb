use veneer::{Engine, StyleArg};
use veneer::ordered::OrderedMap;

fn engine_with_sheet() -> (Engine, veneer::Sheet) {
    let engine = Engine::no_important();
    engine.suppress_injection().unwrap();
    let red: OrderedMap = [("color", "red")].into_iter().collect();
    let blue: OrderedMap = [("color", "blue")].into_iter().collect();
    let tall: OrderedMap = [("height", 100)].into_iter().collect();
    let sheet = engine.compile(vec![
        ("red".to_string(), red),
        ("blue".to_string(), blue),
        ("tall".to_string(), tall),
    ]);
    (engine, sheet)
}

#[test]
fn test_single_style_class_is_underscore_plus_name() {
    let (engine, sheet) = engine_with_sheet();
    let red = sheet.get("red").unwrap();
    let class = engine.class_name(&[red.into()]).unwrap();
    assert_eq!(class, format!("_{}", red.name));
}

#[test]
fn test_skipped_and_missing_entries_are_equivalent() {
    let (engine, sheet) = engine_with_sheet();
    let red = sheet.get("red").unwrap();

    let plain = engine.class_name(&[red.into()]).unwrap();
    let with_skip = engine
        .class_name(&[StyleArg::Skip, red.into(), sheet.get("missing").into()])
        .unwrap();
    let with_group = engine
        .class_name(&[StyleArg::Group(vec![red.into()])])
        .unwrap();

    assert_eq!(plain, with_skip);
    assert_eq!(plain, with_group);
    // Equivalent argument lists share one injected rule.
    assert_eq!(engine.buffered_styles().len(), 1);
}

#[test]
fn test_nested_groups_flatten_in_order() {
    let (engine, sheet) = engine_with_sheet();
    let red = sheet.get("red").unwrap();
    let tall = sheet.get("tall").unwrap();

    let flat = engine.class_name(&[red.into(), tall.into()]).unwrap();
    let grouped = engine
        .class_name(&[StyleArg::Group(vec![red.into()]), tall.into()])
        .unwrap();
    assert_eq!(flat, grouped);
}

#[test]
fn test_combined_styles_merge_with_later_winning() {
    let (engine, sheet) = engine_with_sheet();
    let red = sheet.get("red").unwrap();
    let blue = sheet.get("blue").unwrap();

    let class = engine.class_name(&[red.into(), blue.into()]).unwrap();
    let css = engine.buffered_styles().concat();
    assert_eq!(css, format!(".{class}{{color:blue;}}"));
}

#[test]
fn test_class_names_are_stable_across_engines() {
    let (first_engine, first_sheet) = engine_with_sheet();
    let (second_engine, second_sheet) = engine_with_sheet();

    let first = first_engine
        .class_name(&[first_sheet.get("red").into(), first_sheet.get("tall").into()])
        .unwrap();
    let second = second_engine
        .class_name(&[second_sheet.get("red").into(), second_sheet.get("tall").into()])
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_debug_class_names_join_with_marker() {
    let mut engine = Engine::no_important();
    engine.minify(false);
    engine.suppress_injection().unwrap();

    let red: OrderedMap = [("color", "red")].into_iter().collect();
    let tall: OrderedMap = [("height", 100)].into_iter().collect();
    let sheet = engine.compile(vec![("red".to_string(), red), ("tall".to_string(), tall)]);

    let class = engine
        .class_name(&[sheet.get("red").into(), sheet.get("tall").into()])
        .unwrap();
    assert!(class.starts_with("red_"));
    assert!(class.contains("-o_O-tall_"));
}

#[test]
fn test_repeated_requests_inject_once() {
    let (engine, sheet) = engine_with_sheet();
    let red = sheet.get("red").unwrap();

    engine.class_name(&[red.into()]).unwrap();
    engine.class_name(&[red.into()]).unwrap();
    assert_eq!(engine.buffered_styles().len(), 1);
}
