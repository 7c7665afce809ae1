use super::*;

fn heuristic() -> LayoutConfig {
    LayoutConfig::default().with_optimize(Optimize::Off)
}

#[test]
fn test_render_declarations_chain() {
    let svg = render_declarations("a\nb <- a\nc <- b\n", &LayoutConfig::default()).unwrap();
    assert!(svg.starts_with("<svg"));
    assert_eq!(svg.matches("<rect").count(), 3);
    assert_eq!(svg.matches("<line").count(), 2);
}

#[test]
fn test_render_declarations_default_config_searches() {
    let src = "A -> D, E\nB -> C\nC\nD\nE\n";
    let searched = render_declarations(src, &LayoutConfig::default()).unwrap();
    let heuristic = render_declarations(src, &heuristic()).unwrap();
    assert_ne!(searched, heuristic);
    assert_eq!(searched.matches("<rect").count(), 5);
}

#[test]
fn test_render_declarations_reduces_edges() {
    // c -> a is implied through b and is not drawn.
    let svg = render_declarations("a\nb <- a\nc <- a, b\n", &heuristic()).unwrap();
    assert_eq!(svg.matches("<line").count(), 2);
}

#[test]
fn test_render_declarations_empty() {
    let svg = render_declarations("", &heuristic()).unwrap();
    assert!(!svg.contains("<rect"));
}

#[test]
fn test_render_declarations_errors() {
    assert!(matches!(
        render_declarations("a <- b\n", &heuristic()),
        Err(Error::UnknownReference { .. })
    ));
    assert!(matches!(
        render_declarations("a <- a\n", &heuristic()),
        Err(Error::Cycle { .. })
    ));
    assert!(matches!(
        render_declarations("a <- \n", &heuristic()),
        Err(Error::Parse { line: 1, .. })
    ));
}

#[test]
fn test_error_messages() {
    let err = render_declarations("a <- b\n", &heuristic()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "module \"a\" declares unknown upstream module \"b\""
    );
}
