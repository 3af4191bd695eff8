use nodecanvas::config::EditorConfig;
use nodecanvas::editor::{CommandMenu, EditorCommand, EditorSession, Rejection, UNCATEGORIZED};
use nodecanvas::model::{NodeTemplate, Point, TemplateCatalog};

fn catalog() -> TemplateCatalog {
    let mut entry = NodeTemplate::new("entry", "Entry Point").with_category("Flow");
    entry.private = true;
    let templates = [
        NodeTemplate::new("sin", "Sine").with_category("Math"),
        NodeTemplate::new("log", "Log Message"),
        NodeTemplate::new("branch", "Branch").with_category("Flow"),
        NodeTemplate::new("cos", "Cosine").with_category("Math"),
        NodeTemplate::new("logic", "Logical And").with_category("Math"),
        entry,
    ];
    templates.into_iter().map(|t| (t.id.clone(), t)).collect()
}

fn listed(menu: &CommandMenu) -> Vec<&str> {
    menu.categories()
        .iter()
        .flat_map(|c| c.entries.iter().map(|e| e.template_id.as_str()))
        .collect()
}

#[test]
fn flat_index_spans_categories_in_order() {
    let menu = CommandMenu::new(&catalog());
    assert_eq!(listed(&menu), vec!["sin", "cos", "logic", "branch", "log"]);
    let indices: Vec<_> = menu
        .categories()
        .iter()
        .flat_map(|c| c.entries.iter().map(|e| e.index))
        .collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    assert_eq!(menu.categories().last().unwrap().name, UNCATEGORIZED);
}

#[test]
fn filtered_out_templates_are_unreachable() {
    let c = catalog();
    let mut menu = CommandMenu::new(&c);
    menu.search(&c, "LOG");
    assert_eq!(listed(&menu), vec!["logic", "log"]);
    for _ in 0..5 {
        menu.move_down();
    }
    assert_eq!(menu.selected(), 1);
    assert_eq!(menu.selected_template().map(String::as_str), Some("log"));
}

#[test]
fn keyboard_flow_through_session() {
    let mut s = EditorSession::new(EditorConfig::default(), catalog());
    s.dispatch(EditorCommand::OpenMenu {
        position: Point::new(64.0, 32.0),
    });
    s.dispatch(EditorCommand::MenuSearch { query: "co".into() });
    s.dispatch(EditorCommand::MenuDown);
    s.dispatch(EditorCommand::MenuUp);
    s.dispatch(EditorCommand::MenuUp);
    assert_eq!(s.menu().selected(), 0);

    let outcome = s.dispatch(EditorCommand::MenuEnter);

    assert!(!outcome.is_rejected());
    assert_eq!(outcome.changes.len(), 1);
    let node = &s.nodes().nodes()[0];
    assert_eq!(node.template_id, "cos");
    assert_eq!(node.position, Point::new(64.0, 32.0));
    assert!(!s.menu().open);
}

#[test]
fn opening_resets_search() {
    let mut s = EditorSession::new(EditorConfig::default(), catalog());
    s.dispatch(EditorCommand::OpenMenu {
        position: Point::default(),
    });
    s.dispatch(EditorCommand::MenuSearch { query: "sine".into() });
    s.dispatch(EditorCommand::CloseMenu);
    s.dispatch(EditorCommand::OpenMenu {
        position: Point::default(),
    });
    assert_eq!(s.menu().query(), "");
    assert_eq!(s.menu().len(), 5);
    assert_eq!(
        s.dispatch(EditorCommand::MenuHover { index: 5 }).rejection,
        Some(Rejection::NothingSelected)
    );
}
