//! Searchable, categorized index of insertable node templates.
//!
//! The menu lists every non-private template whose name contains the search
//! string (case-insensitive), grouped by category in catalog order. Each
//! listed template also gets a flat index, contiguous within its category,
//! which keyboard navigation moves over.
//!
//! # Usage
//!
//! ```rust,ignore
//! use nodecanvas::editor::CommandMenu;
//!
//! let mut menu = CommandMenu::new(&catalog);
//! menu.search(&catalog, "add");
//! menu.move_down();
//! let template_id = menu.selected_template();
//! ```

use indexmap::IndexMap;

use crate::model::{NodeTemplate, Point, TemplateCatalog, TemplateId};

/// Category holding templates that declare none. Always listed last.
pub const UNCATEGORIZED: &str = "nodes";

/// A listed template and its flat index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub template_id: TemplateId,
    pub name: String,
    pub description: String,
    pub index: usize,
}

/// A category of matching templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuCategory {
    pub name: String,
    pub entries: Vec<MenuEntry>,
}

/// Build the filtered category list and its total entry count.
pub fn build_categories(catalog: &TemplateCatalog, query: &str) -> (Vec<MenuCategory>, usize) {
    let mut grouped: IndexMap<&str, Vec<&NodeTemplate>> = IndexMap::new();
    let mut uncategorized = Vec::new();
    for template in catalog.values() {
        if template.private || !template.matches_query(query) {
            continue;
        }
        match template.category.as_deref() {
            Some(category) if category != UNCATEGORIZED => {
                grouped.entry(category).or_default().push(template)
            }
            _ => uncategorized.push(template),
        }
    }
    if !uncategorized.is_empty() {
        grouped.insert(UNCATEGORIZED, uncategorized);
    }

    let mut next_index = 0;
    let categories = grouped
        .into_iter()
        .map(|(name, templates)| MenuCategory {
            name: name.to_string(),
            entries: templates
                .into_iter()
                .map(|t| {
                    let entry = MenuEntry {
                        template_id: t.id.clone(),
                        name: t.name.clone(),
                        description: t.description.clone(),
                        index: next_index,
                    };
                    next_index += 1;
                    entry
                })
                .collect(),
        })
        .collect();
    (categories, next_index)
}

/// State of the node-creation menu.
#[derive(Debug, Clone, Default)]
pub struct CommandMenu {
    pub open: bool,
    /// Screen position the menu was opened at; new nodes land here.
    pub anchor: Point,
    query: String,
    categories: Vec<MenuCategory>,
    len: usize,
    selected: usize,
}

impl CommandMenu {
    /// Closed menu indexing the whole catalog.
    pub fn new(catalog: &TemplateCatalog) -> Self {
        let mut menu = Self::default();
        menu.search(catalog, "");
        menu
    }

    /// Open at a screen position with an empty search.
    pub fn open_at(&mut self, catalog: &TemplateCatalog, anchor: Point) {
        self.open = true;
        self.anchor = anchor;
        self.search(catalog, "");
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Re-run the search; the selection resets to the first entry.
    pub fn search(&mut self, catalog: &TemplateCatalog, query: &str) {
        let (categories, len) = build_categories(catalog, query);
        self.query = query.to_string();
        self.categories = categories;
        self.len = len;
        self.selected = 0;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn categories(&self) -> &[MenuCategory] {
        &self.categories
    }

    /// Number of listed templates.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.len {
            self.selected += 1;
        }
    }

    /// Select an entry directly (pointer hover). Out-of-range indices are
    /// ignored.
    pub fn hover(&mut self, index: usize) -> bool {
        if index < self.len {
            self.selected = index;
            true
        } else {
            false
        }
    }

    /// Resolve the selected flat index back to its template by walking the
    /// categories with a running offset.
    pub fn selected_template(&self) -> Option<&TemplateId> {
        let mut offset = 0;
        for category in &self.categories {
            let count = category.entries.len();
            if self.selected < offset + count {
                return category
                    .entries
                    .get(self.selected - offset)
                    .map(|e| &e.template_id);
            }
            offset += count;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> TemplateCatalog {
        let mut c = TemplateCatalog::new();
        let mut add = |t: NodeTemplate| {
            c.insert(t.id.clone(), t);
        };
        add(NodeTemplate::new("add", "Add").with_category("Math"));
        add(NodeTemplate::new("print", "Print"));
        add(NodeTemplate::new("concat", "Concat").with_category("Text"));
        add(NodeTemplate::new("mul", "Multiply").with_category("Math"));
        let mut hidden = NodeTemplate::new("root", "Root").with_category("Math");
        hidden.private = true;
        add(hidden);
        c
    }

    fn flat(menu: &CommandMenu) -> Vec<(String, usize)> {
        menu.categories()
            .iter()
            .flat_map(|c| c.entries.iter().map(|e| (e.template_id.clone(), e.index)))
            .collect()
    }

    #[test]
    fn test_categories_in_catalog_order_catch_all_last() {
        let menu = CommandMenu::new(&catalog());
        let names: Vec<_> = menu.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Math", "Text", UNCATEGORIZED]);
        assert_eq!(
            flat(&menu),
            vec![
                ("add".into(), 0),
                ("mul".into(), 1),
                ("concat".into(), 2),
                ("print".into(), 3)
            ]
        );
        assert_eq!(menu.len(), 4);
    }

    #[test]
    fn test_private_templates_hidden() {
        let menu = CommandMenu::new(&catalog());
        assert!(flat(&menu).iter().all(|(id, _)| id != "root"));
    }

    #[test]
    fn test_search_is_case_insensitive_on_name() {
        let c = catalog();
        let mut menu = CommandMenu::new(&c);
        menu.search(&c, "MUL");
        assert_eq!(flat(&menu), vec![("mul".into(), 0)]);
        // Category names are not searched.
        menu.search(&c, "math");
        assert!(menu.is_empty());
        assert!(menu.categories().is_empty());
    }

    #[test]
    fn test_navigation_clamps() {
        let mut menu = CommandMenu::new(&catalog());
        menu.move_up();
        assert_eq!(menu.selected(), 0);
        for _ in 0..10 {
            menu.move_down();
        }
        assert_eq!(menu.selected(), 3);
        assert_eq!(menu.selected_template().map(String::as_str), Some("print"));
        menu.move_up();
        assert_eq!(menu.selected_template().map(String::as_str), Some("concat"));
    }

    #[test]
    fn test_search_resets_selection() {
        let c = catalog();
        let mut menu = CommandMenu::new(&c);
        menu.move_down();
        menu.move_down();
        menu.search(&c, "");
        assert_eq!(menu.selected(), 0);
    }

    #[test]
    fn test_empty_result_has_no_selection() {
        let c = catalog();
        let mut menu = CommandMenu::new(&c);
        menu.search(&c, "zzz");
        menu.move_down();
        assert_eq!(menu.selected(), 0);
        assert_eq!(menu.selected_template(), None);
    }

    #[test]
    fn test_hover() {
        let mut menu = CommandMenu::new(&catalog());
        assert!(menu.hover(2));
        assert_eq!(menu.selected_template().map(String::as_str), Some("concat"));
        assert!(!menu.hover(4));
        assert_eq!(menu.selected(), 2);
    }
}
