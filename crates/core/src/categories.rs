use crate::model::Category;

/// The predefined category set, in display order.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("1", "Work", "bg-blue-500"),
        Category::new("2", "Personal", "bg-emerald-500"),
        Category::new("3", "Shopping", "bg-purple-500"),
        Category::new("4", "Health", "bg-pink-500"),
        Category::new("5", "Learning", "bg-indigo-500"),
    ]
}

/// Resolve a category id. Unknown or empty ids yield `None` so callers skip the badge.
pub fn find_category<'a>(categories: &'a [Category], id: &str) -> Option<&'a Category> {
    if id.is_empty() {
        return None;
    }
    categories.iter().find(|category| category.id == id)
}

/// Id used for a blank draft: the first category, or empty when there are none.
pub fn default_category_id(categories: &[Category]) -> String {
    categories
        .first()
        .map(|category| category.id.clone())
        .unwrap_or_default()
}
