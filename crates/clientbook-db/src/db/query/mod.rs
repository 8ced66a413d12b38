pub mod client;
pub mod contact;
pub mod link;

diesel::define_sql_function! {
    /// SQL `lower(text)`, matching the `contact_email_lower_key` index expression.
    fn lower(x: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

/// ## Summary
/// Builds a `LIKE` pattern matching every value that starts with `prefix`.
///
/// `%`, `_` and `\` in the prefix are escaped so they match literally.
#[must_use]
pub fn starts_with_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
