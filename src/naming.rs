/// Upper-case the first character of `word`, leaving the rest untouched
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Convert a snake_case identifier to PascalCase
///
/// Each `_`-delimited segment gets its first letter capitalized and the
/// segments are joined without a separator. Empty segments contribute
/// nothing, so `a__b` becomes `AB`
pub fn to_struct_name(identifier: &str) -> String {
    identifier.split('_').map(capitalize).collect()
}

/// Infer the table a migration operates on from its name
///
/// - `create_<table>_table` → `<table>`
/// - `add_<anything>_to_<table>[_table]` → `<table>`, only when `_to_`
///   occurs exactly once
/// - anything else is returned unchanged
pub fn infer_table_name(identifier: &str) -> String {
    if identifier.starts_with("create_") && identifier.ends_with("_table") {
        // prefix and suffix may overlap, as in `create_table`
        let rest = &identifier["create_".len()..];
        return rest.strip_suffix("_table").unwrap_or(rest).to_string();
    }

    if identifier.starts_with("add_") {
        let parts: Vec<&str> = identifier.split("_to_").collect();
        if let &[_, target] = parts.as_slice() {
            return target.strip_suffix("_table").unwrap_or(target).to_string();
        }
    }

    identifier.to_string()
}

/// Capitalize the first letter of every word
///
/// Letters, digits and underscores belong to a word; anything else starts a
/// new one, so `my-app` becomes `My-App` while `my_app` becomes `My_app`
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }
    out
}
