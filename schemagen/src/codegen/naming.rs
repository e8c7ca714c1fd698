//! Naming utilities for code generation

/// Convert a table or column name to a class name (PascalCase)
///
/// Every run of non-alphanumeric characters becomes a word break and the
/// first letter of each word is upper-cased; the rest of each word is kept
/// as written, so `userID` stays `UserID`.
pub fn to_pascal_case(value: &str) -> String {
    value
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect()
}

/// PascalCase with the first character lower-cased
pub fn to_camel_case(value: &str) -> String {
    let pascal = to_pascal_case(value);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Strip a leading `fk_` and a trailing `_id` from a column name
/// e.g., "fk_user_id" -> "user", "approver_id" -> "approver"
pub fn strip_foreign_key_affixes(value: &str) -> &str {
    let value = value.strip_prefix("fk_").unwrap_or(value);
    value.strip_suffix("_id").unwrap_or(value)
}

/// Pluralize by appending `s`
///
/// There is no irregular table: "category" becomes "categorys". Relation
/// names in generated code depend on this exact output.
pub fn pluralize(word: &str) -> String {
    format!("{}s", word)
}

/// Class name of the model for a table
pub fn to_model_class_name(table_name: &str) -> String {
    to_pascal_case(table_name)
}

/// Class name of the form request for a table
/// e.g., "order_items" -> "OrderItemsRequest"
pub fn to_request_class_name(table_name: &str) -> String {
    format!("{}Request", to_pascal_case(table_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("users"), "Users");
        assert_eq!(to_pascal_case("user_settings"), "UserSettings");
        assert_eq!(to_pascal_case("order-items"), "OrderItems");
        assert_eq!(to_pascal_case("  __user  profile__ "), "UserProfile");
        assert_eq!(to_pascal_case("userID"), "UserID");
        assert_eq!(to_pascal_case("table2_v3"), "Table2V3");
        assert_eq!(to_pascal_case(""), "");
        assert_eq!(to_pascal_case("___"), "");
    }

    #[test]
    fn test_to_pascal_case_is_idempotent() {
        for s in [
            "users",
            "user_profile",
            "fk_user_id",
            "ORDER_ITEMS",
            "a-b c.d",
            "already Pascal",
            "",
            "1st_place",
        ] {
            let once = to_pascal_case(s);
            assert_eq!(to_pascal_case(&once), once, "input: {:?}", s);
        }
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("user"), "user");
        assert_eq!(to_camel_case("order_items"), "orderItems");
        assert_eq!(to_camel_case("Blog Post"), "blogPost");
        assert_eq!(to_camel_case(""), "");
    }

    #[test]
    fn test_strip_foreign_key_affixes() {
        assert_eq!(strip_foreign_key_affixes("fk_user_id"), "user");
        assert_eq!(strip_foreign_key_affixes("fk_user"), "user");
        assert_eq!(strip_foreign_key_affixes("user_id"), "user");
        assert_eq!(strip_foreign_key_affixes("username"), "username");
        assert_eq!(strip_foreign_key_affixes("idea_id"), "idea");
        assert_eq!(strip_foreign_key_affixes("my_fk_user"), "my_fk_user");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("post"), "posts");
        assert_eq!(pluralize("category"), "categorys");
        assert_eq!(pluralize("status"), "statuss");
    }

    #[test]
    fn test_class_names() {
        assert_eq!(to_model_class_name("blog_posts"), "BlogPosts");
        assert_eq!(to_request_class_name("blog_posts"), "BlogPostsRequest");
    }
}
