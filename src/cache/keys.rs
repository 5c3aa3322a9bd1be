//! Cache Key Helpers
//!
//! Canonical key shapes for services that cache programmatically instead of
//! through the request middleware. Keeping every key under one of these
//! prefixes is what makes the invalidation router's pattern table work.

use serde_json::Value;

/// Canonical encoding for filter objects embedded in keys. serde_json maps
/// are key-ordered, so logically equal filters produce identical keys.
fn canonical(filters: &Value) -> String {
    serde_json::to_string(filters).unwrap_or_default()
}

// == Classrooms ==
pub fn classroom(id: &str) -> String {
    format!("classroom:{id}")
}

pub fn classroom_list(filters: &Value) -> String {
    format!("classrooms:{}", canonical(filters))
}

pub fn classroom_threads(classroom_id: &str) -> String {
    format!("classroom:{classroom_id}:threads")
}

// == Threads ==
pub fn thread(id: &str) -> String {
    format!("thread:{id}")
}

pub fn thread_list(classroom_id: &str) -> String {
    format!("threads:{classroom_id}")
}

// == Materials ==
pub fn material(id: &str) -> String {
    format!("material:{id}")
}

pub fn material_list(classroom_id: &str) -> String {
    format!("materials:{classroom_id}")
}

// == Users ==
pub fn user(id: &str) -> String {
    format!("user:{id}")
}

pub fn user_profile(id: &str) -> String {
    format!("user:{id}:profile")
}

// == Search ==
pub fn search(query: &str, filters: &Value) -> String {
    format!("search:{query}:{}", canonical(filters))
}

pub fn search_popular() -> String {
    "search:popular".to_string()
}

pub fn search_suggestions(query: &str) -> String {
    format!("search:suggestions:{query}")
}

// == Notifications ==
pub fn notifications(user_id: &str) -> String {
    format!("notifications:{user_id}")
}

pub fn notification_count(user_id: &str) -> String {
    format!("notifications:{user_id}:count")
}

// == Chat ==
pub fn chat_messages(classroom_id: &str) -> String {
    format!("chat:{classroom_id}:messages")
}

// == Statistics ==
pub fn stats(kind: &str) -> String {
    format!("stats:{kind}")
}

pub fn dashboard(user_id: &str) -> String {
    format!("dashboard:{user_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_shapes() {
        assert_eq!(classroom("7"), "classroom:7");
        assert_eq!(classroom_threads("7"), "classroom:7:threads");
        assert_eq!(thread_list("7"), "threads:7");
        assert_eq!(material_list("7"), "materials:7");
        assert_eq!(user_profile("42"), "user:42:profile");
        assert_eq!(search_popular(), "search:popular");
        assert_eq!(notification_count("42"), "notifications:42:count");
        assert_eq!(chat_messages("7"), "chat:7:messages");
        assert_eq!(stats("daily"), "stats:daily");
        assert_eq!(dashboard("42"), "dashboard:42");
    }

    #[test]
    fn test_filter_encoding_is_order_independent() {
        let a = classroom_list(&json!({"page": 1, "archived": false}));
        let b = classroom_list(&json!({"archived": false, "page": 1}));
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_filters_produce_distinct_keys() {
        let a = search("rust", &json!({"page": 1}));
        let b = search("rust", &json!({"page": 2}));
        assert_ne!(a, b);
    }
}
