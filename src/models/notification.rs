use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    Default,
    Destructive,
}

/// A user-visible toast reporting the outcome of a list mutation
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    fn new(title: &str, description: String, variant: NotificationVariant) -> Self {
        Self {
            title: title.to_string(),
            description,
            variant,
        }
    }

    pub fn sign_in_required() -> Self {
        Self::new(
            "Sign in required",
            "Please sign in to add items to your list.".to_string(),
            NotificationVariant::Destructive,
        )
    }

    pub fn added(title: &str) -> Self {
        Self::new(
            "Added to My List",
            format!("{} has been added to your list.", title),
            NotificationVariant::Default,
        )
    }

    pub fn add_failed() -> Self {
        Self::new(
            "Error",
            "Failed to add item to your list.".to_string(),
            NotificationVariant::Destructive,
        )
    }

    pub fn removed() -> Self {
        Self::new(
            "Removed from My List",
            "Item has been removed from your list.".to_string(),
            NotificationVariant::Default,
        )
    }

    pub fn remove_failed() -> Self {
        Self::new(
            "Error",
            "Failed to remove item from your list.".to_string(),
            NotificationVariant::Destructive,
        )
    }

    pub fn is_error(&self) -> bool {
        self.variant == NotificationVariant::Destructive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_added_mentions_title() {
        let n = Notification::added("Inception");
        assert_eq!(n.description, "Inception has been added to your list.");
        assert!(!n.is_error());
    }

    #[test]
    fn test_failures_are_destructive() {
        assert!(Notification::add_failed().is_error());
        assert!(Notification::remove_failed().is_error());
        assert!(Notification::sign_in_required().is_error());
    }

    #[test]
    fn test_variant_serialization() {
        let json = serde_json::to_value(Notification::removed()).unwrap();
        assert_eq!(json["variant"], "default");
    }
}
