//! Update directive translation.
//!
//! An [`Update`] collects per-attribute changes in four categories and
//! renders them into DynamoDB's legacy `AttributeUpdates` vocabulary:
//! `set` → PUT, `push` → ADD, `pop` → DELETE with a value (set-element
//! removal, counter decrement), `unset` → DELETE without a value (attribute
//! removal).

use aws_sdk_dynamodb::types::{AttributeAction, AttributeValue, AttributeValueUpdate};
use std::collections::HashMap;

/// A typed update directive.
///
/// When the same attribute appears in more than one category, the last
/// category in the order [set, push, pop, unset] wins.
///
/// # Examples
///
/// ```
/// use aws_sdk_dynamodb::types::AttributeValue;
/// use dynotable::Update;
///
/// let update = Update::new()
///     .set("name", AttributeValue::S("alice".into()))
///     .push("logins", AttributeValue::N("1".into()))
///     .unset("invite_code");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Update {
    set: Vec<(String, AttributeValue)>,
    push: Vec<(String, AttributeValue)>,
    pop: Vec<(String, AttributeValue)>,
    unset: Vec<String>,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the attribute with `value`.
    pub fn set(mut self, attribute: impl Into<String>, value: AttributeValue) -> Self {
        self.set.push((attribute.into(), value));
        self
    }

    /// Append to a set or increment a number (ADD semantics).
    pub fn push(mut self, attribute: impl Into<String>, value: AttributeValue) -> Self {
        self.push.push((attribute.into(), value));
        self
    }

    /// Remove elements from a set or decrement via a negative ADD complement
    /// (DELETE-with-value semantics).
    pub fn pop(mut self, attribute: impl Into<String>, value: AttributeValue) -> Self {
        self.pop.push((attribute.into(), value));
        self
    }

    /// Remove the attribute entirely.
    pub fn unset(mut self, attribute: impl Into<String>) -> Self {
        self.unset.push(attribute.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.push.is_empty() && self.pop.is_empty() && self.unset.is_empty()
    }

    /// Render the directive into per-attribute actions. Categories are
    /// applied in order [set, push, pop, unset], later entries overwriting
    /// earlier ones for the same attribute.
    pub fn into_actions(self) -> HashMap<String, AttributeValueUpdate> {
        let mut actions = HashMap::new();

        for (attribute, value) in self.set {
            actions.insert(
                attribute,
                AttributeValueUpdate::builder()
                    .action(AttributeAction::Put)
                    .value(value)
                    .build(),
            );
        }
        for (attribute, value) in self.push {
            actions.insert(
                attribute,
                AttributeValueUpdate::builder()
                    .action(AttributeAction::Add)
                    .value(value)
                    .build(),
            );
        }
        for (attribute, value) in self.pop {
            actions.insert(
                attribute,
                AttributeValueUpdate::builder()
                    .action(AttributeAction::Delete)
                    .value(value)
                    .build(),
            );
        }
        for attribute in self.unset {
            actions.insert(
                attribute,
                AttributeValueUpdate::builder()
                    .action(AttributeAction::Delete)
                    .build(),
            );
        }

        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: &str) -> AttributeValue {
        AttributeValue::N(v.to_string())
    }

    #[test]
    fn four_categories_map_to_put_add_delete() {
        let actions = Update::new()
            .set("a", n("1"))
            .push("b", n("2"))
            .pop("c", n("3"))
            .unset("d")
            .into_actions();

        assert_eq!(actions.len(), 4);

        let a = &actions["a"];
        assert_eq!(a.action(), Some(&AttributeAction::Put));
        assert_eq!(a.value(), Some(&n("1")));

        let b = &actions["b"];
        assert_eq!(b.action(), Some(&AttributeAction::Add));
        assert_eq!(b.value(), Some(&n("2")));

        let c = &actions["c"];
        assert_eq!(c.action(), Some(&AttributeAction::Delete));
        assert_eq!(c.value(), Some(&n("3")));

        let d = &actions["d"];
        assert_eq!(d.action(), Some(&AttributeAction::Delete));
        assert_eq!(d.value(), None);
    }

    #[test]
    fn later_category_wins_for_same_attribute() {
        let actions = Update::new()
            .set("x", n("1"))
            .push("x", n("2"))
            .into_actions();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions["x"].action(), Some(&AttributeAction::Add));
        assert_eq!(actions["x"].value(), Some(&n("2")));

        let actions = Update::new()
            .set("x", n("1"))
            .unset("x")
            .into_actions();
        assert_eq!(actions["x"].action(), Some(&AttributeAction::Delete));
        assert_eq!(actions["x"].value(), None);

        // unset beats pop regardless of builder call order
        let actions = Update::new()
            .unset("x")
            .pop("x", n("9"))
            .into_actions();
        assert_eq!(actions["x"].action(), Some(&AttributeAction::Delete));
        assert_eq!(actions["x"].value(), None);
    }

    #[test]
    fn empty_directive() {
        let update = Update::new();
        assert!(update.is_empty());
        assert!(update.into_actions().is_empty());

        assert!(!Update::new().unset("gone").is_empty());
    }
}
