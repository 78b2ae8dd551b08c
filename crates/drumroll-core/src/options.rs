//! Ordered option lists shown by selectors.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// One selectable entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption<V> {
    pub value: V,
    pub label: String,
}

impl<V> SelectOption<V> {
    pub fn new(value: V, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// A non-empty, ordered list of options.
///
/// Values may repeat. Selection is always by index, so duplicates are never ambiguous.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionList<V> {
    items: Vec<SelectOption<V>>,
}

impl<V> OptionList<V> {
    /// Wrap a list of options, refusing an empty one.
    pub fn new(items: Vec<SelectOption<V>>) -> ConfigResult<Self> {
        if items.is_empty() {
            return Err(ConfigError::EmptyOptions);
        }
        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SelectOption<V>> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectOption<V>> {
        self.items.iter()
    }
}

impl<V: PartialEq> OptionList<V> {
    /// Index of the first option holding `value`.
    pub fn position_of(&self, value: &V) -> Option<usize> {
        self.items.iter().position(|option| &option.value == value)
    }
}

impl OptionList<String> {
    /// Build a list whose values are their own labels.
    pub fn from_labels<I, S>(labels: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = labels
            .into_iter()
            .map(|label| {
                let label = label.into();
                SelectOption::new(label.clone(), label)
            })
            .collect();
        Self::new(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rejected() {
        let result = OptionList::<u32>::new(Vec::new());
        assert_eq!(result, Err(ConfigError::EmptyOptions));
    }

    #[test]
    fn test_duplicates_resolve_to_first() {
        let list = OptionList::new(vec![
            SelectOption::new(1, "one"),
            SelectOption::new(2, "two"),
            SelectOption::new(1, "uno"),
        ])
        .unwrap();

        assert_eq!(list.len(), 3);
        assert_eq!(list.position_of(&1), Some(0));
        assert_eq!(list.get(2).map(|o| o.label.as_str()), Some("uno"));
        assert_eq!(list.position_of(&7), None);
    }

    #[test]
    fn test_from_labels() {
        let list = OptionList::from_labels(["Low", "Medium", "High"]).unwrap();
        assert_eq!(list.position_of(&"High".to_string()), Some(2));
        assert!(!list.is_empty());
    }
}
