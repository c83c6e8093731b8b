use serde::{Deserialize, Serialize};
use std::fmt;

/// The selection fields whose options come from the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Service,
    Master,
    Time,
}

impl FieldKind {
    /// Leading "choose one" option; the time field lists its slots bare.
    pub fn prompt(&self) -> Option<&'static str> {
        match self {
            FieldKind::Service => Some("Select a service"),
            FieldKind::Master => Some("Select a master"),
            FieldKind::Time => None,
        }
    }

    pub fn empty_label(&self) -> &'static str {
        match self {
            FieldKind::Service => "No services available",
            FieldKind::Master => "No masters available",
            FieldKind::Time => "No available slots",
        }
    }

    pub fn error_label(&self) -> &'static str {
        match self {
            FieldKind::Service => "Failed to load services",
            FieldKind::Master => "Failed to load masters",
            FieldKind::Time => "Failed to load slots",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldKind::Service => "services",
            FieldKind::Master => "masters",
            FieldKind::Time => "slots",
        })
    }
}

/// Idle -> Loading -> Populated | Empty | Errored, tracked per field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "options", rename_all = "snake_case")]
pub enum FieldState<T> {
    Idle,
    Loading,
    Populated(Vec<T>),
    Empty,
    Errored,
}

impl<T> Default for FieldState<T> {
    fn default() -> Self {
        FieldState::Idle
    }
}

impl<T> FieldState<T> {
    pub fn from_options(options: Vec<T>) -> Self {
        if options.is_empty() {
            FieldState::Empty
        } else {
            FieldState::Populated(options)
        }
    }

    pub fn options(&self) -> &[T] {
        match self {
            FieldState::Populated(options) => options,
            _ => &[],
        }
    }

    /// Drives the field's spinner.
    pub fn is_loading(&self) -> bool {
        matches!(self, FieldState::Loading)
    }

    /// Text of the disabled first option, if the field shows one.
    pub fn placeholder(&self, kind: FieldKind) -> Option<&'static str> {
        match self {
            FieldState::Idle | FieldState::Loading => None,
            FieldState::Populated(_) => kind.prompt(),
            FieldState::Empty => Some(kind.empty_label()),
            FieldState::Errored => Some(kind.error_label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_options_become_empty_state() {
        let state: FieldState<String> = FieldState::from_options(vec![]);
        assert_eq!(state, FieldState::Empty);
        assert_eq!(state.placeholder(FieldKind::Master), Some("No masters available"));
        assert!(state.options().is_empty());
    }

    #[test]
    fn test_placeholders_per_state() {
        let populated = FieldState::from_options(vec!["10:00".to_string()]);
        assert_eq!(populated.placeholder(FieldKind::Time), None);
        assert_eq!(populated.placeholder(FieldKind::Service), Some("Select a service"));

        let errored: FieldState<String> = FieldState::Errored;
        assert_eq!(errored.placeholder(FieldKind::Time), Some("Failed to load slots"));

        let loading: FieldState<String> = FieldState::Loading;
        assert!(loading.is_loading());
        assert_eq!(loading.placeholder(FieldKind::Service), None);
    }

    #[test]
    fn test_serialized_shape() {
        let state = FieldState::from_options(vec!["10:00".to_string()]);
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            serde_json::json!({"state": "populated", "options": ["10:00"]})
        );
        let idle: FieldState<String> = FieldState::Idle;
        assert_eq!(serde_json::to_value(&idle).unwrap(), serde_json::json!({"state": "idle"}));
    }
}
