use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Where a plugin stands in [`crate::AppContext::use_plugin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginState {
    /// Known by name only; never offered to a context.
    Registered,
    Installing,
    Installed,
    Failed,
}

/// One recorded state change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleEvent {
    pub plugin: String,
    pub from: PluginState,
    pub to: PluginState,
    pub at: DateTime<Utc>,
    pub error: Option<String>,
}

/// Install history of the plugins offered to one context, keyed by plugin
/// name in first-offered order.
#[derive(Debug, Clone, Default)]
pub struct LifecycleTracker {
    current: IndexMap<String, PluginState>,
    history: Vec<LifecycleEvent>,
}

impl LifecycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transition(&mut self, plugin: &str, to: PluginState) {
        self.push(plugin, to, None);
    }

    pub fn fail(&mut self, plugin: &str, error: String) {
        self.push(plugin, PluginState::Failed, Some(error));
    }

    fn push(&mut self, plugin: &str, to: PluginState, error: Option<String>) {
        let from = self
            .current
            .insert(plugin.to_string(), to)
            .unwrap_or(PluginState::Registered);
        self.history.push(LifecycleEvent {
            plugin: plugin.to_string(),
            from,
            to,
            at: Utc::now(),
            error,
        });
    }

    pub fn state_of(&self, plugin: &str) -> PluginState {
        self.current
            .get(plugin)
            .copied()
            .unwrap_or(PluginState::Registered)
    }

    pub fn is_installed(&self, plugin: &str) -> bool {
        self.state_of(plugin) == PluginState::Installed
    }

    pub fn events_for(&self, plugin: &str) -> Vec<&LifecycleEvent> {
        self.history.iter().filter(|e| e.plugin == plugin).collect()
    }

    /// Installed plugin names, in the order they were first offered.
    pub fn installed_plugins(&self) -> Vec<&str> {
        self.current
            .iter()
            .filter(|(_, state)| **state == PluginState::Installed)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_unknown_plugin_is_only_registered() {
        let tracker = LifecycleTracker::new();
        assert_eq!(tracker.state_of("toaster"), PluginState::Registered);
        assert!(tracker.events_for("toaster").is_empty());
        assert!(tracker.installed_plugins().is_empty());
    }

    #[test]
    fn test_install_history_chains_states() {
        let mut tracker = LifecycleTracker::new();
        tracker.transition("toaster", PluginState::Installing);
        tracker.transition("toaster", PluginState::Installed);

        let steps: Vec<(PluginState, PluginState)> = tracker
            .events_for("toaster")
            .iter()
            .map(|e| (e.from, e.to))
            .collect();
        assert_eq!(
            steps,
            vec![
                (PluginState::Registered, PluginState::Installing),
                (PluginState::Installing, PluginState::Installed),
            ]
        );
        let events = tracker.events_for("toaster");
        assert!(events[0].at <= events[1].at);
    }

    #[test]
    fn test_failure_keeps_message_and_blocks_installed() {
        let mut tracker = LifecycleTracker::new();
        tracker.transition("assets:grills", PluginState::Installing);
        tracker.fail("assets:grills", "bundle missing".into());

        assert_eq!(tracker.state_of("assets:grills"), PluginState::Failed);
        assert!(!tracker.is_installed("assets:grills"));
        let last = tracker.events_for("assets:grills")[1];
        assert_eq!(last.from, PluginState::Installing);
        assert_eq!(last.error.as_deref(), Some("bundle missing"));
    }

    #[test]
    fn test_installed_plugins_in_offer_order() {
        let mut tracker = LifecycleTracker::new();
        tracker.transition("toaster", PluginState::Installed);
        tracker.fail("broken", "boom".into());
        tracker.transition("components:components", PluginState::Installed);

        assert_eq!(
            tracker.installed_plugins(),
            vec!["toaster", "components:components"]
        );
    }

    #[test]
    fn test_event_serializes_snake_case_state() {
        let mut tracker = LifecycleTracker::new();
        tracker.transition("toaster", PluginState::Installing);
        let value = serde_json::to_value(tracker.events_for("toaster")[0]).unwrap();

        assert_eq!(value["from"], "registered");
        assert_eq!(value["to"], "installing");
        assert!(value["error"].is_null());
    }
}
