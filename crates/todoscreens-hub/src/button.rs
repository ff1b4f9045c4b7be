//! Button events and the press -> action table

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Leftmost hardware button
pub const BUTTON_MASK_1: u8 = 1;
/// Second button
pub const BUTTON_MASK_2: u8 = 2;
/// Third button
pub const BUTTON_MASK_3: u8 = 4;
/// Rightmost button
pub const BUTTON_MASK_4: u8 = 8;
/// Event status for a short press
pub const BUTTON_STATUS_PRESSED: u8 = 0;

/// A button event reported by the hub
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonEvent {
    /// Node the button belongs to
    #[serde(deserialize_with = "node_id")]
    pub node_id: String,
    /// Which button, one of the `BUTTON_MASK_*` bits
    pub button_mask: u8,
    /// Press kind, [`BUTTON_STATUS_PRESSED`] for a short press
    pub status: u8,
}

impl ButtonEvent {
    /// Short press of `button_mask` on `node_id`
    pub fn pressed(node_id: impl Into<String>, button_mask: u8) -> Self {
        Self {
            node_id: node_id.into(),
            button_mask,
            status: BUTTON_STATUS_PRESSED,
        }
    }
}

fn node_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n.to_string(),
        Raw::Text(s) => s,
    })
}

/// What a button press asks the server to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HubAction {
    /// Close the n-th task on screen (1-based)
    Done(u8),
    /// Redraw without changing anything
    Refresh,
}

impl HubAction {
    /// Webhook path for this action, relative to the server root
    pub fn path(&self, token: &str) -> String {
        match self {
            HubAction::Done(n) => format!("update/{token}/done/{n}"),
            HubAction::Refresh => format!("update/{token}"),
        }
    }
}

impl fmt::Display for HubAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HubAction::Done(n) => write!(f, "done-{n}"),
            HubAction::Refresh => f.write_str("refresh"),
        }
    }
}

impl FromStr for HubAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "refresh" {
            return Ok(HubAction::Refresh);
        }
        s.strip_prefix("done-")
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| *n >= 1)
            .map(HubAction::Done)
            .ok_or_else(|| format!("unknown button action {s:?} (expected done-<n> or refresh)"))
    }
}

impl TryFrom<String> for HubAction {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<HubAction> for String {
    fn from(action: HubAction) -> Self {
        action.to_string()
    }
}

/// One row of the button table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// Button bit to match
    pub mask: u8,
    /// Press kind to match, short press when omitted
    #[serde(default)]
    pub status: u8,
    /// Action to fire
    pub action: HubAction,
}

impl Binding {
    /// Bind a short press of `mask` to `action`
    pub fn pressed(mask: u8, action: HubAction) -> Self {
        Self {
            mask,
            status: BUTTON_STATUS_PRESSED,
            action,
        }
    }
}

/// Press -> action table, matched on exact mask and status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonMap {
    bindings: Vec<Binding>,
}

impl Default for ButtonMap {
    /// First three buttons close tasks 1-3, the fourth refreshes
    fn default() -> Self {
        Self::new(vec![
            Binding::pressed(BUTTON_MASK_1, HubAction::Done(1)),
            Binding::pressed(BUTTON_MASK_2, HubAction::Done(2)),
            Binding::pressed(BUTTON_MASK_3, HubAction::Done(3)),
            Binding::pressed(BUTTON_MASK_4, HubAction::Refresh),
        ])
    }
}

impl ButtonMap {
    /// Table with `bindings`; the first match wins
    pub fn new(bindings: Vec<Binding>) -> Self {
        Self { bindings }
    }

    /// Rows in match order
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// The action bound to `event`, if any
    pub fn resolve(&self, event: &ButtonEvent) -> Option<HubAction> {
        self.bindings
            .iter()
            .find(|b| b.mask == event.button_mask && b.status == event.status)
            .map(|b| b.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_map() {
        let map = ButtonMap::default();
        let resolve = |mask| map.resolve(&ButtonEvent::pressed("n", mask));
        assert_eq!(resolve(1), Some(HubAction::Done(1)));
        assert_eq!(resolve(2), Some(HubAction::Done(2)));
        assert_eq!(resolve(4), Some(HubAction::Done(3)));
        assert_eq!(resolve(8), Some(HubAction::Refresh));
        assert_eq!(resolve(3), None);
        assert_eq!(resolve(16), None);
    }

    #[test]
    fn test_release_is_ignored() {
        let map = ButtonMap::default();
        let released = ButtonEvent {
            node_id: "n".to_string(),
            button_mask: BUTTON_MASK_1,
            status: 1,
        };
        assert_eq!(map.resolve(&released), None);
    }

    #[test]
    fn test_event_decodes_numeric_node_id() {
        let event: ButtonEvent =
            serde_json::from_str(r#"{"nodeId": 4660, "buttonMask": 8, "status": 0}"#).unwrap();
        assert_eq!(event, ButtonEvent::pressed("4660", BUTTON_MASK_4));
    }

    #[test]
    fn test_action_paths() {
        assert_eq!(HubAction::Refresh.path("tok"), "update/tok");
        assert_eq!(HubAction::Done(2).path("tok"), "update/tok/done/2");
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!("done-3".parse::<HubAction>(), Ok(HubAction::Done(3)));
        assert_eq!("refresh".parse::<HubAction>(), Ok(HubAction::Refresh));
        assert!("done-0".parse::<HubAction>().is_err());
        assert!("done".parse::<HubAction>().is_err());
        assert!("reboot".parse::<HubAction>().is_err());
    }
}
