//! Navigator configuration

use serde::{Deserialize, Serialize};

use folio_gesture::DEFAULT_TOUCH_DEBOUNCE_MS;
use folio_storage::Database;
use folio_surface::TransitionKind;
use folio_transition::{DEFAULT_ANIMATION_TIMEOUT_MS, DEFAULT_SWIPE_STEPS};

use crate::Result;

const SETTINGS_KEY: &str = "navigator_config";

/// Which surfaces respond to swipe gestures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeConfig {
    pub page: bool,
    pub modal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Page shown when the location names nothing. Falls back to the
    /// registry's first page.
    pub default_identifier: Option<String>,
    pub default_page_transition: TransitionKind,
    pub default_modal_transition: TransitionKind,
    /// Keep a shadow of the host history and correct it
    pub history_managed: bool,
    /// Revisiting a stacked page collapses history back to it
    pub history_unique: bool,
    /// Seat the default page beneath a deep link on first load
    pub default_page_firstly: bool,
    #[serde(rename = "swipeEnabled")]
    pub swipe: SwipeConfig,
    pub animation_timeout_ms: u32,
    pub swipe_steps: u32,
    pub touch_debounce_ms: u32,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Load the persisted configuration, or the default if none was saved
    pub fn load(db: &Database) -> Result<Self> {
        match db.get_setting(SETTINGS_KEY)? {
            Some(json) => Self::from_json(&json),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, db: &Database) -> Result<()> {
        db.set_setting(SETTINGS_KEY, &self.to_json()?)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_identifier: None,
            default_page_transition: TransitionKind::Fade,
            default_modal_transition: TransitionKind::Fade,
            history_managed: true,
            history_unique: false,
            default_page_firstly: false,
            swipe: SwipeConfig::default(),
            animation_timeout_ms: DEFAULT_ANIMATION_TIMEOUT_MS,
            swipe_steps: DEFAULT_SWIPE_STEPS,
            touch_debounce_ms: DEFAULT_TOUCH_DEBOUNCE_MS,
        }
    }
}
