/*!
 * Settings Types
 * Tunables governing automatic collection
 */

use crate::core::errors::{GcError, GcResult};
use crate::core::limits::{
    DEFAULT_CPU_LIMIT_PERCENT, DEFAULT_MEMORY_THRESHOLD_PERCENT, DEFAULT_TIME_INTERVAL_MINUTES,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Collection priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CollectionPriority {
    #[default]
    Balanced,
    Speed,
    Memory,
}

impl CollectionPriority {
    /// Parse a client-supplied name; anything unrecognized is balanced
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "speed" => Self::Speed,
            "memory" => Self::Memory,
            _ => Self::Balanced,
        }
    }

    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::Speed => "speed",
            Self::Memory => "memory",
        }
    }
}

impl Serialize for CollectionPriority {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CollectionPriority {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Any JSON value is accepted; only the two known names are honored
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(value.as_str().map(Self::from_name).unwrap_or_default())
    }
}

/// GC settings
///
/// Field names on the wire follow the dashboard's settings form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcSettings {
    pub auto_collection: bool,
    #[serde(rename = "memoryThreshold")]
    pub memory_threshold_percent: u32,
    #[serde(rename = "timeInterval")]
    pub time_interval_minutes: u32,
    pub background_collection: bool,
    #[serde(rename = "cpuLimit")]
    pub cpu_limit_percent: u32,
    #[serde(default)]
    pub collection_priority: CollectionPriority,
}

impl Default for GcSettings {
    fn default() -> Self {
        Self {
            auto_collection: true,
            memory_threshold_percent: DEFAULT_MEMORY_THRESHOLD_PERCENT as u32,
            time_interval_minutes: DEFAULT_TIME_INTERVAL_MINUTES,
            background_collection: true,
            cpu_limit_percent: DEFAULT_CPU_LIMIT_PERCENT as u32,
            collection_priority: CollectionPriority::Balanced,
        }
    }
}

impl GcSettings {
    pub fn validate(&self) -> GcResult<()> {
        if self.memory_threshold_percent > 100 {
            return Err(GcError::InvalidSettings(format!(
                "memory threshold {}% must be between 0 and 100",
                self.memory_threshold_percent
            )));
        }
        if self.time_interval_minutes == 0 {
            return Err(GcError::InvalidSettings(
                "time interval must be at least 1 minute".to_string(),
            ));
        }
        if self.cpu_limit_percent > 100 {
            return Err(GcError::InvalidSettings(format!(
                "cpu limit {}% must be between 0 and 100",
                self.cpu_limit_percent
            )));
        }
        Ok(())
    }

    pub fn with_auto_collection(mut self, enabled: bool) -> Self {
        self.auto_collection = enabled;
        self
    }

    pub fn with_memory_threshold(mut self, percent: u32) -> Self {
        self.memory_threshold_percent = percent;
        self
    }

    pub fn with_time_interval(mut self, minutes: u32) -> Self {
        self.time_interval_minutes = minutes;
        self
    }

    pub fn with_background_collection(mut self, enabled: bool) -> Self {
        self.background_collection = enabled;
        self
    }

    pub fn with_cpu_limit(mut self, percent: u32) -> Self {
        self.cpu_limit_percent = percent;
        self
    }

    pub fn with_priority(mut self, priority: CollectionPriority) -> Self {
        self.collection_priority = priority;
        self
    }
}
