//! ## flodvakt-core::scenario
//! **Scenario taxonomy and the registry of per-scenario generation parameters**
//!
//! Every `Scenario` owns exactly one `ScenarioProfile`. The profiles live in a
//! fixed array indexed by discriminant, so lookup is a bounds-checked index and
//! a missing entry is impossible by construction.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Traffic scenario driving the shape and cadence of emitted events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Scenario {
    #[default]
    Normal = 0,
    Ddos = 1,
    Scan = 2,
    Sqli = 3,
    Mitm = 4,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::Normal,
        Scenario::Ddos,
        Scenario::Scan,
        Scenario::Sqli,
        Scenario::Mitm,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`Scenario::index`].
    #[inline]
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Wire identifier, as accepted by `SET_MODE`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Scenario::Normal => "NORMAL",
            Scenario::Ddos => "DDOS",
            Scenario::Scan => "SCAN",
            Scenario::Sqli => "SQLI",
            Scenario::Mitm => "MITM",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = CoreError;

    /// Exact, case-sensitive match against the five identifiers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scenario| scenario.as_str() == s)
            .ok_or_else(|| CoreError::UnknownScenario(s.to_string()))
    }
}

/// Second label/color pair picked by a weighted coin flip.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelBranch {
    /// Probability of keeping the profile's primary labels.
    pub primary_probability: f64,
    pub alternate_kind: &'static str,
    pub alternate_color: &'static str,
}

/// Presentation metadata and emission cadence for one scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioProfile {
    pub scenario: Scenario,
    pub src: &'static str,
    pub dst: &'static str,
    pub kind: &'static str,
    pub flags: &'static str,
    pub color: &'static str,
    pub interval: Duration,
    pub branch: Option<LabelBranch>,
}

/// Tunable registry data. Defaults reproduce the stock cadence.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrySettings {
    /// Emission interval while a flood is running.
    pub fast_interval: Duration,
    /// Emission interval for every other scenario.
    pub slow_interval: Duration,
    /// Chance that a `NORMAL` event is TCP rather than UDP.
    pub normal_tcp_probability: f64,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            fast_interval: Duration::from_millis(100),
            slow_interval: Duration::from_millis(500),
            normal_tcp_probability: 0.7,
        }
    }
}

/// Immutable lookup table from scenario to profile.
#[derive(Debug, Clone)]
pub struct ScenarioRegistry {
    profiles: [ScenarioProfile; 5],
}

impl Default for ScenarioRegistry {
    fn default() -> Self {
        Self::build(&RegistrySettings::default())
    }
}

impl ScenarioRegistry {
    /// Builds the registry, rejecting settings the synthesizer cannot honor.
    pub fn new(settings: RegistrySettings) -> Result<Self, CoreError> {
        if !(0.0..=1.0).contains(&settings.normal_tcp_probability) {
            return Err(CoreError::InvalidSettings(format!(
                "normal_tcp_probability must be within [0, 1], got {}",
                settings.normal_tcp_probability
            )));
        }
        if settings.fast_interval.is_zero() || settings.slow_interval.is_zero() {
            return Err(CoreError::InvalidSettings(
                "emission intervals must be non-zero".into(),
            ));
        }
        Ok(Self::build(&settings))
    }

    fn build(settings: &RegistrySettings) -> Self {
        let slow = settings.slow_interval;
        Self {
            profiles: [
                ScenarioProfile {
                    scenario: Scenario::Normal,
                    src: "My PC",
                    dst: "Router",
                    kind: "TCP",
                    flags: "A",
                    color: "cyan",
                    interval: slow,
                    branch: Some(LabelBranch {
                        primary_probability: settings.normal_tcp_probability,
                        alternate_kind: "UDP",
                        alternate_color: "orange",
                    }),
                },
                ScenarioProfile {
                    scenario: Scenario::Ddos,
                    src: "Hacker",
                    dst: "Server",
                    kind: "UDP",
                    flags: "A",
                    color: "red",
                    interval: settings.fast_interval,
                    branch: None,
                },
                ScenarioProfile {
                    scenario: Scenario::Scan,
                    src: "Hacker",
                    dst: "My PC",
                    kind: "TCP (SYN)",
                    flags: "S",
                    color: "purple",
                    interval: slow,
                    branch: None,
                },
                ScenarioProfile {
                    scenario: Scenario::Sqli,
                    src: "Hacker",
                    dst: "Server",
                    kind: "HTTP (Malicious)",
                    flags: "A",
                    color: "yellow",
                    interval: slow,
                    branch: None,
                },
                ScenarioProfile {
                    scenario: Scenario::Mitm,
                    src: "My PC",
                    dst: "Hacker",
                    kind: "HTTPS (Intercepted)",
                    flags: "A",
                    color: "magenta",
                    interval: slow,
                    branch: None,
                },
            ],
        }
    }

    #[inline]
    pub fn profile(&self, scenario: Scenario) -> &ScenarioProfile {
        &self.profiles[scenario.index()]
    }

    #[inline]
    pub fn interval(&self, scenario: Scenario) -> Duration {
        self.profile(scenario).interval
    }
}
