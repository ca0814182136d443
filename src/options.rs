//! Player settings.

use core::time::Duration;

use serde::{Deserialize, Serialize};

/// Strength of the computer opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Random legal plays; discards keep the best-counting hand.
    #[default]
    Easy,
    /// Mostly heuristic plays with some randomness.
    Medium,
    /// Heuristic plays and strategic discards.
    Hard,
}

/// Settings chosen by the player.
///
/// Use the builder pattern to customize settings:
///
/// ```
/// use cribbage::{Difficulty, Settings};
///
/// let settings = Settings::default()
///     .with_difficulty(Difficulty::Hard)
///     .with_sound_enabled(false)
///     .with_ai_think_time_ms(0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Strength of the computer opponent.
    pub difficulty: Difficulty,
    /// Whether the host plays sounds.
    pub sound_enabled: bool,
    /// Whether the host uses haptic feedback.
    pub haptic_enabled: bool,
    /// Pause before each computer action, in milliseconds.
    pub ai_think_time_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            sound_enabled: true,
            haptic_enabled: true,
            ai_think_time_ms: 1000,
        }
    }
}

impl Settings {
    /// Sets the computer's difficulty.
    ///
    /// # Example
    ///
    /// ```
    /// use cribbage::{Difficulty, Settings};
    ///
    /// let settings = Settings::default().with_difficulty(Difficulty::Medium);
    /// assert_eq!(settings.difficulty, Difficulty::Medium);
    /// ```
    #[must_use]
    pub const fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Sets whether sound is enabled.
    #[must_use]
    pub const fn with_sound_enabled(mut self, enabled: bool) -> Self {
        self.sound_enabled = enabled;
        self
    }

    /// Sets whether haptic feedback is enabled.
    #[must_use]
    pub const fn with_haptic_enabled(mut self, enabled: bool) -> Self {
        self.haptic_enabled = enabled;
        self
    }

    /// Sets the pause before computer actions.
    ///
    /// # Example
    ///
    /// ```
    /// use cribbage::Settings;
    ///
    /// let settings = Settings::default().with_ai_think_time_ms(250);
    /// assert_eq!(settings.ai_think_time().as_millis(), 250);
    /// ```
    #[must_use]
    pub const fn with_ai_think_time_ms(mut self, millis: u64) -> Self {
        self.ai_think_time_ms = millis;
        self
    }

    /// Returns the pause before computer actions.
    #[must_use]
    pub const fn ai_think_time(&self) -> Duration {
        Duration::from_millis(self.ai_think_time_ms)
    }
}
