//! Platform profiles — read-only role lookup for prompt shaping.
//!
//! DESIGN
//! ======
//! The pipeline never talks to the platform's user store directly; it goes
//! through the [`ProfileStore`] trait so the lookup can be swapped out. The
//! shipped implementation is a seeded in-memory map mirroring the demo data
//! set. A missing profile is a valid state (anonymous caller), never an
//! error.

use std::collections::HashMap;

use serde::Serialize;

/// View counts for a developer's active game.
#[derive(Debug, Clone, Serialize)]
pub struct GameViews {
    pub yesterday: u64,
    pub last_7_days: u64,
}

/// Role-tagged profile. Each variant carries only its relevant fields;
/// the anonymous/unknown role is the absence of a profile.
#[derive(Debug, Clone)]
pub enum Profile {
    Developer {
        active_game: Option<String>,
        progress: Option<String>,
        completed_games: Vec<String>,
        views: GameViews,
    },
    Buyer {
        favourite_game: Option<String>,
        budget: Option<String>,
        completed_games: Vec<String>,
    },
}

/// Read-only profile lookup by opaque user id.
pub trait ProfileStore: Send + Sync {
    fn profile_of(&self, user_id: &str) -> Option<Profile>;
}

// =============================================================================
// SEEDED STORE
// =============================================================================

/// In-memory profile store seeded with the platform demo accounts.
pub struct SeededProfiles {
    profiles: HashMap<String, Profile>,
}

impl SeededProfiles {
    #[must_use]
    pub fn platform_demo() -> Self {
        let mut profiles = HashMap::new();
        profiles.insert(
            "dev_user".to_string(),
            Profile::Developer {
                active_game: Some("SkyRunner".to_string()),
                progress: Some("40%".to_string()),
                completed_games: vec!["StarQuest".to_string(), "MoonLander".to_string()],
                views: GameViews { yesterday: 23, last_7_days: 150 },
            },
        );
        profiles.insert(
            "dev_user_2".to_string(),
            Profile::Developer {
                active_game: Some("Dragon Quest".to_string()),
                progress: Some("75%".to_string()),
                completed_games: vec!["Pixel Adventure".to_string()],
                views: GameViews { yesterday: 0, last_7_days: 5 },
            },
        );
        profiles.insert(
            "buyer_1".to_string(),
            Profile::Buyer {
                favourite_game: Some("Call of Duty".to_string()),
                budget: Some("900".to_string()),
                completed_games: vec!["Indie Cat".to_string(), "Space Explorer".to_string()],
            },
        );
        profiles.insert(
            "buyer_2".to_string(),
            Profile::Buyer {
                favourite_game: Some("The Witcher 3".to_string()),
                budget: Some("1200".to_string()),
                completed_games: vec!["Wars of Immortals".to_string(), "Fantasy Land".to_string()],
            },
        );
        Self { profiles }
    }
}

impl ProfileStore for SeededProfiles {
    fn profile_of(&self, user_id: &str) -> Option<Profile> {
        self.profiles.get(user_id).cloned()
    }
}

// =============================================================================
// CONTEXT RENDERING
// =============================================================================

/// Render the `USER_PROFILE` block injected into the assembled prompt.
#[must_use]
pub fn profile_context(profile: Option<&Profile>) -> String {
    match profile {
        None => "No context available for the given user.".to_string(),
        Some(Profile::Developer { active_game, progress, completed_games, .. }) => format!(
            "Developer Profile:\n- Active Game: {}\n- Progress: {}\n- Completed Games: {}\n",
            active_game.as_deref().unwrap_or("Unknown"),
            progress.as_deref().unwrap_or("Unknown"),
            join_or(completed_games, "None"),
        ),
        Some(Profile::Buyer { favourite_game, budget, completed_games }) => format!(
            "Buyer Profile:\n- Favourite Game: {}\n- Budget: ${}\n- Completed Games: {}\n",
            favourite_game.as_deref().unwrap_or("Unknown"),
            budget.as_deref().unwrap_or("Unknown"),
            join_or(completed_games, "None"),
        ),
    }
}

/// Comma-joined list, or a literal placeholder when empty.
pub(crate) fn join_or(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
