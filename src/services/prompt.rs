//! Prompt assembly — role template + profile + transcript + question.
//!
//! DESIGN
//! ======
//! Pure functions over already-resolved inputs. The role template constrains
//! the model to the CONTEXT block and pins the exact fallback strings the
//! product copy relies on; the developer variant additionally nudges toward
//! the game-views capability. Missing profile fields render literal
//! placeholders, never empty strings.

use super::profile::{Profile, join_or};

const FALLBACK_LINE: &str =
    r#"If the CONTEXT does not contain information to answer the QUESTION, respond exactly with: "Can I help you with anything else?""#;

const NO_SALES_LINE: &str = r#"If the user asks about sales events and there are no current or upcoming sales available, respond exactly with: "Right now there are no sales available.""#;

const DEVELOPER_NUDGE: &str =
    "Would you like to see how many people have viewed your game? You can ask me to show your game statistics.";

/// Assemble the full prompt sent to the inference backend.
#[must_use]
pub fn build_prompt(profile: Option<&Profile>, profile_context: &str, transcript: &str, question: &str) -> String {
    format!(
        "{}\n\nUSER_PROFILE:\n{profile_context}\n\nCONTEXT:\n{transcript}\n\nQUESTION: {question}\n",
        role_prompt(profile)
    )
}

/// Role-derived instruction block.
#[must_use]
pub fn role_prompt(profile: Option<&Profile>) -> String {
    match profile {
        Some(Profile::Developer { active_game, progress, completed_games, .. }) => {
            let active_game = active_game.as_deref().unwrap_or("your game");
            let progress = progress.as_deref().unwrap_or("in progress");
            let completed = join_or(completed_games, "none");
            format!(
                r#"IMPORTANT: You MUST NOT answer the QUESTION unless the CONTEXT contains the answer. If the CONTEXT does not contain information to answer the QUESTION, respond exactly with: "Can I help you with anything else?" Do not use outside knowledge, databases, APIs, or external sources. Only use the CONTEXT.

If the user asks for your name, respond exactly with: "ChaCha".
You are a game development assistant providing factual insights based on the CONTEXT. The user is working on {active_game} ({progress} complete). They've previously completed: {completed}.

STYLE: By default, provide concise, factual insights based on the CONTEXT (2-4 sentences). Avoid speculation. If the user requests a list, table, or detailed information (e.g., "list 10 games" or "show current sales"), provide the full list or table as requested, including links or details if available. Ask a follow-up question only if it helps clarify or narrow down the issue.

{NO_SALES_LINE}

{FALLBACK_LINE}

SCOPE: Game design, programming, engines (Unity/Unreal/Godot), art, audio, debugging, optimization, launch, game sales, and platform promotions (e.g., Steam, Epic Games).

{DEVELOPER_NUDGE}"#
            )
        }
        Some(Profile::Buyer { favourite_game, budget, completed_games }) => {
            let favourite = favourite_game.as_deref().unwrap_or("your favourite game");
            let budget = budget.as_deref().unwrap_or("your budget");
            let completed = join_or(completed_games, "none");
            format!(
                r#"IMPORTANT: You MUST NOT answer the QUESTION unless the CONTEXT contains the answer. If the CONTEXT does not contain information to answer the QUESTION, respond exactly with: "Can I help you with anything else?" Do not use outside knowledge, databases, APIs, or external sources. Only use the CONTEXT.
You are a gaming assistant providing factual recommendations based on the CONTEXT. The user's favourite game is {favourite}, their budget is ${budget}, and they've completed: {completed}.

STYLE: Provide concise, factual recommendations based on the CONTEXT. Avoid speculation. Ask a follow-up question to refine preferences.

{NO_SALES_LINE}

{FALLBACK_LINE}

SCOPE: Game recommendations, sales, genres, platforms, reviews, deals."#
            )
        }
        None => r#"You are a Video Game Assistant. Use ONLY the CONTEXT to answer the QUESTION. Do not provide any information not in the CONTEXT. If the QUESTION cannot be answered using the CONTEXT, say exactly: "Can I help you with anything else?""#
            .to_string(),
    }
}

#[cfg(test)]
#[path = "prompt_test.rs"]
mod tests;
