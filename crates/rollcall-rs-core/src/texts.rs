//! User-facing message strings.

pub const PROMPT_SCHOOL: &str = "Which school do you study at?";
pub const PROMPT_GRADE: &str = "Which grade are you in?";
pub const PROMPT_FULL_NAME: &str = "Enter your first and last name:";
pub const PROMPT_PHONE: &str = "Share your phone number with the button below.";

pub const CONTACT_BUTTON: &str = "📱 Share phone number";

pub const GATE_PROMPT: &str = "❗ To use this bot, join the channel(s) below first:";
pub const GATE_RECHECK_LABEL: &str = "✅ I've joined, check again";
pub const GATE_STILL_MISSING: &str = "❌ You haven't joined yet.";
pub const GATE_CONFIRMED: &str = "✅ Subscription confirmed!";

pub const SAVED: &str = "✅ Your details have been recorded. Good luck! 🍀";
pub const SAVE_FAILED: &str =
    "⚠️ We couldn't save your details. Press the button to try again.";
pub const RETRY_LABEL: &str = "🔁 Try again";

pub const USE_START: &str = "Send /start to begin.";
