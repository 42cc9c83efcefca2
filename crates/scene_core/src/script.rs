//! The librarian's hardcoded lines, and the one piece of free-text matching
//! the scene performs.

pub const DEFAULT_PROMPT: &str = "What can I do for you?";

pub const OTHER_PROMPT: &str = "What would you like me to help you with?";

pub const BUSY_MESSAGE: &str = "Making coffee for you...";

pub const COFFEE_FOLLOW_UP: &str = "Here's your coffee. In fact, it's been so many years since anyone has been here that I can't even remember how long it's been. My database has suffered severe damage, and this is the only three things I can still do.";

pub const REJECTION: &str = "Sorry, I can't do it.";

pub const SCOLDING: &str = "This email contains assignments submitted by students, and you are not allowed to look at them.";

pub const INTRODUCTION: &str = "Welcome to our historic library! This magnificent institution was established in 1892 and has served as a beacon of knowledge for over a century. Our collection houses over 500,000 volumes, including rare manuscripts and first editions. The building itself is a masterpiece of Victorian architecture, featuring beautiful stained glass windows and ornate reading rooms that have inspired countless scholars and students throughout the years.";

pub const INTRODUCTION_PLACEHOLDER: &str = "Loading introduction...";

/// Where the back button leads.
pub const BACK_URL: &str = "https://chat.qwen.ai";

/// Case-insensitive substring test; no further validation is performed.
pub fn mentions_coffee(text: &str) -> bool {
    text.to_lowercase().contains("coffee")
}
