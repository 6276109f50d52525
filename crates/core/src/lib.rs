pub mod compose;
pub mod extract;
pub mod intent;
pub mod models;

pub use compose::{compose_reply, ReplyMessage};
pub use extract::{extract_place, lead_in_rules, LeadInRule};
pub use intent::{classify_intents, normalize_text};
pub use models::*;
