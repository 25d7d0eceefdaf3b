// Core algorithm exports
pub mod content;
pub mod orientation;
pub mod selection;

pub use content::{clamp_limit, normalize_content, ContentError};
pub use orientation::{decode_options, normalize_answers, orientation_gap, orientation_score, AnswerError};
pub use selection::{PartnerSelector, Selection};
