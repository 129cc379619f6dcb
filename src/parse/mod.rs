pub mod date;
pub mod idea_parser;

pub use date::{format_default_date, parse_idea_date, today_default_date};
pub use idea_parser::{ParseResult, parse_raw_ideas};
