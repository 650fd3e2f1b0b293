mod parser;
mod rules;

pub use parser::{TajweedSegment, parse};
pub use rules::{TajweedRule, rule_by_class, rule_by_id, rules};
