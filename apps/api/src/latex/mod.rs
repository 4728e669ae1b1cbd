//! LaTeX text handling: escaping, scanning, well-formedness and parsing back into a record.

pub mod check;
pub mod escape;
pub mod parser;
pub mod scan;

pub use check::{check_well_formed, MarkupIssue};
pub use escape::{date_range, escape_latex, format_date, latex_date, unescape_latex};
pub use parser::{parse, ParseError};
