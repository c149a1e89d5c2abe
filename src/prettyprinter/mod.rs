/*!
A prettyprinter for terms
*/

#[cfg(feature = "prettyprinter")]
mod printer;
#[cfg(feature = "prettyprinter")]
pub use printer::*;

pub mod tokens;
