pub mod aggregator;
pub mod calculators;
pub mod tokenize;

pub use aggregator::*;
pub use calculators::*;
pub use tokenize::*;
