pub mod bleu;
pub mod meteor;
pub mod rouge;

pub use bleu::*;
pub use meteor::*;
pub use rouge::*;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricOutput {
    pub score: Decimal,
    pub metadata: serde_json::Value,
}
