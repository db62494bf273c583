pub mod engine;
pub mod error;
pub mod indicators;
pub mod normalize;
pub mod validation;
pub mod weights;

pub use engine::{score, score_all, score_default, ScoreBreakdown, ScoreResult, TermContribution};
pub use error::ValidationError;
pub use indicators::{IndicatorSet, NormalizedIndicators, INDICATOR_FIELDS, MAX_CLUSTERING_BENEFIT};
pub use normalize::{normalize, normalize_with_max, IndicatorScale};
pub use validation::WeightValidation;
pub use weights::{DemandWeights, FrictionWeights, GrowthWeights, Imbalance, TopWeights, WeightConfig};
