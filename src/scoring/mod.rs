mod metrics;

pub use metrics::{aic, complexity, entropy, k2_log_score, mdl, node_k2_log_score};
