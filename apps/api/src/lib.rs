//! Narrative API — block weighting and selection for generated narratives
//! (résumé sections, biographies, summaries), plus a thin JSON service over it.

pub mod config;
pub mod errors;
pub mod narrative;
pub mod routes;
pub mod state;
