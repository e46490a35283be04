// Recommendation core: catalog → encoder → model → ranker.
// Catalog and model are a versioned pair; see `state::verify_pair`.

pub mod catalog;
pub mod encoder;
pub mod handlers;
pub mod model;
pub mod pipeline;
pub mod ranker;
