// Domain layer - Parameters, segments and submission state

pub mod errors;
pub mod model;
pub mod rules;
