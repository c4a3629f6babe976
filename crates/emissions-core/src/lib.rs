pub mod aggregation;
pub mod chart;
pub mod config;
pub mod error;
pub mod frame;
pub mod material_resolver;
pub mod measurements;
pub mod outliers;
pub mod outputs;
pub mod pipeline;
pub mod profiling;
pub mod reference;
pub mod schema;
pub mod transform;
