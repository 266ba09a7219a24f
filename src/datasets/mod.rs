mod dataset;

pub use dataset::Dataset;
