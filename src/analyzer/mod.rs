//! Analysis engine for determining the release bump from pull request labels

pub mod label_classifier;

pub use label_classifier::{Classification, LabelClassifier};
