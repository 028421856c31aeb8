//! # Data Module
//!
//! Container of labeled examples that feeds a training loop.
//!
//! ## Key Components
//!
//! - [`DataSet`]: index-aligned feature and label columns plus shared encoders
//! - [`NextBatch`]: lazy batch iterator with on-the-fly one-hot encoding
//! - [`SplitSampler`]: splits indices into chunks of near-equal length
//!
//! ## Example
//!
//! ```ignore
//! use onehot_dataset::data::{BatchOptions, DataSet};
//! use onehot_dataset::diagnostics::LogReporter;
//!
//! let dataset = DataSet::new(features, labels, "train").with_encoders(chars, spaces);
//!
//! let options = BatchOptions::new().batch_size(32);
//! for batch in dataset.next_batch(&options, &LogReporter)? {
//!     let encoded = batch?.into_one_hot();
//!     // Train on batch
//! }
//! ```

pub mod batch;
pub mod dataset;
pub mod sampler;

pub use batch::{Batch, BatchOptions, NextBatch};
pub use dataset::{Column, ColumnView, DataSet, DataSetBuilder, DataSetError};
pub use sampler::SplitSampler;
