//! # onehot-dataset: Labeled Data Container for Training Loops
//!
//! **onehot-dataset** keeps index-aligned features and labels, hands them out
//! in batches (with on-the-fly one-hot encoding) and persists them to disk as a
//! stream of values, optionally gzip-compressed.
//!
//! ## Usage Example
//!
//! ```no_run
//! use ndarray::{arr1, Array1};
//! use onehot_dataset::data::{BatchOptions, DataSet};
//! use onehot_dataset::diagnostics::LogReporter;
//! use onehot_dataset::encoding::VectorEncoder;
//! use onehot_dataset::serialization::PersistOptions;
//! use serde::{Deserialize, Serialize};
//! use std::sync::Arc;
//!
//! #[derive(Serialize, Deserialize)]
//! struct Digits;
//!
//! impl VectorEncoder<u8> for Digits {
//!     fn to_vectors(&self, item: &u8) -> Vec<Array1<i32>> {
//!         vec![self.to_vector(item)]
//!     }
//!
//!     fn to_vector(&self, item: &u8) -> Array1<i32> {
//!         let mut v = Array1::zeros(10);
//!         v[*item as usize % 10] = 1;
//!         v
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let encoder = Arc::new(Digits);
//! let dataset = DataSet::new(arr1(&[1u8, 2, 3]), arr1(&[0u8, 1, 0]), "digits")
//!     .with_encoders(encoder.clone(), encoder);
//!
//! // 1. Batches of two examples, each encoded when it is pulled
//! for batch in dataset.next_batch(&BatchOptions::new().batch_size(2), &LogReporter)? {
//!     let batch = batch?;
//!     println!("batch of {}", batch.len());
//! }
//!
//! // 2. Save to disk
//! dataset.save("digits.dataset.gz", &PersistOptions::for_path("digits.dataset.gz"), &LogReporter)?;
//! # Ok(())
//! # }
//! ```

// Public modules that make up the library API.
pub mod data;
pub mod diagnostics;
pub mod encoding;
pub mod serialization;

pub use data::{Batch, BatchOptions, DataSet, DataSetError};
pub use diagnostics::{LogReporter, MemoryReporter, Reporter, SilentReporter};
pub use encoding::{EncodedBatch, NoEncoder, VectorEncoder};
pub use serialization::PersistOptions;
