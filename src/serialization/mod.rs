// --- Файл: src/serialization/mod.rs ---

//! Модуль для сохранения и загрузки датасетов.
//!
//! Файл - это поток независимо сериализованных (bincode) значений,
//! при необходимости сжатый gzip. Признаки пишутся и читаются по одному.
//!
//! # Примеры
//!
//! ```rust,ignore
//! use onehot_dataset::serialization::PersistOptions;
//! use onehot_dataset::diagnostics::LogReporter;
//!
//! let options = PersistOptions::for_path("train.dataset.gz").verbose(true);
//! dataset.save("train.dataset.gz", &options, &LogReporter)?;
//!
//! let loaded: DataSet<String, bool, CharVectors> =
//!     DataSet::load("train.dataset.gz", &options, &LogReporter)?;
//! ```

pub mod persist;
pub mod stream;

pub use persist::{PersistOptions, PROGRESS_INTERVAL};
pub use stream::{FileSink, FileSource, StreamError, ValueReader, ValueWriter};
