// --- Файл: src/serialization/persist.rs ---

//! Сохранение и загрузка `DataSet`.
//!
//! Формат файла - поток значений (см. [`super::stream`]) в порядке:
//!
//! ```text
//! name             String
//! size             usize
//! features_vector  Option<E>
//! labels_vector    Option<E>
//! labels           Column<L>   (одним значением)
//! features[0..size]            (по одному значению на пример)
//! ```
//!
//! Признак пишется как `F`, если метки в сырой форме, и как `Vec<i32>`,
//! если метки уже закодированы. Поэтому сохраняются только датасеты, у
//! которых оба столбца в одной форме.
//!
//! У закодированного столбца признаков без строк ширина в файле не
//! сохраняется: после загрузки его форма `(0, 0)`.

use super::stream::{ValueReader, ValueWriter};
use crate::data::{Column, DataSet, DataSetError};
use crate::diagnostics::{check_interval, Reporter};
use crate::encoding::RowStack;
use ndarray::Array1;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

type Result<T> = std::result::Result<T, DataSetError>;

/// Как часто (в элементах) сообщать о прогрессе при `verbose`.
pub const PROGRESS_INTERVAL: usize = 100_000;

/// Параметры сохранения и загрузки.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistOptions {
    /// Сжимать/распаковывать gzip
    pub gzip: bool,
    /// Сообщать о промежуточном прогрессе
    pub verbose: bool,
}

impl PersistOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Параметры по расширению файла: `.gz` включает gzip.
    pub fn for_path<P: AsRef<Path>>(path: P) -> Self {
        let gzip = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("gz"))
            .unwrap_or(false);
        Self {
            gzip,
            verbose: false,
        }
    }

    pub fn gzip(mut self, gzip: bool) -> Self {
        self.gzip = gzip;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Счетчик прогресса для потоковой записи и чтения.
struct Progress<'a> {
    reporter: &'a dyn Reporter,
    file_name: String,
    action: &'static str,
    total: usize,
    interval: usize,
    verbose: bool,
}

impl<'a> Progress<'a> {
    fn new(
        reporter: &'a dyn Reporter,
        path: &Path,
        action: &'static str,
        total: usize,
        verbose: bool,
        limit: usize,
    ) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            reporter,
            file_name,
            action,
            total,
            interval: check_interval(limit, total),
            verbose,
        }
    }

    fn step(&self, index: usize) {
        if self.verbose && index % self.interval == 0 {
            let percent = index as f64 / self.total as f64 * 100.0;
            self.reporter
                .info(&format!("{} {:.1}% {}.", self.file_name, percent, self.action));
        }
    }

    /// Финальное сообщение выводится всегда, независимо от `verbose`.
    fn done(&self) {
        self.reporter
            .info(&format!("{} 100% {}.", self.file_name, self.action));
    }
}

impl<F, L, E> DataSet<F, L, E>
where
    F: Serialize,
    L: Serialize,
    E: Serialize,
{
    /// Сохраняет датасет в файл.
    ///
    /// Признаки пишутся по одному, так что в памяти не собирается
    /// сериализованная копия всего столбца.
    pub fn save<P: AsRef<Path>>(
        &self,
        path: P,
        options: &PersistOptions,
        reporter: &dyn Reporter,
    ) -> Result<()> {
        let path = path.as_ref();
        if self.features.is_one_hot() != self.labels.is_one_hot() {
            return Err(DataSetError::MixedColumns {
                features: self.features.is_one_hot(),
                labels: self.labels.is_one_hot(),
            });
        }
        if self.features.len() != self.size {
            return Err(DataSetError::SizeMismatch {
                size: self.size,
                features: self.features.len(),
            });
        }

        let mut writer = ValueWriter::create(path, options.gzip)?;
        writer.write(&self.name)?;
        writer.write(&self.size)?;
        writer.write(&self.features_vector.as_deref())?;
        writer.write(&self.labels_vector.as_deref())?;
        writer.write(&self.labels)?;

        let progress = Progress::new(
            reporter,
            path,
            "saved",
            self.size,
            options.verbose,
            PROGRESS_INTERVAL,
        );
        match &self.features {
            Column::Raw(items) => {
                for (i, item) in items.iter().enumerate() {
                    writer.write(item)?;
                    progress.step(i);
                }
            }
            Column::OneHot(rows) => {
                for (i, row) in rows.outer_iter().enumerate() {
                    writer.write(&row.to_vec())?;
                    progress.step(i);
                }
            }
        }

        writer.finish()?;
        progress.done();
        Ok(())
    }
}

impl<F, L, E> DataSet<F, L, E>
where
    F: DeserializeOwned,
    L: DeserializeOwned,
    E: DeserializeOwned,
{
    /// Загружает датасет, сохраненный через [`DataSet::save`].
    ///
    /// Обрыв файла или несовпадение типов возвращается как ошибка
    /// десериализации.
    pub fn load<P: AsRef<Path>>(
        path: P,
        options: &PersistOptions,
        reporter: &dyn Reporter,
    ) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = ValueReader::open(path, options.gzip)?;

        let name: String = reader.read()?;
        let size: usize = reader.read()?;
        let features_vector: Option<E> = reader.read()?;
        let labels_vector: Option<E> = reader.read()?;
        let labels: Column<L> = reader.read()?;

        let progress = Progress::new(
            reporter,
            path,
            "loaded",
            size,
            options.verbose,
            PROGRESS_INTERVAL,
        );
        let features = if labels.is_one_hot() {
            let mut rows = RowStack::new("features");
            for i in 0..size {
                let row: Vec<i32> = reader.read()?;
                rows.push(&row)?;
                progress.step(i);
            }
            Column::OneHot(rows.finish()?)
        } else {
            let mut items: Vec<F> = Vec::new();
            for i in 0..size {
                items.push(reader.read()?);
                progress.step(i);
            }
            Column::Raw(Array1::from_vec(items))
        };
        progress.done();

        Ok(DataSet {
            name,
            size,
            features,
            labels,
            features_vector: features_vector.map(Arc::new),
            labels_vector: labels_vector.map(Arc::new),
        })
    }
}
