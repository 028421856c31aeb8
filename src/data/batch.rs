// --- Файл: src/data/batch.rs ---

//! Ленивый итератор по батчам датасета.

use super::dataset::{ColumnView, DataSet, DataSetError, Result};
use super::sampler::SplitSampler;
use crate::diagnostics::Reporter;
use crate::encoding::{EncodedBatch, VectorEncoder};
use ndarray::CowArray;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Параметры нарезки на батчи.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchOptions {
    /// Желаемый размер батча
    pub batch_size: usize,
    /// Кодировать ли каждый батч в one-hot перед выдачей
    pub to_one_hot_vector: bool,
    /// Диагностика при кодировании
    pub verbose: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            batch_size: 50,
            to_one_hot_vector: true,
            verbose: false,
        }
    }
}

impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Устанавливает размер батча.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Включает/выключает one-hot кодирование батчей.
    pub fn to_one_hot_vector(mut self, enabled: bool) -> Self {
        self.to_one_hot_vector = enabled;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Батч данных - пара (features, labels) одинаковой длины.
#[derive(Debug)]
pub struct Batch<'a, F, L> {
    pub features: ColumnView<'a, F>,
    pub labels: ColumnView<'a, L>,
}

impl<'a, F, L> Batch<'a, F, L> {
    fn encoded(batch: EncodedBatch) -> Self {
        Self {
            features: ColumnView::OneHot(CowArray::from(batch.features)),
            labels: ColumnView::OneHot(CowArray::from(batch.labels)),
        }
    }

    /// Количество примеров в батче.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Забирает закодированные массивы, если батч в one-hot форме.
    pub fn into_one_hot(self) -> Option<EncodedBatch> {
        Some(EncodedBatch {
            features: self.features.into_one_hot()?,
            labels: self.labels.into_one_hot()?,
        })
    }
}

/// Итератор по батчам.
///
/// Каждый батч нарезается (и при необходимости кодируется) только когда
/// его запрашивают. Пройденный итератор не перезапускается: за новым
/// проходом нужно снова вызвать [`DataSet::next_batch`].
pub struct NextBatch<'a, F, L, E> {
    dataset: &'a DataSet<F, L, E>,
    sampler: SplitSampler,
    options: BatchOptions,
    reporter: &'a dyn Reporter,
}

impl<'a, F, L, E> NextBatch<'a, F, L, E> {
    /// Общее количество батчей в проходе.
    pub fn num_batches(&self) -> usize {
        self.sampler.num_splits()
    }
}

impl<'a, F, L, E> Iterator for NextBatch<'a, F, L, E>
where
    F: Debug,
    E: VectorEncoder<F> + VectorEncoder<L>,
{
    type Item = Result<Batch<'a, F, L>>;

    fn next(&mut self) -> Option<Self::Item> {
        let range = self.sampler.next()?;
        let dataset = self.dataset;

        if self.options.to_one_hot_vector {
            let encoded = dataset.encode_rows(range, 0, self.options.verbose, self.reporter);
            Some(encoded.map(Batch::encoded))
        } else {
            Some(Ok(Batch {
                features: dataset.features.view(range.clone()),
                labels: dataset.labels.view(range),
            }))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.sampler.size_hint()
    }
}

impl<F, L, E> DataSet<F, L, E> {
    /// Нарезает датасет на `ceil(size / batch_size)` последовательных
    /// батчей почти равной длины, без перемешивания.
    ///
    /// При `to_one_hot_vector` каждый батч кодируется в момент выдачи.
    pub fn next_batch<'a>(
        &'a self,
        options: &BatchOptions,
        reporter: &'a dyn Reporter,
    ) -> Result<NextBatch<'a, F, L, E>> {
        if options.batch_size == 0 {
            return Err(DataSetError::InvalidBatchSize);
        }

        Ok(NextBatch {
            dataset: self,
            sampler: SplitSampler::with_batch_size(self.aligned_len(), options.batch_size),
            options: *options,
            reporter,
        })
    }
}
