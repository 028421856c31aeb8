// --- Файл: src/encoding.rs ---

//! One-hot кодирование пар (признак, метка).
//!
//! Сама схема кодирования живет во внешнем кодировщике, реализующем
//! [`VectorEncoder`]. Здесь только общая логика: собрать закодированные
//! строки пакета в два целочисленных массива.

use crate::diagnostics::{check_interval, Reporter};
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Как часто (в элементах) выводить диагностику при `verbose`.
pub const VERBOSE_INTERVAL: usize = 1000;

/// Трейт для кодировщиков категориальных значений в числовые векторы.
///
/// Реализация должна быть детерминированной: один и тот же элемент
/// всегда дает один и тот же вектор.
pub trait VectorEncoder<T: ?Sized> {
    /// Кодирует составной элемент (например, строку) в последовательность
    /// векторов, по одному на каждую часть.
    fn to_vectors(&self, item: &T) -> Vec<Array1<i32>>;

    /// Кодирует элемент целиком в один вектор.
    fn to_vector(&self, item: &T) -> Array1<i32>;
}

/// Ошибки при кодировании пакета.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Векторы разной длины в столбце '{column}': элемент {index} имеет длину {actual}, ожидалось {expected}")]
    RaggedVectors {
        column: &'static str,
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Ошибка формы массива: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

type Result<T> = std::result::Result<T, EncodeError>;

/// Закодированный пакет: по одной строке на пример.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedBatch {
    /// Признаки формы [n, сумма длин под-векторов]
    pub features: Array2<i32>,
    /// Метки формы [n, длина вектора метки]
    pub labels: Array2<i32>,
}

impl EncodedBatch {
    /// Количество закодированных примеров.
    pub fn len(&self) -> usize {
        self.features.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Кодировщик-заглушка для наборов без кодирования.
///
/// Тип необитаем: `Option<Arc<NoEncoder>>` всегда `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoEncoder {}

impl<T: ?Sized> VectorEncoder<T> for NoEncoder {
    fn to_vectors(&self, _item: &T) -> Vec<Array1<i32>> {
        match *self {}
    }

    fn to_vector(&self, _item: &T) -> Array1<i32> {
        match *self {}
    }
}

/// Построчный накопитель для двумерного массива.
pub(crate) struct RowStack {
    column: &'static str,
    data: Vec<i32>,
    width: Option<usize>,
    rows: usize,
}

impl RowStack {
    pub(crate) fn new(column: &'static str) -> Self {
        Self {
            column,
            data: Vec::new(),
            width: None,
            rows: 0,
        }
    }

    pub(crate) fn push(&mut self, row: &[i32]) -> Result<()> {
        let expected = *self.width.get_or_insert(row.len());
        if row.len() != expected {
            return Err(EncodeError::RaggedVectors {
                column: self.column,
                index: self.rows,
                expected,
                actual: row.len(),
            });
        }
        self.data.extend_from_slice(row);
        self.rows += 1;
        Ok(())
    }

    /// Без единой строки ширина неизвестна, и результат имеет форму `(0, 0)`.
    pub(crate) fn finish(self) -> Result<Array2<i32>> {
        let width = self.width.unwrap_or(0);
        Ok(Array2::from_shape_vec((self.rows, width), self.data)?)
    }
}

/// Кодирует пакет пар (признак, метка).
///
/// Признак превращается в последовательность под-векторов через
/// `features_vector.to_vectors`, которые склеиваются в одну строку.
/// Метка кодируется через `labels_vector.to_vector`.
///
/// При `max_len > 0` обход останавливается на первом индексе `i > max_len`,
/// то есть кодируются элементы с индексами `0..=max_len` (`max_len + 1` штук).
pub fn encode_batch<F, L, E>(
    features: ArrayView1<'_, F>,
    labels: ArrayView1<'_, L>,
    features_vector: &E,
    labels_vector: &E,
    max_len: usize,
    verbose: bool,
    reporter: &dyn Reporter,
) -> Result<EncodedBatch>
where
    F: Debug,
    E: VectorEncoder<F> + VectorEncoder<L> + ?Sized,
{
    let interval = check_interval(VERBOSE_INTERVAL, features.len());
    let mut feature_rows = RowStack::new("features");
    let mut label_rows = RowStack::new("labels");

    for (i, (feature, label)) in features.iter().zip(labels.iter()).enumerate() {
        if max_len > 0 && i > max_len {
            break;
        }

        let parts = <E as VectorEncoder<F>>::to_vectors(features_vector, feature);
        let row: Vec<i32> = parts.iter().flat_map(|part| part.iter().copied()).collect();
        let label_row = <E as VectorEncoder<L>>::to_vector(labels_vector, label);

        if verbose && i % interval == 0 {
            reporter.info(&format!(
                "[{}] to_one_hot_vector {:?} -> {}, {} (len={}) {} (len={})",
                i,
                feature,
                label_row,
                Array1::from_vec(row.clone()),
                row.len(),
                label_row,
                label_row.len()
            ));
        }

        feature_rows.push(&row)?;
        label_rows.push(&label_row.to_vec())?;
    }

    Ok(EncodedBatch {
        features: feature_rows.finish()?,
        labels: label_rows.finish()?,
    })
}
