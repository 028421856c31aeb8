// --- Файл: src/data/dataset.rs ---

//! Контейнер `DataSet`: выровненные столбцы признаков и меток
//! плюс ссылки на кодировщики.

use crate::diagnostics::Reporter;
use crate::encoding::{encode_batch, EncodeError, EncodedBatch, VectorEncoder};
use crate::serialization::StreamError;
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, CowArray, Ix2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::sync::Arc;
use thiserror::Error;

/// Ошибки при работе с датасетом
#[derive(Error, Debug)]
pub enum DataSetError {
    #[error("Ошибка потока значений: {0}")]
    StreamError(#[from] StreamError),

    #[error("Ошибка кодирования: {0}")]
    EncodeError(#[from] EncodeError),

    #[error("Кодировщик '{0}' не задан")]
    MissingEncoder(&'static str),

    #[error("Столбец '{0}' уже закодирован")]
    AlreadyEncoded(&'static str),

    #[error("Размер батча должен быть больше нуля")]
    InvalidBatchSize,

    #[error("Размер датасета {size} не совпадает с числом признаков {features}")]
    SizeMismatch { size: usize, features: usize },

    #[error("Столбцы в разной форме: признаки one-hot = {features}, метки one-hot = {labels}")]
    MixedColumns { features: bool, labels: bool },
}

pub(crate) type Result<T> = std::result::Result<T, DataSetError>;

/// Столбец датасета: исходные элементы или закодированные строки.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Column<T> {
    /// Исходные (сырые) элементы
    Raw(Array1<T>),
    /// One-hot строки, по одной на пример
    OneHot(Array2<i32>),
}

impl<T> Column<T> {
    /// Количество примеров в столбце.
    pub fn len(&self) -> usize {
        match self {
            Column::Raw(items) => items.len(),
            Column::OneHot(rows) => rows.nrows(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_one_hot(&self) -> bool {
        matches!(self, Column::OneHot(_))
    }

    pub fn as_raw(&self) -> Option<&Array1<T>> {
        match self {
            Column::Raw(items) => Some(items),
            Column::OneHot(_) => None,
        }
    }

    pub fn as_one_hot(&self) -> Option<&Array2<i32>> {
        match self {
            Column::Raw(_) => None,
            Column::OneHot(rows) => Some(rows),
        }
    }

    /// Возвращает срез столбца без копирования.
    ///
    /// # Паника
    ///
    /// Паникует если `range` выходит за пределы столбца.
    pub fn view(&self, range: Range<usize>) -> ColumnView<'_, T> {
        match self {
            Column::Raw(items) => ColumnView::Raw(items.slice(s![range])),
            Column::OneHot(rows) => ColumnView::OneHot(CowArray::from(rows.slice(s![range, ..]))),
        }
    }

    /// Обрезает столбец до первых `len` примеров.
    fn truncate(self, len: usize) -> Self {
        if self.len() <= len {
            return self;
        }
        match self {
            Column::Raw(items) => Column::Raw(items.slice_move(s![..len])),
            Column::OneHot(rows) => Column::OneHot(rows.slice_move(s![..len, ..])),
        }
    }

    /// Имя типа первого элемента, если столбец не пуст.
    fn element_type(&self) -> Option<&'static str> {
        if self.is_empty() {
            return None;
        }
        Some(match self {
            Column::Raw(_) => std::any::type_name::<T>(),
            Column::OneHot(_) => "ndarray::Array1<i32>",
        })
    }
}

impl<T> Default for Column<T> {
    fn default() -> Self {
        Column::Raw(Array1::from_vec(Vec::new()))
    }
}

impl<T> From<Array1<T>> for Column<T> {
    fn from(items: Array1<T>) -> Self {
        Column::Raw(items)
    }
}

impl<T> From<Vec<T>> for Column<T> {
    fn from(items: Vec<T>) -> Self {
        Column::Raw(Array1::from_vec(items))
    }
}

impl<T> From<Array2<i32>> for Column<T> {
    fn from(rows: Array2<i32>) -> Self {
        Column::OneHot(rows)
    }
}

/// Срез столбца, отдаваемый батчем.
#[derive(Debug)]
pub enum ColumnView<'a, T> {
    /// Срез исходных элементов
    Raw(ArrayView1<'a, T>),
    /// Закодированные строки: заимствованные из уже закодированного
    /// столбца или только что закодированные
    OneHot(CowArray<'a, i32, Ix2>),
}

impl<'a, T> ColumnView<'a, T> {
    pub fn len(&self) -> usize {
        match self {
            ColumnView::Raw(items) => items.len(),
            ColumnView::OneHot(rows) => rows.nrows(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_raw(&self) -> Option<&ArrayView1<'a, T>> {
        match self {
            ColumnView::Raw(items) => Some(items),
            ColumnView::OneHot(_) => None,
        }
    }

    pub fn as_one_hot(&self) -> Option<ArrayView2<'_, i32>> {
        match self {
            ColumnView::Raw(_) => None,
            ColumnView::OneHot(rows) => Some(rows.view()),
        }
    }

    /// Превращает закодированный срез во владеющий массив.
    pub fn into_one_hot(self) -> Option<Array2<i32>> {
        match self {
            ColumnView::Raw(_) => None,
            ColumnView::OneHot(rows) => Some(rows.into_owned()),
        }
    }
}

/// Датасет из выровненных по индексу признаков и меток.
///
/// Пример `i` - это пара `features[i]`, `labels[i]`. Оба столбца всегда
/// имеют длину `size`. Кодировщики разделяемые и никогда не изменяются.
///
/// # Пример
///
/// ```rust,ignore
/// let dataset = DataSet::new(vec!["ab".to_string(), "c".to_string()], vec![true, false], "train")
///     .with_encoders(chars, spaces);
///
/// for batch in dataset.next_batch(&BatchOptions::new().batch_size(32), &LogReporter)? {
///     let batch = batch?;
///     // ...
/// }
/// ```
#[derive(Debug)]
pub struct DataSet<F, L, E> {
    pub(crate) name: String,
    pub(crate) size: usize,
    pub(crate) features: Column<F>,
    pub(crate) labels: Column<L>,
    pub(crate) features_vector: Option<Arc<E>>,
    pub(crate) labels_vector: Option<Arc<E>>,
}

impl<F, L, E> DataSet<F, L, E> {
    /// Создает датасет из признаков и меток.
    ///
    /// Если длины различаются, оба столбца молча обрезаются до меньшей,
    /// хвост без пары отбрасывается.
    pub fn new(features: impl Into<Column<F>>, labels: impl Into<Column<L>>, name: &str) -> Self {
        DataSetBuilder::new()
            .features(features)
            .labels(labels)
            .name(name)
            .build()
    }

    /// Возвращает builder для частичной сборки.
    pub fn builder() -> DataSetBuilder<F, L, E> {
        DataSetBuilder::new()
    }

    /// Устанавливает кодировщики признаков и меток.
    pub fn with_encoders(mut self, features_vector: Arc<E>, labels_vector: Arc<E>) -> Self {
        self.features_vector = Some(features_vector);
        self.labels_vector = Some(labels_vector);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Количество примеров.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn features(&self) -> &Column<F> {
        &self.features
    }

    pub fn labels(&self) -> &Column<L> {
        &self.labels
    }

    pub fn features_vector(&self) -> Option<&Arc<E>> {
        self.features_vector.as_ref()
    }

    pub fn labels_vector(&self) -> Option<&Arc<E>> {
        self.labels_vector.as_ref()
    }

    /// Закодированы ли столбцы.
    pub fn is_one_hot(&self) -> bool {
        self.features.is_one_hot() && self.labels.is_one_hot()
    }

    /// Число пар, реально доступных в обоих столбцах.
    pub(crate) fn aligned_len(&self) -> usize {
        self.features.len().min(self.labels.len())
    }

    /// Возвращает оба кодировщика или ошибку, если какого-то нет.
    fn encoders(&self) -> Result<(&E, &E)> {
        let features_vector = self
            .features_vector
            .as_deref()
            .ok_or(DataSetError::MissingEncoder("features_vector"))?;
        let labels_vector = self
            .labels_vector
            .as_deref()
            .ok_or(DataSetError::MissingEncoder("labels_vector"))?;
        Ok((features_vector, labels_vector))
    }

    /// Кодирует примеры из `range`.
    pub(crate) fn encode_rows(
        &self,
        range: Range<usize>,
        max_len: usize,
        verbose: bool,
        reporter: &dyn Reporter,
    ) -> Result<EncodedBatch>
    where
        F: fmt::Debug,
        E: VectorEncoder<F> + VectorEncoder<L>,
    {
        let features = self
            .features
            .as_raw()
            .ok_or(DataSetError::AlreadyEncoded("features"))?;
        let labels = self
            .labels
            .as_raw()
            .ok_or(DataSetError::AlreadyEncoded("labels"))?;
        let (features_vector, labels_vector) = self.encoders()?;

        Ok(encode_batch(
            features.slice(s![range.clone()]),
            labels.slice(s![range]),
            features_vector,
            labels_vector,
            max_len,
            verbose,
            reporter,
        )?)
    }

    /// Кодирует весь датасет на месте.
    ///
    /// Оба столбца заменяются закодированными строками. При `max_len > 0`
    /// кодируются только примеры `0..=max_len`, и `size` уменьшается
    /// до их числа. Возвращает `&mut self` для цепочек вызовов.
    pub fn convert_to_one_hot_vector(
        &mut self,
        max_len: usize,
        verbose: bool,
        reporter: &dyn Reporter,
    ) -> Result<&mut Self>
    where
        F: fmt::Debug,
        E: VectorEncoder<F> + VectorEncoder<L>,
    {
        let encoded = self.encode_rows(0..self.aligned_len(), max_len, verbose, reporter)?;

        self.size = encoded.len();
        self.features = Column::OneHot(encoded.features);
        self.labels = Column::OneHot(encoded.labels);
        Ok(self)
    }
}

impl<F: Clone, L: Clone, E> Clone for DataSet<F, L, E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            size: self.size,
            features: self.features.clone(),
            labels: self.labels.clone(),
            features_vector: self.features_vector.clone(),
            labels_vector: self.labels_vector.clone(),
        }
    }
}

impl<F, L, E> fmt::Display for DataSet<F, L, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DataSet \"{}\" (feature: {}, label:{}, size: {})",
            self.name,
            self.features.element_type().unwrap_or("none"),
            self.labels.element_type().unwrap_or("none"),
            self.size
        )
    }
}

/// Builder для `DataSet` с необязательными частями.
///
/// Если заданы и признаки, и метки, `size` пересчитывается как меньшая из
/// длин. Иначе сохраняется явно заданный `size`, а недостающий столбец
/// остается пустым.
pub struct DataSetBuilder<F, L, E> {
    name: String,
    size: usize,
    features: Option<Column<F>>,
    labels: Option<Column<L>>,
    features_vector: Option<Arc<E>>,
    labels_vector: Option<Arc<E>>,
}

impl<F, L, E> Default for DataSetBuilder<F, L, E> {
    fn default() -> Self {
        Self {
            name: String::new(),
            size: 0,
            features: None,
            labels: None,
            features_vector: None,
            labels_vector: None,
        }
    }
}

impl<F, L, E> DataSetBuilder<F, L, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Явный размер; учитывается только если не заданы оба столбца.
    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn features(mut self, features: impl Into<Column<F>>) -> Self {
        self.features = Some(features.into());
        self
    }

    pub fn labels(mut self, labels: impl Into<Column<L>>) -> Self {
        self.labels = Some(labels.into());
        self
    }

    pub fn features_vector(mut self, encoder: Arc<E>) -> Self {
        self.features_vector = Some(encoder);
        self
    }

    pub fn labels_vector(mut self, encoder: Arc<E>) -> Self {
        self.labels_vector = Some(encoder);
        self
    }

    /// Собирает датасет.
    pub fn build(self) -> DataSet<F, L, E> {
        let (size, features, labels) = match (self.features, self.labels) {
            (Some(features), Some(labels)) => {
                let size = features.len().min(labels.len());
                (size, features.truncate(size), labels.truncate(size))
            }
            (features, labels) => (
                self.size,
                features.unwrap_or_default(),
                labels.unwrap_or_default(),
            ),
        };

        DataSet {
            name: self.name,
            size,
            features,
            labels,
            features_vector: self.features_vector,
            labels_vector: self.labels_vector,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{MemoryReporter, SilentReporter};
    use crate::encoding::tests::CharEncoder;
    use crate::encoding::NoEncoder;
    use ndarray::{arr1, arr2};

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn encoded_dataset(features: &[&str], labels: &[bool]) -> DataSet<String, bool, CharEncoder> {
        let encoder = Arc::new(CharEncoder::new("abc"));
        DataSet::new(words(features), labels.to_vec(), "test").with_encoders(encoder.clone(), encoder)
    }

    #[test]
    fn test_truncates_to_shorter_column() {
        let dataset: DataSet<&str, &str, NoEncoder> =
            DataSet::new(vec!["a", "b", "c"], vec!["x", "y"], "trunc");

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.features(), &Column::Raw(arr1(&["a", "b"])));
        assert_eq!(dataset.labels(), &Column::Raw(arr1(&["x", "y"])));
    }

    #[test]
    fn test_truncates_labels_too() {
        let dataset: DataSet<i64, i64, NoEncoder> = DataSet::new(vec![1], vec![7, 8, 9], "");
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.labels().len(), 1);
        assert_eq!(dataset.labels().as_raw().unwrap()[0], 7);
    }

    #[test]
    fn test_size_is_min_of_lengths() {
        for m in 0..6 {
            for n in 0..6 {
                let dataset: DataSet<usize, usize, NoEncoder> =
                    DataSet::new((0..m).collect::<Vec<_>>(), (0..n).collect::<Vec<_>>(), "grid");
                assert_eq!(dataset.len(), m.min(n));
                assert_eq!(dataset.features().len(), m.min(n));
                assert_eq!(dataset.labels().len(), m.min(n));
            }
        }
    }

    #[test]
    fn test_partial_builder_keeps_explicit_size() {
        let dataset: DataSet<String, bool, NoEncoder> = DataSet::builder()
            .labels(vec![true, false, true])
            .size(3)
            .name("partial")
            .build();

        assert_eq!(dataset.len(), 3);
        assert!(dataset.features().is_empty());
        assert_eq!(dataset.labels().len(), 3);
        assert_eq!(dataset.name(), "partial");
    }

    #[test]
    fn test_convert_to_one_hot_vector() {
        let mut dataset = encoded_dataset(&["ab", "bc", "ca"], &[true, false, true]);

        dataset
            .convert_to_one_hot_vector(0, false, &SilentReporter)
            .unwrap();

        assert!(dataset.is_one_hot());
        assert_eq!(dataset.len(), 3);
        let features = dataset.features().as_one_hot().unwrap();
        assert_eq!(features.shape(), &[3, 6]);
        assert_eq!(features.row(1).to_vec(), vec![0, 1, 0, 0, 0, 1]);
        assert_eq!(
            dataset.labels().as_one_hot().unwrap(),
            &arr2(&[[0, 1], [1, 0], [0, 1]])
        );
    }

    #[test]
    fn test_convert_with_max_len_keeps_alignment() {
        let mut dataset = encoded_dataset(&["a", "b", "c", "a", "b"], &[true; 5]);

        let size = dataset
            .convert_to_one_hot_vector(1, false, &SilentReporter)
            .unwrap()
            .len();

        // max_len = 1 кодирует индексы 0 и 1
        assert_eq!(size, 2);
        assert_eq!(dataset.features().len(), 2);
        assert_eq!(dataset.labels().len(), 2);
    }

    #[test]
    fn test_convert_twice_fails() {
        let mut dataset = encoded_dataset(&["a"], &[true]);
        dataset.convert_to_one_hot_vector(0, false, &SilentReporter).unwrap();

        let result = dataset.convert_to_one_hot_vector(0, false, &SilentReporter);
        assert!(matches!(result, Err(DataSetError::AlreadyEncoded("features"))));
    }

    #[test]
    fn test_convert_without_encoders_fails() {
        let mut dataset: DataSet<String, bool, CharEncoder> =
            DataSet::new(words(&["a"]), vec![true], "no encoders");

        let result = dataset.convert_to_one_hot_vector(0, false, &SilentReporter);
        assert!(matches!(result, Err(DataSetError::MissingEncoder("features_vector"))));
    }

    #[test]
    fn test_convert_verbose_goes_to_reporter() {
        let mut dataset = encoded_dataset(&["a", "b"], &[true, false]);
        let reporter = MemoryReporter::new();

        dataset.convert_to_one_hot_vector(0, true, &reporter).unwrap();

        assert_eq!(reporter.len(), 1);
        assert!(reporter.messages()[0].starts_with("[0] to_one_hot_vector"));
    }

    #[test]
    fn test_display() {
        let dataset = encoded_dataset(&["a", "b"], &[true, false]);
        assert_eq!(
            dataset.to_string(),
            "DataSet \"test\" (feature: alloc::string::String, label:bool, size: 2)"
        );
    }

    #[test]
    fn test_display_after_conversion() {
        let mut dataset = encoded_dataset(&["a"], &[true]);
        dataset.convert_to_one_hot_vector(0, false, &SilentReporter).unwrap();

        assert_eq!(
            dataset.to_string(),
            "DataSet \"test\" (feature: ndarray::Array1<i32>, label:ndarray::Array1<i32>, size: 1)"
        );
    }

    #[test]
    fn test_display_empty() {
        let dataset: DataSet<String, bool, NoEncoder> = DataSet::new(Vec::new(), Vec::new(), "empty");
        assert_eq!(
            dataset.to_string(),
            "DataSet \"empty\" (feature: none, label:none, size: 0)"
        );
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_column_view() {
        let column: Column<i32> = Column::from(vec![10, 20, 30, 40]);
        let view = column.view(1..3);
        assert_eq!(view.len(), 2);
        assert_eq!(view.as_raw().unwrap().to_vec(), vec![20, 30]);

        let rows: Column<i32> = Column::from(arr2(&[[1, 0], [0, 1], [1, 1]]));
        let view = rows.view(2..3);
        assert_eq!(view.into_one_hot().unwrap(), arr2(&[[1, 1]]));
    }
}
