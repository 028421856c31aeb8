// --- Файл: src/data/sampler.rs ---

//! Разбиение диапазона индексов на последовательные куски.

use std::ops::Range;

/// Сэмплер, делящий `0..total` на `splits` смежных кусков почти равной длины.
///
/// Первые `total % splits` кусков на один элемент длиннее остальных,
/// поэтому длины отличаются не больше чем на единицу. Порядок сохраняется.
#[derive(Debug, Clone)]
pub struct SplitSampler {
    total: usize,
    splits: usize,
    current: usize,
}

impl SplitSampler {
    /// Создает сэмплер на `splits` кусков.
    pub fn new(total: usize, splits: usize) -> Self {
        Self {
            total,
            splits,
            current: 0,
        }
    }

    /// Создает сэмплер на `ceil(total / batch_size)` кусков.
    ///
    /// `batch_size` должен быть больше нуля.
    pub fn with_batch_size(total: usize, batch_size: usize) -> Self {
        debug_assert!(batch_size > 0);
        Self::new(total, total.div_ceil(batch_size))
    }

    /// Общее количество кусков.
    pub fn num_splits(&self) -> usize {
        self.splits
    }

    /// Сбрасывает сэмплер в начальное состояние.
    pub fn reset(&mut self) {
        self.current = 0;
    }

    /// Диапазон индексов куска с номером `index`.
    fn range_of(&self, index: usize) -> Range<usize> {
        let base = self.total / self.splits;
        let extra = self.total % self.splits;
        let start = index * base + index.min(extra);
        let len = base + usize::from(index < extra);
        start..start + len
    }
}

impl Iterator for SplitSampler {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current < self.splits {
            let range = self.range_of(self.current);
            self.current += 1;
            Some(range)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.splits - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SplitSampler {}
