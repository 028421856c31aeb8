// --- Файл: src/diagnostics.rs ---

//! Диагностические сообщения о ходе загрузки, сохранения и кодирования.
//!
//! Вместо глобального логгера операции принимают `&dyn Reporter`.
//! Вызывающий код сам решает, куда уходят сообщения: в фасад `log`,
//! в память (для тестов) или никуда.

use std::cell::RefCell;

/// Цель, под которой сообщения уходят в фасад `log`.
pub const LOG_TARGET: &str = "onehot_dataset";

/// Приемник диагностических сообщений.
pub trait Reporter {
    /// Принимает одно информационное сообщение.
    fn info(&self, message: &str);
}

/// Передает сообщения в `log::info!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn info(&self, message: &str) {
        log::info!(target: LOG_TARGET, "{}", message);
    }
}

/// Отбрасывает все сообщения.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn info(&self, _message: &str) {}
}

/// Накапливает сообщения в памяти.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    messages: RefCell<Vec<String>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Возвращает копию накопленных сообщений.
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    /// Количество накопленных сообщений.
    pub fn len(&self) -> usize {
        self.messages.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }

    /// Забирает сообщения, очищая буфер.
    pub fn take(&self) -> Vec<String> {
        self.messages.take()
    }
}

impl Reporter for MemoryReporter {
    fn info(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

/// Интервал между сообщениями о прогрессе: не реже `limit` шагов,
/// но не меньше одного.
pub(crate) fn check_interval(limit: usize, total: usize) -> usize {
    limit.min(total).max(1)
}
