//! Ошибки загрузки книги и нормализации помесячных листов.

/// Ошибка чтения книги или разбора помесячного листа.
#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    /// Ошибка ввода-вывода при чтении исходного файла.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Книгу не удалось декодировать.
    #[error("Workbook error: {0}")]
    Workbook(String),
    /// В книге нет листа с указанным именем.
    #[error("Sheet '{sheet}' not found")]
    SheetNotFound {
        /// Имя листа.
        sheet: String,
    },
    /// Строка заголовка не найдена: обязательный столбец отсутствует
    /// во всех строках-кандидатах.
    #[error("Sheet '{sheet}': header row undetectable, required column '{column}' missing")]
    Schema {
        /// Имя листа.
        sheet: String,
        /// Первый отсутствующий обязательный столбец.
        column: &'static str,
    },
    /// В книге не нашлось ни одного помесячного листа.
    #[error("No monthly sheets found in workbook")]
    NoMonthlySheets,
}
