//! Исходные данные книги: типизированные ячейки, сетки листов и сама книга.

use crate::error::ReportError;
use crate::types::Money;
use calamine::{Data, Range, Reader, open_workbook_auto};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Значение одной ячейки листа.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Cell {
    /// Пустая ячейка.
    #[default]
    Empty,
    /// Текст.
    Text(String),
    /// Число.
    Number(Money),
}

static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    /// Создаёт числовую ячейку из `f64`; NaN и бесконечности дают пустую ячейку.
    #[inline]
    pub fn from_f64(value: f64) -> Self {
        Decimal::from_f64(value).map_or(Self::Empty, Self::Number)
    }

    /// Пустая ячейка или текст из одних пробелов.
    #[inline]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(_) => false,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Self::Number(Decimal::from(value))
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Number(Decimal::from(value))
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<Decimal> for Cell {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<&Data> for Cell {
    fn from(value: &Data) -> Self {
        match value {
            Data::Int(i) => Self::Number(Decimal::from(*i)),
            Data::Float(f) => Self::from_f64(*f),
            Data::String(s) => Self::Text(s.clone()),
            Data::Bool(b) => Self::Text(b.to_string()),
            // Даты приходят серийным номером Excel.
            Data::DateTime(dt) => Self::from_f64(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Self::Text(s.clone()),
            _ => Self::Empty,
        }
    }
}

/// Двумерная сетка ячеек листа без предположений о заголовке.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawGrid {
    rows: Vec<Vec<Cell>>,
}

impl RawGrid {
    /// Создаёт сетку из строк ячеек. Строки могут быть разной длины.
    #[inline]
    pub const fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Копирует диапазон, прочитанный `calamine`.
    pub fn from_range(range: &Range<Data>) -> Self {
        Self::new(
            range
                .rows()
                .map(|row| row.iter().map(Cell::from).collect())
                .collect(),
        )
    }

    /// Строки сетки.
    #[inline]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Число строк.
    #[inline]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Ширина самой длинной строки.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Ячейка по адресу; за пределами сетки возвращает пустую ячейку.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Нет ни одной непустой ячейки.
    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(Cell::is_blank)
    }
}

/// Книга: упорядоченный набор листов в порядке их следования в файле.
#[derive(Debug, Clone, Default)]
pub struct RawWorkbook {
    sheets: Vec<(String, RawGrid)>,
}

impl RawWorkbook {
    /// Читает xlsx/xls/ods-книгу целиком в память.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReportError> {
        let path = path.as_ref();
        fs::metadata(path)?;
        let mut workbook =
            open_workbook_auto(path).map_err(|e| ReportError::Workbook(e.to_string()))?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let range = workbook
                .worksheet_range(&name)
                .map_err(|e| ReportError::Workbook(format!("{name}: {e}")))?;
            let grid = RawGrid::from_range(&range);
            debug!(sheet = %name, rows = grid.height(), cols = grid.width(), "sheet decoded");
            sheets.push((name, grid));
        }

        Ok(Self { sheets })
    }

    /// Собирает книгу из готовых сеток (пары «имя листа — сетка»).
    pub fn from_sheets<I, S>(sheets: I) -> Self
    where
        I: IntoIterator<Item = (S, RawGrid)>,
        S: Into<String>,
    {
        Self {
            sheets: sheets
                .into_iter()
                .map(|(name, grid)| (name.into(), grid))
                .collect(),
        }
    }

    /// Итератор по листам в исходном порядке.
    #[inline]
    pub fn sheets(&self) -> impl Iterator<Item = (&str, &RawGrid)> {
        self.sheets.iter().map(|(name, grid)| (name.as_str(), grid))
    }

    /// Имена листов в исходном порядке.
    #[inline]
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|(name, _)| name.as_str())
    }

    /// Ищет лист по имени без учёта регистра и крайних пробелов.
    pub fn find_sheet(&self, name: &str) -> Option<&RawGrid> {
        let wanted = name.trim().to_lowercase();
        self.sheets
            .iter()
            .find(|(n, _)| n.trim().to_lowercase() == wanted)
            .map(|(_, grid)| grid)
    }

    /// Лист по точному имени.
    pub fn sheet(&self, name: &str) -> Result<&RawGrid, ReportError> {
        self.sheets
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, grid)| grid)
            .ok_or_else(|| ReportError::SheetNotFound {
                sheet: name.to_string(),
            })
    }
}
