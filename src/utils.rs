//! Приведение ячеек к числам и строкам, поиск заголовка и форматирование значений.

use crate::raw::{Cell, RawGrid};
use crate::types::Money;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Нормализует последовательность символов, схлопывая группы пробельных.
fn normalize_chars<I: IntoIterator<Item = char>>(iter: I) -> String {
    let mut output = String::new();
    let mut prev_space = false;
    for ch in iter {
        let is_space = ch.is_whitespace();
        if is_space {
            if !prev_space {
                output.push(' ');
            }
        } else {
            output.push(ch);
        }
        prev_space = is_space;
    }
    output.trim().to_string()
}

/// Нормализует числовую строку, удаляя пробелы, знак плюса, разделители разрядов и `$`.
fn normalize_number(input: &str) -> String {
    input
        .chars()
        .filter(|ch| !ch.is_whitespace() && !matches!(*ch, '+' | ',' | '$'))
        .collect()
}

/// Разбирает число из текста; принимает обычную и экспоненциальную запись.
fn parse_money(value: &str) -> Option<Money> {
    let normalized = normalize_number(value);
    if normalized.is_empty() {
        return None;
    }
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
}

/// Приводит ячейку к числу. Пустая ячейка и нечисловой текст дают `None`.
///
/// Текст вида `$2,500.50` или `+1 200` разбирается как число: пробелы, `+`,
/// `,` и `$` отбрасываются до разбора. Строгий разбор дал бы здесь ноль.
pub fn coerce_money(cell: &Cell) -> Option<Money> {
    match cell {
        Cell::Number(n) => Some(*n),
        Cell::Text(s) => parse_money(s),
        Cell::Empty => None,
    }
}

/// Приводит ячейку к числу, трактуя всё нечисловое как ноль.
#[inline]
pub fn coerce_money_or_zero(cell: &Cell) -> Money {
    coerce_money(cell).unwrap_or(Decimal::ZERO)
}

/// Сумма с насыщением на границах `Decimal` вместо паники при переполнении.
pub fn sum_money<I: IntoIterator<Item = Money>>(values: I) -> Money {
    values.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Текст ячейки без крайних пробелов; число выводится в нормализованном виде.
pub fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::Text(s) => s.trim().to_string(),
        Cell::Number(n) => n.normalize().to_string(),
    }
}

/// Ключ для сравнения подписей столбцов: пробелы схлопнуты, регистр нижний.
pub fn label_key(label: &str) -> String {
    normalize_chars(label.chars()).to_lowercase()
}

/// Подпись столбца из ячейки заголовка.
#[inline]
pub fn column_label(cell: &Cell) -> String {
    normalize_chars(cell_text(cell).chars())
}

/// Содержит ли текст хотя бы одно ключевое слово (без учёта регистра).
pub fn contains_keyword(text: &str, keywords: &[&str]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}

/// Ищет строку заголовка среди первых `depth` строк сетки: первую, где есть
/// все требуемые столбцы.
///
/// При неудаче возвращает первый отсутствующий столбец той строки-кандидата,
/// которой не хватило меньше всего.
pub fn find_header_row(
    grid: &RawGrid,
    required: &[&'static str],
    depth: usize,
) -> Result<usize, &'static str> {
    let mut best: Option<(usize, &'static str)> = None;

    for (idx, row) in grid.rows().iter().take(depth).enumerate() {
        let labels: Vec<String> = row.iter().map(|c| label_key(&cell_text(c))).collect();
        let missing: Vec<&'static str> = required
            .iter()
            .copied()
            .filter(|target| !labels.contains(&label_key(target)))
            .collect();

        match missing.first() {
            None => return Ok(idx),
            Some(&first) => {
                if best.is_none_or(|(count, _)| missing.len() < count) {
                    best = Some((missing.len(), first));
                }
            }
        }
    }

    Err(best.map_or_else(
        || required.first().copied().unwrap_or_default(),
        |(_, column)| column,
    ))
}

/// Группирует разряды целой части: `1234567` → `1,234,567`.
fn group_thousands(digits: &str) -> String {
    let mut output = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            output.push(',');
        }
        output.push(ch);
    }
    output
}

/// Денежный формат: `$1,234.56`, `-$10.00`.
pub fn format_currency(value: Money) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    format!("{sign}${}.{frac_part}", group_thousands(int_part))
}

/// Процент с одним знаком после запятой: `12.3%`.
pub fn format_pct(value: Money) -> String {
    let rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.1}%")
}
