//! Настройки загрузки: состав столбцов выручки и параметры из окружения.

use std::env;
use std::path::PathBuf;

/// Столбец с названием площадки.
pub const LOCATION_COLUMN: &str = "Location";
/// Столбец итоговой выручки площадки.
pub const TOTAL_COLUMN: &str = "Total";

const VOICE_COLUMNS: &[&str] = &[
    "NBIP-NBIP Calls Revenue",
    "Fixed Calls Revenue",
    "Telekom Calls Revenue",
    "BMobile Calls Revenue",
    "International Calls Revenue",
];

const SMS_COLUMNS: &[&str] = &[
    "A2P SMS Revenue",
    "Telekom SMS Revenue",
    "BMobile SMS Revenue",
    "International SMS Revenue",
];

const DATA_COLUMNS: &[&str] = &["Mobile Data Revenue"];

const DEFAULT_WORKBOOK: &str = "data/monthly_report.xlsx";
const DEFAULT_AUX_SHEET: &str = "Sheet22";
const DEFAULT_TITLE: &str = "Monthly Site Revenue KPI Report";

/// Столбцы выручки по категориям.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevenueColumns {
    /// Голосовая связь.
    pub voice: Vec<String>,
    /// SMS.
    pub sms: Vec<String>,
    /// Мобильные данные.
    pub data: Vec<String>,
}

impl RevenueColumns {
    /// Все столбцы-компоненты: голос, SMS, данные.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.voice
            .iter()
            .chain(&self.sms)
            .chain(&self.data)
            .map(String::as_str)
    }
}

impl Default for RevenueColumns {
    fn default() -> Self {
        let owned =
            |cols: &[&str]| -> Vec<String> { cols.iter().map(ToString::to_string).collect() };
        Self {
            voice: owned(VOICE_COLUMNS),
            sms: owned(SMS_COLUMNS),
            data: owned(DATA_COLUMNS),
        }
    }
}

/// Параметры запуска.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Путь к книге с помесячными листами (`SITE_KPI_WORKBOOK`).
    pub workbook: PathBuf,
    /// Имя вспомогательного листа (`SITE_KPI_AUX_SHEET`).
    pub aux_sheet: String,
    /// Заголовок отчёта (`SITE_KPI_TITLE`).
    pub title: String,
}

impl Config {
    /// Читает настройки из переменных окружения.
    #[inline]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Читает настройки через произвольный источник; пустые значения игнорируются.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            workbook: PathBuf::from(get("SITE_KPI_WORKBOOK", DEFAULT_WORKBOOK)),
            aux_sheet: get("SITE_KPI_AUX_SHEET", DEFAULT_AUX_SHEET),
            title: get("SITE_KPI_TITLE", DEFAULT_TITLE),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
