//! Dated working directories.

use chrono::{Days, NaiveDate};
use std::path::{Path, PathBuf};

/// Parent directory holding one working directory per day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceRoot {
    base: PathBuf,
}

impl WorkspaceRoot {
    /// Root at `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Root directory.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Working directory for `date`, e.g. `gen/2026-10-16`.
    pub fn by_date(&self, date: NaiveDate) -> PathBuf {
        self.base.join(date.format("%Y-%m-%d").to_string())
    }

    /// Existing working directories from the `days_back` days before `today`,
    /// most recent first.
    pub fn find_recent(&self, today: NaiveDate, days_back: u64) -> Vec<PathBuf> {
        (1..=days_back)
            .filter_map(|i| today.checked_sub_days(Days::new(i)))
            .map(|day| self.by_date(day))
            .filter(|dir| dir.is_dir())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_recent_skips_missing_days() {
        let temp = tempfile::TempDir::new().unwrap();
        let root = WorkspaceRoot::new(temp.path());
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        std::fs::create_dir_all(root.by_date(NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()))
            .unwrap();
        std::fs::create_dir_all(root.by_date(NaiveDate::from_ymd_opt(2026, 10, 13).unwrap()))
            .unwrap();
        std::fs::create_dir_all(root.by_date(NaiveDate::from_ymd_opt(2026, 10, 12).unwrap()))
            .unwrap();

        let recent = root.find_recent(today, 3);
        assert_eq!(
            recent,
            vec![
                temp.path().join("2026-10-15"),
                temp.path().join("2026-10-13"),
            ]
        );
    }
}
