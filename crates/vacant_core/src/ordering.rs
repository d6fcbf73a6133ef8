use std::cmp::Ordering;

use crate::VacancyRecord;

/// Orders two records by `avg_salary` alone.
///
/// Every other field is ignored: two different listings with the same
/// salary compare as `Equal`.
pub fn compare_by_salary(a: &VacancyRecord, b: &VacancyRecord) -> Ordering {
    a.avg_salary().cmp(&b.avg_salary())
}

/// True when both records carry the same `avg_salary`, whatever else differs.
pub fn same_salary(a: &VacancyRecord, b: &VacancyRecord) -> bool {
    a.avg_salary() == b.avg_salary()
}

/// Borrowing wrapper whose `Eq`/`Ord` are salary-only.
///
/// Use it where a std API needs `Ord`, e.g. `iter().map(BySalary).max()`,
/// so the salary-only semantics are spelled out at the call site.
#[derive(Debug, Clone, Copy)]
pub struct BySalary<'a>(pub &'a VacancyRecord);

impl PartialEq for BySalary<'_> {
    fn eq(&self, other: &Self) -> bool {
        same_salary(self.0, other.0)
    }
}

impl Eq for BySalary<'_> {}

impl PartialOrd for BySalary<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BySalary<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_by_salary(self.0, other.0)
    }
}
