//! Sorting options for the process list
//!
//! Every ordinary column has one natural-order comparator in [`compare`];
//! descending order reverses that comparator's result per comparison. The
//! `Tree` pseudo-column bypasses comparators and hands the table to the
//! tree builder.

use std::cmp::Ordering;
use std::mem;

use super::tree_builder::build_tree;
use super::ProcessSample;

/// Characters of a user name that take part in comparisons
const USER_NAME_PREFIX: usize = 256;

/// Characters of an executable name that take part in comparisons
const EXE_NAME_PREFIX: usize = 260;

/// Sort column options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    Id,
    UserName,
    Priority,
    CpuPercent,
    UsedMemory,
    ThreadCount,
    DiskUsage,
    UpTime,
    ExeName,
    /// Hierarchical ordering instead of a comparator
    Tree,
}

/// Ordinary columns in display order
const CYCLE: [SortColumn; 9] = [
    SortColumn::Id,
    SortColumn::UserName,
    SortColumn::Priority,
    SortColumn::CpuPercent,
    SortColumn::UsedMemory,
    SortColumn::ThreadCount,
    SortColumn::DiskUsage,
    SortColumn::UpTime,
    SortColumn::ExeName,
];

impl SortColumn {
    /// Cycle to the next ordinary column, wrapping; `Tree` enters at the first.
    pub fn next(self) -> Self {
        match CYCLE.iter().position(|&c| c == self) {
            Some(i) => CYCLE[(i + 1) % CYCLE.len()],
            None => CYCLE[0],
        }
    }

    /// Cycle to the previous ordinary column, wrapping; `Tree` enters at the last.
    pub fn prev(self) -> Self {
        match CYCLE.iter().position(|&c| c == self) {
            Some(i) => CYCLE[(i + CYCLE.len() - 1) % CYCLE.len()],
            None => CYCLE[CYCLE.len() - 1],
        }
    }

    /// Column header text, also accepted by [`SortColumn::from_name`]
    pub fn name(&self) -> &'static str {
        match self {
            SortColumn::Id => "ID",
            SortColumn::UserName => "USER",
            SortColumn::Priority => "PRI",
            SortColumn::CpuPercent => "CPU%",
            SortColumn::UsedMemory => "MEM",
            SortColumn::ThreadCount => "THRD",
            SortColumn::DiskUsage => "DISK",
            SortColumn::UpTime => "TIME",
            SortColumn::ExeName => "EXE",
            SortColumn::Tree => "TREE",
        }
    }

    /// Parses a column name case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.to_ascii_uppercase();
        match upper.as_str() {
            "CPU" => Some(SortColumn::CpuPercent),
            _ => CYCLE
                .iter()
                .chain(std::iter::once(&SortColumn::Tree))
                .copied()
                .find(|c| c.name() == upper),
        }
    }

    #[inline]
    pub fn is_tree(&self) -> bool {
        matches!(self, SortColumn::Tree)
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn inverted(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    /// Arrow drawn next to the active column header
    pub fn arrow(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "↑",
            SortOrder::Descending => "↓",
        }
    }
}

/// Active column and direction; persists across sampling cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub column: SortColumn,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(column: SortColumn, order: SortOrder) -> Self {
        Self { column, order }
    }
}

/// Compares a bounded, case-insensitive prefix of two strings.
fn compare_text(a: &str, b: &str, prefix: usize) -> Ordering {
    folded(a, prefix).cmp(folded(b, prefix))
}

fn folded(s: &str, prefix: usize) -> impl Iterator<Item = char> + '_ {
    s.chars().take(prefix).flat_map(char::to_lowercase)
}

/// Natural (ascending) order of two samples under `column`.
///
/// `Tree` has no comparator and compares everything as equal.
pub fn compare(a: &ProcessSample, b: &ProcessSample, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Id => a.id.cmp(&b.id),
        SortColumn::UserName => compare_text(&a.user_name, &b.user_name, USER_NAME_PREFIX),
        SortColumn::Priority => a.base_priority.cmp(&b.base_priority),
        SortColumn::CpuPercent => a.cpu_percent.total_cmp(&b.cpu_percent),
        SortColumn::UsedMemory => a.used_memory_bytes.cmp(&b.used_memory_bytes),
        SortColumn::ThreadCount => a.thread_count.cmp(&b.thread_count),
        SortColumn::DiskUsage => a.disk_bytes_per_sec.cmp(&b.disk_bytes_per_sec),
        SortColumn::UpTime => a.uptime_ms.cmp(&b.uptime_ms),
        SortColumn::ExeName => compare_text(&a.exe_name, &b.exe_name, EXE_NAME_PREFIX),
        SortColumn::Tree => Ordering::Equal,
    }
}

/// Reorders `samples` in place according to `spec`.
///
/// Uses the stable `sort_by`, so ties keep their previous relative order.
pub fn sort_samples(samples: &mut Vec<ProcessSample>, spec: SortSpec) {
    if spec.column.is_tree() {
        *samples = build_tree(mem::take(samples));
        return;
    }

    let column = spec.column;
    samples.sort_by(|a, b| {
        let cmp = compare(a, b, column);
        match spec.order {
            SortOrder::Ascending => cmp,
            SortOrder::Descending => cmp.reverse(),
        }
    });
}
