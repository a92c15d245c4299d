use serde::{Deserialize, Serialize};

/// Scheduling priority of a request.
///
/// The pipeline maps this onto its own queue priorities. Variants are
/// declared in ascending order so the derived `Ord` is the priority order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Prefetching and other speculative work.
    VeryLow,
    /// Off-screen content likely to be needed soon.
    Low,
    /// Regular on-screen content.
    #[default]
    Normal,
    /// Content the user is waiting on.
    High,
    /// Blocks user interaction until it finishes.
    VeryHigh,
}

impl Priority {
    pub const ALL: [Priority; 5] = [
        Priority::VeryLow,
        Priority::Low,
        Priority::Normal,
        Priority::High,
        Priority::VeryHigh,
    ];
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::VeryLow => write!(f, "very_low"),
            Priority::Low => write!(f, "low"),
            Priority::Normal => write!(f, "normal"),
            Priority::High => write!(f, "high"),
            Priority::VeryHigh => write!(f, "very_high"),
        }
    }
}
