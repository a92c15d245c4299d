use std::sync::Arc;

/// Byte-level progress of the load backing a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub completed: u64,
    pub total: Option<u64>,
}

impl Progress {
    pub fn new(completed: u64, total: Option<u64>) -> Self {
        Self { completed, total }
    }

    /// Completed fraction in `0.0..=1.0`, if the total is known.
    pub fn fraction(&self) -> Option<f32> {
        self.total.map(|total| {
            if total == 0 {
                0.0
            } else {
                (self.completed as f32 / total as f32).min(1.0)
            }
        })
    }
}

/// Callback invoked by the pipeline as bytes arrive.
///
/// Called off the critical fetch path; it receives a reference to avoid
/// cloning on every invocation.
pub type ProgressHandler = Arc<dyn Fn(&Progress) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction() {
        assert_eq!(Progress::new(5, None).fraction(), None);
        assert_eq!(Progress::new(5, Some(0)).fraction(), Some(0.0));
        assert_eq!(Progress::new(5, Some(10)).fraction(), Some(0.5));
        assert_eq!(Progress::new(20, Some(10)).fraction(), Some(1.0));
    }
}
