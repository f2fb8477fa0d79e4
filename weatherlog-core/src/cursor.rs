/// Position of the record shown in single-record mode, counted from the
/// newest snapshot. Lives for one interactive session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordCursor {
    index: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Previous,
    Next,
}

impl RecordCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(index: u64) -> Self {
        Self { index }
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    /// Step back, never below 0.
    pub fn previous(self) -> Self {
        Self {
            index: self.index.saturating_sub(1),
        }
    }

    /// Step forward, never past `total - 1`.
    pub fn next(self, total: u64) -> Self {
        Self {
            index: self.index.saturating_add(1),
        }
        .clamp(total)
    }

    /// Pull the cursor back into `[0, total - 1]`; 0 when there are no records.
    pub fn clamp(self, total: u64) -> Self {
        Self {
            index: self.index.min(total.saturating_sub(1)),
        }
    }

    pub fn apply(self, nav: Navigation, total: u64) -> Self {
        match nav {
            Navigation::Previous => self.previous().clamp(total),
            Navigation::Next => self.next(total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(RecordCursor::new().index(), 0);
    }

    #[test]
    fn next_clamps_at_last_record() {
        let cursor = RecordCursor::new();

        let cursor = cursor.next(3);
        assert_eq!(cursor.index(), 1);
        let cursor = cursor.next(3);
        assert_eq!(cursor.index(), 2);
        let cursor = cursor.next(3);
        assert_eq!(cursor.index(), 2);
    }

    #[test]
    fn previous_floors_at_zero() {
        assert_eq!(RecordCursor::new().previous().index(), 0);
        assert_eq!(RecordCursor::at(2).previous().index(), 1);
    }

    #[test]
    fn repeated_steps_stay_in_bounds() {
        for total in 1..=6 {
            let mut cursor = RecordCursor::new();
            for _ in 0..10 {
                cursor = cursor.apply(Navigation::Next, total);
                assert!(cursor.index() < total);
            }
            assert_eq!(cursor.index(), total - 1);

            for _ in 0..10 {
                cursor = cursor.apply(Navigation::Previous, total);
            }
            assert_eq!(cursor.index(), 0);
        }
    }

    #[test]
    fn empty_table_keeps_cursor_at_zero() {
        let cursor = RecordCursor::at(4).clamp(0);
        assert_eq!(cursor.index(), 0);
        assert_eq!(cursor.next(0).index(), 0);
    }
}
