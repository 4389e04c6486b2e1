// src/data_range.rs
//! Text range indicator: where a row's occurrences sit inside the whole table.

const FILLED: char = '█';
const EMPTY: char = '░';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataRange {
    pub position: u64,
    pub count: u64,
    pub total: u64,
}

impl DataRange {
    pub fn new(position: u64, count: u64, total: u64) -> Self {
        Self { position, count, total }
    }

    pub fn fraction_width(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count as f64 / self.total as f64
    }

    /// Cells `[start, end)` of a bar `width` cells wide covered by this range.
    pub fn cells(&self, width: usize) -> (usize, usize) {
        if self.total == 0 || width == 0 {
            return (0, 0);
        }
        let w = width as u128;
        let total = u128::from(self.total);
        let from = u128::from(self.position);
        let to = from + u128::from(self.count);
        let mut start = ((from * w) / total).min(w) as usize;
        if self.count == 0 {
            return (start, start);
        }
        let end = ((to * w).div_ceil(total)).min(w) as usize;

        // a non-empty range always shows up
        if end <= start {
            if start == width {
                start = width - 1;
            }
            return (start, start + 1);
        }
        (start, end)
    }

    pub fn render(&self, width: usize) -> String {
        let (start, end) = self.cells(width);
        (0..width)
            .map(|i| if i >= start && i < end { FILLED } else { EMPTY })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_marks_the_covered_span() {
        assert_eq!(DataRange::new(0, 50, 100).render(10), "█████░░░░░");
        assert_eq!(DataRange::new(50, 30, 100).render(10), "░░░░░███░░");
        assert_eq!(DataRange::new(80, 20, 100).render(10), "░░░░░░░░██");
    }

    #[test]
    fn tiny_ranges_still_show() {
        let (start, end) = DataRange::new(999, 1, 1000).cells(10);
        assert_eq!((start, end), (9, 10));
        assert_eq!(DataRange::new(0, 1, 1_000_000).render(4), "█░░░");
    }

    #[test]
    fn empty_total_renders_blank() {
        assert_eq!(DataRange::new(0, 0, 0).render(3), "░░░");
        assert_eq!(DataRange::new(0, 0, 0).fraction_width(), 0.0);
    }
}
