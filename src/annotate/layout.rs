//! Legend grid geometry

/// Legend grid parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendLayout {
    pub columns: u32,
    pub row_height: u32,
    /// Extra height below the last row, and the inset of each cell
    pub padding: u32,
}

impl Default for LegendLayout {
    fn default() -> Self {
        Self {
            columns: 3,
            row_height: 20,
            padding: 10,
        }
    }
}

impl LegendLayout {
    pub fn rows(&self, count: usize) -> u64 {
        (count as u64).div_ceil(u64::from(self.columns.max(1)))
    }

    /// Legend height for `count` entries: `ceil(count / columns) * row_height + padding`
    pub fn height(&self, count: usize) -> u64 {
        self.rows(count) * u64::from(self.row_height) + u64::from(self.padding)
    }

    /// Top-left text origin of entry `index` on a canvas `canvas_width` wide
    /// whose legend starts at `image_height`
    pub fn cell_origin(&self, index: usize, canvas_width: u32, image_height: u32) -> (i32, i32) {
        let columns = u64::from(self.columns.max(1));
        let index = index as u64;
        let column = index % columns;
        let row = index / columns;
        let column_width = u64::from(canvas_width) / columns;

        let x = column * column_width + u64::from(self.padding);
        let y = u64::from(image_height) + row * u64::from(self.row_height) + u64::from(self.padding);

        (clamp_i32(x), clamp_i32(y))
    }
}

fn clamp_i32(value: u64) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
