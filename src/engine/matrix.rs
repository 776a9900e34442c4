// Module matrix
//------------------------------------------------------------------------------

/// Dark/light module grid produced by a symbol writer, quiet zone included. Linear symbols
/// are a single row that the renderer stretches to the requested height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    grid: Vec<bool>,
    w: usize,
    h: usize,
}

impl ModuleMatrix {
    pub fn new(w: usize, h: usize) -> Self {
        debug_assert!(w > 0 && h > 0, "Empty module matrix");
        Self { grid: vec![false; w * h], w, h }
    }

    /// Builds a single-row matrix from alternating run widths, starting with `first_dark`.
    pub fn from_runs(runs: &[usize], first_dark: bool, quiet_zone: usize) -> Self {
        let code_w = runs.iter().sum::<usize>();
        let mut mat = Self::new(code_w + 2 * quiet_zone, 1);
        let mut pos = quiet_zone;
        let mut dark = first_dark;
        for &r in runs {
            if dark {
                mat.grid[pos..pos + r].fill(true);
            }
            pos += r;
            dark = !dark;
        }
        mat
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn is_linear(&self) -> bool {
        self.h == 1
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&&m| m).count()
    }

    fn coord_to_index(&self, r: i32, c: i32) -> usize {
        let (w, h) = (self.w as i32, self.h as i32);
        debug_assert!(-h <= r && r < h, "row out of bounds");
        debug_assert!(-w <= c && c < w, "column out of bounds");

        let r = if r < 0 { r + h } else { r };
        let c = if c < 0 { c + w } else { c };
        (r * w + c) as _
    }

    pub fn get(&self, r: i32, c: i32) -> bool {
        self.grid[self.coord_to_index(r, c)]
    }

    pub fn set(&mut self, r: i32, c: i32, dark: bool) {
        let index = self.coord_to_index(r, c);
        self.grid[index] = dark;
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let mut res = String::with_capacity((self.w + 1) * self.h + 1);
        res.push('\n');
        for r in 0..self.h as i32 {
            for c in 0..self.w as i32 {
                res.push(if self.get(r, c) { '#' } else { '.' });
            }
            res.push('\n');
        }
        res
    }
}
