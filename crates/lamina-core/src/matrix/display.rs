//! `Display` formatting for [`Matrix`].

use core::fmt;

use crate::dtype::Element;

use super::Matrix;

impl<T: Element> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "matrix([")?;
        for (r, row) in self.data.chunks(self.columns).enumerate() {
            write!(f, "  [")?;
            for (c, v) in row.iter().enumerate() {
                if c > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{v}")?;
            }
            if r + 1 < self.rows {
                writeln!(f, "],")?;
            } else {
                writeln!(f, "]")?;
            }
        }
        write!(f, "], shape=({}, {}))", self.rows, self.columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_2x2() {
        let m = Matrix::from_vec(2, 2, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(
            m.to_string(),
            "matrix([\n  [1, 2],\n  [3, 4]\n], shape=(2, 2))"
        );
    }

    #[test]
    fn test_display_single_row() {
        let m = Matrix::from_vec(1, 3, vec![1.5, -2.0, 0.25]).unwrap();
        assert_eq!(m.to_string(), "matrix([\n  [1.5, -2, 0.25]\n], shape=(1, 3))");
    }
}
