//! Debug rendering of a `Factor` as a table, one row per joint assignment in flat order.
//! Not meant to be parsed back.

use super::Factor;
use crate::variable::state_label;

use itertools::Itertools;

use std::fmt;


impl fmt::Display for Factor {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let scope = self.scope();

        let mut header = String::new();
        for v in scope.iter() {
            header.push_str(v);
            header.push('\t');
        }
        header.push_str(&format!("phi({})", scope.iter().join(", ")));

        writeln!(f, "{}", header)?;
        writeln!(f, "{}", "-".repeat(header.len()))?;

        for (states, value) in self.shape.states().zip(self.values.iter()) {
            for (v, s) in scope.iter().zip(states) {
                write!(f, "{}\t", state_label(v, s))?;
            }
            writeln!(f, "{}", value)?;
        }

        Ok(())
    }

}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table() {
        let phi = Factor::new(&["x1", "x2"], &[2, 2], vec![0., 0.5, 1., 1.5]).unwrap();
        let out = phi.to_string();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(6, lines.len());
        assert_eq!("x1\tx2\tphi(x1, x2)", lines[0]);
        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!("x1_0\tx2_0\t0", lines[2]);
        assert_eq!("x1_0\tx2_1\t0.5", lines[3]);
        assert_eq!("x1_1\tx2_0\t1", lines[4]);
        assert_eq!("x1_1\tx2_1\t1.5", lines[5]);
    }

    #[test]
    fn scalar() {
        let phi = Factor::new::<&str, _>(&[], &[], vec![2.]).unwrap();
        assert_eq!("phi()\n-----\n2\n", phi.to_string());
    }
}
