use crate::{error::*, Discrete};
use ndarray::{Array1, Array2, Array3};

pub(crate) fn to_array2<T: Clone>(rows: &[Vec<T>], what: &str) -> MdpResult<Array2<T>> {
    let n_cols = rows.first().map_or(0, Vec::len);
    if let Some(i) = rows.iter().position(|r| r.len() != n_cols) {
        return Err(MdpError::Shape(format!(
            "{what} row {i} has {} entries, expected {n_cols}",
            rows[i].len()
        )));
    }

    let data = rows.iter().flatten().cloned().collect();
    Ok(Array2::from_shape_vec((rows.len(), n_cols), data)?)
}

pub(crate) fn to_array3(rows: &[Vec<Vec<f64>>], what: &str) -> MdpResult<Array3<f64>> {
    let n_a = rows.first().map_or(0, Vec::len);
    let n_next = rows.first().and_then(|r| r.first()).map_or(0, Vec::len);
    for (s, row) in rows.iter().enumerate() {
        if row.len() != n_a {
            return Err(MdpError::Shape(format!(
                "{what} row {s} has {} actions, expected {n_a}",
                row.len()
            )));
        }
        if let Some(a) = row.iter().position(|probs| probs.len() != n_next) {
            return Err(MdpError::Shape(format!(
                "{what} entry ({s}, {a}) has {} next states, expected {n_next}",
                row[a].len()
            )));
        }
    }

    let data = rows.iter().flatten().flatten().copied().collect();
    Ok(Array3::from_shape_vec((rows.len(), n_a, n_next), data)?)
}

pub(crate) fn to_nested2<T: Clone>(table: &Array2<T>) -> Vec<Vec<T>> {
    table.rows().into_iter().map(|r| r.to_vec()).collect()
}

pub(crate) fn to_nested3(table: &Array3<f64>) -> Vec<Vec<Vec<f64>>> {
    table
        .outer_iter()
        .map(|s| s.rows().into_iter().map(|r| r.to_vec()).collect())
        .collect()
}

/// An empty flag vector stands for "no terminal states".
pub(crate) fn terminal_or_default(terminal: Option<&[bool]>, n_s: usize) -> Array1<bool> {
    match terminal {
        Some(flags) if !flags.is_empty() => Array1::from_vec(flags.to_vec()),
        _ => Array1::from_elem(n_s, false),
    }
}

/// Checks the shape invariants shared by both variants: at least one state,
/// an `S x A` reward table and `S` terminal flags.
pub(crate) fn check_common(
    n_s: usize,
    n_a: usize,
    reward: &Array2<f64>,
    terminal: &Array1<bool>,
) -> MdpResult<()> {
    if n_s == 0 {
        return Err(MdpError::Shape("transition table has no states".into()));
    }
    if reward.dim() != (n_s, n_a) {
        let (r_s, r_a) = reward.dim();
        return Err(MdpError::Shape(format!(
            "reward table is {r_s} x {r_a}, transition table is {n_s} x {n_a}"
        )));
    }
    if terminal.len() != n_s {
        return Err(MdpError::Shape(format!(
            "terminal has {} flags for {n_s} states",
            terminal.len()
        )));
    }

    Ok(())
}

/// Validates a step request against the current state before anything is mutated.
pub(crate) fn check_step(
    state: Discrete,
    action: Discrete,
    n_s: usize,
    n_a: usize,
) -> MdpResult<()> {
    if state >= n_s {
        return Err(MdpError::InvalidState { state, n_s });
    }
    if action >= n_a {
        return Err(MdpError::InvalidAction { action, n_a });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr2, arr3};

    #[test]
    fn nested_rows_become_arrays() {
        let t = to_array2(&[vec![1, 0], vec![0, 1]], "transition").unwrap();
        assert_eq!(t, arr2(&[[1, 0], [0, 1]]));
        assert_eq!(to_nested2(&t), vec![vec![1, 0], vec![0, 1]]);

        let rows = vec![vec![vec![0.5, 0.5]], vec![vec![1.0, 0.0]]];
        let t = to_array3(&rows, "transition").unwrap();
        assert_eq!(t, arr3(&[[[0.5, 0.5]], [[1.0, 0.0]]]));
        assert_eq!(to_nested3(&t), rows);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(matches!(
            to_array2(&[vec![1.0, 0.0], vec![0.0]], "reward"),
            Err(MdpError::Shape(_))
        ));
        assert!(matches!(
            to_array3(&[vec![vec![1.0]], vec![vec![0.5, 0.5]]], "transition"),
            Err(MdpError::Shape(_))
        ));
    }

    #[test]
    fn empty_table_has_no_states() {
        let t = to_array2::<f64>(&[], "reward").unwrap();
        assert_eq!(t.dim(), (0, 0));
        assert!(matches!(
            check_common(0, 0, &t, &Array1::from_elem(0, false)),
            Err(MdpError::Shape(_))
        ));
    }

    #[test]
    fn step_bounds_are_checked() {
        assert!(check_step(1, 0, 2, 1).is_ok());
        assert!(matches!(
            check_step(0, 1, 2, 1),
            Err(MdpError::InvalidAction { action: 1, n_a: 1 })
        ));
        assert!(matches!(
            check_step(2, 0, 2, 1),
            Err(MdpError::InvalidState { state: 2, n_s: 2 })
        ));
    }
}
