use crate::SurfaceError;

/// Clamped uniform knot vector for `point_count` control points of the given degree.
///
/// The first and last `degree + 1` knots are 0 and 1; the interior knots are
/// evenly spaced. Fails when `point_count <= degree`.
pub fn knot_vector(point_count: usize, degree: usize) -> Result<Vec<f32>, SurfaceError> {
    if point_count <= degree {
        return Err(SurfaceError::InvalidSurfaceParameters(format!(
            "degree {degree} needs at least {} control points, got {point_count}",
            degree + 1
        )));
    }
    let spans = point_count - degree;
    let mut knots = Vec::with_capacity(point_count + degree + 1);
    knots.extend(std::iter::repeat_n(0.0, degree + 1));
    knots.extend((1..spans).map(|i| i as f32 / spans as f32));
    knots.extend(std::iter::repeat_n(1.0, degree + 1));
    Ok(knots)
}

/// Index of the knot span containing `u` (The NURBS Book, A2.1).
///
/// `last` is the index of the last control point.
pub(crate) fn find_span(last: usize, degree: usize, u: f32, knots: &[f32]) -> usize {
    if u >= knots[last + 1] {
        return last;
    }
    if u <= knots[degree] {
        return degree;
    }
    let mut low = degree;
    let mut high = last + 1;
    let mut mid = (low + high) / 2;
    while u < knots[mid] || u >= knots[mid + 1] {
        if u < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }
    mid
}

/// The `degree + 1` non-vanishing basis functions at `u` (The NURBS Book, A2.2).
pub(crate) fn basis_functions(span: usize, u: f32, degree: usize, knots: &[f32]) -> Vec<f32> {
    let mut n = vec![0.0; degree + 1];
    let mut left = vec![0.0; degree + 1];
    let mut right = vec![0.0; degree + 1];
    n[0] = 1.0;
    for j in 1..=degree {
        left[j] = u - knots[span + 1 - j];
        right[j] = knots[span + j] - u;
        let mut saved = 0.0;
        for r in 0..j {
            let denom = right[r + 1] + left[j - r];
            let temp = if denom == 0.0 { 0.0 } else { n[r] / denom };
            n[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        n[j] = saved;
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_clamped(knots: &[f32], point_count: usize, degree: usize) {
        assert_eq!(knots.len(), point_count + degree + 1);
        assert!(knots.windows(2).all(|w| w[0] <= w[1]));
        assert!(knots[..=degree].iter().all(|k| *k == 0.0));
        assert!(knots[knots.len() - degree - 1..].iter().all(|k| *k == 1.0));
    }

    #[test]
    fn knot_vector_shape_holds_for_many_inputs() {
        for degree in 0..6 {
            for point_count in degree + 1..degree + 9 {
                let knots = knot_vector(point_count, degree).unwrap();
                assert_clamped(&knots, point_count, degree);
            }
        }
    }

    #[test]
    fn interior_knots_are_uniform() {
        let knots = knot_vector(5, 2).unwrap();
        assert_eq!(knots.len(), 8);
        assert_eq!(&knots[..3], &[0.0, 0.0, 0.0]);
        assert!((knots[3] - 1.0 / 3.0).abs() < 1e-6);
        assert!((knots[4] - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!(&knots[5..], &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn bezier_case_has_no_interior_knots() {
        assert_eq!(
            knot_vector(4, 3).unwrap(),
            vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]
        );
    }

    #[test]
    fn degree_at_or_above_count_fails() {
        assert!(matches!(
            knot_vector(3, 3),
            Err(SurfaceError::InvalidSurfaceParameters(_))
        ));
        assert!(knot_vector(0, 0).is_err());
        assert!(knot_vector(2, 5).is_err());
    }

    #[test]
    fn basis_functions_partition_unity() {
        let degree = 3;
        let knots = knot_vector(7, degree).unwrap();
        for step in 0..=20 {
            let u = step as f32 / 20.0;
            let span = find_span(6, degree, u, &knots);
            let sum: f32 = basis_functions(span, u, degree, &knots).iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "u={u} sum={sum}");
        }
    }

    #[test]
    fn span_is_clamped_at_ends() {
        let knots = knot_vector(5, 2).unwrap();
        assert_eq!(find_span(4, 2, 0.0, &knots), 2);
        assert_eq!(find_span(4, 2, 1.0, &knots), 4);
        assert_eq!(find_span(4, 2, 0.5, &knots), 3);
    }
}
