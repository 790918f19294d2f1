use approx::assert_relative_eq;
use matpack::{
    as_column, copy, Extent, MatpackError, Matrix, MatrixView, MatrixViewMut, Range, Vector,
    VectorView, VectorViewMut,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn make_matrix(rows: usize, cols: usize) -> Matrix<f64> {
    Matrix::from_fn(rows, cols, |r, c| (r * cols + c) as f64)
}

#[test]
fn test_range_index_formula() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let start = rng.gen_range(0..100usize);
        let extent = rng.gen_range(0..20usize);
        let mut stride = rng.gen_range(-5isize..=5);
        if stride == 0 {
            stride = 1;
        }
        let r = Range::new(start, extent, stride);
        for i in 0..extent {
            assert_eq!(r.index(i), start as isize + i as isize * stride);
        }
    }
}

#[test]
fn test_open_range_resolves_to_parent() {
    for n in [0usize, 1, 7, 64] {
        assert_eq!(Range::all().resolve(n), Range::new(0, n, 1));
    }
    assert_eq!(Range::to_end(3, 1).extent(), Extent::ToEnd);
    assert_eq!(Range::to_end(3, 1).len(), None);
}

#[test]
fn test_sub_view_scaling_propagates() {
    let mut v = Vector::from([1.0, 2.0, 3.0, 4.0, 5.0]);
    let sub = v.sub(Range::new(1, 3, 1));
    assert_eq!(sub.to_vector().as_slice(), &[2.0, 3.0, 4.0]);
    let mut sub = v.sub_mut(Range::new(1, 3, 1));
    sub *= 2.0;
    assert_eq!(v.as_slice(), &[1.0, 4.0, 6.0, 8.0, 5.0]);
}

#[test]
fn test_deep_nesting_is_one_composed_range() {
    let v: Vector<i64> = (0..1000).collect();
    let mut view = v.view();
    let mut expected: Vec<i64> = (0..1000).collect();
    for _ in 0..4 {
        view = view.sub(Range::to_end(view.len() - 1, -2));
        expected = expected.iter().rev().step_by(2).copied().collect();
    }
    assert_eq!(view.iter().copied().collect::<Vec<_>>(), expected);
    assert_eq!(view.stride(), 16);
}

#[test]
fn test_aliasing_views_see_each_others_writes() {
    let mut m = make_matrix(3, 3);
    {
        let mut t = m.t_mut();
        t[(0, 2)] = -1.0;
        assert_eq!(t.t()[(2, 0)], -1.0);
    }
    assert_eq!(m[(2, 0)], -1.0);
    m.view_mut().diagonal_mut().fill(0.0);
    assert_eq!(m.t().diagonal().sum(), 0.0);
}

#[test]
fn test_transpose_reference_values() {
    let m = Matrix::from_fn(3, 3, |r, c| (3 * r + c + 1) as f64);
    assert_eq!(m.t()[(0, 2)], 7.0);
    assert_eq!(m[(2, 0)], 7.0);
}

#[test]
fn test_random_sub_views_match_manual_indexing() {
    let mut rng = StdRng::seed_from_u64(42);
    let m = make_matrix(9, 11);
    for _ in 0..100 {
        let r0 = rng.gen_range(0..9usize);
        let c0 = rng.gen_range(0..11usize);
        let rs = rng.gen_range(1..3isize) * if rng.gen::<bool>() { 1 } else { -1 };
        let cs = rng.gen_range(1..4isize) * if rng.gen::<bool>() { 1 } else { -1 };
        let rows = Range::to_end(r0, rs);
        let cols = Range::to_end(c0, cs);
        let s = m.sub(rows, cols);
        let rr = rows.resolve(9);
        let cc = cols.resolve(11);
        assert_eq!(s.dims(), [rr.len().unwrap(), cc.len().unwrap()]);
        for i in 0..s.nrows() {
            for j in 0..s.ncols() {
                let expected = m[(rr.index(i) as usize, cc.index(j) as usize)];
                assert_eq!(s[(i, j)], expected);
            }
        }
    }
}

#[test]
fn test_assign_scalar_after_resize() {
    let mut v = Vector::from([9.0; 4]);
    v.resize(10);
    v.fill(2.5);
    assert!(v.iter().all(|&x| x == 2.5));

    let mut m = make_matrix(2, 2);
    m.resize(3, 5);
    m.fill(-1.0);
    assert!(m.view().iter().all(|&x| x == -1.0));
}

#[test]
fn test_mismatch_is_reported_not_panicking() {
    let a = Vector::<f64>::zeros(3);
    let mut b = Vector::<f64>::zeros(4);
    assert!(matches!(
        b.assign(&a.view()),
        Err(MatpackError::DimensionMismatch { .. })
    ));
    assert!(b.view_mut().try_add_assign(&a.view()).is_err());
    assert!(a.view().dot(&b.view()).is_err());

    let m = make_matrix(2, 3);
    let mut n = Matrix::<f64>::zeros(3, 3);
    assert!(n.assign(&m.view()).is_err());
    assert!(n.assign(&m.t().sub(.., 0..2)).is_err());
}

#[test]
fn test_copy_between_matrix_column_and_vector() {
    let m = make_matrix(4, 3);
    let mut v = Vector::<f64>::zeros(4);
    copy(m.column(.., 1).iter(), v.view_mut().iter_mut());
    assert_eq!(v.as_slice(), &[1.0, 4.0, 7.0, 10.0]);
    let col = as_column(v.view());
    assert_eq!(col.dims(), [4, 1]);
    assert_eq!(col, m.sub(.., 1..2));
}

#[test]
fn test_raw_buffer_views() {
    let data: Vec<f64> = (0..12).map(f64::from).collect();
    let v = VectorView::new(&data, Range::new(11, 4, -3)).unwrap();
    assert_eq!(v.to_vector().as_slice(), &[11.0, 8.0, 5.0, 2.0]);
    assert!(VectorView::new(&data, Range::new(0, 5, 3)).is_err());

    let m = MatrixView::from_strided(&data, [4, 3], [1, 4], 0).unwrap();
    assert_eq!(m.row(1, ..).to_vector().as_slice(), &[1.0, 5.0, 9.0]);

    let mut buf = data.clone();
    let mut mv = MatrixViewMut::from_strided(&mut buf, [2, 3], [6, 2], 0).unwrap();
    mv.fill(0.0);
    assert_eq!(buf, vec![0.0, 1.0, 0.0, 3.0, 0.0, 5.0, 0.0, 7.0, 0.0, 9.0, 0.0, 11.0]);

    let mut single = 3.0;
    let mut sv = VectorViewMut::from_mut(&mut single);
    sv += 1.0;
    assert_eq!(single, 4.0);
}

#[test]
fn test_reductions_match_iterator_fold() {
    let mut rng = StdRng::seed_from_u64(1);
    let data: Vec<f64> = (0..200).map(|_| rng.gen::<f64>() - 0.5).collect();
    let v = Vector::from(data.clone());
    let sel = v.sub(Range::new(3, 40, 4));
    let picked: Vec<f64> = (0..40).map(|i| data[3 + 4 * i]).collect();
    let sum: f64 = picked.iter().sum();
    assert_relative_eq!(sel.sum(), sum, epsilon = 1e-12);
    assert_relative_eq!(sel.mean().unwrap(), sum / 40.0, epsilon = 1e-12);
    let max = picked.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = picked.iter().copied().fold(f64::INFINITY, f64::min);
    assert_eq!(sel.max(), Some(max));
    assert_eq!(sel.min(), Some(min));
}

#[test]
fn test_display_formats() {
    assert_eq!(Range::new(0, 5, 2).to_string(), "5 2 0");
    let m = Matrix::from([[1, 2, 3], [4, 5, 6]]);
    assert_eq!(m.to_string(), "1 2 3\n4 5 6");
    assert_eq!(m.column(.., 2).to_string(), "3 6");
}
