use matview::{IndexIterator, MatrixError, Selector, View};
use proptest::prelude::*;

fn iota(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

/// Every coordinate tuple of `shape`, dimension 0 fastest.
fn coords(shape: &[usize]) -> Vec<Vec<usize>> {
    let mut out = vec![vec![]];
    for &n in shape {
        out = (0..n)
            .flat_map(|i| {
                out.iter().map(move |c| {
                    let mut c = c.clone();
                    c.push(i);
                    c
                })
            })
            .collect();
    }
    out
}

fn linear_indices(view: &View) -> Vec<usize> {
    coords(&view.shape())
        .iter()
        .map(|c| view.linear_index(c).unwrap())
        .collect()
}

fn shape_and_order() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
    (1usize..5).prop_flat_map(|rank| {
        (
            prop::collection::vec(1usize..5, rank),
            Just((0..rank).collect::<Vec<_>>()).prop_shuffle(),
        )
    })
}

fn selector(size: usize) -> impl Strategy<Value = Selector> {
    let n = size as isize;
    prop_oneof![
        Just(Selector::All),
        (0..n).prop_map(Selector::Index),
        (0..n, 0..n).prop_map(|(s, e)| Selector::Range(s, e)),
        prop::collection::vec(0..n, 1..5).prop_map(Selector::Indices),
        prop::collection::vec(any::<bool>(), size)
            .prop_filter("mask selects something", |m| m.contains(&true))
            .prop_map(Selector::Mask),
    ]
}

fn shape_and_selectors() -> impl Strategy<Value = (Vec<usize>, Vec<Selector>)> {
    prop::collection::vec(1usize..5, 1..4).prop_flat_map(|shape| {
        let selectors: Vec<_> = shape.iter().map(|&n| selector(n)).collect();
        (Just(shape), selectors)
    })
}

#[test]
fn test_scenario_column_then_row() {
    // 3x3 data [0..9]: dimension 0 runs along columns.
    let data = iota(9);
    let mut view = View::new(&[3, 3]).unwrap();
    view.select(&[Selector::All, Selector::Index(0)]).unwrap();
    assert_eq!(view.extract_from(&data).unwrap(), vec![0, 1, 2]);
    view.restore();
    assert!(view.is_initial());
    view.select(&[Selector::Index(0)]).unwrap();
    assert_eq!(view.extract_from(&data).unwrap(), vec![0, 3, 6]);
}

#[test]
fn test_circshift_5x5() {
    let data = iota(25);
    let mut view = View::new(&[5, 5]).unwrap();
    view.circshift(&[2, -2], None).unwrap();
    let out = view.extract_from(&data).unwrap();
    for j in 0..5 {
        for i in 0..5 {
            let expected = (i + 3) % 5 + 5 * ((j + 2) % 5);
            assert_eq!(out[i + 5 * j], expected as i64, "at ({i}, {j})");
        }
    }
}

#[test]
fn test_circshift_single_dimension() {
    let mut view = View::new(&[4, 2]).unwrap();
    view.circshift(&[1], Some(0)).unwrap();
    assert_eq!(view.extract_from(&iota(8)).unwrap(), vec![3, 0, 1, 2, 7, 4, 5, 6]);
    assert!(matches!(
        view.circshift(&[1, 1], Some(0)),
        Err(MatrixError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_rot90_four_times_is_identity() {
    let data = iota(6);
    let mut view = View::new(&[2, 3]).unwrap();
    let once = {
        let mut v = view.clone();
        v.rot90(1).unwrap();
        v.extract_from(&data).unwrap()
    };
    // [[0, 2, 4], [1, 3, 5]] rotated counterclockwise.
    assert_eq!(once, vec![4, 2, 0, 5, 3, 1]);
    for _ in 0..4 {
        view.rot90(1).unwrap();
    }
    assert_eq!(view.shape(), vec![2, 3]);
    assert_eq!(view.extract_from(&data).unwrap(), data);
}

#[test]
fn test_iteration_protocol() {
    let mut view = View::new(&[2, 3]).unwrap();
    view.select_dimension(1, Selector::StepRange(2, -2, 0)).unwrap();
    let mut it = view.iter();
    let mut seen = vec![];
    let mut pos = it.begin(0);
    while !it.is_end() {
        seen.push(pos);
        pos = it.advance();
    }
    assert_eq!(seen, vec![4, 5, 0, 1]);
    assert_eq!(view.iter().collect::<Vec<_>>(), vec![4, 5, 0, 1]);
    assert_eq!(view.iter().len(), 4);
}

#[test]
fn test_shift_dimension_drops_leading_singletons() {
    let data = iota(12);
    let mut view = View::new(&[3, 4]).unwrap();
    view.select_dimension(0, Selector::Index(2)).unwrap();
    view.shift_dimension(None).unwrap();
    assert_eq!(view.shape(), vec![4]);
    assert_eq!(view.extract_from(&data).unwrap(), vec![2, 5, 8, 11]);
}

#[test]
fn test_display() {
    let mut view = View::new(&[2, 2]).unwrap();
    view.select_indices_dimension(1, &[1]).unwrap();
    let text = view.to_string();
    assert!(text.starts_with("View [2x1]"));
    assert!(text.contains("indices=[2]"));
}

proptest! {
    #[test]
    fn prop_permute_then_ipermute_round_trips((shape, order) in shape_and_order()) {
        let mut view = View::new(&shape).unwrap();
        let before = linear_indices(&view);
        view.permute(&order).unwrap();
        prop_assert_eq!(view.len(), shape.iter().product::<usize>());
        view.ipermute(&order).unwrap();
        prop_assert_eq!(view.shape(), shape);
        prop_assert_eq!(linear_indices(&view), before);
    }

    #[test]
    fn prop_double_flip_round_trips(shape in prop::collection::vec(1usize..5, 1..4), d in 0usize..4) {
        let mut view = View::new(&shape).unwrap();
        view.flipdim(d).unwrap();
        view.flipdim(d).unwrap();
        prop_assert!(view.is_initial());
    }

    #[test]
    fn prop_permutation_composition(
        (shape, p1) in shape_and_order(),
        seed in any::<u64>(),
    ) {
        // Derive a second permutation of the same rank from the seed.
        let rank = p1.len();
        let mut p2: Vec<usize> = (0..rank).collect();
        let mut s = seed;
        for i in (1..rank).rev() {
            s = s.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            p2.swap(i, (s >> 33) as usize % (i + 1));
        }
        let composed: Vec<usize> = p2.iter().map(|&i| p1[i]).collect();

        let data = iota(shape.iter().product());
        let mut chained = View::new(&shape).unwrap();
        chained.permute(&p1).unwrap().permute(&p2).unwrap();
        let mut single = View::new(&shape).unwrap();
        single.permute(&composed).unwrap();
        prop_assert_eq!(chained.shape(), single.shape());
        prop_assert_eq!(chained.extract_from(&data).unwrap(), single.extract_from(&data).unwrap());
    }

    #[test]
    fn prop_save_restore(
        (shape, selectors) in shape_and_selectors(),
        flip in 0usize..3,
    ) {
        let mut view = View::new(&shape).unwrap();
        view.flipdim(flip).unwrap();
        let before = view.clone();
        view.save();
        view.select(&selectors).unwrap();
        view.fliplr().unwrap();
        view.restore();
        prop_assert_eq!(view.shape(), before.shape());
        for d in 0..view.ndim() {
            prop_assert_eq!(view.first(d).unwrap(), before.first(d).unwrap());
            prop_assert_eq!(view.step(d).unwrap(), before.step(d).unwrap());
        }
        // Nothing saved: back to the construction-time state.
        view.restore();
        prop_assert!(view.is_initial());
    }

    #[test]
    fn prop_iter_matches_linear_index((shape, selectors) in shape_and_selectors()) {
        let mut view = View::new(&shape).unwrap();
        view.select(&selectors).unwrap();
        let expected = linear_indices(&view);
        prop_assert_eq!(view.iter().collect::<Vec<_>>(), expected);
    }
}
