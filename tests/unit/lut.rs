use super::*;
use crate::expression::Representation;

fn compiled(src: &str) -> CompiledExpr {
    CompiledExpr::compile(src, Representation::Flat).unwrap()
}

#[test]
fn x_and_y_fill_coordinates() {
    let dims = PlaneDims::new(7, 5);
    let lx = build_lut(&compiled("x"), dims, &LutThreading::default()).unwrap();
    let ly = build_lut(&compiled("y"), dims, &LutThreading::default()).unwrap();
    for row in 0..5 {
        for col in 0..7 {
            assert_eq!(lx.get(col, row), Some(col as f32));
            assert_eq!(ly.get(col, row), Some(row as f32));
        }
    }
    assert_eq!(lx.as_slice().len(), 35);
}

#[test]
fn parallel_and_sequential_are_bit_identical() {
    let e = compiled("x 3 * y 7 % + 1.5 pow 2 max x y < 0 5 ? /");
    let dims = PlaneDims::new(33, 21);
    let seq = build_lut(&e, dims, &LutThreading::sequential()).unwrap();
    let par = build_lut(&e, dims, &LutThreading::default()).unwrap();
    let pool = build_lut(
        &e,
        dims,
        &LutThreading {
            parallel: true,
            threads: Some(3),
        },
    )
    .unwrap();

    let bits = |l: &Lut| l.as_slice().iter().map(|v| v.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&seq), bits(&par));
    assert_eq!(bits(&seq), bits(&pool));
}

#[test]
fn rows_and_bounds() {
    let l = build_lut(&compiled("x y 10 * +"), PlaneDims::new(3, 2), &LutThreading::sequential())
        .unwrap();
    assert_eq!(l.row(1), Some(&[10.0, 11.0, 12.0][..]));
    assert_eq!(l.row(2), None);
    assert_eq!(l.get(3, 0), None);
}

#[test]
fn empty_planes_produce_empty_luts() {
    let l = build_lut(&compiled("x"), PlaneDims::new(0, 4), &LutThreading::default()).unwrap();
    assert!(l.as_slice().is_empty());
    assert_eq!(l.dims(), PlaneDims::new(0, 4));
}

#[test]
fn builder_reuses_one_pool_across_planes() {
    let b = LutBuilder::new(&LutThreading {
        parallel: true,
        threads: Some(2),
    })
    .unwrap();
    assert_eq!(b.pool_threads(), Some(2));

    let e = compiled("x y +");
    let luma = b.build(&e, PlaneDims::new(8, 4)).unwrap();
    let chroma = b.build(&e, PlaneDims::new(4, 2)).unwrap();
    assert_eq!(luma.get(7, 3), Some(10.0));
    assert_eq!(chroma.get(3, 1), Some(4.0));

    assert_eq!(LutBuilder::new(&LutThreading::default()).unwrap().pool_threads(), None);
    assert_eq!(LutBuilder::new(&LutThreading::sequential()).unwrap().pool_threads(), None);
}

#[test]
fn zero_threads_is_rejected() {
    let err = build_lut(
        &compiled("x"),
        PlaneDims::new(2, 2),
        &LutThreading {
            parallel: true,
            threads: Some(0),
        },
    )
    .unwrap_err();
    assert!(matches!(err, DrawError::Config(_)));
}

#[test]
fn from_vec_checks_length() {
    assert!(Lut::from_vec(PlaneDims::new(2, 2), vec![0.0; 4]).is_ok());
    assert!(matches!(
        Lut::from_vec(PlaneDims::new(2, 2), vec![0.0; 3]),
        Err(DrawError::Config(_))
    ));
}
