use super::*;

fn lut(dims: PlaneDims, f: impl Fn(u32, u32) -> f32) -> Lut {
    let mut data = Vec::with_capacity(dims.len());
    for y in 0..dims.height {
        for x in 0..dims.width {
            data.push(f(x, y));
        }
    }
    Lut::from_vec(dims, data).unwrap()
}

#[test]
fn new_frame_allocates_subsampled_planes() {
    let f = Frame::new(VideoFormat::yuv420(40, 10, 10)).unwrap();
    assert_eq!(f.plane_count(), 3);
    assert_eq!(f.plane_dims(0), PlaneDims::new(40, 10));
    assert_eq!(f.plane_dims(1), PlaneDims::new(20, 5));
    assert_eq!(f.plane(0).unwrap().stride(), 64);
    assert_eq!(f.plane(1).unwrap().stride(), 32);
    assert!(matches!(f.plane(0).unwrap().data(), PlaneData::U16(_)));
    assert_eq!(f.plane_dims(7), PlaneDims::new(0, 0));
}

#[test]
fn new_frame_rejects_bad_formats() {
    let bad = VideoFormat::yuv444(4, 4, 32);
    assert!(matches!(Frame::new(bad), Err(DrawError::Config(_))));
}

#[test]
fn write_plane_truncates_and_saturates_8bit() {
    let mut f = Frame::new(VideoFormat::gray8(4, 1)).unwrap();
    let values = [-3.0, 12.9, 300.0, f32::NAN];
    let l = lut(PlaneDims::new(4, 1), |x, _| values[x as usize]);
    f.write_plane(0, &l).unwrap();

    let p = f.plane(0).unwrap();
    assert_eq!(p.sample(0, 0), Some(0));
    assert_eq!(p.sample(1, 0), Some(12));
    assert_eq!(p.sample(2, 0), Some(255));
    assert_eq!(p.sample(3, 0), Some(0));
}

#[test]
fn write_plane_saturates_to_bit_depth() {
    let mut f = Frame::new(VideoFormat::yuv444(2, 1, 10)).unwrap();
    let l = lut(PlaneDims::new(2, 1), |x, _| if x == 0 { 5000.0 } else { f32::INFINITY });
    f.write_plane(2, &l).unwrap();
    assert_eq!(f.plane(2).unwrap().sample(0, 0), Some(1023));
    assert_eq!(f.plane(2).unwrap().sample(1, 0), Some(1023));
    // untouched planes stay blank
    assert_eq!(f.plane(0).unwrap().sample(0, 0), Some(0));
}

#[test]
fn write_plane_rejects_mismatched_luts() {
    let mut f = Frame::new(VideoFormat::yuv420(8, 8, 8)).unwrap();
    let full = lut(PlaneDims::new(8, 8), |_, _| 1.0);
    assert!(matches!(f.write_plane(1, &full), Err(DrawError::Config(_))));
    assert!(matches!(f.write_plane(3, &full), Err(DrawError::Config(_))));
    assert!(f.write_plane(0, &full).is_ok());
}

#[test]
fn packed_samples_drop_stride_padding() {
    let mut f = Frame::new(VideoFormat::gray8(3, 2)).unwrap();
    let l = lut(PlaneDims::new(3, 2), |x, y| (x + 10 * y) as f32);
    f.write_plane(0, &l).unwrap();

    let p = f.plane(0).unwrap();
    assert_eq!(p.stride(), 32);
    assert_eq!(
        p.packed_samples(),
        PlaneData::U8(vec![0, 1, 2, 10, 11, 12])
    );
}

#[test]
fn set_sample_saturates_to_bit_depth() {
    let mut f = Frame::new(VideoFormat::yuv444(2, 1, 10)).unwrap();
    let p = f.plane_mut(1).unwrap();
    p.set_sample(0, 0, 5000).unwrap();
    p.set_sample(1, 0, 700).unwrap();
    assert_eq!(p.sample(0, 0), Some(1023));
    assert_eq!(p.sample(1, 0), Some(700));
}

#[test]
fn set_sample_bounds_and_saturation() {
    let mut f = Frame::new(VideoFormat::gray8(2, 2)).unwrap();
    let p = f.plane_mut(0).unwrap();
    p.set_sample(1, 1, 999).unwrap();
    assert_eq!(p.sample(1, 1), Some(255));
    assert!(matches!(p.set_sample(2, 0, 1), Err(DrawError::Config(_))));
    assert_eq!(p.sample(2, 0), None);
}
