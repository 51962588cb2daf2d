use super::*;

#[test]
fn over_opaque_src_replaces_dst() {
    assert_eq!(over([1, 2, 3, 255], [9, 8, 7, 255], 1.0), [9, 8, 7, 255]);
}

#[test]
fn over_zero_opacity_or_transparent_src_is_noop() {
    let dst = [10, 20, 30, 255];
    assert_eq!(over(dst, [255, 255, 255, 255], 0.0), dst);
    assert_eq!(over(dst, [0, 0, 0, 0], 1.0), dst);
}

#[test]
fn over_half_white_on_black() {
    let out = over([0, 0, 0, 255], [128, 128, 128, 128], 1.0);
    assert_eq!(out[3], 255);
    assert!((i32::from(out[0]) - 128).abs() <= 1);
}

#[test]
fn over_in_place_rejects_length_mismatch() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());
}

#[test]
fn shifted_composite_moves_pixels() {
    let (w, h) = (3u32, 3u32);
    let mut src = vec![0u8; 36];
    // Single opaque pixel at (1, 1).
    src[16..20].copy_from_slice(&[255, 255, 255, 255]);
    let mut dst = vec![0u8; 36];

    over_shifted_in_place(&mut dst, &src, w, h, 1, -1, 1.0).unwrap();
    // Lands at (2, 0).
    assert_eq!(&dst[8..12], &[255, 255, 255, 255]);
    assert_eq!(dst.iter().map(|&v| u32::from(v)).sum::<u32>(), 255 * 4);

    let mut dst2 = vec![0u8; 36];
    over_shifted_in_place(&mut dst2, &src, w, h, 5, 0, 1.0).unwrap();
    assert!(dst2.iter().all(|&v| v == 0));
}
