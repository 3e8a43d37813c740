/// POINT Z (1 2 3), little-endian ISO code 1001.
pub(crate) fn little_endian_point_z() -> Vec<u8> {
    let mut wkb = vec![0x01];
    wkb.extend_from_slice(&1001u32.to_le_bytes());
    for v in [1., 2., 3.] {
        wkb.extend_from_slice(&f64::to_le_bytes(v));
    }
    wkb
}

/// POINT Z (1 2 3), big-endian EWKB flag.
pub(crate) fn big_endian_point_z() -> Vec<u8> {
    let mut wkb = vec![0x00];
    wkb.extend_from_slice(&(1u32 | 0x80000000).to_be_bytes());
    for v in [1., 2., 3.] {
        wkb.extend_from_slice(&f64::to_be_bytes(v));
    }
    wkb
}

/// MULTIPOINT ((1 2), (3 4)) whose second part is big-endian.
pub(crate) fn multipoint_mixed_endian() -> Vec<u8> {
    let mut wkb = vec![0x01];
    wkb.extend_from_slice(&4u32.to_le_bytes());
    wkb.extend_from_slice(&2u32.to_le_bytes());

    wkb.push(0x01);
    wkb.extend_from_slice(&1u32.to_le_bytes());
    wkb.extend_from_slice(&f64::to_le_bytes(1.));
    wkb.extend_from_slice(&f64::to_le_bytes(2.));

    wkb.push(0x00);
    wkb.extend_from_slice(&1u32.to_be_bytes());
    wkb.extend_from_slice(&f64::to_be_bytes(3.));
    wkb.extend_from_slice(&f64::to_be_bytes(4.));
    wkb
}
