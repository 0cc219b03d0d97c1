use super::*;

#[test]
fn header_size() {
    assert_eq!(std::mem::size_of::<Header>(), 32);
}

#[test]
fn header_new() {
    let h = Header::new(8);

    assert!(h.validate_magic());
    assert!(h.validate_endian());
    assert_eq!(h.header_size, 32);
    assert_eq!(h.map_offset, 40);
    assert_eq!(h.pkg_size, 8);
    assert_eq!(h.file_size, 0);
    assert_eq!(h.map_size, 0);
}

#[test]
fn version_bytes() {
    let h = Header::new(4);

    assert_eq!(&h.version, b"0101");
    assert_eq!((h.major(), h.minor(), h.build()), (0, 1, 1));
}

#[test]
fn header_roundtrip() {
    let h = Header {
        magic: MAGIC,
        version: VERSION,
        file_size: 1024,
        header_size: 32,
        endian_tag: ENDIAN_TAG,
        map_offset: 40,
        map_size: 5,
        pkg_size: 8,
    };

    let bytes = h.to_bytes();
    assert_eq!(&bytes[0..4], b"KLC\0");
    assert_eq!(&bytes[16..20], &[0x4d, 0x3c, 0x2b, 0x1a]);

    let decoded = Header::from_bytes(&bytes);
    assert_eq!(decoded, h);
}

#[test]
fn magic_checks_three_letters() {
    let mut h = Header::new(4);
    h.magic[3] = b'!';
    assert!(h.validate_magic());

    h.magic[2] = b'X';
    assert!(!h.validate_magic());
}

#[test]
fn swapped_endian_tag_is_detected() {
    let mut h = Header::new(4);
    h.endian_tag = ENDIAN_TAG.swap_bytes();
    assert!(!h.validate_endian());
}

#[test]
fn package_size_is_aligned() {
    assert_eq!(package_size(""), 4);
    assert_eq!(package_size("abc"), 4);
    assert_eq!(package_size("lang"), 8);
    assert_eq!(package_size("koala/lang"), 12);
}
