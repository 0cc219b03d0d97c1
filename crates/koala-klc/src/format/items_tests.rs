use koala_core::{Index, Primitive};

use super::*;
use crate::error::ImageError;

fn idx(i: u32) -> Index {
    Index::from_raw(i)
}

fn encode<R: Record>(record: &R) -> Vec<u8> {
    let mut out = Vec::new();
    record.write(&mut out);
    assert_eq!(out.len(), record.byte_len(), "byte_len disagrees with write for {record:?}");
    out
}

fn decode<R: Record>(bytes: &[u8]) -> Result<R, ImageError> {
    let mut r = ByteReader::new(bytes);
    let record = R::read(&mut r)?;
    assert_eq!(r.remaining(), 0, "read left bytes behind");
    Ok(record)
}

#[test]
fn access_from_name_casing() {
    assert_eq!(Access::for_name("Greeting", false), Access::PUBLIC);
    assert_eq!(Access::for_name("greeting", false), Access::PRIVATE);
    assert_eq!(Access::for_name("_x", false), Access::PRIVATE);
    assert_eq!(Access::for_name("", false), Access::PRIVATE);

    let k = Access::for_name("MAX", true);
    assert!(k.is_public());
    assert!(k.is_const());
    assert_eq!(k.bits(), 2);
}

#[test]
fn access_display() {
    assert_eq!(Access::for_name("A", false).to_string(), "var,public");
    assert_eq!(Access::for_name("a", false).to_string(), "var,private");
    assert_eq!(Access::for_name("A", true).to_string(), "const,public");
    assert_eq!(Access::for_name("a", true).to_string(), "const,private");
}

#[test]
fn access_from_bits_rejects_unknown() {
    assert_eq!(Access::from_bits(3).map(Access::bits), Some(3));
    assert_eq!(Access::from_bits(4), None);
    assert_eq!(Access::from_bits(-1), None);
}

#[test]
fn string_layout() {
    let bytes = encode(&StringItem("abc".into()));

    assert_eq!(bytes, [4, 0, 0, 0, b'a', b'b', b'c', 0]);
    assert_eq!(decode::<StringItem>(&bytes).unwrap(), StringItem("abc".into()));
}

#[test]
fn string_without_nul_is_rejected() {
    let bytes = [3, 0, 0, 0, b'a', b'b', b'c'];
    let err = decode::<StringItem>(&bytes).unwrap_err();

    assert_eq!(err.to_string(), "invalid string record: missing NUL terminator");
}

#[test]
fn primitive_type_layout() {
    let item = TypeItem {
        varg: false,
        dims: 2,
        payload: TypePayload::Primitive(Primitive::Int),
    };
    let bytes = encode(&item);

    assert_eq!(bytes, [1, 0, 2, 0, b'i', 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(decode::<TypeItem>(&bytes).unwrap(), item);
}

#[test]
fn user_type_without_path_stores_minus_one() {
    let item = TypeItem {
        varg: false,
        dims: 0,
        payload: TypePayload::UserDefined {
            path: None,
            name: idx(3),
        },
    };
    let bytes = encode(&item);

    assert_eq!(&bytes[4..8], &(-1i32).to_le_bytes());
    assert_eq!(&bytes[8..12], &3i32.to_le_bytes());
    assert_eq!(item.references(), vec![(Category::String, idx(3))]);
    assert_eq!(decode::<TypeItem>(&bytes).unwrap(), item);
}

#[test]
fn package_path_type_layout() {
    let item = TypeItem {
        varg: false,
        dims: 0,
        payload: TypePayload::PackagePath(idx(1)),
    };
    let bytes = encode(&item);

    assert_eq!(bytes[0], 4);
    assert_eq!(&bytes[8..12], &(-1i32).to_le_bytes());
    assert_eq!(decode::<TypeItem>(&bytes).unwrap(), item);
}

#[test]
fn type_with_unknown_kind_is_rejected() {
    let mut bytes = encode(&TypeItem {
        varg: false,
        dims: 0,
        payload: TypePayload::Proto(idx(0)),
    });
    bytes[0] = 9;

    let err = decode::<TypeItem>(&bytes).unwrap_err();
    assert_eq!(err.to_string(), "invalid type record: unknown kind 9");
}

#[test]
fn variadic_array_type_is_rejected() {
    let bytes = [1, 1, 1, 0, b'A', 0, 0, 0, 0, 0, 0, 0];
    let err = decode::<TypeItem>(&bytes).unwrap_err();

    assert!(matches!(err, ImageError::InvalidRecord { what: "type", .. }));
}

#[test]
fn proto_empty_lists_are_minus_one() {
    let item = ProtoItem {
        returns: None,
        params: Some(idx(0)),
    };
    let bytes = encode(&item);

    assert_eq!(&bytes[0..4], &(-1i32).to_le_bytes());
    assert_eq!(&bytes[4..8], &0i32.to_le_bytes());
    assert_eq!(item.references(), vec![(Category::TypeList, idx(0))]);
    assert_eq!(decode::<ProtoItem>(&bytes).unwrap(), item);
}

#[test]
fn negative_reference_other_than_minus_one_is_rejected() {
    let bytes = [0xfe, 0xff, 0xff, 0xff, 0, 0, 0, 0];
    let err = decode::<ProtoItem>(&bytes).unwrap_err();

    assert_eq!(err.to_string(), "invalid proto record: negative index -2");
}

#[test]
fn type_list_layout() {
    let item = TypeListItem(vec![idx(0), idx(2)]);
    let bytes = encode(&item);

    assert_eq!(bytes, [2, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0]);
    assert_eq!(decode::<TypeListItem>(&bytes).unwrap(), item);
}

#[test]
fn type_list_longer_than_input_is_truncated() {
    let bytes = [0xff, 0xff, 0xff, 0x0f];
    let err = decode::<TypeListItem>(&bytes).unwrap_err();

    assert!(matches!(err, ImageError::Truncated { what: "typelist", .. }));
}

#[test]
fn const_layouts() {
    let cases = [
        ConstItem::Int(-7),
        ConstItem::float(2.5),
        ConstItem::Bool(true),
        ConstItem::String(idx(4)),
    ];

    for item in cases {
        let bytes = encode(&item);
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[4..8], &[0; 4]);
        assert_eq!(decode::<ConstItem>(&bytes).unwrap(), item);
    }

    assert_eq!(ConstItem::float(2.5).as_f64(), Some(2.5));
    assert_eq!(ConstItem::Int(1).as_f64(), None);
}

#[test]
fn float_consts_compare_by_bits() {
    assert_ne!(ConstItem::float(0.0), ConstItem::float(-0.0));
    assert_eq!(ConstItem::float(f64::NAN), ConstItem::float(f64::NAN));
}

#[test]
fn locvar_reference_follows_scope() {
    let in_func = LocVarItem {
        name: idx(0),
        ty: idx(1),
        pos: idx(2),
        scope: LocalScope::Function,
        index: 1,
    };
    let in_meth = LocVarItem {
        scope: LocalScope::Method,
        ..in_func
    };

    assert_eq!(in_func.references()[2], (Category::Func, idx(2)));
    assert_eq!(in_meth.references()[2], (Category::Method, idx(2)));

    let bytes = encode(&in_meth);
    assert_eq!(&bytes[12..14], &2u16.to_le_bytes());
    assert_eq!(decode::<LocVarItem>(&bytes).unwrap(), in_meth);
}

#[test]
fn symbol_record_sizes() {
    let access = Access::PRIVATE;

    let var = VarItem {
        name: idx(0),
        ty: idx(0),
        access,
    };
    let func = FuncItem {
        name: idx(0),
        proto: idx(0),
        access,
        locvars: 3,
        code: idx(0),
    };
    let class = ClassItem {
        ty: idx(0),
        access,
        super_type: None,
        traits: None,
    };
    let method = MethodItem {
        class: idx(0),
        name: idx(1),
        proto: idx(0),
        access,
        locvars: 0,
        code: idx(0),
    };
    let imeth = IMethItem {
        owner: idx(0),
        name: idx(1),
        proto: idx(0),
        access,
    };

    assert_eq!(encode(&var).len(), 12);
    assert_eq!(encode(&func).len(), 16);
    assert_eq!(encode(&class).len(), 16);
    assert_eq!(encode(&method).len(), 20);
    assert_eq!(encode(&imeth).len(), 16);

    assert_eq!(decode::<FuncItem>(&encode(&func)).unwrap(), func);
    assert_eq!(decode::<ClassItem>(&encode(&class)).unwrap(), class);
    assert_eq!(decode::<MethodItem>(&encode(&method)).unwrap(), method);
}

#[test]
fn class_optional_references() {
    let class = ClassItem {
        ty: idx(0),
        access: Access::PUBLIC,
        super_type: Some(idx(1)),
        traits: Some(idx(0)),
    };

    assert_eq!(
        class.references(),
        vec![
            (Category::Type, idx(0)),
            (Category::Type, idx(1)),
            (Category::TypeList, idx(0)),
        ]
    );
}

#[test]
fn code_layout() {
    let bytes = encode(&CodeItem(vec![0xde, 0xad]));

    assert_eq!(bytes, [2, 0, 0, 0, 0xde, 0xad]);
    assert!(CodeItem(vec![]).references().is_empty());
}

#[test]
fn map_item_layout_and_unknown_category() {
    let entry = MapItem {
        category: Category::Var,
        offset: 0x40,
        count: 2,
    };
    let bytes = encode(&entry);

    assert_eq!(bytes, [7, 0, 0, 0, 0x40, 0, 0, 0, 2, 0, 0, 0]);
    assert_eq!(decode::<MapItem>(&bytes).unwrap(), entry);

    let mut bad = bytes;
    bad[0] = 99;
    assert!(matches!(
        decode::<MapItem>(&bad),
        Err(ImageError::UnknownCategory(99))
    ));
}
