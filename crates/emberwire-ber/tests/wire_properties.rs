use bytes::Bytes;
use emberwire_ber::{
    decode_header, decode_self_delimited, decode_tlv, encode, encode_header, encode_tlv,
    encoded_length, tlv_length, BerError, ByteSink, Class, DynamicBuffer, FixedBuffer, Length,
    RelativeOid, Tag, Value,
};

fn encode_to_vec<F>(write: F) -> Vec<u8>
where
    F: FnOnce(&mut Vec<u8>) -> emberwire_ber::Result<()>,
{
    let mut out = Vec::new();
    write(&mut out).expect("encoding into a Vec should succeed");
    out
}

#[test]
fn test_tag_numbers_survive_the_wire() {
    for number in [0u32, 1, 30, 31, 127, 128, 16383, 16384, u32::MAX] {
        for class in [
            Class::Universal,
            Class::Application,
            Class::ContextSpecific,
            Class::Private,
        ] {
            let tag = Tag::new(class, number, true);
            let bytes = encode_to_vec(|out| tag.encode(out));
            assert_eq!(bytes.len(), tag.encoded_length(), "tag {tag}");

            let mut input = bytes.as_slice();
            let decoded: Tag = decode_self_delimited(&mut input).expect("tag should decode");
            assert!(input.is_empty());
            assert_eq!(decoded, tag);
            assert_eq!(decoded.class(), class);
            assert_eq!(decoded.number(), number);
            assert!(decoded.is_constructed());
        }
    }
}

#[test]
fn test_tag_equality_ignores_constructed_flag() {
    assert_eq!(Tag::context(3), Tag::context(3).to_constructed());
    assert_ne!(Tag::context(3), Tag::application(3));
}

#[test]
fn test_length_forms() {
    let cases: [(usize, &[u8]); 5] = [
        (0, &[0x00]),
        (127, &[0x7F]),
        (128, &[0x81, 0x80]),
        (256, &[0x82, 0x01, 0x00]),
        (16_777_215, &[0x83, 0xFF, 0xFF, 0xFF]),
    ];
    for (length, expected) in cases {
        let bytes = encode_to_vec(|out| Length::Definite(length).encode(out));
        assert_eq!(bytes, expected, "length {length}");

        let mut input = bytes.as_slice();
        let decoded: Length = decode_self_delimited(&mut input).expect("length should decode");
        assert_eq!(decoded, Length::Definite(length));
    }
}

#[test]
fn test_integer_encoding_is_minimal() {
    let cases: [(i64, &[u8]); 8] = [
        (0, &[0x00]),
        (127, &[0x7F]),
        (128, &[0x00, 0x80]),
        (255, &[0x00, 0xFF]),
        (256, &[0x01, 0x00]),
        (-1, &[0xFF]),
        (-128, &[0x80]),
        (-129, &[0xFF, 0x7F]),
    ];
    for (value, expected) in cases {
        assert_eq!(encoded_length(&value), expected.len(), "value {value}");
        let bytes = encode_to_vec(|out| encode(out, &value));
        assert_eq!(bytes, expected, "value {value}");
    }
}

#[test]
fn test_leaf_framing_layout() {
    let tag = Tag::context(2);
    let bytes = encode_to_vec(|out| encode_tlv(out, tag, &300i64));
    assert_eq!(bytes, [0xA2, 0x04, 0x02, 0x02, 0x01, 0x2C]);
    assert_eq!(tlv_length(tag, &300i64), bytes.len());

    let mut input = bytes.as_slice();
    let decoded: i64 = decode_tlv(&mut input, tag).expect("leaf should decode");
    assert_eq!(decoded, 300);
    assert!(input.is_empty());
}

#[test]
fn test_runtime_values_share_the_static_layout() {
    let values = [
        Value::Boolean(false),
        Value::Integer(-42),
        Value::Real(0.25),
        Value::Utf8String("Ember+".into()),
        Value::OctetString(Bytes::from_static(&[0xDE, 0xAD])),
        Value::Null,
        Value::RelativeOid(RelativeOid::new(vec![1, 3, 200])),
    ];
    for value in values {
        let tag = Tag::context(7);
        let bytes = encode_to_vec(|out| encode_tlv(out, tag, &value));
        assert_eq!(bytes.len(), tlv_length(tag, &value));

        let mut input = bytes.as_slice();
        let (outer, outer_length) = decode_header(&mut input).expect("outer header");
        assert_eq!(outer, tag);
        assert!(outer.is_constructed());
        assert_eq!(outer_length, Length::Definite(input.len()));

        let (inner, inner_length) = decode_header(&mut input).expect("inner header");
        let length = inner_length.definite().expect("primitive length is definite");
        let decoded = Value::decode(inner, &mut input, length).expect("value should decode");
        assert_eq!(decoded, value);
    }
}

#[test]
fn test_fixed_buffer_rejects_overflow_without_partial_write() {
    let mut memory = [0u8; 4];
    let mut buffer = FixedBuffer::new(&mut memory);
    buffer.push_slice(&[1, 2, 3]).expect("three bytes fit");

    let err = buffer.push_slice(&[4, 5]).unwrap_err();
    assert!(matches!(err, BerError::BufferOverflow { .. }));
    assert_eq!(buffer.as_slice(), &[1, 2, 3]);

    buffer.push(4).expect("last byte fits");
    assert!(buffer.is_full());
}

#[test]
fn test_dynamic_buffer_grows_on_demand() {
    let mut buffer = DynamicBuffer::with_capacity(2);
    encode_header(&mut buffer, Tag::universal(16).to_constructed(), Length::Definite(300))
        .expect("header should encode");
    buffer
        .push_slice(&[0u8; 300])
        .expect("dynamic buffer should grow");
    assert_eq!(buffer.len(), 4 + 300);
    assert_eq!(&buffer.as_slice()[..4], &[0x30, 0x82, 0x01, 0x2C]);
}

#[test]
fn test_truncated_input_is_reported() {
    let mut input: &[u8] = &[0xA0, 0x05, 0x0C, 0x03, b'a'];
    let err = decode_tlv::<String>(&mut input, Tag::context(0)).unwrap_err();
    assert!(err.is_invalid_encoding(), "unexpected error {err:?}");
}
