use std::sync::Arc;

use protocodec::schemas::{cosmos, dydx};
use protocodec::{
    from_partial, CodecConfig, DecodeError, FieldKind, MessageDescriptor, MessageValue,
    ProtoDecoder, ProtoEncoder, ProtoValue, Reader, Timestamp, WireType, Writer,
};

fn market_param_value() -> MessageValue {
    MessageValue::new()
        .with("id", 1u32)
        .with("pair", "BTC-USD")
        .with("exponent", -5i32)
        .with("min_exchanges", 3u32)
        .with("min_price_change_ppm", 50u32)
        .with("exchange_config_json", "{}")
}

#[test]
fn market_param_concrete_bytes_matrix() {
    let desc = dydx::market_param();
    let bytes = ProtoEncoder::new()
        .encode(&market_param_value(), &desc)
        .expect("encode must succeed");
    assert_eq!(
        bytes,
        [
            0x08, 0x01, 0x12, 0x07, 0x42, 0x54, 0x43, 0x2d, 0x55, 0x53, 0x44, 0x18, 0x09, 0x20,
            0x03, 0x28, 0x32, 0x32, 0x02, 0x7b, 0x7d,
        ]
    );
    let decoded = ProtoDecoder::new()
        .decode(&bytes, &desc)
        .expect("decode must succeed");
    assert_eq!(decoded, market_param_value());
}

#[test]
fn default_message_encodes_empty_matrix() {
    for desc in [
        dydx::market_param(),
        dydx::market_price(),
        dydx::subaccount(),
        dydx::perpetual_fee_tier(),
        cosmos::msg_send(),
        cosmos::page_request(),
    ] {
        let bytes = ProtoEncoder::new()
            .encode(&desc.default_message(), &desc)
            .expect("encode must succeed");
        assert!(bytes.is_empty(), "{} encoded defaults", desc.full_name);
        let decoded = ProtoDecoder::new()
            .decode(&[], &desc)
            .expect("decode must succeed");
        assert_eq!(decoded, desc.default_message(), "{}", desc.full_name);
    }
}

#[test]
fn unknown_fields_of_every_wire_type_are_skipped() {
    let desc = dydx::market_price();
    let known = from_partial(
        &MessageValue::new()
            .with("id", 7u32)
            .with("exponent", -9i32)
            .with("price", 5_000_000_000u64),
        &desc,
    )
    .expect("from_partial must succeed");
    let known_bytes = ProtoEncoder::new()
        .encode(&known, &desc)
        .expect("encode must succeed");

    let mut writer = Writer::new();
    writer.tag(20, WireType::Varint).uint64(u64::MAX);
    writer.buf(&known_bytes[..2]);
    writer.tag(21, WireType::Fixed64).fixed64(42);
    writer.tag(22, WireType::LengthDelimited).string("future");
    writer.buf(&known_bytes[2..]);
    writer.tag(23, WireType::Fixed32).fixed32(42);
    writer.tag(24, WireType::StartGroup);
    writer.tag(1, WireType::Varint).uint32(1);
    writer.tag(24, WireType::EndGroup);
    let extended = writer.finish().expect("finish must succeed");

    let decoded = ProtoDecoder::new()
        .decode(&extended, &desc)
        .expect("decode must succeed");
    assert_eq!(decoded, known);
}

#[test]
fn packed_and_unpacked_repeated_decode_identically() {
    let desc = dydx::market_premiums();
    let premiums = [-3i32, 0, 250, i32::MIN];

    let mut packed = Writer::new();
    packed.tag(2, WireType::LengthDelimited).fork();
    for p in premiums {
        packed.sint32(p);
    }
    packed.ldelim().expect("ldelim must succeed");
    let packed = packed.finish().expect("finish must succeed");

    let mut unpacked = Writer::new();
    for p in premiums {
        unpacked.tag(2, WireType::Varint).sint32(p);
    }
    let unpacked = unpacked.finish().expect("finish must succeed");

    let decoder = ProtoDecoder::new();
    let a = decoder.decode(&packed, &desc).expect("packed must decode");
    let b = decoder.decode(&unpacked, &desc).expect("unpacked must decode");
    assert_eq!(a, b);
    assert_eq!(
        a.get("premiums"),
        Some(&ProtoValue::List(
            premiums.iter().copied().map(ProtoValue::Int32).collect()
        ))
    );
    // The encoder always writes the packed form.
    let reencoded = ProtoEncoder::new().encode(&b, &desc).expect("encode must succeed");
    assert_eq!(reencoded, packed);
}

#[test]
fn nested_length_prefix_matches_payload() {
    let desc = dydx::prices_genesis_state();
    let long_config = "x".repeat(16 * 1024);
    let param = market_param_value().with("exchange_config_json", long_config.as_str());
    let value = MessageValue::new()
        .with("market_params", vec![ProtoValue::Message(param)])
        .with("market_prices", Vec::<ProtoValue>::new());
    let bytes = ProtoEncoder::new().encode(&value, &desc).expect("encode must succeed");

    let mut reader = Reader::new(&bytes);
    assert_eq!(
        reader.read_tag().expect("tag"),
        (1, WireType::LengthDelimited)
    );
    let len = reader.read_len().expect("len");
    assert_eq!(reader.pos() + len, bytes.len());
    // 16 KiB needs a three-byte inner length prefix; the outer one too.
    assert_eq!(reader.pos(), 1 + 3);

    let decoded = ProtoDecoder::new().decode(&bytes, &desc).expect("decode must succeed");
    assert_eq!(decoded, value);
}

#[test]
fn two_level_nested_prefixes_match_payload() {
    let inner =
        Arc::new(MessageDescriptor::new("test.Inner").field("payload", 1, FieldKind::String));
    let middle = Arc::new(
        MessageDescriptor::new("test.Middle")
            .field("label", 1, FieldKind::String)
            .field("inner", 2, FieldKind::Message(inner)),
    );
    let outer =
        MessageDescriptor::new("test.Outer").field("middle", 1, FieldKind::Message(middle));

    let payload = "p".repeat(16 * 1024);
    let value = MessageValue::new().with(
        "middle",
        MessageValue::new()
            .with("label", "mid")
            .with("inner", MessageValue::new().with("payload", payload.as_str())),
    );
    let bytes = ProtoEncoder::new()
        .encode(&value, &outer)
        .expect("encode must succeed");

    // inner: 1 + 3 + 16384; middle: 5 + 1 + 3 + 16388; outer: 1 + 3 + 16397
    assert_eq!(bytes.len(), 16_401);
    let mut reader = Reader::new(&bytes);
    assert_eq!(reader.read_tag().expect("tag"), (1, WireType::LengthDelimited));
    let middle_len = reader.read_len().expect("len");
    assert_eq!(middle_len, 16_397);
    let middle_end = reader.pos() + middle_len;
    assert_eq!(middle_end, bytes.len());

    assert_eq!(reader.read_tag().expect("tag"), (1, WireType::LengthDelimited));
    assert_eq!(reader.read_string().expect("label"), "mid");
    assert_eq!(reader.read_tag().expect("tag"), (2, WireType::LengthDelimited));
    let inner_len = reader.read_len().expect("len");
    assert_eq!(inner_len, 16_388);
    assert_eq!(reader.pos() + inner_len, middle_end);

    assert_eq!(reader.read_tag().expect("tag"), (1, WireType::LengthDelimited));
    assert_eq!(reader.read_string().expect("payload"), payload);
    assert!(reader.is_empty());

    let decoded = ProtoDecoder::new()
        .decode(&bytes, &outer)
        .expect("decode must succeed");
    assert_eq!(decoded, value);
}

#[test]
fn nested_unknown_groups_are_bounded() {
    let desc = dydx::market_price();
    let hostile = [0xa3u8, 0x01].repeat(2_000_000);
    assert_eq!(
        ProtoDecoder::new().decode(&hostile, &desc),
        Err(DecodeError::RecursionLimitExceeded(100))
    );

    let shallow = ProtoDecoder::with_config(CodecConfig {
        recursion_limit: 2,
        ..CodecConfig::default()
    });
    let three_deep = [
        0xa3, 0x01, 0xa3, 0x01, 0xa3, 0x01, //
        0xa4, 0x01, 0xa4, 0x01, 0xa4, 0x01,
    ];
    assert_eq!(
        shallow.decode(&three_deep, &desc),
        Err(DecodeError::RecursionLimitExceeded(2))
    );
    let decoded = ProtoDecoder::new()
        .decode(&three_deep, &desc)
        .expect("decode must succeed");
    assert_eq!(decoded, desc.default_message());

    // An end-group that does not close its own group.
    assert_eq!(
        ProtoDecoder::new().decode(&[0xa3, 0x01, 0xac, 0x01], &desc),
        Err(DecodeError::UnexpectedEndGroup(21))
    );
    assert_eq!(
        ProtoDecoder::new().decode(&[0xa4, 0x01], &desc),
        Err(DecodeError::UnexpectedEndGroup(20))
    );
}

#[test]
fn decode_failure_matrix() {
    let inner = Arc::new(MessageDescriptor::new("test.Inner").field("a", 1, FieldKind::Uint32));
    let outer = MessageDescriptor::new("test.Outer").field("inner", 1, FieldKind::Message(inner));
    let decoder = ProtoDecoder::new();

    let cases: [(&[u8], DecodeError); 7] = [
        (
            &[0x0a, 0x02, 0x08, 0x96, 0x01][..],
            DecodeError::OverrunMessage {
                message: "test.Inner".into(),
                overrun: 1,
            },
        ),
        (
            &[0x0a, 0x05, 0x08][..],
            DecodeError::TruncatedMessage {
                len: 5,
                remaining: 1,
            },
        ),
        (&[0x0a, 0x01, 0x08][..], DecodeError::UnexpectedEof),
        (&[0x80; 11][..], DecodeError::MalformedVarint),
        (&[0x0e][..], DecodeError::InvalidWireType(6)),
        (&[0x00][..], DecodeError::InvalidFieldNumber),
        (
            &[0x08, 0x01][..],
            DecodeError::WireTypeMismatch {
                message: "test.Outer".into(),
                field: "inner".into(),
                wire_type: 0,
            },
        ),
    ];
    for (input, expected) in cases {
        assert_eq!(decoder.decode(input, &outer), Err(expected), "{input:02x?}");
    }
}

#[test]
fn invalid_utf8_in_string_field() {
    let desc = dydx::subaccount_id();
    assert_eq!(
        ProtoDecoder::new().decode(&[0x0a, 0x02, 0xc3, 0x28], &desc),
        Err(DecodeError::InvalidUtf8)
    );
}

#[test]
fn block_info_timestamp_wire_form() {
    let desc = dydx::block_info();
    let value = MessageValue::new()
        .with("height", 10u32)
        .with("timestamp", Timestamp::new(1_700_000_000, 0));
    let bytes = ProtoEncoder::new().encode(&value, &desc).expect("encode must succeed");
    assert_eq!(
        bytes,
        [0x08, 0x0a, 0x12, 0x06, 0x08, 0x80, 0xe2, 0xcf, 0xaa, 0x06]
    );
    assert_eq!(
        ProtoDecoder::new().decode(&bytes, &desc).expect("decode must succeed"),
        value
    );
}

#[test]
fn subaccount_nested_roundtrip() {
    let desc = dydx::subaccount();
    let partial = MessageValue::new()
        .with(
            "id",
            MessageValue::new().with("owner", "dydx1owner").with("number", 0u32),
        )
        .with(
            "asset_positions",
            vec![ProtoValue::Message(
                MessageValue::new()
                    .with("asset_id", 0u32)
                    .with("quantums", vec![0x02u8, 0x54, 0x0b, 0xe4, 0x00]),
            )],
        )
        .with("margin_enabled", true);
    let value = from_partial(&partial, &desc).expect("from_partial must succeed");
    let bytes = ProtoEncoder::new().encode(&value, &desc).expect("encode must succeed");
    let decoded = ProtoDecoder::new().decode(&bytes, &desc).expect("decode must succeed");
    assert_eq!(decoded, value);
    // An empty `number` is still an explicit `id` message.
    assert_eq!(&bytes[..2], &[0x0a, 0x0c]);
}
