use std::collections::BTreeMap;
use std::sync::Arc;

use proptest::collection::{btree_map, vec};
use proptest::option;
use proptest::prelude::*;
use protocodec::schemas::cosmos;
use protocodec::{
    from_amino, from_json, from_partial, to_amino, to_json, Duration, EnumDescriptor, FieldKind,
    MapKey, MessageDescriptor, MessageValue, ProtoDecoder, ProtoEncoder, ProtoValue, Timestamp,
};

fn everything() -> MessageDescriptor {
    let status = Arc::new(EnumDescriptor::new(
        "test.Status",
        &[("STATUS_UNSPECIFIED", 0), ("STATUS_OK", 1), ("STATUS_FAILED", 2)],
    ));
    MessageDescriptor::new("test.Everything")
        .field("f_double", 1, FieldKind::Double)
        .field("f_float", 2, FieldKind::Float)
        .field("f_int32", 3, FieldKind::Int32)
        .field("f_int64", 4, FieldKind::Int64)
        .field("f_uint32", 5, FieldKind::Uint32)
        .field("f_uint64", 6, FieldKind::Uint64)
        .field("f_sint32", 7, FieldKind::Sint32)
        .field("f_sint64", 8, FieldKind::Sint64)
        .field("f_fixed32", 9, FieldKind::Fixed32)
        .field("f_fixed64", 10, FieldKind::Fixed64)
        .field("f_sfixed32", 11, FieldKind::Sfixed32)
        .field("f_sfixed64", 12, FieldKind::Sfixed64)
        .field("f_bool", 13, FieldKind::Bool)
        .field("f_string", 14, FieldKind::String)
        .field("f_bytes", 15, FieldKind::Bytes)
        .field("f_enum", 16, FieldKind::Enum(status))
        .field("f_coin", 17, FieldKind::Message(cosmos::coin()))
        .field("f_time", 18, FieldKind::Timestamp)
        .field("f_span", 19, FieldKind::Duration)
        .optional("f_maybe", 20, FieldKind::Int32)
        .repeated("r_sint64", 21, FieldKind::Sint64)
        .repeated("r_string", 22, FieldKind::String)
        .repeated("r_coin", 23, FieldKind::Message(cosmos::coin()))
        .map("m_balances", 24, FieldKind::String, FieldKind::Uint64)
        .map("m_by_id", 25, FieldKind::Sint32, FieldKind::Message(cosmos::coin()))
}

fn coin_strategy() -> impl Strategy<Value = ProtoValue> {
    ("[a-z]{0,8}", "[0-9]{0,12}").prop_map(|(denom, amount)| {
        ProtoValue::Message(
            MessageValue::new()
                .with("denom", denom)
                .with("amount", amount),
        )
    })
}

fn timestamp_strategy() -> impl Strategy<Value = Timestamp> {
    (-62_135_596_800i64..=253_402_300_799, 0i32..1_000_000_000)
        .prop_map(|(seconds, nanos)| Timestamp::new(seconds, nanos))
}

fn duration_strategy() -> impl Strategy<Value = Duration> {
    (-315_576_000_000i64..=315_576_000_000, 0i32..1_000_000_000).prop_map(|(seconds, nanos)| {
        if seconds < 0 {
            Duration::new(seconds, -nanos)
        } else {
            Duration::new(seconds, nanos)
        }
    })
}

fn scalars() -> impl Strategy<Value = MessageValue> {
    (
        -1e12f64..1e12,
        -1e6f32..1e6,
        any::<i32>(),
        any::<i64>(),
        any::<u32>(),
        any::<u64>(),
        any::<i32>(),
        any::<i64>(),
        any::<u32>(),
        any::<u64>(),
        any::<i32>(),
        any::<i64>(),
    )
        .prop_map(|(d, f, i32a, i64a, u32a, u64a, s32, s64, x32, x64, sx32, sx64)| {
            MessageValue::new()
                .with("f_double", d)
                .with("f_float", f)
                .with("f_int32", i32a)
                .with("f_int64", i64a)
                .with("f_uint32", u32a)
                .with("f_uint64", u64a)
                .with("f_sint32", s32)
                .with("f_sint64", s64)
                .with("f_fixed32", x32)
                .with("f_fixed64", x64)
                .with("f_sfixed32", sx32)
                .with("f_sfixed64", sx64)
        })
}

fn everything_strategy() -> impl Strategy<Value = MessageValue> {
    let rest = (
        any::<bool>(),
        ".{0,16}",
        vec(any::<u8>(), 0..24),
        -3i32..6,
        option::of(coin_strategy()),
        option::of(timestamp_strategy()),
        option::of(duration_strategy()),
        option::of(any::<i32>()),
        vec(any::<i64>(), 0..6),
        vec(".{0,6}", 0..4),
        vec(coin_strategy(), 0..3),
        (
            btree_map("[a-z]{0,5}", any::<u64>(), 0..4),
            btree_map(any::<i32>(), coin_strategy(), 0..3),
        ),
    );
    (scalars(), rest).prop_map(
        |(mut value, (b, s, bytes, e, coin, time, span, maybe, r64, rstr, rcoin, (balances, by_id)))| {
            value.set("f_bool", b);
            value.set("f_string", s);
            value.set("f_bytes", bytes);
            value.set("f_enum", ProtoValue::Enum(e));
            if let Some(coin) = coin {
                value.set("f_coin", coin);
            }
            if let Some(time) = time {
                value.set("f_time", time);
            }
            if let Some(span) = span {
                value.set("f_span", span);
            }
            if let Some(maybe) = maybe {
                value.set("f_maybe", maybe);
            }
            value.set(
                "r_sint64",
                r64.into_iter().map(ProtoValue::Int64).collect::<Vec<_>>(),
            );
            value.set(
                "r_string",
                rstr.into_iter().map(ProtoValue::String).collect::<Vec<_>>(),
            );
            value.set("r_coin", rcoin);
            let balances: BTreeMap<_, _> = balances
                .into_iter()
                .map(|(k, v)| (MapKey::String(k), ProtoValue::Uint64(v)))
                .collect();
            value.set("m_balances", ProtoValue::Map(balances));
            let by_id: BTreeMap<_, _> = by_id
                .into_iter()
                .map(|(k, v)| (MapKey::Int(k as i64), v))
                .collect();
            value.set("m_by_id", ProtoValue::Map(by_id));
            value
        },
    )
}

proptest! {
    #[test]
    fn wire_roundtrip_is_identity(value in everything_strategy()) {
        let desc = everything();
        let value = from_partial(&value, &desc).expect("from_partial must succeed");
        let bytes = ProtoEncoder::new().encode(&value, &desc).expect("encode must succeed");
        let decoded = ProtoDecoder::new().decode(&bytes, &desc).expect("decode must succeed");
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn json_roundtrip_is_identity(value in everything_strategy()) {
        let desc = everything();
        let value = from_partial(&value, &desc).expect("from_partial must succeed");
        let json = to_json(&value, &desc).expect("to_json must succeed");
        prop_assert_eq!(from_json(&json, &desc).expect("from_json must succeed"), value);
    }

    #[test]
    fn amino_roundtrip_is_identity(value in everything_strategy()) {
        let desc = everything();
        let value = from_partial(&value, &desc).expect("from_partial must succeed");
        let json = to_amino(&value, &desc).expect("to_amino must succeed");
        prop_assert_eq!(from_amino(&json, &desc).expect("from_amino must succeed"), value);
    }

    #[test]
    fn decoding_arbitrary_bytes_never_panics(data in vec(any::<u8>(), 0..64)) {
        let _ = ProtoDecoder::new().decode(&data, &everything());
    }

    #[test]
    fn encoding_is_deterministic(value in everything_strategy()) {
        let desc = everything();
        let mut encoder = ProtoEncoder::new();
        let first = encoder.encode(&value, &desc).expect("encode must succeed");
        let second = encoder.encode(&value, &desc).expect("encode must succeed");
        prop_assert_eq!(first, second);
    }
}
