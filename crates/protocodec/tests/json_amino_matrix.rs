use protocodec::schemas::{cosmos, dydx};
use protocodec::{
    from_amino, from_amino_msg, from_json, from_partial, to_amino, to_amino_msg, to_json, Duration,
    JsonError, MessageValue, ProtoValue, Timestamp,
};
use serde_json::json;

fn coin(denom: &str, amount: &str) -> ProtoValue {
    ProtoValue::Message(MessageValue::new().with("denom", denom).with("amount", amount))
}

#[test]
fn msg_send_json_matrix() {
    let desc = cosmos::msg_send();
    let value = from_partial(
        &MessageValue::new()
            .with("from_address", "dydx1from")
            .with("to_address", "dydx1to")
            .with("amount", vec![coin("adv4tnt", "1000")]),
        &desc,
    )
    .expect("from_partial must succeed");

    let canonical = to_json(&value, &desc).expect("to_json must succeed");
    assert_eq!(
        canonical,
        json!({
            "fromAddress": "dydx1from",
            "toAddress": "dydx1to",
            "amount": [{"denom": "adv4tnt", "amount": "1000"}],
        })
    );
    let amino = to_amino(&value, &desc).expect("to_amino must succeed");
    assert_eq!(
        amino,
        json!({
            "from_address": "dydx1from",
            "to_address": "dydx1to",
            "amount": [{"denom": "adv4tnt", "amount": "1000"}],
        })
    );
    assert_eq!(from_json(&canonical, &desc).expect("from_json"), value);
    assert_eq!(from_amino(&amino, &desc).expect("from_amino"), value);

    let msg = to_amino_msg(&value, &desc).expect("to_amino_msg must succeed");
    assert_eq!(msg, json!({"type": "cosmos-sdk/MsgSend", "value": amino}));
    assert_eq!(from_amino_msg(&msg, &desc).expect("from_amino_msg"), value);
}

#[test]
fn sixty_four_bit_values_are_strings() {
    let desc = dydx::perpetual_fee_tier();
    let value = from_partial(
        &MessageValue::new()
            .with("name", "1")
            .with("absolute_volume_requirement", u64::MAX)
            .with("maker_fee_ppm", -110i32)
            .with("taker_fee_ppm", 500i32),
        &desc,
    )
    .expect("from_partial must succeed");
    let json = to_json(&value, &desc).expect("to_json must succeed");
    assert_eq!(json["absoluteVolumeRequirement"], json!("18446744073709551615"));
    assert_eq!(json["makerFeePpm"], json!(-110));
    assert_eq!(json["totalVolumeShareRequirementPpm"], json!(0));
    assert_eq!(from_json(&json, &desc).expect("from_json"), value);

    // Numbers are accepted for 64-bit fields on input.
    let numeric = from_json(&json!({"absoluteVolumeRequirement": 5}), &desc).expect("from_json");
    assert_eq!(
        numeric.get("absolute_volume_requirement"),
        Some(&ProtoValue::Uint64(5))
    );
}

#[test]
fn omitted_repeated_fields_read_as_empty() {
    let desc = dydx::prices_genesis_state();
    let value = from_json(&json!({}), &desc).expect("from_json must succeed");
    assert_eq!(value.get("market_params"), Some(&ProtoValue::List(vec![])));
    assert_eq!(value.get("market_prices"), Some(&ProtoValue::List(vec![])));
    assert_eq!(
        to_json(&value, &desc).expect("to_json must succeed"),
        json!({"marketParams": [], "marketPrices": []})
    );
}

#[test]
fn timestamp_and_duration_styles() {
    let info = dydx::block_info();
    let value = MessageValue::new()
        .with("height", 5u32)
        .with("timestamp", Timestamp::new(1_700_000_000, 120_000_000));
    let expected = json!({"height": 5, "timestamp": "2023-11-14T22:13:20.120Z"});
    assert_eq!(to_json(&value, &info).expect("to_json"), expected);
    assert_eq!(to_amino(&value, &info).expect("to_amino"), expected);
    assert_eq!(from_json(&expected, &info).expect("from_json"), value);

    let params = dydx::downtime_params();
    let value = MessageValue::new().with(
        "durations",
        vec![
            ProtoValue::Duration(Duration::new(10, 0)),
            ProtoValue::Duration(Duration::new(0, 250_000_000)),
        ],
    );
    let canonical = to_json(&value, &params).expect("to_json");
    assert_eq!(canonical, json!({"durations": ["10s", "0.250s"]}));
    let amino = to_amino(&value, &params).expect("to_amino");
    assert_eq!(amino, json!({"durations": ["10000000000", "250000000"]}));
    assert_eq!(from_json(&canonical, &params).expect("from_json"), value);
    assert_eq!(from_amino(&amino, &params).expect("from_amino"), value);
}

#[test]
fn enum_styles() {
    let desc = cosmos::msg_vote();
    let value = from_partial(
        &MessageValue::new()
            .with("proposal_id", 12u64)
            .with("option", ProtoValue::Enum(4)),
        &desc,
    )
    .expect("from_partial must succeed");
    let canonical = to_json(&value, &desc).expect("to_json");
    assert_eq!(canonical["option"], json!("VOTE_OPTION_NO_WITH_VETO"));
    let amino = to_amino(&value, &desc).expect("to_amino");
    assert_eq!(amino["option"], json!(4));
    assert_eq!(from_json(&canonical, &desc).expect("from_json"), value);
    assert_eq!(from_amino(&amino, &desc).expect("from_amino"), value);
}

#[test]
fn bytes_fields_use_padded_base64() {
    let desc = dydx::perpetual_position();
    let value = from_partial(
        &MessageValue::new()
            .with("perpetual_id", 1u32)
            .with("quantums", vec![0x03u8, 0x0d, 0x40])
            .with("funding_index", vec![0x01u8]),
        &desc,
    )
    .expect("from_partial must succeed");
    let json = to_amino(&value, &desc).expect("to_amino");
    assert_eq!(json["quantums"], json!("Aw1A"));
    assert_eq!(json["funding_index"], json!("AQ=="));
    assert_eq!(from_amino(&json, &desc).expect("from_amino"), value);
    assert!(matches!(
        from_amino(&json!({"quantums": "%%%"}), &desc),
        Err(JsonError::InvalidBase64 { .. })
    ));
}

#[test]
fn absent_message_fields_are_omitted() {
    let desc = dydx::subaccount();
    let json = to_json(&desc.default_message(), &desc).expect("to_json");
    assert_eq!(
        json,
        json!({"assetPositions": [], "perpetualPositions": [], "marginEnabled": false})
    );
    let with_null = from_json(&json!({"id": null}), &desc).expect("from_json");
    assert!(!with_null.contains("id"));
}

#[test]
fn json_error_matrix() {
    let desc = dydx::market_param();
    let cases = [
        json!({"id": "x"}),
        json!({"id": -1}),
        json!({"id": 4294967296u64}),
        json!({"exponent": 2147483648u64}),
        json!({"pair": 1}),
        json!({"nope": 1}),
        json!("not an object"),
    ];
    for case in cases {
        assert!(from_json(&case, &desc).is_err(), "{case}");
    }
    let timestamp = dydx::block_info();
    assert!(matches!(
        from_json(&json!({"timestamp": "2023-13-01T00:00:00Z"}), &timestamp),
        Err(JsonError::InvalidTimestamp(_))
    ));
    let durations = dydx::downtime_params();
    assert!(matches!(
        from_json(&json!({"durations": ["ten seconds"]}), &durations),
        Err(JsonError::InvalidDuration(_))
    ));
}
