//! cosmos-sdk messages.

use std::sync::Arc;

use crate::descriptor::{EnumDescriptor, FieldKind, MessageDescriptor};

pub fn coin() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new("cosmos.base.v1beta1.Coin")
            .field("denom", 1, FieldKind::String)
            .field("amount", 2, FieldKind::String),
    )
}

pub fn msg_send() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new("cosmos.bank.v1beta1.MsgSend")
            .field("from_address", 1, FieldKind::String)
            .field("to_address", 2, FieldKind::String)
            .repeated("amount", 3, FieldKind::Message(coin()))
            .with_amino_name("cosmos-sdk/MsgSend"),
    )
}

/// Pagination cursor of list queries.
pub fn page_request() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new("cosmos.base.query.v1beta1.PageRequest")
            .field("key", 1, FieldKind::Bytes)
            .field("offset", 2, FieldKind::Uint64)
            .field("limit", 3, FieldKind::Uint64)
            .field("count_total", 4, FieldKind::Bool)
            .field("reverse", 5, FieldKind::Bool),
    )
}

pub fn page_response() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new("cosmos.base.query.v1beta1.PageResponse")
            .field("next_key", 1, FieldKind::Bytes)
            .field("total", 2, FieldKind::Uint64),
    )
}

pub fn basic_allowance() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new("cosmos.feegrant.v1beta1.BasicAllowance")
            .repeated("spend_limit", 1, FieldKind::Message(coin()))
            .field("expiration", 2, FieldKind::Timestamp)
            .with_amino_name("cosmos-sdk/BasicAllowance"),
    )
}

pub fn staking_params() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new("cosmos.staking.v1beta1.Params")
            .field("unbonding_time", 1, FieldKind::Duration)
            .field("max_validators", 2, FieldKind::Uint32)
            .field("max_entries", 3, FieldKind::Uint32)
            .field("historical_entries", 4, FieldKind::Uint32)
            .field("bond_denom", 5, FieldKind::String)
            .field("min_commission_rate", 6, FieldKind::String)
            .with_amino_name("cosmos-sdk/x/staking/Params"),
    )
}

pub fn vote_option() -> Arc<EnumDescriptor> {
    Arc::new(EnumDescriptor::new(
        "cosmos.gov.v1.VoteOption",
        &[
            ("VOTE_OPTION_UNSPECIFIED", 0),
            ("VOTE_OPTION_YES", 1),
            ("VOTE_OPTION_ABSTAIN", 2),
            ("VOTE_OPTION_NO", 3),
            ("VOTE_OPTION_NO_WITH_VETO", 4),
        ],
    ))
}

pub fn msg_vote() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new("cosmos.gov.v1.MsgVote")
            .field("proposal_id", 1, FieldKind::Uint64)
            .field("voter", 2, FieldKind::String)
            .field("option", 3, FieldKind::Enum(vote_option()))
            .field("metadata", 4, FieldKind::String)
            .with_amino_name("cosmos-sdk/v1/MsgVote"),
    )
}

pub fn all() -> Vec<Arc<MessageDescriptor>> {
    vec![
        coin(),
        msg_send(),
        page_request(),
        page_response(),
        basic_allowance(),
        staking_params(),
        msg_vote(),
    ]
}
