//! dYdX v4 chain messages.

use std::sync::Arc;

use crate::descriptor::{FieldKind, MessageDescriptor};

use super::cosmos::{page_request, page_response};

// ---------------------------------------------------------------- prices

/// Parameters of an oracle market; `exponent` scales the integer price.
pub fn market_param() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new("dydxprotocol.prices.MarketParam")
            .field("id", 1, FieldKind::Uint32)
            .field("pair", 2, FieldKind::String)
            .field("exponent", 3, FieldKind::Sint32)
            .field("min_exchanges", 4, FieldKind::Uint32)
            .field("min_price_change_ppm", 5, FieldKind::Uint32)
            .field("exchange_config_json", 6, FieldKind::String),
    )
}

pub fn market_price() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new("dydxprotocol.prices.MarketPrice")
            .field("id", 1, FieldKind::Uint32)
            .field("exponent", 2, FieldKind::Sint32)
            .field("price", 3, FieldKind::Uint64),
    )
}

pub fn prices_genesis_state() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new("dydxprotocol.prices.GenesisState")
            .repeated("market_params", 1, FieldKind::Message(market_param()))
            .repeated("market_prices", 2, FieldKind::Message(market_price())),
    )
}

pub fn query_all_market_params_request() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new("dydxprotocol.prices.QueryAllMarketParamsRequest")
            .field("pagination", 1, FieldKind::Message(page_request())),
    )
}

pub fn query_all_market_params_response() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new("dydxprotocol.prices.QueryAllMarketParamsResponse")
            .repeated("market_params", 1, FieldKind::Message(market_param()))
            .field("pagination", 2, FieldKind::Message(page_response())),
    )
}

// ---------------------------------------------------------------- subaccounts

pub fn subaccount_id() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new("dydxprotocol.subaccounts.SubaccountId")
            .field("owner", 1, FieldKind::String)
            .field("number", 2, FieldKind::Uint32),
    )
}

/// `quantums` is a serialized big integer and stays opaque bytes.
pub fn asset_position() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new("dydxprotocol.subaccounts.AssetPosition")
            .field("asset_id", 1, FieldKind::Uint32)
            .field("quantums", 2, FieldKind::Bytes)
            .field("index", 3, FieldKind::Uint64),
    )
}

pub fn perpetual_position() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new("dydxprotocol.subaccounts.PerpetualPosition")
            .field("perpetual_id", 1, FieldKind::Uint32)
            .field("quantums", 2, FieldKind::Bytes)
            .field("funding_index", 3, FieldKind::Bytes),
    )
}

pub fn subaccount() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new("dydxprotocol.subaccounts.Subaccount")
            .field("id", 1, FieldKind::Message(subaccount_id()))
            .repeated("asset_positions", 2, FieldKind::Message(asset_position()))
            .repeated("perpetual_positions", 3, FieldKind::Message(perpetual_position()))
            .field("margin_enabled", 4, FieldKind::Bool),
    )
}

// ---------------------------------------------------------------- blocktime

pub fn block_info() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new("dydxprotocol.blocktime.BlockInfo")
            .field("height", 1, FieldKind::Uint32)
            .field("timestamp", 2, FieldKind::Timestamp),
    )
}

pub fn downtime_params() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new("dydxprotocol.blocktime.DowntimeParams")
            .repeated("durations", 1, FieldKind::Duration),
    )
}

// ---------------------------------------------------------------- feetiers

pub fn perpetual_fee_tier() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new("dydxprotocol.feetiers.PerpetualFeeTier")
            .field("name", 1, FieldKind::String)
            .field("absolute_volume_requirement", 2, FieldKind::Uint64)
            .field("total_volume_share_requirement_ppm", 3, FieldKind::Uint32)
            .field("maker_volume_share_requirement_ppm", 4, FieldKind::Uint32)
            .field("maker_fee_ppm", 5, FieldKind::Sint32)
            .field("taker_fee_ppm", 6, FieldKind::Sint32),
    )
}

pub fn perpetual_fee_params() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new("dydxprotocol.feetiers.PerpetualFeeParams")
            .repeated("tiers", 1, FieldKind::Message(perpetual_fee_tier())),
    )
}

// ---------------------------------------------------------------- perpetuals

/// Non-zero premium samples of one market, written as packed `sint32`.
pub fn market_premiums() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new("dydxprotocol.perpetuals.MarketPremiums")
            .field("perpetual_id", 1, FieldKind::Uint32)
            .repeated("premiums", 2, FieldKind::Sint32),
    )
}

pub fn premium_store() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new("dydxprotocol.perpetuals.PremiumStore")
            .repeated("all_market_premiums", 1, FieldKind::Message(market_premiums()))
            .field("num_premiums", 2, FieldKind::Uint32),
    )
}

pub fn all() -> Vec<Arc<MessageDescriptor>> {
    vec![
        market_param(),
        market_price(),
        prices_genesis_state(),
        query_all_market_params_request(),
        query_all_market_params_response(),
        subaccount_id(),
        asset_position(),
        perpetual_position(),
        subaccount(),
        block_info(),
        downtime_params(),
        perpetual_fee_tier(),
        perpetual_fee_params(),
        market_premiums(),
        premium_store(),
    ]
}
