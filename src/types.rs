use serde::{Deserialize, Serialize};

use crate::{ManapoolError, Result, Timestamp};

/// Largest page the seller inventory endpoint returns.
pub const MAX_INVENTORY_PAGE: u32 = 500;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    pub username: String,
    pub email: String,
    pub verified: bool,
    pub singles_live: bool,
    pub sealed_live: bool,
    pub payouts_enabled: bool,
}

/// Body of `PUT account`. `None` fields are sent as `null`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerAccountUpdate {
    pub singles_live: Option<bool>,
    pub sealed_live: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub total: u64,
    pub returned: u64,
    pub offset: u64,
    pub limit: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryResponse {
    pub inventory: Vec<InventoryItem>,
    pub pagination: Pagination,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryItem {
    pub id: String,
    pub product_type: String,
    pub product_id: String,
    pub product: Product,
    pub price_cents: i64,
    pub quantity: i64,
    pub effective_as_of: Option<Timestamp>,
}

impl InventoryItem {
    pub fn price_dollars(&self) -> f64 {
        self.price_cents as f64 / 100.0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub tcgplayer_sku: Option<i64>,
    pub single: Option<Single>,
    pub sealed: Option<Sealed>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Single {
    pub scryfall_id: String,
    pub mtgjson_id: String,
    pub tcgplayer_id: Option<i64>,
    pub name: String,
    pub set: String,
    pub number: String,
    pub language_id: String,
    pub condition_id: String,
    pub finish_id: String,
}

impl Single {
    /// Human-readable condition, e.g. `"Near Mint Foil"`.
    pub fn condition_name(&self) -> String {
        let condition = match self.condition_id.as_str() {
            "NM" => "Near Mint",
            "LP" => "Lightly Played",
            "MP" => "Moderately Played",
            "HP" => "Heavily Played",
            "DMG" => "Damaged",
            _ => "Unknown",
        };
        match self.finish_id.as_str() {
            "FO" | "EF" => format!("{condition} Foil"),
            _ => condition.to_owned(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sealed {
    pub mtgjson_id: String,
    pub tcgplayer_id: Option<i64>,
    pub name: String,
    pub set: String,
    pub language_id: String,
}

/// Paging for `GET seller/inventory`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InventoryOptions {
    /// Page size; 0 selects the maximum of 500.
    pub limit: u32,
    pub offset: u32,
}

impl InventoryOptions {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    /// Rejects out-of-range pages and fills in the default limit.
    pub fn validate(self) -> Result<Self> {
        if self.limit > MAX_INVENTORY_PAGE {
            return Err(ManapoolError::validation(
                "limit",
                format!(
                    "limit must not exceed {MAX_INVENTORY_PAGE}, got {}",
                    self.limit
                ),
            ));
        }
        let limit = if self.limit == 0 {
            MAX_INVENTORY_PAGE
        } else {
            self.limit
        };
        Ok(Self { limit, ..self })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryItemsResponse {
    pub inventory: Vec<InventoryItem>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryListingResponse {
    pub inventory: InventoryItem,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryListingsResponse {
    pub inventory_items: Vec<InventoryItem>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryItemResponse {
    pub inventory_item: InventoryItem,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryUpdateRequest {
    pub price_cents: i64,
    pub quantity: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryBulkItemBySku {
    pub tcgplayer_sku: i64,
    pub price_cents: i64,
    pub quantity: i64,
}

/// Optional filters for lookups by Scryfall or TCGPlayer ID.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InventoryLookupOptions {
    pub language_id: Option<String>,
    pub finish_id: Option<String>,
    pub condition_id: Option<String>,
}

impl InventoryLookupOptions {
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("language_id", &self.language_id),
            ("finish_id", &self.finish_id),
            ("condition_id", &self.condition_id),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .filter(|value| !value.is_empty())
                .map(|value| (key, value.to_owned()))
        })
        .collect()
    }
}

/// Filters for `GET seller/orders`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrdersOptions {
    pub since: Option<Timestamp>,
    pub is_unfulfilled: Option<bool>,
    pub is_fulfilled: Option<bool>,
    pub has_fulfillments: Option<bool>,
    pub label: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl OrdersOptions {
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(since) = &self.since {
            pairs.push(("since", since.to_rfc3339()));
        }
        if let Some(value) = self.is_unfulfilled {
            pairs.push(("is_unfulfilled", value.to_string()));
        }
        if let Some(value) = self.is_fulfilled {
            pairs.push(("is_fulfilled", value.to_string()));
        }
        if let Some(value) = self.has_fulfillments {
            pairs.push(("has_fulfillments", value.to_string()));
        }
        if let Some(label) = self.label.as_deref().filter(|label| !label.is_empty()) {
            pairs.push(("label", label.to_owned()));
        }
        if let Some(limit) = self.limit.filter(|limit| *limit > 0) {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset.filter(|offset| *offset > 0) {
            pairs.push(("offset", offset.to_string()));
        }
        pairs
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrdersResponse {
    pub orders: Vec<OrderSummary>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderSummary {
    pub id: String,
    pub created_at: Option<Timestamp>,
    pub label: String,
    pub total_cents: i64,
    pub shipping_method: String,
    pub latest_fulfillment_status: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderDetailsResponse {
    pub order: OrderDetails,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderDetails {
    #[serde(flatten)]
    pub summary: OrderSummary,
    pub buyer_id: String,
    pub shipping_address: Address,
    pub payment: OrderPayment,
    pub fulfillments: Vec<OrderFulfillment>,
    pub items: Vec<OrderItem>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line3: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderPayment {
    pub subtotal_cents: i64,
    pub shipping_cents: i64,
    pub total_cents: i64,
    pub fee_cents: i64,
    pub net_cents: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderFulfillment {
    pub status: Option<String>,
    pub tracking_company: Option<String>,
    pub tracking_number: Option<String>,
    pub tracking_url: Option<String>,
    pub in_transit_at: Option<Timestamp>,
    pub estimated_delivery_at: Option<Timestamp>,
    pub delivered_at: Option<Timestamp>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderItem {
    pub tcgsku: Option<i64>,
    pub product_id: String,
    pub product_type: String,
    pub product: Product,
    pub quantity: i64,
    pub price_cents: i64,
}

/// Body of the fulfillment update endpoints. Same shape as
/// [`OrderFulfillment`]; `None` fields are sent as `null`.
pub type OrderFulfillmentRequest = OrderFulfillment;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderFulfillmentResponse {
    pub fulfillment: OrderFulfillment,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderReportsResponse {
    pub reports: Vec<OrderReport>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderReport {
    pub report_id: String,
    pub order_id: String,
    pub order_reported_issues: OrderReportedIssues,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderReportedIssues {
    pub comment: Option<String>,
    pub created_at: Option<Timestamp>,
    pub proposed_remediation_method: Option<String>,
    pub reporter_role: String,
    #[serde(rename = "is_nondelivery_report")]
    pub is_non_delivery_report: bool,
    pub rescinded: bool,
    pub items: Vec<OrderReportedItem>,
    pub remediations: Vec<OrderReportedRemediation>,
    pub charges: Vec<OrderReportedCharge>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderReportedItem {
    pub order_item_id: String,
    pub quantity: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderReportedRemediation {
    pub remediation_expense_cents: Option<i64>,
    pub comment: Option<String>,
    pub created_at: Option<Timestamp>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderReportedCharge {
    pub seller_charge_cents: Option<i64>,
    pub payout_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Webhook {
    pub id: String,
    pub topic: String,
    pub callback_url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhooksResponse {
    pub webhooks: Vec<Webhook>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookRegisterRequest {
    pub topic: String,
    pub callback_url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricesMeta {
    pub as_of: Option<Timestamp>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinglesPricesList {
    pub meta: PricesMeta,
    pub data: Vec<SinglePriceListing>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinglePriceListing {
    pub url: String,
    pub name: String,
    pub set_code: String,
    pub number: String,
    pub multiverse_id: Option<String>,
    pub scryfall_id: String,
    pub available_quantity: i64,
    pub price_cents: Option<i64>,
    pub price_cents_lp_plus: Option<i64>,
    pub price_cents_nm: Option<i64>,
    pub price_cents_foil: Option<i64>,
    pub price_cents_lp_plus_foil: Option<i64>,
    pub price_cents_nm_foil: Option<i64>,
    pub price_cents_etched: Option<i64>,
    pub price_cents_lp_plus_etched: Option<i64>,
    pub price_cents_nm_etched: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantPricesList {
    pub meta: PricesMeta,
    pub data: Vec<VariantPriceListing>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantPriceListing {
    pub url: String,
    pub product_type: String,
    pub product_id: String,
    pub set_code: String,
    pub number: String,
    pub name: String,
    pub scryfall_id: String,
    pub tcgplayer_product_id: Option<i64>,
    pub language_id: String,
    pub condition_id: Option<String>,
    pub finish_id: Option<String>,
    pub low_price: i64,
    pub available_quantity: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SealedPricesList {
    pub meta: PricesMeta,
    pub data: Vec<SealedPriceListing>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SealedPriceListing {
    pub url: String,
    pub product_type: String,
    pub product_id: String,
    pub set_code: String,
    pub name: String,
    pub tcgplayer_product_id: Option<i64>,
    pub language_id: String,
    pub low_price: i64,
    pub available_quantity: i64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        InventoryItem, InventoryLookupOptions, InventoryOptions, InventoryUpdateRequest,
        ManapoolError, OrderDetailsResponse, OrdersOptions, Single, Timestamp,
    };

    fn single(condition: &str, finish: &str) -> Single {
        Single {
            condition_id: condition.to_owned(),
            finish_id: finish.to_owned(),
            ..Single::default()
        }
    }

    #[test]
    fn condition_names() {
        assert_eq!(single("NM", "NF").condition_name(), "Near Mint");
        assert_eq!(single("LP", "FO").condition_name(), "Lightly Played Foil");
        assert_eq!(single("DMG", "EF").condition_name(), "Damaged Foil");
        assert_eq!(single("??", "").condition_name(), "Unknown");
    }

    #[test]
    fn price_in_dollars() {
        let item = InventoryItem {
            price_cents: 1_299,
            ..InventoryItem::default()
        };
        assert_eq!(item.price_dollars(), 12.99);
    }

    #[test]
    fn inventory_options_default_and_bounds() {
        assert_eq!(
            InventoryOptions::default().validate().expect("valid"),
            InventoryOptions::new(500, 0)
        );
        assert_eq!(
            InventoryOptions::new(50, 100).validate().expect("valid"),
            InventoryOptions::new(50, 100)
        );
        let err = InventoryOptions::new(501, 0).validate().expect_err("too large");
        assert!(matches!(err, ManapoolError::Validation { ref field, .. } if field == "limit"));
    }

    #[test]
    fn orders_options_skip_unset_filters() {
        let since: Timestamp = "2024-04-01T05:44:13Z".parse().expect("valid");
        let options = OrdersOptions {
            since: Some(since),
            is_unfulfilled: Some(true),
            label: Some(String::new()),
            limit: Some(0),
            offset: Some(20),
            ..OrdersOptions::default()
        };
        assert_eq!(
            options.query_pairs(),
            vec![
                ("since", "2024-04-01T05:44:13Z".to_owned()),
                ("is_unfulfilled", "true".to_owned()),
                ("offset", "20".to_owned()),
            ]
        );
    }

    #[test]
    fn lookup_options_skip_empty_values() {
        let options = InventoryLookupOptions {
            language_id: Some("EN".to_owned()),
            finish_id: Some(String::new()),
            condition_id: Some("NM".to_owned()),
        };
        assert_eq!(
            options.query_pairs(),
            vec![
                ("language_id", "EN".to_owned()),
                ("condition_id", "NM".to_owned())
            ]
        );
    }

    #[test]
    fn order_details_flatten_summary_and_tolerate_missing_fields() {
        let body = json!({
            "order": {
                "id": "ord_1",
                "created_at": "2025-08-05T20:38:54.549229+0000",
                "label": "A12",
                "total_cents": 450,
                "buyer_id": "buyer_9",
                "items": [{ "tcgsku": 123, "quantity": 2, "price_cents": 225 }]
            }
        });
        let decoded: OrderDetailsResponse = serde_json::from_value(body).expect("must decode");
        assert_eq!(decoded.order.summary.id, "ord_1");
        assert_eq!(decoded.order.summary.label, "A12");
        assert_eq!(decoded.order.buyer_id, "buyer_9");
        assert_eq!(decoded.order.items[0].tcgsku, Some(123));
        assert!(decoded.order.fulfillments.is_empty());
        assert!(decoded.order.summary.created_at.is_some());
    }

    #[test]
    fn update_request_round_trips_through_json() {
        let request = InventoryUpdateRequest {
            price_cents: 1_050,
            quantity: 3,
        };
        let encoded = serde_json::to_vec(&request).expect("must encode");
        let decoded: InventoryUpdateRequest = serde_json::from_slice(&encoded).expect("must decode");
        assert_eq!(decoded, request);
    }
}
