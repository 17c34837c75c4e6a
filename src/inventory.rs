//! Seller inventory, inventory listings and the pagination helper.

use std::future::Future;

use crate::{
    request::require_non_empty, ApiRequest, InventoryBulkItemBySku, InventoryItem,
    InventoryItemResponse, InventoryItemsResponse, InventoryListingResponse,
    InventoryListingsResponse, InventoryLookupOptions, InventoryOptions, InventoryResponse,
    InventoryUpdateRequest, ManapoolClient, ManapoolError, Result, MAX_INVENTORY_PAGE,
};

/// Anything that can serve pages of the seller inventory.
///
/// Implemented by [`ManapoolClient`]; tests and callers with their own cache
/// can implement it to drive [`iterate_inventory`].
pub trait InventorySource {
    fn inventory_page(
        &self,
        options: InventoryOptions,
    ) -> impl Future<Output = Result<InventoryResponse>> + Send;
}

impl InventorySource for ManapoolClient {
    fn inventory_page(
        &self,
        options: InventoryOptions,
    ) -> impl Future<Output = Result<InventoryResponse>> + Send {
        self.get_seller_inventory(options)
    }
}

/// Walks every inventory item, page by page, starting at offset 0.
///
/// Stops when a page is empty or the reported total has been reached. The
/// first error from `source` or `callback` ends the walk and is returned.
pub async fn iterate_inventory<S, F, E>(source: &S, mut callback: F) -> std::result::Result<(), E>
where
    S: InventorySource + ?Sized,
    F: FnMut(InventoryItem) -> std::result::Result<(), E>,
    E: From<ManapoolError>,
{
    let mut offset = 0u32;
    loop {
        let page = source
            .inventory_page(InventoryOptions::new(MAX_INVENTORY_PAGE, offset))
            .await?;
        let returned = page.pagination.returned;
        let total = page.pagination.total;

        for item in page.inventory {
            callback(item)?;
        }

        let next = u64::from(offset) + returned;
        if returned == 0 || next >= total {
            return Ok(());
        }
        offset = u32::try_from(next).map_err(|_| {
            ManapoolError::validation("offset", format!("inventory offset {next} out of range"))
        })?;
    }
}

impl ManapoolClient {
    /// Fetches one page of the seller inventory.
    ///
    /// A zero limit requests the maximum page of 500; larger limits are
    /// rejected before any request is made.
    pub async fn get_seller_inventory(&self, options: InventoryOptions) -> Result<InventoryResponse> {
        let options = options.validate()?;
        self.logger().debug(format_args!(
            "Getting seller inventory: limit={}, offset={}",
            options.limit, options.offset
        ));

        let request = ApiRequest::get("seller/inventory")
            .query("limit", options.limit.to_string())
            .query("offset", options.offset.to_string());
        let response: InventoryResponse = self.call(request).await?;

        self.logger().debug(format_args!(
            "Retrieved {} inventory items (total: {})",
            response.pagination.returned, response.pagination.total
        ));
        Ok(response)
    }

    /// Walks the whole seller inventory. See [`iterate_inventory`].
    pub async fn iterate_inventory<F, E>(&self, callback: F) -> std::result::Result<(), E>
    where
        F: FnMut(InventoryItem) -> std::result::Result<(), E>,
        E: From<ManapoolError>,
    {
        iterate_inventory(self, callback).await
    }

    /// Looks up one of the seller's items by TCGPlayer SKU.
    pub async fn get_inventory_by_tcgplayer_id(&self, tcgplayer_id: &str) -> Result<InventoryItem> {
        require_non_empty("tcgplayer_id", tcgplayer_id)?;
        self.logger().debug(format_args!(
            "Getting inventory by TCGPlayer ID: {tcgplayer_id}"
        ));

        let item: InventoryItem = self
            .call(ApiRequest::get(format!("seller/inventory/tcgsku/{tcgplayer_id}")))
            .await?;

        let name = item
            .product
            .single
            .as_ref()
            .map_or("unknown", |single| single.name.as_str());
        self.logger().debug(format_args!(
            "Retrieved inventory item: {name} (qty: {}, price: ${:.2})",
            item.quantity,
            item.price_dollars()
        ));
        Ok(item)
    }

    /// Fetches marketplace listings by ID. Empty IDs are skipped.
    pub async fn get_inventory_listings<I, S>(&self, ids: I) -> Result<InventoryListingsResponse>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids: Vec<String> = ids
            .into_iter()
            .filter(|id| !id.as_ref().is_empty())
            .map(|id| id.as_ref().to_owned())
            .collect();
        if ids.is_empty() {
            return Err(ManapoolError::validation(
                "ids",
                "at least one non-empty id is required",
            ));
        }
        self.logger()
            .debug(format_args!("Getting {} inventory listings", ids.len()));

        let request =
            ApiRequest::get("inventory/listings").query_pairs(ids.into_iter().map(|id| ("id", id)));
        self.call(request).await
    }

    pub async fn get_inventory_listing(&self, id: &str) -> Result<InventoryItemResponse> {
        require_non_empty("id", id)?;
        self.logger()
            .debug(format_args!("Getting inventory listing: {id}"));
        self.call(ApiRequest::get(format!("inventory/listings/{id}")))
            .await
    }

    pub async fn get_seller_inventory_by_sku(&self, sku: u64) -> Result<InventoryListingResponse> {
        self.logger()
            .debug(format_args!("Getting seller inventory by SKU: {sku}"));
        self.call(ApiRequest::get(format!("seller/inventory/tcgsku/{sku}")))
            .await
    }

    pub async fn update_seller_inventory_by_sku(
        &self,
        sku: u64,
        update: &InventoryUpdateRequest,
    ) -> Result<InventoryListingResponse> {
        self.logger().debug(format_args!(
            "Updating seller inventory by SKU: {sku} (qty: {}, price_cents: {})",
            update.quantity, update.price_cents
        ));
        let request = ApiRequest::put(format!("seller/inventory/tcgsku/{sku}")).json(update)?;
        self.call(request).await
    }

    pub async fn delete_seller_inventory_by_sku(&self, sku: u64) -> Result<InventoryListingResponse> {
        self.logger()
            .debug(format_args!("Deleting seller inventory by SKU: {sku}"));
        self.call(ApiRequest::delete(format!("seller/inventory/tcgsku/{sku}")))
            .await
    }

    /// Creates or replaces listings in bulk, keyed by TCGPlayer SKU.
    pub async fn create_inventory_bulk_by_sku(
        &self,
        items: &[InventoryBulkItemBySku],
    ) -> Result<InventoryItemsResponse> {
        if items.is_empty() {
            return Err(ManapoolError::validation(
                "items",
                "at least one item is required",
            ));
        }
        self.logger().debug(format_args!(
            "Creating {} inventory items by SKU",
            items.len()
        ));
        let request = ApiRequest::post("seller/inventory/tcgsku").json(items)?;
        self.call(request).await
    }

    pub async fn get_seller_inventory_by_scryfall(
        &self,
        scryfall_id: &str,
        options: &InventoryLookupOptions,
    ) -> Result<InventoryListingResponse> {
        require_non_empty("scryfall_id", scryfall_id)?;
        self.logger().debug(format_args!(
            "Getting seller inventory by Scryfall ID: {scryfall_id}"
        ));
        let request = ApiRequest::get(format!("seller/inventory/scryfall_id/{scryfall_id}"))
            .query_pairs(options.query_pairs());
        self.call(request).await
    }
}
