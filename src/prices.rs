//! Bulk price exports. Each call downloads the full catalog.

use crate::{ApiRequest, ManapoolClient, Result, SealedPricesList, SinglesPricesList, VariantPricesList};

impl ManapoolClient {
    pub async fn get_singles_prices(&self) -> Result<SinglesPricesList> {
        self.logger().debug(format_args!("Getting singles prices"));
        self.call(ApiRequest::get("prices/singles")).await
    }

    pub async fn get_variant_prices(&self) -> Result<VariantPricesList> {
        self.logger().debug(format_args!("Getting variant prices"));
        self.call(ApiRequest::get("prices/variants")).await
    }

    pub async fn get_sealed_prices(&self) -> Result<SealedPricesList> {
        self.logger().debug(format_args!("Getting sealed prices"));
        self.call(ApiRequest::get("prices/sealed")).await
    }
}
