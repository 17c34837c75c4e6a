use crate::{
    request::require_non_empty, ApiRequest, ManapoolClient, OrderDetailsResponse,
    OrderFulfillmentRequest, OrderFulfillmentResponse, OrderReportsResponse, OrdersOptions,
    OrdersResponse, Result,
};

impl ManapoolClient {
    /// Lists the seller's orders. Unset filters are omitted from the query.
    pub async fn get_seller_orders(&self, options: &OrdersOptions) -> Result<OrdersResponse> {
        let query = options.query_pairs();
        self.logger()
            .debug(format_args!("Getting seller orders ({} filters)", query.len()));
        let response: OrdersResponse = self
            .call(ApiRequest::get("seller/orders").query_pairs(query))
            .await?;
        self.logger()
            .debug(format_args!("Retrieved {} seller orders", response.orders.len()));
        Ok(response)
    }

    pub async fn get_seller_order(&self, id: &str) -> Result<OrderDetailsResponse> {
        require_non_empty("id", id)?;
        self.logger().debug(format_args!("Getting seller order: {id}"));
        self.call(ApiRequest::get(format!("seller/orders/{id}"))).await
    }

    /// Records shipping progress for an order.
    pub async fn update_seller_order_fulfillment(
        &self,
        id: &str,
        request: &OrderFulfillmentRequest,
    ) -> Result<OrderFulfillmentResponse> {
        require_non_empty("id", id)?;
        self.logger()
            .debug(format_args!("Updating fulfillment for seller order: {id}"));
        let request = ApiRequest::put(format!("seller/orders/{id}/fulfillment")).json(request)?;
        self.call(request).await
    }

    /// Buyer-reported issues on an order.
    pub async fn get_seller_order_reports(&self, id: &str) -> Result<OrderReportsResponse> {
        require_non_empty("id", id)?;
        self.logger()
            .debug(format_args!("Getting reports for seller order: {id}"));
        self.call(ApiRequest::get(format!("seller/orders/{id}/reports")))
            .await
    }
}
