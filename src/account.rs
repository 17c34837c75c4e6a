use crate::{Account, ApiRequest, ManapoolClient, Result, SellerAccountUpdate};

impl ManapoolClient {
    /// Fetches the authenticated seller account.
    pub async fn get_seller_account(&self) -> Result<Account> {
        self.logger().debug(format_args!("Getting seller account"));
        let account: Account = self.call(ApiRequest::get("account")).await?;
        self.logger().debug(format_args!(
            "Retrieved seller account: {} ({})",
            account.username, account.email
        ));
        Ok(account)
    }

    /// Toggles whether singles and sealed listings are live.
    pub async fn update_seller_account(&self, update: &SellerAccountUpdate) -> Result<Account> {
        self.logger().debug(format_args!("Updating seller account"));
        let account: Account = self.call(ApiRequest::put("account").json(update)?).await?;
        self.logger().debug(format_args!(
            "Updated seller account: {} ({})",
            account.username, account.email
        ));
        Ok(account)
    }
}
