use crate::{
    request::require_non_empty, ApiRequest, ManapoolClient, Result, Webhook,
    WebhookRegisterRequest, WebhooksResponse,
};

impl ManapoolClient {
    /// Lists registered webhooks, optionally filtered by topic.
    pub async fn get_webhooks(&self, topic: Option<&str>) -> Result<WebhooksResponse> {
        let mut request = ApiRequest::get("webhooks");
        if let Some(topic) = topic.filter(|topic| !topic.is_empty()) {
            request = request.query("topic", topic);
        }
        self.logger().debug(format_args!("Getting webhooks"));
        self.call(request).await
    }

    pub async fn get_webhook(&self, id: &str) -> Result<Webhook> {
        require_non_empty("id", id)?;
        self.logger().debug(format_args!("Getting webhook: {id}"));
        self.call(ApiRequest::get(format!("webhooks/{id}"))).await
    }

    pub async fn register_webhook(&self, request: &WebhookRegisterRequest) -> Result<Webhook> {
        self.logger().debug(format_args!(
            "Registering webhook for topic {}",
            request.topic
        ));
        self.call(ApiRequest::put("webhooks/register").json(request)?)
            .await
    }

    /// Deletes a webhook. The API answers with an empty body.
    pub async fn delete_webhook(&self, id: &str) -> Result<()> {
        require_non_empty("id", id)?;
        self.logger().debug(format_args!("Deleting webhook: {id}"));
        self.call_empty(ApiRequest::delete(format!("webhooks/{id}")))
            .await
    }
}
