//! Calls made with the process-wide default configuration.

#[cfg(test)]
mod tests {
    use rustbay_client::{Client, StaticTransport};
    use rustbay_core::{SiteId, configure, default_config};
    use rustbay_xml::Value;

    #[tokio::test]
    async fn test_should_snapshot_default_config_at_construction() {
        configure(|c| {
            c.app_id = Some("default-app".to_owned());
            c.site_id = SiteId::new(15);
        });
        let client = Client::with_default_config(StaticTransport::new(
            "<GetItemResponse><Ack>Success</Ack></GetItemResponse>",
        ));

        configure(|c| c.site_id = SiteId::new(3));
        assert_eq!(default_config().site_id, SiteId::new(3));

        client.call("GetItem", Value::Null).await.expect("call succeeds");
        let sent = client.transport().last_request().expect("request sent");
        assert!(
            sent.headers
                .contains(&("X-EBAY-API-SITEID", "15".to_owned()))
        );
        assert!(
            sent.headers
                .contains(&("X-EBAY-API-APP-NAME", "default-app".to_owned()))
        );
    }
}
