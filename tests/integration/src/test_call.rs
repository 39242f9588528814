//! Full call flows: request building, transport and response decoding.

#[cfg(test)]
mod tests {
    use rustbay_client::{ClientError, RequestOptions};
    use rustbay_core::SiteId;
    use rustbay_xml::{Value, mapping};
    use serde::Deserialize;

    use crate::{client_returning, test_config};

    const GET_ORDERS_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<GetOrdersResponse xmlns="urn:ebay:apis:eBLBaseComponents">
  <Timestamp>2024-03-01T12:00:00.000Z</Timestamp>
  <Ack>Success</Ack>
  <Version>1325</Version>
  <OrderArray>
    <Order>
      <OrderID>100</OrderID>
      <OrderStatus>Completed</OrderStatus>
      <Total currencyID="USD">25.50</Total>
    </Order>
    <Order>
      <OrderID>00101</OrderID>
      <OrderStatus>Active</OrderStatus>
      <Total currencyID="EUR">9.99</Total>
    </Order>
  </OrderArray>
  <PageNumber>1</PageNumber>
  <ReturnedOrderCountActual>2</ReturnedOrderCountActual>
</GetOrdersResponse>"#;

    #[tokio::test]
    async fn test_should_fetch_official_time() {
        let client = client_returning(
            test_config(),
            "<GeteBayOfficialTimeResponse><Ack>Success</Ack><Timestamp>2010-10-10T10:00:00.000Z</Timestamp></GeteBayOfficialTimeResponse>",
        );

        let response = client
            .call("get_ebay_official_time", Value::Null)
            .await
            .expect("call succeeds");

        assert!(response.is_success());
        assert_eq!(response["timestamp"], Value::from("2010-10-10T10:00:00.000Z"));
        assert_eq!(response["Timestamp"], response["timestamp"]);

        let sent = client.transport().last_request().expect("request sent");
        assert_eq!(sent.uri.path(), "/ws/api.dll");
        assert_eq!(
            sent.body,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<GeteBayOfficialTimeRequest xmlns=\"urn:ebay:apis:eBLBaseComponents\"><RequesterCredentials><eBayAuthToken>test-token</eBayAuthToken></RequesterCredentials></GeteBayOfficialTimeRequest>"
        );
    }

    #[tokio::test]
    async fn test_should_decode_orders_with_attributes_and_sequences() {
        let client = client_returning(test_config(), GET_ORDERS_RESPONSE);
        let response = client
            .call(
                "GetOrders",
                mapping! {
                    "CreateTimeFrom" => "2024-02-01T00:00:00Z",
                    "OrderRole" => "Seller",
                },
            )
            .await
            .expect("call succeeds");

        let orders = response["order_array"]["order"].items();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0]["order_id"], Value::from("100"));
        assert_eq!(orders[0]["total"]["value"], Value::from("25.50"));
        assert_eq!(
            orders[1]["total"]["attributes"]["currency_id"],
            Value::from("EUR")
        );
        assert!(response.subset_match(&Value::from(mapping! {
            "Ack" => "Success",
            "PageNumber" => "1",
        })));
    }

    #[tokio::test]
    async fn test_should_convert_integers_when_configured() {
        let mut config = test_config();
        config.convert_integers = true;
        let client = client_returning(config, GET_ORDERS_RESPONSE);

        let response = client.call("GetOrders", Value::Null).await.expect("call succeeds");
        let orders = &response["order_array"]["order"];
        assert_eq!(orders[0]["order_id"], Value::Integer(100));
        assert_eq!(orders[1]["order_id"], Value::from("00101"));
        assert_eq!(response["version"], Value::Integer(1325));
        assert_eq!(response["returned_order_count_actual"], Value::Integer(2));
    }

    #[tokio::test]
    async fn test_should_deserialize_response_into_struct() {
        #[derive(Debug, Deserialize)]
        struct OrdersPage {
            ack: String,
            page_number: i64,
            returned_order_count_actual: i64,
        }

        let mut config = test_config();
        config.convert_integers = true;
        let client = client_returning(config, GET_ORDERS_RESPONSE);

        let response = client.call("GetOrders", Value::Null).await.expect("call succeeds");
        let page: OrdersPage = response.to_struct().expect("struct conversion");
        assert_eq!(page.ack, "Success");
        assert_eq!(page.page_number, 1);
        assert_eq!(page.returned_order_count_actual, 2);
    }

    #[tokio::test]
    async fn test_should_send_overrides_in_headers() {
        let client = client_returning(test_config(), "<GetItemResponse/>");
        client
            .call_with(
                "GetItem",
                mapping! { "ItemID" => "110" },
                RequestOptions::builder()
                    .oauth_token("bearer")
                    .site_id(SiteId::new(77))
                    .compatibility_level(1100)
                    .build(),
            )
            .await
            .expect("call succeeds");

        let sent = client.transport().last_request().expect("request sent");
        let header = |name: &str| {
            sent.headers
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.clone())
        };
        assert_eq!(header("X-EBAY-API-IAF-TOKEN").as_deref(), Some("bearer"));
        assert_eq!(header("X-EBAY-API-SITEID").as_deref(), Some("77"));
        assert_eq!(header("X-EBAY-API-COMPATIBILITY-LEVEL").as_deref(), Some("1100"));
        assert_eq!(header("X-EBAY-API-DEV-NAME").as_deref(), Some("test-dev"));
        assert!(!sent.body.contains("RequesterCredentials"));
    }

    #[tokio::test]
    async fn test_should_return_empty_record_for_unexpected_root() {
        let client = client_returning(
            test_config(),
            "<GetItemResponse><Ack>Success</Ack></GetItemResponse>",
        );
        let response = client.call("GetOrders", Value::Null).await.expect("call succeeds");
        assert!(response.is_empty());
        assert!(response.ack().is_none());
    }

    #[tokio::test]
    async fn test_should_report_failure_acks() {
        let client = client_returning(
            test_config(),
            "<AddItemResponse><Ack>Failure</Ack><Errors><ShortMessage>Invalid</ShortMessage><ErrorCode>37</ErrorCode></Errors></AddItemResponse>",
        );
        let response = client.call("add_item", Value::Null).await.expect("call succeeds");
        assert!(!response.is_success());
        assert_eq!(response["errors"]["error_code"], Value::from("37"));
    }

    #[tokio::test]
    async fn test_should_fail_on_malformed_body() {
        let client = client_returning(test_config(), "<GetItemResponse><Ack>");
        let err = client
            .call("GetItem", Value::Null)
            .await
            .expect_err("decoding fails");
        assert!(matches!(err, ClientError::Xml(_)));
    }
}
