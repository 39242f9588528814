//! Encoder and decoder behavior across crate boundaries.

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rustbay_client::{Request, Response, stub_response_body};
    use rustbay_core::DecodeOptions;
    use rustbay_xml::{Record, Value, decode, encode, mapping, normalize_key};

    use crate::test_config;

    #[test]
    fn test_should_encode_add_item_request() {
        let input = mapping! {
            "Item" => mapping! {
                "Title" => "Desk lamp",
                "StartPrice" => Value::attributed("19.99", mapping! { "currencyID" => "USD" }),
                "PictureDetails" => mapping! {
                    "PictureURL" => vec!["https://i.example/1.jpg", "https://i.example/2.jpg"],
                },
                "ScheduleTime" => Utc.with_ymd_and_hms(2010, 10, 31, 3, 15, 0).unwrap(),
            },
        };
        let request = Request::new("add_item", input, &test_config()).expect("request");

        assert_eq!(request.command(), "AddItem");
        assert_eq!(
            request.input_xml().expect("encoding"),
            concat!(
                "<Item><Title>Desk lamp</Title>",
                r#"<StartPrice currencyID="USD">19.99</StartPrice>"#,
                "<PictureDetails><PictureURL>https://i.example/1.jpg</PictureURL>",
                "<PictureURL>https://i.example/2.jpg</PictureURL></PictureDetails>",
                "<ScheduleTime>2010-10-31T03:15:00Z</ScheduleTime></Item>",
            )
        );
    }

    #[test]
    fn test_should_read_back_stubbed_content() {
        let body = stub_response_body(
            "GetItem",
            &Value::from(mapping! {
                "Item" => mapping! {
                    "ItemID" => "110",
                    "Price" => Value::attributed("5", mapping! { "currencyID" => "USD" }),
                    "Tag" => vec!["a", "b"],
                },
            }),
        )
        .expect("stub");

        let response =
            Response::parse("GetItem", body, &DecodeOptions::default()).expect("response");
        assert!(response.is_success());
        assert!(response.subset_match(&Value::from(mapping! {
            "Item" => mapping! {
                "ItemID" => "110",
                "Price" => mapping! {
                    "attributes" => mapping! { "currencyID" => "USD" },
                    "value" => "5",
                },
                "Tag" => vec!["a", "b"],
            },
        })));
    }

    #[test]
    fn test_should_not_round_trip_single_element_sequences() {
        let xml = encode(&[Value::from(mapping! {
            "List" => mapping! { "Entry" => vec!["only"] },
        })])
        .expect("encoding");
        assert_eq!(xml, "<List><Entry>only</Entry></List>");

        let document = decode(&xml, &DecodeOptions::default()).expect("decoding");
        assert_eq!(document["List"]["Entry"], Value::from("only"));
    }

    #[test]
    fn test_should_normalize_every_key_variant_alike() {
        let record = Record::from(mapping! { "eBayItemID" => "1" });
        for key in ["eBayItemID", "ebay_item_id", "EbayItemId", "ebayItemID"] {
            assert_eq!(normalize_key(key), "ebay_item_id", "{key}");
            assert_eq!(record[key], Value::from("1"), "{key}");
        }
    }

    #[test]
    fn test_should_serialize_record_as_json() {
        let document = decode(
            r#"<Root><Name>Lamp</Name><Price currencyID="USD">5</Price><Tag>a</Tag><Tag>b</Tag></Root>"#,
            &DecodeOptions {
                convert_integers: true,
            },
        )
        .expect("decoding");
        let record = Record::from(document);
        let json = serde_json::to_value(&record).expect("json");
        assert_eq!(
            json,
            serde_json::json!({
                "root": {
                    "name": "Lamp",
                    "price": { "attributes": { "currency_id": "USD" }, "value": 5 },
                    "tag": ["a", "b"],
                }
            })
        );
    }

    #[test]
    fn test_should_build_input_from_json() {
        let json = serde_json::json!({
            "ItemID": "110",
            "IncludeWatchCount": true,
            "OutputSelector": ["Title", "Price"],
        });
        let request = Request::new("GetItem", Value::from(json), &test_config()).expect("request");
        assert_eq!(
            request.input_xml().expect("encoding"),
            "<ItemID>110</ItemID><IncludeWatchCount>true</IncludeWatchCount><OutputSelector>Title</OutputSelector><OutputSelector>Price</OutputSelector>"
        );
    }
}
