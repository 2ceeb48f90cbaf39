//! # Messenger Templates
//!
//! Structured message payloads (generic cards, button lists and receipts).
//! Templates are sent as the payload of a `template` attachment and are
//! discriminated by their `template_type` field.
//!
//! Generic and button templates must respect the platform limits; call
//! `validate` before sending them, the client does not do it for you.

use crate::{consts, messenger::errors::ValidationError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "template_type", rename_all = "snake_case")]
pub enum Template {
    Generic(GenericTemplate),
    Button(ButtonTemplate),
    Receipt(ReceiptTemplate),
}

impl From<GenericTemplate> for Template {
    fn from(template: GenericTemplate) -> Self {
        Template::Generic(template)
    }
}

impl From<ButtonTemplate> for Template {
    fn from(template: ButtonTemplate) -> Self {
        Template::Button(template)
    }
}

impl From<ReceiptTemplate> for Template {
    fn from(template: ReceiptTemplate) -> Self {
        Template::Receipt(template)
    }
}

/// Call to action attached to an element or a button template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Button {
    /// Opens `url` in the in-app browser
    WebUrl { title: String, url: String },
    /// Sends `payload` back to the webhook as a postback event
    Postback { title: String, payload: String },
}

impl Button {
    pub fn web_url(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self::WebUrl {
            title: title.into(),
            url: url.into(),
        }
    }

    pub fn postback(title: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::Postback {
            title: title.into(),
            payload: payload.into(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Button::WebUrl { title, .. } | Button::Postback { title, .. } => title,
        }
    }
}

/// Horizontal carousel of elements ("bubbles")
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericTemplate {
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl GenericTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_element(&mut self, element: Element) -> &mut Self {
        self.elements.push(element);
        self
    }

    /// Returns the first violated limit, checking the element count first and
    /// then every element in order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.elements.len() > consts::GENERIC_TEMPLATE_BUBBLES_PER_MESSAGE_LIMIT {
            return Err(ValidationError::BubblesLimitExceeded);
        }

        self.elements.iter().try_for_each(Element::validate)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Button>,
}

impl Element {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            item_url: None,
            image_url: None,
            subtitle: None,
            buttons: Vec::new(),
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn with_item_url(mut self, item_url: impl Into<String>) -> Self {
        self.item_url = Some(item_url.into());
        self
    }

    pub fn add_button(&mut self, button: Button) -> &mut Self {
        self.buttons.push(button);
        self
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if char_len(&self.title) > consts::GENERIC_TEMPLATE_TITLE_LENGTH_LIMIT {
            return Err(ValidationError::TitleLengthExceeded);
        }

        if self
            .subtitle
            .as_deref()
            .is_some_and(|s| char_len(s) > consts::GENERIC_TEMPLATE_SUBTITLE_LENGTH_LIMIT)
        {
            return Err(ValidationError::SubtitleLengthExceeded);
        }

        if self.buttons.len() > consts::GENERIC_TEMPLATE_CALL_TO_ACTION_ITEMS_LIMIT {
            return Err(ValidationError::ButtonsLimitExceeded);
        }

        validate_button_titles(&self.buttons)
    }
}

/// Text with up to three buttons below it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonTemplate {
    pub text: String,
    #[serde(default)]
    pub buttons: Vec<Button>,
}

impl ButtonTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    pub fn add_button(&mut self, button: Button) -> &mut Self {
        self.buttons.push(button);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.buttons.len() > consts::BUTTON_TEMPLATE_BUTTONS_LIMIT {
            return Err(ValidationError::ButtonsLimitExceeded);
        }

        validate_button_titles(&self.buttons)
    }
}

/// Order confirmation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptTemplate {
    pub recipient_name: String,
    pub order_number: String,
    pub currency: String,
    pub payment_method: String,
    /// Order time in seconds since the epoch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_url: Option<String>,
    #[serde(rename = "elements", default)]
    pub items: Vec<OrderItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<OrderAddress>,
    pub summary: OrderSummary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub adjustments: Vec<OrderAdjustment>,
}

impl ReceiptTemplate {
    /// New receipt with a random order number, priced in USD
    pub fn new(recipient_name: impl Into<String>) -> Self {
        Self {
            recipient_name: recipient_name.into(),
            order_number: uuid::Uuid::new_v4().to_string(),
            currency: consts::DEFAULT_RECEIPT_CURRENCY.to_string(),
            payment_method: String::new(),
            timestamp: None,
            order_url: None,
            items: Vec::new(),
            address: None,
            summary: OrderSummary::default(),
            adjustments: Vec::new(),
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_payment_method(mut self, payment_method: impl Into<String>) -> Self {
        self.payment_method = payment_method.into();
        self
    }

    pub fn with_timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.timestamp = Some(at.timestamp());
        self
    }

    pub fn with_order_url(mut self, order_url: impl Into<String>) -> Self {
        self.order_url = Some(order_url.into());
        self
    }

    pub fn with_address(mut self, address: OrderAddress) -> Self {
        self.address = Some(address);
        self
    }

    pub fn with_summary(mut self, summary: OrderSummary) -> Self {
        self.summary = summary;
        self
    }

    pub fn add_item(&mut self, item: OrderItem) -> &mut Self {
        self.items.push(item);
        self
    }

    pub fn add_adjustment(&mut self, adjustment: OrderAdjustment) -> &mut Self {
        self.adjustments.push(adjustment);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl OrderItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            quantity: None,
            price: None,
            currency: None,
            image_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAddress {
    pub street_1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub state: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_cost: Decimal,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub subtotal: Option<Decimal>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub shipping_cost: Option<Decimal>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_tax: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderAdjustment {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn validate_button_titles(buttons: &[Button]) -> Result<(), ValidationError> {
    if buttons
        .iter()
        .any(|b| char_len(b.title()) > consts::GENERIC_TEMPLATE_CALL_TO_ACTION_TITLE_LIMIT)
    {
        return Err(ValidationError::CallToActionTitleLengthExceeded);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn element_with_buttons(buttons: usize) -> Element {
        let mut element = Element::new("title");
        for i in 0..buttons {
            element.add_button(Button::postback(format!("b{i}"), "PAYLOAD"));
        }
        element
    }

    fn generic_with_elements(elements: usize) -> GenericTemplate {
        let mut template = GenericTemplate::new();
        for _ in 0..elements {
            template.add_element(Element::new("title"));
        }
        template
    }

    #[test]
    fn test_generic_template_bubbles_limit() {
        assert_eq!(
            generic_with_elements(11).validate(),
            Err(ValidationError::BubblesLimitExceeded)
        );
        assert_eq!(generic_with_elements(10).validate(), Ok(()));
    }

    #[test]
    fn test_generic_template_title_limit() {
        let mut template = GenericTemplate::new();
        template.add_element(Element::new("a".repeat(46)));
        assert_eq!(
            template.validate(),
            Err(ValidationError::TitleLengthExceeded)
        );

        let mut template = GenericTemplate::new();
        template.add_element(Element::new("a".repeat(45)));
        assert_eq!(template.validate(), Ok(()));
    }

    #[test]
    fn test_generic_template_title_limit_counts_chars() {
        let mut template = GenericTemplate::new();
        template.add_element(Element::new("ñ".repeat(45)));
        assert_eq!(template.validate(), Ok(()));
    }

    #[test]
    fn test_generic_template_subtitle_limit() {
        let mut template = GenericTemplate::new();
        template.add_element(Element::new("title").with_subtitle("s".repeat(81)));
        assert_eq!(
            template.validate(),
            Err(ValidationError::SubtitleLengthExceeded)
        );

        let mut template = GenericTemplate::new();
        template.add_element(Element::new("title").with_subtitle("s".repeat(80)));
        assert_eq!(template.validate(), Ok(()));
    }

    #[test]
    fn test_generic_template_buttons_limit() {
        let mut template = GenericTemplate::new();
        template.add_element(element_with_buttons(4));
        assert_eq!(
            template.validate(),
            Err(ValidationError::ButtonsLimitExceeded)
        );

        let mut template = GenericTemplate::new();
        template.add_element(element_with_buttons(3));
        assert_eq!(template.validate(), Ok(()));
    }

    #[test]
    fn test_generic_template_button_title_limit() {
        let mut element = Element::new("title");
        element.add_button(Button::web_url("x".repeat(21), "https://example.com"));
        let mut template = GenericTemplate::new();
        template.add_element(element);
        assert_eq!(
            template.validate(),
            Err(ValidationError::CallToActionTitleLengthExceeded)
        );

        let mut element = Element::new("title");
        element.add_button(Button::web_url("x".repeat(20), "https://example.com"));
        let mut template = GenericTemplate::new();
        template.add_element(element);
        assert_eq!(template.validate(), Ok(()));
    }

    #[test]
    fn test_generic_template_reports_first_violation() {
        // 11 elements, each with a too long title: the count is checked first
        let mut template = GenericTemplate::new();
        for _ in 0..11 {
            template.add_element(Element::new("a".repeat(50)));
        }
        assert_eq!(
            template.validate(),
            Err(ValidationError::BubblesLimitExceeded)
        );

        let mut template = GenericTemplate::new();
        template.add_element(Element::new("a".repeat(50)).with_subtitle("s".repeat(90)));
        assert_eq!(
            template.validate(),
            Err(ValidationError::TitleLengthExceeded)
        );
    }

    #[test]
    fn test_generic_template_at_every_limit() {
        let mut template = GenericTemplate::new();
        for _ in 0..10 {
            let mut element = Element::new("t".repeat(45)).with_subtitle("s".repeat(80));
            for _ in 0..3 {
                element.add_button(Button::postback("b".repeat(20), "PAYLOAD"));
            }
            template.add_element(element);
        }

        assert_eq!(template.validate(), Ok(()));
    }

    #[test]
    fn test_button_template_limits() {
        let mut template = ButtonTemplate::new("pick one");
        for i in 0..4 {
            template.add_button(Button::postback(format!("b{i}"), "PAYLOAD"));
        }
        assert_eq!(
            template.validate(),
            Err(ValidationError::ButtonsLimitExceeded)
        );

        template.buttons.pop();
        assert_eq!(template.validate(), Ok(()));
    }

    #[test]
    fn test_button_template_round_trip() {
        let mut template = ButtonTemplate::new("What do you want to do next?");
        template
            .add_button(Button::web_url("Show Website", "https://petersapparel.parseapp.com"))
            .add_button(Button::postback("Start Chatting", "USER_DEFINED_PAYLOAD"))
            .add_button(Button::postback("Stop", "STOP"));

        let encoded = serde_json::to_value(Template::from(template.clone())).unwrap();
        assert_eq!(encoded["template_type"], "button");

        let decoded: Template = serde_json::from_value(encoded).unwrap();
        match decoded {
            Template::Button(decoded) => assert_eq!(decoded.buttons, template.buttons),
            other => panic!("expected a button template, got {other:?}"),
        }
    }

    #[test]
    fn test_generic_template_serialization() {
        let mut element = Element::new("Classic White T-Shirt")
            .with_item_url("https://shop.example.com/shirt")
            .with_image_url("https://shop.example.com/shirt.png")
            .with_subtitle("Soft white cotton t-shirt");
        element.add_button(Button::postback("Bookmark Item", "BOOKMARK"));
        let mut template = GenericTemplate::new();
        template.add_element(element);

        assert_eq!(
            serde_json::to_value(Template::from(template)).unwrap(),
            json!({
                "template_type": "generic",
                "elements": [{
                    "title": "Classic White T-Shirt",
                    "item_url": "https://shop.example.com/shirt",
                    "image_url": "https://shop.example.com/shirt.png",
                    "subtitle": "Soft white cotton t-shirt",
                    "buttons": [{"type": "postback", "title": "Bookmark Item", "payload": "BOOKMARK"}]
                }]
            })
        );
    }

    #[test]
    fn test_new_receipt_defaults() {
        let receipt = ReceiptTemplate::new("Stephane Crozatier");

        assert_eq!(receipt.currency, "USD");
        assert!(uuid::Uuid::parse_str(&receipt.order_number).is_ok());
        assert_ne!(
            receipt.order_number,
            ReceiptTemplate::new("Stephane Crozatier").order_number
        );
    }

    #[test]
    fn test_receipt_template_serialization() {
        let mut receipt = ReceiptTemplate::new("Stephane Crozatier")
            .with_payment_method("Visa 2345")
            .with_timestamp(DateTime::from_timestamp(1428444852, 0).unwrap())
            .with_address(OrderAddress {
                street_1: "1 Hacker Way".to_string(),
                street_2: None,
                city: "Menlo Park".to_string(),
                postal_code: "94025".to_string(),
                state: "CA".to_string(),
                country: "US".to_string(),
            })
            .with_summary(OrderSummary {
                total_cost: dec!(56.14),
                subtotal: Some(dec!(75.00)),
                shipping_cost: Some(dec!(4.95)),
                total_tax: Some(dec!(6.19)),
            });
        receipt.order_number = "12345678902".to_string();
        receipt
            .add_item(OrderItem {
                quantity: Some(2),
                price: Some(dec!(50)),
                currency: Some("USD".to_string()),
                ..OrderItem::new("Classic White T-Shirt")
            })
            .add_adjustment(OrderAdjustment {
                name: "New Customer Discount".to_string(),
                amount: dec!(20),
            });

        let encoded = serde_json::to_value(Template::from(receipt)).unwrap();

        assert_eq!(encoded["template_type"], "receipt");
        assert_eq!(encoded["order_number"], "12345678902");
        assert_eq!(encoded["timestamp"], 1428444852);
        assert_eq!(encoded["elements"][0]["title"], "Classic White T-Shirt");
        assert_eq!(encoded["elements"][0]["quantity"], 2);
        assert_eq!(encoded["address"]["street_1"], "1 Hacker Way");
        assert!(encoded["address"].get("street_2").is_none());
        assert_eq!(encoded["summary"]["total_cost"], 56.14);
        assert_eq!(encoded["summary"]["shipping_cost"], 4.95);
        assert!(encoded["summary"]["total_cost"].is_number());
        assert_eq!(encoded["elements"][0]["price"], 50.0);
        assert_eq!(encoded["adjustments"][0]["amount"], 20.0);
    }

    #[test]
    fn test_order_amounts_are_json_numbers() {
        let summary = OrderSummary {
            total_cost: dec!(10.5),
            ..OrderSummary::default()
        };

        assert_eq!(serde_json::to_value(&summary).unwrap(), json!({"total_cost": 10.5}));

        let decoded: OrderSummary =
            serde_json::from_value(json!({"total_cost": 56.14, "total_tax": 6.19})).unwrap();
        assert_eq!(decoded.total_cost, dec!(56.14));
        assert_eq!(decoded.total_tax, Some(dec!(6.19)));
        assert_eq!(decoded.subtotal, None);
    }
}
