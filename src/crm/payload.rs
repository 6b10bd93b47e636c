//! Lead payloads in the field-naming conventions GoHighLevel expects.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::delivery::DeliveryEstimate;
use crate::pricing::{Quote, QuoteConfiguration};

const QUOTE_SOURCE: &str = "Fencing Quote Calculator";
const FORM_SOURCE: &str = "Website Contact Form";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Contact fields captured by the wizard and the contact form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ContactDetails {
    /// Check required fields. Returns the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.first_name.trim().is_empty() {
            return Err("First name is required".to_string());
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err("Email is required".to_string());
        }
        if !EMAIL_RE.is_match(email) {
            return Err("Please enter a valid email address".to_string());
        }
        if !self.phone.trim().is_empty() {
            let digits = self.phone.chars().filter(char::is_ascii_digit).count();
            if !(8..=15).contains(&digits) {
                return Err("Please enter a valid phone number".to_string());
            }
        }
        Ok(())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// What gets recorded against the lead for a priced quote
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteSummary {
    pub reference: Uuid,
    pub configuration: QuoteConfiguration,
    pub panels: u32,
    pub feet: u32,
    pub clamps: u32,
    pub braces: u32,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total_price: Decimal,
    pub delivery_address: Option<String>,
    pub delivery: Option<DeliveryEstimate>,
}

impl QuoteSummary {
    pub fn new(
        configuration: &QuoteConfiguration,
        quote: &Quote,
        delivery_address: Option<String>,
        delivery: Option<DeliveryEstimate>,
    ) -> Self {
        Self {
            reference: Uuid::new_v4(),
            configuration: configuration.clamped(),
            panels: quote.materials.panels,
            feet: quote.materials.feet,
            clamps: quote.materials.clamps,
            braces: quote.materials.braces,
            subtotal: quote.subtotal,
            discount: quote.discount,
            total_price: quote.total_price,
            delivery_address,
            delivery,
        }
    }

    fn hire_duration_text(&self) -> String {
        if self.configuration.is_hire() {
            format!(
                "{} {}",
                self.configuration.hire_units(),
                self.configuration.duration_unit.as_str()
            )
        } else {
            String::new()
        }
    }

    /// Custom fields, un-prefixed. The webhook adds `contact.`.
    fn custom_fields(&self) -> Vec<(&'static str, Value)> {
        let cfg = &self.configuration;
        let mut fields = vec![
            ("quote_reference", json!(self.reference.to_string())),
            ("fence_panel_type", json!(cfg.fence_type.as_str())),
            ("feet_option", json!(cfg.feet_option.as_str())),
            ("meters_required", json!(cfg.meters_required.to_string())),
            ("purchase_or_hire", json!(cfg.option.as_str())),
            ("hire_duration", json!(self.hire_duration_text())),
            ("number_of_panels", json!(self.panels)),
            ("number_of_feet", json!(self.feet)),
            ("number_of_clamps", json!(self.clamps)),
            ("number_of_braces", json!(self.braces)),
            ("quote_subtotal", json!(self.subtotal.to_string())),
            ("quote_discount", json!(self.discount.to_string())),
            ("quote_total", json!(self.total_price.to_string())),
        ];

        if let Some(address) = &self.delivery_address {
            fields.push(("delivery_address", json!(address)));
        }
        if let Some(delivery) = &self.delivery {
            fields.push(("delivery_distance_km", json!(delivery.distance_km)));
            fields.push(("delivery_fee", json!(delivery.fee.to_string())));
            fields.push(("delivery_estimated", json!(delivery.using_fallback)));
        }
        fields
    }
}

/// Body for `POST /v1/contacts/`.
pub fn rest_contact_body(
    contact: &ContactDetails,
    location_id: &str,
    quote: Option<&QuoteSummary>,
) -> Value {
    let mut tags = vec!["website-lead".to_string()];
    let mut body = json!({
        "firstName": contact.first_name.trim(),
        "lastName": contact.last_name.trim(),
        "name": contact.full_name(),
        "email": contact.email.trim(),
        "phone": contact.phone.trim(),
        "address1": contact.address.trim(),
        "locationId": location_id,
        "source": if quote.is_some() { QUOTE_SOURCE } else { FORM_SOURCE },
    });

    if let Some(company) = &contact.company {
        body["companyName"] = json!(company);
    }

    let mut custom_field = Map::new();
    if let Some(message) = &contact.message {
        custom_field.insert("message".to_string(), json!(message));
    }
    if let Some(summary) = quote {
        tags.push("fencing-quote".to_string());
        tags.push(format!("fence-{}", summary.configuration.fence_type.as_str()));
        tags.push(summary.configuration.option.as_str().to_string());
        for (name, value) in summary.custom_fields() {
            custom_field.insert(name.to_string(), value);
        }
    }

    body["tags"] = json!(tags);
    if !custom_field.is_empty() {
        body["customField"] = Value::Object(custom_field);
    }
    body
}

/// Flat body for the inbound webhook.
pub fn webhook_body(contact: &ContactDetails, summary: &QuoteSummary) -> Value {
    let mut body = Map::new();
    body.insert("first_name".to_string(), json!(contact.first_name.trim()));
    body.insert("last_name".to_string(), json!(contact.last_name.trim()));
    body.insert("full_name".to_string(), json!(contact.full_name()));
    body.insert("email".to_string(), json!(contact.email.trim()));
    body.insert("phone".to_string(), json!(contact.phone.trim()));
    body.insert("address1".to_string(), json!(contact.address.trim()));
    body.insert("source".to_string(), json!(QUOTE_SOURCE));
    if let Some(company) = &contact.company {
        body.insert("company_name".to_string(), json!(company));
    }
    if let Some(message) = &contact.message {
        body.insert("contact.message".to_string(), json!(message));
    }
    for (name, value) in summary.custom_fields() {
        body.insert(format!("contact.{name}"), value);
    }
    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{calculate_quote, FenceType, PurchaseOption};
    use crate::pricing::models::DurationUnit;
    use rust_decimal_macros::dec;

    fn contact() -> ContactDetails {
        ContactDetails {
            first_name: "Jo".to_string(),
            last_name: "Citizen".to_string(),
            email: "jo@example.com.au".to_string(),
            phone: "0412 345 678".to_string(),
            address: "1 Church St, Parramatta NSW".to_string(),
            company: None,
            message: None,
        }
    }

    fn summary(option: PurchaseOption) -> QuoteSummary {
        let configuration = QuoteConfiguration {
            fence_type: FenceType::Builders,
            feet_option: Default::default(),
            meters_required: dec!(100),
            option,
            hire_duration: dec!(3),
            duration_unit: DurationUnit::Months,
        };
        let quote = calculate_quote(&configuration);
        QuoteSummary::new(
            &configuration,
            &quote,
            Some("Parramatta NSW".to_string()),
            Some(DeliveryEstimate::resolved(21.5, true)),
        )
    }

    #[test]
    fn test_validate_accepts_complete_contact() {
        assert!(contact().validate().is_ok());
    }

    #[test]
    fn test_validate_requires_first_name_and_email() {
        let mut c = contact();
        c.first_name = "  ".to_string();
        assert_eq!(c.validate().unwrap_err(), "First name is required");

        let mut c = contact();
        c.email = String::new();
        assert_eq!(c.validate().unwrap_err(), "Email is required");

        let mut c = contact();
        c.email = "jo@localhost".to_string();
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_validate_phone_digits() {
        let mut c = contact();
        c.phone = "123".to_string();
        assert!(c.validate().is_err());

        c.phone = "+61 (2) 9000 0000".to_string();
        assert!(c.validate().is_ok());

        c.phone = String::new();
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_webhook_body_uses_flat_contact_fields() {
        let body = webhook_body(&contact(), &summary(PurchaseOption::Purchase));

        assert_eq!(body["first_name"], "Jo");
        assert_eq!(body["full_name"], "Jo Citizen");
        assert_eq!(body["contact.fence_panel_type"], "builders");
        assert_eq!(body["contact.feet_option"], "feet");
        assert_eq!(body["contact.meters_required"], "100");
        assert_eq!(body["contact.purchase_or_hire"], "purchase");
        assert_eq!(body["contact.hire_duration"], "");
        assert_eq!(body["contact.number_of_panels"], 42);
        assert_eq!(body["contact.number_of_braces"], 6);
        assert_eq!(body["contact.quote_total"], "3375.35");
        assert_eq!(body["contact.delivery_distance_km"], 21.5);
        assert_eq!(body["contact.delivery_fee"], "100");
        assert_eq!(body["contact.delivery_estimated"], true);
    }

    #[test]
    fn test_webhook_body_records_hire_duration() {
        let body = webhook_body(&contact(), &summary(PurchaseOption::Hire));
        assert_eq!(body["contact.purchase_or_hire"], "hire");
        assert_eq!(body["contact.hire_duration"], "3 months");
    }

    #[test]
    fn test_rest_body_for_contact_form() {
        let mut c = contact();
        c.message = Some("Need fencing for a site next month".to_string());
        let body = rest_contact_body(&c, "loc-123", None);

        assert_eq!(body["firstName"], "Jo");
        assert_eq!(body["name"], "Jo Citizen");
        assert_eq!(body["locationId"], "loc-123");
        assert_eq!(body["source"], "Website Contact Form");
        assert_eq!(body["tags"], json!(["website-lead"]));
        assert_eq!(body["customField"]["message"], "Need fencing for a site next month");
    }

    #[test]
    fn test_rest_body_with_quote() {
        let body = rest_contact_body(&contact(), "loc-123", Some(&summary(PurchaseOption::Hire)));

        assert_eq!(body["source"], "Fencing Quote Calculator");
        assert_eq!(
            body["tags"],
            json!(["website-lead", "fencing-quote", "fence-builders", "hire"])
        );
        assert_eq!(body["customField"]["number_of_panels"], 42);
        assert!(body.get("companyName").is_none());
    }
}
