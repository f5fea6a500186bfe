//! Three-step order wizard
//!
//! The order form collects a draft in three steps: logistics, design and
//! contact details. A step is only left forward when every field on it
//! validates; going back is always allowed. [`finalize`] re-checks all
//! three steps and prices the order.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::catalog::{self, TimeSlot};
use crate::error::FieldErrors;
use crate::models::{FulfillmentType, Order, OrderStatus};
use crate::pricing;
use crate::{Error, Result};

/// Longest message that still fits on a cake
pub const MAX_MESSAGE_CHARS: usize = 80;

/// Upper bound on an inline inspiration image (data URL length)
pub const MAX_INSPIRATION_IMAGE_BYTES: usize = 5 * 1024 * 1024;

static HTTP_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://[^\s/$.?#][^\s]*$").expect("url regex is valid"));

/// Steps of the order form, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WizardStep {
    Logistics = 1,
    Design = 2,
    Contact = 3,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [WizardStep::Logistics, WizardStep::Design, WizardStep::Contact];

    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(WizardStep::Logistics),
            2 => Some(WizardStep::Design),
            3 => Some(WizardStep::Contact),
            _ => None,
        }
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(&self) -> Option<Self> {
        Self::from_number(self.number().saturating_sub(1))
    }
}

/// Order form contents as submitted by a client
///
/// Every field is optional on the wire so that partially filled steps can be
/// validated. Dates and time slots stay as text until validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderDraft {
    pub fulfillment_type: FulfillmentType,
    pub postcode: Option<String>,
    pub address: Option<String>,
    /// `YYYY-MM-DD`
    pub delivery_date: Option<String>,
    pub delivery_time_slot: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub flavor: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub size: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub message_on_cake: String,
    pub inspiration_image: Option<String>,
    pub inspiration_link: Option<String>,
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Default for OrderDraft {
    fn default() -> Self {
        Self {
            fulfillment_type: FulfillmentType::Collection,
            postcode: None,
            address: None,
            delivery_date: None,
            delivery_time_slot: None,
            flavor: catalog::default_flavor().to_string(),
            size: catalog::default_size().label.to_string(),
            message_on_cake: String::new(),
            inspiration_image: None,
            inspiration_link: None,
            customer_name: None,
            phone: None,
            email: None,
        }
    }
}

impl OrderDraft {
    /// Switch fulfillment type; collection drops any delivery postcode
    pub fn set_fulfillment(&mut self, fulfillment: FulfillmentType) {
        self.fulfillment_type = fulfillment;
        if fulfillment == FulfillmentType::Collection {
            self.postcode = None;
        }
    }

    /// Normalized postcode, only meaningful for delivery
    pub fn delivery_postcode(&self) -> Option<String> {
        match self.fulfillment_type {
            FulfillmentType::Delivery => non_blank(&self.postcode).map(pricing::normalize_postcode),
            FulfillmentType::Collection => None,
        }
    }

    /// Delivery fee for the current logistics choice, zero when unresolvable
    pub fn delivery_fee_pence(&self) -> i64 {
        pricing::delivery_fee(self.fulfillment_type, self.delivery_postcode().as_deref()).unwrap_or(0)
    }
}

/// Cleared form fields arrive as `null`
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn check_logistics(draft: &OrderDraft, today: NaiveDate, errors: &mut FieldErrors) {
    match non_blank(&draft.delivery_date) {
        None => {
            errors.insert("delivery_date".into(), "Choose a delivery date".into());
        }
        Some(raw) => match parse_date(raw) {
            None => {
                errors.insert("delivery_date".into(), "Delivery date must be YYYY-MM-DD".into());
            }
            Some(date) if date < today => {
                errors.insert("delivery_date".into(), "Delivery date cannot be in the past".into());
            }
            Some(_) => {}
        },
    }

    match non_blank(&draft.delivery_time_slot) {
        None => {
            errors.insert("delivery_time_slot".into(), "Choose a time slot".into());
        }
        Some(raw) => {
            if raw.parse::<TimeSlot>().is_err() {
                errors.insert("delivery_time_slot".into(), format!("Unknown time slot: {}", raw));
            }
        }
    }

    if draft.fulfillment_type == FulfillmentType::Delivery {
        match non_blank(&draft.postcode) {
            None => {
                errors.insert("postcode".into(), "A postcode is required for delivery".into());
            }
            Some(pc) if !pricing::is_valid_uk_postcode(pc) => {
                errors.insert("postcode".into(), "Invalid UK postcode".into());
            }
            Some(_) => {}
        }
    }
}

fn check_design(draft: &OrderDraft, errors: &mut FieldErrors) {
    if !catalog::is_known_flavor(&draft.flavor) {
        errors.insert("flavor".into(), format!("Unknown flavor: {}", draft.flavor));
    }
    if catalog::find_size(&draft.size).is_none() {
        errors.insert("size".into(), format!("Unknown cake size: {}", draft.size));
    }
    if draft.message_on_cake.trim().chars().count() > MAX_MESSAGE_CHARS {
        errors.insert(
            "message_on_cake".into(),
            format!("Message must be at most {} characters", MAX_MESSAGE_CHARS),
        );
    }
    if let Some(link) = non_blank(&draft.inspiration_link) {
        if !HTTP_URL.is_match(link) {
            errors.insert("inspiration_link".into(), "Inspiration link must be an http(s) URL".into());
        }
    }
    if let Some(image) = non_blank(&draft.inspiration_image) {
        if !image.starts_with("data:image/") {
            errors.insert("inspiration_image".into(), "Inspiration image must be an image data URL".into());
        } else if image.len() > MAX_INSPIRATION_IMAGE_BYTES {
            errors.insert("inspiration_image".into(), "Inspiration image is too large".into());
        }
    }
}

fn check_contact(draft: &OrderDraft, errors: &mut FieldErrors) {
    if non_blank(&draft.customer_name).is_none() {
        errors.insert("customer_name".into(), "Name is required".into());
    }
    if non_blank(&draft.phone).is_none() {
        errors.insert("phone".into(), "Phone number is required".into());
    }
    if let Some(email) = non_blank(&draft.email) {
        if !email.contains('@') {
            errors.insert("email".into(), "Email address looks invalid".into());
        }
    }
}

fn into_result(errors: FieldErrors) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(errors))
    }
}

/// Validate the fields of one step, collecting every failure
pub fn validate_step(step: WizardStep, draft: &OrderDraft, today: NaiveDate) -> Result<()> {
    let mut errors = FieldErrors::new();
    match step {
        WizardStep::Logistics => check_logistics(draft, today, &mut errors),
        WizardStep::Design => check_design(draft, &mut errors),
        WizardStep::Contact => check_contact(draft, &mut errors),
    }
    into_result(errors)
}

/// Validate all steps at once
pub fn validate_all(draft: &OrderDraft, today: NaiveDate) -> Result<()> {
    let mut errors = FieldErrors::new();
    check_logistics(draft, today, &mut errors);
    check_design(draft, &mut errors);
    check_contact(draft, &mut errors);
    into_result(errors)
}

/// Order form position plus the draft being filled in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wizard {
    pub step: WizardStep,
    pub draft: OrderDraft,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new(OrderDraft::default())
    }
}

impl Wizard {
    pub fn new(draft: OrderDraft) -> Self {
        Self {
            step: WizardStep::Logistics,
            draft,
        }
    }

    /// Move to the next step if the current one validates
    ///
    /// On the last step this only validates; use [`finalize`] to submit.
    pub fn advance(&mut self, today: NaiveDate) -> Result<WizardStep> {
        validate_step(self.step, &self.draft, today)?;
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    /// Move to the previous step, staying on the first
    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    pub fn is_last_step(&self) -> bool {
        self.step.next().is_none()
    }
}

/// Validate and price a draft, producing a new pending order
pub fn finalize(draft: &OrderDraft, today: NaiveDate, now: DateTime<Utc>) -> Result<Order> {
    validate_all(draft, today)?;

    let postcode = draft.delivery_postcode();
    let quote = pricing::quote(draft.fulfillment_type, postcode.as_deref(), &draft.size)?;

    let delivery_date = non_blank(&draft.delivery_date)
        .and_then(parse_date)
        .ok_or_else(|| Error::Internal("validated delivery date failed to parse".to_string()))?;
    let delivery_time_slot = non_blank(&draft.delivery_time_slot)
        .ok_or_else(|| Error::Internal("validated time slot missing".to_string()))?
        .parse::<TimeSlot>()?;

    let address = match draft.fulfillment_type {
        FulfillmentType::Delivery => non_blank(&draft.address).map(str::to_string),
        FulfillmentType::Collection => None,
    };

    Ok(Order {
        id: Uuid::new_v4(),
        customer_name: non_blank(&draft.customer_name).unwrap_or_default().to_string(),
        email: non_blank(&draft.email).map(str::to_string),
        phone: non_blank(&draft.phone).unwrap_or_default().to_string(),
        fulfillment_type: draft.fulfillment_type,
        postcode,
        address,
        delivery_fee_pence: quote.delivery_fee_pence,
        delivery_date,
        delivery_time_slot,
        flavor: draft.flavor.clone(),
        size: quote.size,
        message_on_cake: draft.message_on_cake.trim().to_string(),
        inspiration_image: non_blank(&draft.inspiration_image).map(str::to_string),
        inspiration_link: non_blank(&draft.inspiration_link).map(str::to_string),
        total_price_pence: quote.total_pence,
        status: OrderStatus::Pending,
        created_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn complete_draft() -> OrderDraft {
        OrderDraft {
            fulfillment_type: FulfillmentType::Delivery,
            postcode: Some("ta1 1aa".to_string()),
            address: Some("12 High Street".to_string()),
            delivery_date: Some("2026-03-14".to_string()),
            delivery_time_slot: Some("Afternoon".to_string()),
            flavor: "Rich Belgian Chocolate".to_string(),
            size: "Large (10\")".to_string(),
            message_on_cake: "Happy 30th Sam".to_string(),
            customer_name: Some("Sam Taylor".to_string()),
            phone: Some("07700 900123".to_string()),
            ..OrderDraft::default()
        }
    }

    fn field_errors(result: Result<()>) -> FieldErrors {
        match result {
            Err(Error::Validation(fields)) => fields,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_step_numbers() {
        assert_eq!(WizardStep::from_number(2), Some(WizardStep::Design));
        assert_eq!(WizardStep::from_number(0), None);
        assert_eq!(WizardStep::Contact.next(), None);
        assert_eq!(WizardStep::Logistics.previous(), None);
    }

    #[test]
    fn test_empty_logistics_reports_every_field() {
        let draft = OrderDraft {
            fulfillment_type: FulfillmentType::Delivery,
            ..OrderDraft::default()
        };
        let errors = field_errors(validate_step(WizardStep::Logistics, &draft, today()));
        assert!(errors.contains_key("delivery_date"));
        assert!(errors.contains_key("delivery_time_slot"));
        assert!(errors.contains_key("postcode"));
    }

    #[test]
    fn test_collection_needs_no_postcode() {
        let draft = OrderDraft {
            delivery_date: Some("2026-03-10".to_string()),
            delivery_time_slot: Some("Morning".to_string()),
            ..OrderDraft::default()
        };
        assert!(validate_step(WizardStep::Logistics, &draft, today()).is_ok());
    }

    #[test]
    fn test_past_date_rejected() {
        let mut draft = complete_draft();
        draft.delivery_date = Some("2026-03-09".to_string());
        let errors = field_errors(validate_step(WizardStep::Logistics, &draft, today()));
        assert_eq!(errors["delivery_date"], "Delivery date cannot be in the past");
    }

    #[test]
    fn test_invalid_postcode_rejected() {
        let mut draft = complete_draft();
        draft.postcode = Some("ZZZ".to_string());
        let errors = field_errors(validate_step(WizardStep::Logistics, &draft, today()));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["postcode"], "Invalid UK postcode");
    }

    #[test]
    fn test_design_rejects_unknown_choices() {
        let mut draft = complete_draft();
        draft.flavor = "Marmite".to_string();
        draft.size = "Enormous".to_string();
        draft.inspiration_link = Some("pinterest board".to_string());
        let errors = field_errors(validate_step(WizardStep::Design, &draft, today()));
        assert!(errors.contains_key("flavor"));
        assert!(errors.contains_key("size"));
        assert!(errors.contains_key("inspiration_link"));
    }

    #[test]
    fn test_message_length_limit() {
        let mut draft = complete_draft();
        draft.message_on_cake = "x".repeat(MAX_MESSAGE_CHARS + 1);
        let errors = field_errors(validate_step(WizardStep::Design, &draft, today()));
        assert!(errors.contains_key("message_on_cake"));
    }

    #[test]
    fn test_inspiration_image_must_be_data_url() {
        let mut draft = complete_draft();
        draft.inspiration_image = Some("https://example.com/cake.png".to_string());
        assert!(validate_step(WizardStep::Design, &draft, today()).is_err());

        draft.inspiration_image = Some("data:image/png;base64,iVBORw0KGgo=".to_string());
        assert!(validate_step(WizardStep::Design, &draft, today()).is_ok());
    }

    #[test]
    fn test_inspiration_image_size_limit() {
        let header = "data:image/jpeg;base64,";
        let mut draft = complete_draft();

        draft.inspiration_image = Some(format!(
            "{}{}",
            header,
            "A".repeat(MAX_INSPIRATION_IMAGE_BYTES - header.len())
        ));
        assert!(validate_step(WizardStep::Design, &draft, today()).is_ok());

        draft.inspiration_image = Some(format!(
            "{}{}",
            header,
            "A".repeat(MAX_INSPIRATION_IMAGE_BYTES)
        ));
        let errors = field_errors(validate_step(WizardStep::Design, &draft, today()));
        assert_eq!(errors["inspiration_image"], "Inspiration image is too large");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_draft_accepts_null_text_fields() {
        let draft: OrderDraft = serde_json::from_str(
            r#"{"fulfillment_type": "Collection", "message_on_cake": null, "flavor": null}"#,
        )
        .unwrap();
        assert_eq!(draft.message_on_cake, "");
        assert_eq!(draft.flavor, "");
        assert_eq!(draft.size, catalog::default_size().label);

        let errors = field_errors(validate_step(WizardStep::Design, &draft, today()));
        assert!(errors.contains_key("flavor"));
        assert!(!errors.contains_key("message_on_cake"));
    }

    #[test]
    fn test_contact_requires_name_and_phone() {
        let mut draft = complete_draft();
        draft.customer_name = Some("   ".to_string());
        draft.phone = None;
        draft.email = Some("not-an-email".to_string());
        let errors = field_errors(validate_step(WizardStep::Contact, &draft, today()));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_wizard_gates_on_current_step() {
        let mut wizard = Wizard::default();
        assert!(wizard.advance(today()).is_err());
        assert_eq!(wizard.step, WizardStep::Logistics);

        wizard.draft = complete_draft();
        assert_eq!(wizard.advance(today()).unwrap(), WizardStep::Design);
        assert_eq!(wizard.advance(today()).unwrap(), WizardStep::Contact);
        assert!(wizard.is_last_step());
        assert_eq!(wizard.advance(today()).unwrap(), WizardStep::Contact);
    }

    #[test]
    fn test_wizard_back_stops_at_first_step() {
        let mut wizard = Wizard::new(complete_draft());
        wizard.advance(today()).unwrap();
        assert_eq!(wizard.back(), WizardStep::Logistics);
        assert_eq!(wizard.back(), WizardStep::Logistics);
    }

    #[test]
    fn test_switching_to_collection_clears_postcode() {
        let mut draft = complete_draft();
        assert_eq!(draft.delivery_fee_pence(), 500);
        draft.set_fulfillment(FulfillmentType::Collection);
        assert_eq!(draft.postcode, None);
        assert_eq!(draft.delivery_fee_pence(), 0);
    }

    #[test]
    fn test_finalize_prices_order() {
        let now = Utc::now();
        let order = finalize(&complete_draft(), today(), now).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.postcode.as_deref(), Some("TA1 1AA"));
        assert_eq!(order.delivery_fee_pence, 500);
        assert_eq!(order.total_price_pence, 8_500 + 500);
        assert_eq!(order.delivery_time_slot, TimeSlot::Afternoon);
        assert_eq!(order.created_at, now);
    }

    #[test]
    fn test_finalize_collection_drops_address() {
        let mut draft = complete_draft();
        draft.set_fulfillment(FulfillmentType::Collection);
        let order = finalize(&draft, today(), Utc::now()).unwrap();
        assert_eq!(order.delivery_fee_pence, 0);
        assert_eq!(order.address, None);
        assert_eq!(order.total_price_pence, 8_500);
    }

    #[test]
    fn test_finalize_reports_all_steps() {
        let draft = OrderDraft::default();
        let err = finalize(&draft, today(), Utc::now()).unwrap_err();
        match err {
            Error::Validation(fields) => {
                assert!(fields.contains_key("delivery_date"));
                assert!(fields.contains_key("customer_name"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
