//! WhatsApp deep links for measurement appointments

use crate::config::ShareConfig;
use crate::core::error::DeskResult;
use crate::core::field::parse_calendar_date;
use crate::entities::{Measurement, User};
use regex::Regex;
use std::sync::OnceLock;
use tera::{Context, Tera};

const LINK_TEMPLATE: &str = "{{ base_url }}?phone={{ phone }}&text={{ message | urlencode_strict }}";

/// Device the link is opened on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Mobile,
    Desktop,
}

impl Platform {
    /// Phones and tablets get the app link, everything else the web client
    pub fn from_user_agent(user_agent: &str) -> Self {
        static MOBILE: OnceLock<Regex> = OnceLock::new();
        let mobile = MOBILE.get_or_init(|| Regex::new(r"(?i)iPhone|Android|iPad").unwrap());
        if mobile.is_match(user_agent) {
            Platform::Mobile
        } else {
            Platform::Desktop
        }
    }
}

/// A ready-to-open link with its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhatsAppLink {
    /// Country code followed by the assignee's digits
    pub phone: String,
    pub message: String,
    pub url: String,
}

impl WhatsAppLink {
    /// Link with the built-in share settings
    pub fn build(
        assignee: &User,
        measurement: &Measurement,
        platform: Platform,
    ) -> DeskResult<Option<Self>> {
        Self::build_with(&ShareConfig::default(), assignee, measurement, platform)
    }

    /// Link for `measurement` addressed to `assignee`
    ///
    /// Returns `None` when the assignee's phone has no digits.
    pub fn build_with(
        config: &ShareConfig,
        assignee: &User,
        measurement: &Measurement,
        platform: Platform,
    ) -> DeskResult<Option<Self>> {
        let digits = assignee.phone_digits();
        if digits.is_empty() {
            return Ok(None);
        }
        let phone = format!("{}{}", config.country_code, digits);

        let mut context = Context::new();
        context.insert("first_name", &assignee.first_name);
        context.insert("last_name", &assignee.last_name);
        context.insert("customer_name", &measurement.customer_name);
        context.insert("customer_mobile", &measurement.customer_mobile);
        context.insert(
            "customer_address",
            measurement
                .customer_address
                .as_deref()
                .filter(|a| !a.is_empty())
                .unwrap_or("N/A"),
        );
        context.insert("measurement_date", &display_date(measurement.measurement_date.as_deref()));
        let message = Tera::one_off(&config.template, &context, false)?;

        let base_url = match platform {
            Platform::Mobile => &config.mobile_base_url,
            Platform::Desktop => &config.web_base_url,
        };
        let mut link_context = Context::new();
        link_context.insert("base_url", base_url);
        link_context.insert("phone", &phone);
        link_context.insert("message", &message);
        let url = Tera::one_off(LINK_TEMPLATE, &link_context, false)?;

        tracing::debug!(phone = %phone, ?platform, "built share link");
        Ok(Some(Self { phone, message, url }))
    }
}

/// `DD/MM/YYYY`, or `N/A` when missing or unreadable
fn display_date(date: Option<&str>) -> String {
    date.and_then(parse_calendar_date)
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}
