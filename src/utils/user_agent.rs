//! Device and browser classification from a User-Agent header.

use woothee::parser::Parser;

use crate::domain::entities::{DeviceClass, UNKNOWN};

/// Device class and browser name derived from a User-Agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientProfile {
    pub device: DeviceClass,
    pub browser: String,
}

impl ClientProfile {
    fn unknown() -> Self {
        Self {
            device: DeviceClass::Unknown,
            browser: UNKNOWN.to_string(),
        }
    }
}

/// Classifies a User-Agent string.
///
/// Woothee has no tablet category, so tablets are recognized first by
/// marker: iPads, anything announcing "Tablet", and Android without "Mobile".
pub fn classify(user_agent: Option<&str>) -> ClientProfile {
    let Some(ua) = user_agent.map(str::trim).filter(|ua| !ua.is_empty()) else {
        return ClientProfile::unknown();
    };

    let Some(parsed) = Parser::new().parse(ua) else {
        return ClientProfile::unknown();
    };

    let browser = if parsed.name.is_empty() || parsed.name == "UNKNOWN" {
        UNKNOWN.to_string()
    } else {
        parsed.name.to_string()
    };

    let device = if is_tablet(ua) {
        DeviceClass::Tablet
    } else {
        match parsed.category {
            "smartphone" | "mobilephone" => DeviceClass::Mobile,
            "pc" | "appliance" => DeviceClass::Desktop,
            _ => DeviceClass::Unknown,
        }
    };

    ClientProfile { device, browser }
}

fn is_tablet(ua: &str) -> bool {
    ua.contains("iPad")
        || ua.contains("Tablet")
        || (ua.contains("Android") && !ua.contains("Mobile"))
}
