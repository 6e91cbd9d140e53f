//! Telegram Stars subscription plans.

use crate::transport::Invoice;

pub const STARS_CURRENCY: &str = "XTR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    pub months: u32,
    pub stars: u32,
    pub days: i64,
}

pub const PLANS: [Plan; 4] = [
    Plan { months: 1, stars: 250, days: 30 },
    Plan { months: 3, stars: 550, days: 90 },
    Plan { months: 6, stars: 950, days: 180 },
    Plan { months: 12, stars: 1750, days: 365 },
];

pub fn plan_for(months: u32) -> Option<Plan> {
    PLANS.iter().copied().find(|p| p.months == months)
}

impl Plan {
    pub fn payload(&self) -> String {
        format!("sub_{}m", self.months)
    }

    pub fn title(&self) -> String {
        format!("Subscription for {} mo.", self.months)
    }

    pub fn invoice(&self) -> Invoice {
        let description = if self.months == 1 {
            "Subscription payment for 1 month".to_string()
        } else {
            format!("Subscription payment for {} months", self.months)
        };
        Invoice {
            title: self.title(),
            description,
            payload: self.payload(),
            currency: STARS_CURRENCY.to_string(),
            amount: self.stars,
        }
    }
}

/// Month count from an invoice payload of the form `sub_<months>m`
/// (case-insensitive, surrounding whitespace ignored).
pub fn months_from_payload(payload: &str) -> Option<u32> {
    let payload = payload.trim().to_lowercase();
    let digits = payload.strip_prefix("sub_")?.strip_suffix('m')?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
