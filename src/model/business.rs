// src/model/business.rs
use super::Photo;
use serde::{Deserialize, Serialize};

/// Happy-hour deals offered on one day of the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealInfo {
    pub id: String,
    #[serde(default)]
    pub business_id: String,
    /// 0 = Sunday ... 6 = Saturday.
    pub day_of_week: u32,
    /// `HH:MM`, 24-hour clock.
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub deals: Vec<String>,
}

/// A bar or restaurant listed on Hoppy Hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub address: String,
    pub phone_number: Option<String>,
    pub price_level: Option<u8>,
    pub is_bar: Option<bool>,
    pub is_restaurant: Option<bool>,
    pub url: Option<String>,
    pub rating_overall: Option<f64>,
    pub rating_yelp: Option<f64>,
    pub rating_google: Option<f64>,
    pub operating_hours: Option<String>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub deal_info: Vec<DealInfo>,
}

impl Business {
    /// The photo flagged main, else the first photo.
    pub fn main_photo(&self) -> Option<&Photo> {
        self.photos
            .iter()
            .find(|p| p.main_photo)
            .or_else(|| self.photos.first())
    }

    /// Deals running on `weekday` (0 = Sunday), earliest first.
    pub fn deals_on(&self, weekday: u32) -> Vec<&DealInfo> {
        let mut deals: Vec<&DealInfo> = self
            .deal_info
            .iter()
            .filter(|deal| deal.day_of_week == weekday)
            .collect();
        deals.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        deals
    }

    /// Deals running today in local time.
    pub fn deals_today(&self) -> Vec<&DealInfo> {
        use chrono::Datelike;
        self.deals_on(chrono::Local::now().weekday().num_days_from_sunday())
    }

    /// `"$$"` for price level 2; `None` when unknown or zero.
    pub fn price_label(&self) -> Option<String> {
        match self.price_level {
            Some(level) if level > 0 => Some("$".repeat(level as usize)),
            _ => None,
        }
    }

    /// `"Bar • Restaurant"`, `"Bar"`, ... or `None`.
    pub fn category_label(&self) -> Option<String> {
        let mut labels = Vec::new();
        if self.is_bar == Some(true) {
            labels.push("Bar");
        }
        if self.is_restaurant == Some(true) {
            labels.push("Restaurant");
        }
        if labels.is_empty() {
            None
        } else {
            Some(labels.join(" • "))
        }
    }
}

/// Renders `"17:30"` as `"5:30 PM"`. Unparseable input is returned as-is.
pub fn format_deal_time(time: &str) -> String {
    let time = time.trim();
    if time.is_empty() {
        return String::new();
    }

    let (hours, minutes) = match time.split_once(':') {
        Some((h, m)) => (h, Some(m)),
        None => (time, None),
    };
    let Ok(hour) = hours.parse::<u32>() else {
        return time.to_string();
    };

    let meridiem = if hour >= 12 { "PM" } else { "AM" };
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    match minutes.filter(|m| !m.is_empty()) {
        Some(m) => format!("{}:{} {}", hour12, m, meridiem),
        None => format!("{} {}", hour12, meridiem),
    }
}

/// Joins deal descriptions with `" • "`; `None` when there are none.
pub fn format_deals(deals: &[String]) -> Option<String> {
    if deals.is_empty() {
        None
    } else {
        Some(deals.join(" • "))
    }
}
