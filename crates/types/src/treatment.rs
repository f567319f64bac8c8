use crate::faq::FaqList;
use crate::image::Image;
use crate::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Treatment record as served by `GET /api/v1/treatments`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Treatment {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub treatment_type: Option<String>,
    #[serde(default)]
    pub price_min: Option<f64>,
    #[serde(default)]
    pub price_max: Option<f64>,
    #[serde(default)]
    pub price_exact: Option<f64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub hospital_id: Option<EntityId>,
    #[serde(default)]
    pub other_hospital_name: Option<String>,
    #[serde(default)]
    pub doctor_id: Option<EntityId>,
    #[serde(default)]
    pub other_doctor_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_ayushman: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default, with = "crate::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(flatten)]
    pub faqs: FaqList,
}

impl Treatment {
    /// Display price: the exact price, else the min/max range, else "Price on request".
    pub fn price_label(&self) -> String {
        match (self.price_exact, self.price_min, self.price_max) {
            (Some(exact), _, _) if exact > 0.0 => format!("₹{}", group_thousands(exact)),
            (_, Some(min), Some(max)) if min > 0.0 && max > 0.0 => {
                format!("₹{} - ₹{}", group_thousands(min), group_thousands(max))
            }
            _ => "Price on request".to_owned(),
        }
    }
}

fn group_thousands(amount: f64) -> String {
    let digits = format!("{:.0}", amount.round().abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn treatment(exact: Option<f64>, min: Option<f64>, max: Option<f64>) -> Treatment {
        let mut t: Treatment =
            serde_json::from_value(json!({"id": 1, "name": "Knee replacement"})).expect("decode");
        t.price_exact = exact;
        t.price_min = min;
        t.price_max = max;
        t
    }

    #[test]
    fn test_price_label_prefers_exact_price() {
        assert_eq!(
            treatment(Some(250000.0), Some(1.0), Some(2.0)).price_label(),
            "₹250,000"
        );
    }

    #[test]
    fn test_price_label_formats_range() {
        assert_eq!(
            treatment(None, Some(90000.0), Some(1500000.0)).price_label(),
            "₹90,000 - ₹1,500,000"
        );
    }

    #[test]
    fn test_price_label_without_prices() {
        assert_eq!(treatment(None, Some(5.0), None).price_label(), "Price on request");
        assert_eq!(treatment(Some(0.0), None, None).price_label(), "Price on request");
    }
}
