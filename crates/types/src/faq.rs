//! Frequently asked questions attached to doctors, hospitals and treatments.
//!
//! The backend carries FAQs in two shapes at once: five numbered column pairs
//! (`faq1_question`/`faq1_answer` .. `faq5_question`/`faq5_answer`) and a free-form `faqs`
//! array. [`FaqList`] merges both into one ordered list while decoding: numbered pairs first,
//! then array entries. A pair with a blank question or answer is dropped.
//!
//! `FaqList` is meant to be `#[serde(flatten)]`ed into the owning record so it sees every
//! field the record does not name itself.

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Number of numbered FAQ column pairs the backend exposes.
pub const NUMBERED_FAQ_SLOTS: usize = 5;

/// A single question and answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

impl Faq {
    fn from_parts(question: Option<&Value>, answer: Option<&Value>) -> Option<Self> {
        let question = question?.as_str()?.trim();
        let answer = answer?.as_str()?.trim();
        if question.is_empty() || answer.is_empty() {
            return None;
        }
        Some(Self {
            question: question.to_owned(),
            answer: answer.to_owned(),
        })
    }
}

/// Ordered FAQ entries for one record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FaqList(Vec<Faq>);

impl FaqList {
    pub fn new(entries: Vec<Faq>) -> Self {
        Self(entries)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Faq> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn from_fields(fields: &BTreeMap<String, Value>) -> Self {
        let mut entries = Vec::new();

        for slot in 1..=NUMBERED_FAQ_SLOTS {
            let question = fields.get(&format!("faq{slot}_question"));
            let answer = fields.get(&format!("faq{slot}_answer"));
            entries.extend(Faq::from_parts(question, answer));
        }

        if let Some(Value::Array(items)) = fields.get("faqs") {
            for item in items {
                entries.extend(Faq::from_parts(item.get("question"), item.get("answer")));
            }
        }

        Self(entries)
    }
}

impl<'a> IntoIterator for &'a FaqList {
    type Item = &'a Faq;
    type IntoIter = std::slice::Iter<'a, Faq>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for FaqList {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("faqs", &self.0)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for FaqList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = BTreeMap::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_fields(&fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize, Serialize)]
    struct Holder {
        id: i64,
        #[serde(flatten)]
        faqs: FaqList,
    }

    #[test]
    fn test_numbered_pairs_come_before_array_entries() {
        let holder: Holder = serde_json::from_value(json!({
            "id": 7,
            "faq2_question": "Is parking available?",
            "faq2_answer": "Yes",
            "faq1_question": "Do you accept insurance?",
            "faq1_answer": "Most providers",
            "faqs": [{"question": "Visiting hours?", "answer": "9 to 5"}]
        }))
        .expect("decode");

        let questions: Vec<&str> = holder.faqs.iter().map(|f| f.question.as_str()).collect();
        assert_eq!(
            questions,
            vec!["Do you accept insurance?", "Is parking available?", "Visiting hours?"]
        );
    }

    #[test]
    fn test_incomplete_pairs_are_dropped() {
        let holder: Holder = serde_json::from_value(json!({
            "id": 1,
            "faq1_question": "Question without answer",
            "faq3_question": "  ",
            "faq3_answer": "Answer without question",
            "faqs": [{"question": "Only a question"}, "not an object"]
        }))
        .expect("decode");

        assert!(holder.faqs.is_empty());
    }

    #[test]
    fn test_serialised_form_reads_back_identically() {
        let holder: Holder = serde_json::from_value(json!({
            "id": 2,
            "faq1_question": "Q",
            "faq1_answer": "A"
        }))
        .expect("decode");

        let encoded = serde_json::to_value(&holder).expect("encode");
        assert_eq!(encoded["faqs"][0]["question"], "Q");

        let decoded: Holder = serde_json::from_value(encoded).expect("re-decode");
        assert_eq!(decoded.faqs, holder.faqs);
    }
}
