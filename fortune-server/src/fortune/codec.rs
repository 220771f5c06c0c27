//! Shareable link codec.
//!
//! A fortune travels in the result URL as `id`, `color`, `num` and `place`.
//! Color and place are written as display names rather than indices, and are
//! looked up in the active language first and then in the other one, so a link
//! made in one language still opens in the other.

use crate::error::LinkError;
use crate::fortune::catalog::{fortunes, lucky_colors, lucky_places, Language};
use crate::fortune::FortuneSelection;
use crate::routes::util::{encode_pairs, parse_query};

pub const KEY_ID: &str = "id";
pub const KEY_COLOR: &str = "color";
pub const KEY_NUMBER: &str = "num";
pub const KEY_PLACE: &str = "place";
/// Optional campaign tag forwarded into analytics, never needed to decode.
pub const KEY_UTM_SOURCE: &str = "utm_source";

/// Flat, ordered string mapping. Keys keep insertion order so the encoded
/// query string is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharableState {
    pairs: Vec<(String, String)>,
}

impl SharableState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string (with or without the leading `?`). Extra keys are kept.
    pub fn from_query(query: &str) -> Self {
        Self {
            pairs: parse_query(query),
        }
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set `key`, replacing an existing value in place.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Percent-encoded `key=value&...` form, without a leading `?`.
    pub fn to_query(&self) -> String {
        encode_pairs(&self.pairs)
    }
}

/// Encode a selection using the display names of `language`.
///
/// Fails only if the selection does not index into that language's lists;
/// it never yields a state with some fields missing.
pub fn encode(selection: &FortuneSelection, language: Language) -> Result<SharableState, LinkError> {
    if selection.fortune_id >= fortunes(language).len() {
        return Err(LinkError::OutOfRange {
            field: KEY_ID,
            index: selection.fortune_id,
        });
    }
    let color = lucky_colors(language)
        .get(selection.color_index)
        .ok_or(LinkError::OutOfRange {
            field: KEY_COLOR,
            index: selection.color_index,
        })?;
    let place = lucky_places(language)
        .get(selection.place_index)
        .ok_or(LinkError::OutOfRange {
            field: KEY_PLACE,
            index: selection.place_index,
        })?;

    let mut state = SharableState::new();
    state.insert(KEY_ID, selection.fortune_id.to_string());
    state.insert(KEY_COLOR, color.name);
    state.insert(KEY_NUMBER, selection.lucky_number.to_string());
    state.insert(KEY_PLACE, *place);
    Ok(state)
}

/// Decode a link while `language` is active.
pub fn decode(state: &SharableState, language: Language) -> Result<FortuneSelection, LinkError> {
    let id = require(state, KEY_ID)?;
    let color_name = require(state, KEY_COLOR)?;
    let num = require(state, KEY_NUMBER)?;
    let place_name = require(state, KEY_PLACE)?;

    let fortune_id: usize = parse_int(KEY_ID, id)?;
    let lucky_number: i64 = parse_int(KEY_NUMBER, num)?;

    let in_range = [language, language.other()]
        .iter()
        .any(|l| fortune_id < fortunes(*l).len());
    if !in_range {
        return Err(LinkError::OutOfRange {
            field: KEY_ID,
            index: fortune_id,
        });
    }

    let color_index = find_color(color_name, language)
        .or_else(|| find_color(color_name, language.other()))
        .ok_or_else(|| LinkError::UnknownColor(color_name.to_string()))?;
    let place_index = find_place(place_name, language)
        .or_else(|| find_place(place_name, language.other()))
        .ok_or_else(|| LinkError::UnknownPlace(place_name.to_string()))?;

    Ok(FortuneSelection {
        fortune_id,
        color_index,
        place_index,
        lucky_number,
    })
}

fn require<'a>(state: &'a SharableState, key: &'static str) -> Result<&'a str, LinkError> {
    state.get(key).ok_or(LinkError::MissingField(key))
}

fn parse_int<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, LinkError> {
    value.parse().map_err(|_| LinkError::InvalidInteger {
        field,
        value: value.to_string(),
    })
}

fn find_color(name: &str, language: Language) -> Option<usize> {
    lucky_colors(language).iter().position(|c| c.name == name)
}

fn find_place(name: &str, language: Language) -> Option<usize> {
    lucky_places(language).iter().position(|p| *p == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fortune::catalog::LUCKY_NUMBERS;
    use proptest::prelude::*;

    fn selection(fortune_id: usize, color_index: usize, place_index: usize, lucky_number: i64) -> FortuneSelection {
        FortuneSelection {
            fortune_id,
            color_index,
            place_index,
            lucky_number,
        }
    }

    fn any_language() -> impl Strategy<Value = Language> {
        prop_oneof![Just(Language::Ko), Just(Language::En)]
    }

    fn any_selection() -> impl Strategy<Value = FortuneSelection> {
        (
            0..fortunes(Language::Ko).len(),
            0..lucky_colors(Language::Ko).len(),
            0..lucky_places(Language::Ko).len(),
            prop::sample::select(LUCKY_NUMBERS.to_vec()),
        )
            .prop_map(|(f, c, p, n)| selection(f, c, p, n))
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(s in any_selection(), language in any_language()) {
            let state = encode(&s, language).unwrap();
            prop_assert_eq!(decode(&state, language).unwrap(), s);
        }

        #[test]
        fn decode_survives_language_switch(s in any_selection(), language in any_language()) {
            let state = encode(&s, language).unwrap();
            let decoded = decode(&state, language.other()).unwrap();
            prop_assert_eq!(decoded.fortune_id, s.fortune_id);
            prop_assert_eq!(decoded.lucky_number, s.lucky_number);
            prop_assert_eq!(decoded, s);
        }

        #[test]
        fn query_form_round_trips(s in any_selection(), language in any_language()) {
            let query = encode(&s, language).unwrap().to_query();
            let parsed = SharableState::from_query(&query);
            prop_assert_eq!(decode(&parsed, language).unwrap(), s);
        }
    }

    #[test]
    fn encodes_names_not_indices() {
        let state = encode(&selection(0, 0, 0, 7), Language::En).unwrap();
        assert_eq!(state.to_query(), "id=0&color=Red&num=7&place=Window+Seat");
        assert_eq!(state.len(), 4);
    }

    #[test]
    fn english_link_opens_while_korean_is_active() {
        let state = SharableState::from_query("id=0&color=Red&num=7&place=Window+Seat");
        let decoded = decode(&state, Language::Ko).unwrap();
        assert_eq!(decoded, selection(0, 0, 0, 7));
    }

    #[test]
    fn korean_link_opens_while_english_is_active() {
        let query = encode(&selection(3, 4, 5, 21), Language::Ko).unwrap().to_query();
        let decoded = decode(&SharableState::from_query(&query), Language::En).unwrap();
        assert_eq!(decoded, selection(3, 4, 5, 21));
    }

    #[test]
    fn missing_field_fails() {
        let state = SharableState::from_query("id=0&color=Red&place=Window+Seat");
        assert_eq!(decode(&state, Language::Ko), Err(LinkError::MissingField("num")));
    }

    #[test]
    fn non_integer_fields_fail() {
        let state = SharableState::from_query("id=zero&color=Red&num=7&place=Terrace");
        assert!(matches!(
            decode(&state, Language::En),
            Err(LinkError::InvalidInteger { field: "id", .. })
        ));

        let state = SharableState::from_query("id=1&color=Red&num=7abc&place=Terrace");
        assert!(matches!(
            decode(&state, Language::En),
            Err(LinkError::InvalidInteger { field: "num", .. })
        ));
    }

    #[test]
    fn negative_lucky_number_is_kept() {
        let state = SharableState::from_query("id=0&color=Red&num=-7&place=Terrace");
        assert_eq!(decode(&state, Language::En).unwrap(), selection(0, 0, 2, -7));
    }

    #[test]
    fn unknown_names_fail() {
        let state = SharableState::from_query("id=0&color=Teal&num=7&place=Terrace");
        assert_eq!(
            decode(&state, Language::En),
            Err(LinkError::UnknownColor("Teal".to_string()))
        );

        let state = SharableState::from_query("id=0&color=Red&num=7&place=Rooftop");
        assert_eq!(
            decode(&state, Language::Ko),
            Err(LinkError::UnknownPlace("Rooftop".to_string()))
        );
    }

    #[test]
    fn fortune_id_out_of_range_fails() {
        let state = SharableState::from_query("id=500&color=Red&num=7&place=Terrace");
        assert!(matches!(
            decode(&state, Language::Ko),
            Err(LinkError::OutOfRange { field: "id", index: 500 })
        ));
    }

    #[test]
    fn extra_keys_are_ignored() {
        let state = SharableState::from_query("?id=2&color=Blue&num=3&place=Terrace&utm_source=instagram");
        assert_eq!(state.get(KEY_UTM_SOURCE), Some("instagram"));
        assert_eq!(decode(&state, Language::En).unwrap(), selection(2, 4, 2, 3));
    }

    #[test]
    fn encode_rejects_invalid_selection() {
        assert!(encode(&selection(0, 99, 0, 7), Language::Ko).is_err());
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut state = SharableState::new();
        state.insert("a", "1");
        state.insert("b", "2");
        state.insert("a", "3");
        assert_eq!(state.to_query(), "a=3&b=2");
    }
}
