//! Serialization and deserialization for cards
//!
//! Cards travel as their integer index so that the browser can sort and
//! render them without knowing the token alphabet. Deserialization also
//! accepts the "QH" token form for hand-written requests.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::cards_types::{Card, Suit};

impl Serialize for Suit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = match self {
            Suit::Clubs => "CLUBS",
            Suit::Diamonds => "DIAMONDS",
            Suit::Hearts => "HEARTS",
            Suit::Spades => "SPADES",
        };
        serializer.serialize_str(s)
    }
}

impl Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.index())
    }
}

struct CardVisitor;

impl Visitor<'_> for CardVisitor {
    type Value = Card;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("a card index 0..52 or a two-character card token")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Card, E> {
        let index = u8::try_from(v).map_err(|_| E::custom(format!("Parse card: {v}")))?;
        Card::from_index(index).map_err(|e| E::custom(e.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Card, E> {
        let index = u64::try_from(v).map_err(|_| E::custom(format!("Parse card: {v}")))?;
        self.visit_u64(index)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Card, E> {
        v.parse::<Card>().map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(CardVisitor)
    }
}
